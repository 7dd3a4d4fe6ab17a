//! Login gate consulted when an authenticated view is entered.

use tracing::debug;

/// Answers whether the current user is signed in. Backed by whatever the
/// host stores the flag in.
pub trait SessionGate {
    fn is_logged_in(&self) -> bool;
}

/// Fixed answer, for the CLI and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticGate(pub bool);

impl SessionGate for StaticGate {
    fn is_logged_in(&self) -> bool {
        self.0
    }
}

/// Outcome of entering a gated view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    RedirectToLogin,
}

pub fn check_access(gate: &impl SessionGate, view: &str) -> Access {
    if gate.is_logged_in() {
        Access::Granted
    } else {
        debug!(view, "not logged in; redirecting");
        Access::RedirectToLogin
    }
}
