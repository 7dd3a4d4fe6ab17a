//! Login flag kept in `localStorage`.

use gloo::storage::{LocalStorage, Storage};
use stepviz::SessionGate;

const LOGIN_KEY: &str = "isLoggedIn";

#[derive(Clone, Copy, Default, PartialEq)]
pub struct LocalStorageGate;

impl LocalStorageGate {
    pub fn log_in(&self) {
        if let Err(e) = LocalStorage::set(LOGIN_KEY, true) {
            gloo::console::warn!(format!("could not store login flag: {e}"));
        }
    }

    pub fn log_out(&self) {
        LocalStorage::delete(LOGIN_KEY);
    }
}

impl SessionGate for LocalStorageGate {
    fn is_logged_in(&self) -> bool {
        LocalStorage::get::<bool>(LOGIN_KEY).unwrap_or(false)
    }
}
