//! One-shot timers for auto-play.
//!
//! The controller never sleeps. It asks a [`Scheduler`] to deliver a
//! [`TickToken`] after a delay and keeps the returned handle; dropping the
//! handle cancels the tick. Delivering the token back to
//! [`PlaybackController::tick`](crate::PlaybackController::tick) is the
//! host's job: a browser timeout callback in the web UI, a polling loop in
//! the CLI, or a test calling [`ManualScheduler::advance`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::trace;

/// Identifies one scheduled tick.
///
/// `generation` changes whenever a sequence is loaded or the controller is
/// reset; `epoch` changes whenever a timer is armed or cancelled. A tick is
/// honoured only if both still match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken {
    pub generation: u64,
    pub epoch: u64,
}

/// Source of delayed ticks.
pub trait Scheduler {
    /// Pending-tick guard. Dropping it must cancel the tick if it has not
    /// fired yet.
    type Handle;

    fn schedule(&mut self, after: Duration, token: TickToken) -> Self::Handle;
}

// ---------------------------------------------------------------------------
// Virtual clock
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Pending {
    id: u64,
    due: Duration,
    token: TickToken,
}

#[derive(Debug, Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

/// Deterministic scheduler over a virtual clock.
///
/// Clones share one clock, so a test can hand one clone to the controller
/// and keep another to drive time.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

/// Cancels its tick on drop.
#[derive(Debug)]
pub struct ManualHandle {
    id: u64,
    clock: Weak<RefCell<Clock>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        if let Some(clock) = self.clock.upgrade()
            && let Ok(mut clock) = clock.try_borrow_mut()
        {
            clock.pending.retain(|p| p.id != self.id);
        }
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Number of ticks scheduled and not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.clock.borrow().pending.len()
    }

    /// Delay from now until the earliest pending tick.
    pub fn next_due(&self) -> Option<Duration> {
        let clock = self.clock.borrow();
        clock
            .pending
            .iter()
            .map(|p| p.due.saturating_sub(clock.now))
            .min()
    }

    /// Move the clock forward and return the tokens that came due, earliest
    /// first. Returned ticks are no longer pending; the caller delivers them.
    pub fn advance(&self, by: Duration) -> Vec<TickToken> {
        let mut clock = self.clock.borrow_mut();
        clock.now = clock.now.saturating_add(by);
        let now = clock.now;
        let mut due: Vec<Pending> = Vec::new();
        let mut i = 0;
        while i < clock.pending.len() {
            if clock.pending[i].due <= now {
                due.push(clock.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|p| (p.due, p.id));
        due.into_iter().map(|p| p.token).collect()
    }

    /// Advance exactly to the earliest pending tick, if any.
    pub fn fire_next(&self) -> Option<TickToken> {
        let wait = self.next_due()?;
        self.advance(wait).into_iter().next()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&mut self, after: Duration, token: TickToken) -> ManualHandle {
        let mut clock = self.clock.borrow_mut();
        let id = clock.next_id;
        clock.next_id += 1;
        let due = clock.now.saturating_add(after);
        clock.pending.push(Pending { id, due, token });
        trace!(?token, ?after, "scheduled tick");
        ManualHandle {
            id,
            clock: Rc::downgrade(&self.clock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(epoch: u64) -> TickToken {
        TickToken {
            generation: 1,
            epoch,
        }
    }

    #[test]
    fn test_advance_returns_due_ticks_in_order() {
        let mut sched = ManualScheduler::new();
        let _late = sched.schedule(Duration::from_millis(300), token(2));
        let _early = sched.schedule(Duration::from_millis(100), token(1));
        assert_eq!(sched.pending(), 2);
        assert_eq!(sched.next_due(), Some(Duration::from_millis(100)));

        assert!(sched.advance(Duration::from_millis(50)).is_empty());
        assert_eq!(sched.advance(Duration::from_millis(50)), vec![token(1)]);
        assert_eq!(sched.next_due(), Some(Duration::from_millis(200)));
        assert_eq!(sched.advance(Duration::from_secs(1)), vec![token(2)]);
        assert_eq!(sched.pending(), 0);
        assert_eq!(sched.now(), Duration::from_millis(1100));
    }

    #[test]
    fn test_dropping_handle_cancels() {
        let mut sched = ManualScheduler::new();
        let handle = sched.schedule(Duration::from_millis(10), token(1));
        drop(handle);
        assert_eq!(sched.pending(), 0);
        assert!(sched.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_fire_next_jumps_to_due_time() {
        let mut sched = ManualScheduler::new();
        let _h = sched.schedule(Duration::from_millis(250), token(7));
        assert_eq!(sched.fire_next(), Some(token(7)));
        assert_eq!(sched.now(), Duration::from_millis(250));
        assert_eq!(sched.fire_next(), None);
    }

    #[test]
    fn test_clones_share_clock() {
        let driver = ManualScheduler::new();
        let mut owned = driver.clone();
        let _h = owned.schedule(Duration::from_millis(5), token(3));
        assert_eq!(driver.pending(), 1);
        assert_eq!(driver.advance(Duration::from_millis(5)), vec![token(3)]);
    }
}
