//! Browser-backed scheduler.

use std::time::Duration;

use gloo::timers::callback::Timeout;
use stepviz::{Scheduler, TickToken};
use yew::Callback;

/// Arms a `setTimeout` per tick and posts the token back to the component.
///
/// gloo's [`Timeout`] clears itself on drop, which is exactly the handle
/// contract the controller relies on.
pub struct GlooScheduler {
    on_tick: Callback<TickToken>,
}

impl GlooScheduler {
    pub fn new(on_tick: Callback<TickToken>) -> Self {
        Self { on_tick }
    }
}

impl Scheduler for GlooScheduler {
    type Handle = Timeout;

    fn schedule(&mut self, after: Duration, token: TickToken) -> Timeout {
        let on_tick = self.on_tick.clone();
        let millis = u32::try_from(after.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || on_tick.emit(token))
    }
}
