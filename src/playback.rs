//! Playback controller: a small state machine over a loaded sequence.
//!
//! | From | Call | To |
//! |---|---|---|
//! | any | `load` | Paused at step 0 |
//! | Paused | `play` | Running, or Finished when already at the last step |
//! | Running | `pause` | Paused |
//! | Running | `tick` | Running, or Finished at the last step |
//! | not Idle | `step_forward` / `step_back` / `jump_to` | Paused |
//! | any | `reset` | Idle |
//!
//! Auto-play uses one-shot timers. Every state change drops the pending
//! timer handle before anything new is armed, and every tick carries a
//! [`TickToken`] that must match the controller's current generation and
//! epoch. A tick that was already in flight when the user paused, reset or
//! loaded a new sequence is therefore ignored.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::PlaybackConfig;
use crate::scheduler::{Scheduler, TickToken};
use crate::step::{Step, StepSequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// No sequence loaded.
    Idle,
    Paused,
    Running,
    /// Auto-play reached the last step.
    Finished,
}

/// What a presentation layer needs to render the controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    pub current_index: usize,
    pub is_running: bool,
    pub speed: u32,
}

pub struct PlaybackController<S: Scheduler> {
    config: PlaybackConfig,
    scheduler: S,
    sequence: Option<StepSequence>,
    status: PlaybackStatus,
    current: usize,
    speed: u32,
    generation: u64,
    epoch: u64,
    pending: Option<S::Handle>,
}

impl<S: Scheduler> PlaybackController<S> {
    pub fn new(scheduler: S) -> Self {
        Self::with_config(scheduler, PlaybackConfig::default())
    }

    pub fn with_config(scheduler: S, config: PlaybackConfig) -> Self {
        let speed = config.clamp_speed(config.default_speed);
        Self {
            config,
            scheduler,
            sequence: None,
            status: PlaybackStatus::Idle,
            current: 0,
            speed,
            generation: 0,
            epoch: 0,
            pending: None,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            status: self.status,
            current_index: self.current,
            is_running: self.is_running(),
            speed: self.speed,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == PlaybackStatus::Running
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The step to render, or `None` when idle.
    pub fn current_step(&self) -> Option<&Step> {
        self.sequence.as_ref()?.get(self.current)
    }

    pub fn sequence(&self) -> Option<&StepSequence> {
        self.sequence.as_ref()
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Delay between auto-play steps at the current speed.
    pub fn period(&self) -> Duration {
        self.config.period_for(self.speed)
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn last_index(&self) -> usize {
        self.sequence.as_ref().map_or(0, StepSequence::last_index)
    }

    // -----------------------------------------------------------------------
    // Timer plumbing
    // -----------------------------------------------------------------------

    /// Drop any pending tick and invalidate one that is already in flight.
    fn disarm(&mut self) {
        self.pending = None;
        self.epoch += 1;
    }

    fn arm(&mut self) {
        self.disarm();
        let token = TickToken {
            generation: self.generation,
            epoch: self.epoch,
        };
        let after = self.period();
        self.pending = Some(self.scheduler.schedule(after, token));
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Install a sequence and pause at its first step.
    pub fn load(&mut self, sequence: StepSequence) {
        self.disarm();
        self.generation += 1;
        debug!(
            topic = %sequence.topic(),
            operation = %sequence.operation(),
            steps = sequence.len(),
            generation = self.generation,
            "loaded sequence"
        );
        self.sequence = Some(sequence);
        self.current = 0;
        self.status = PlaybackStatus::Paused;
    }

    /// Start auto-play from the current step. At the last step this goes
    /// straight to `Finished` without arming a timer.
    pub fn play(&mut self) {
        if self.status != PlaybackStatus::Paused {
            trace!(status = ?self.status, "play ignored");
            return;
        }
        if self.current >= self.last_index() {
            self.disarm();
            self.status = PlaybackStatus::Finished;
            debug!(index = self.current, "play at last step: finished");
            return;
        }
        self.status = PlaybackStatus::Running;
        self.arm();
        debug!(index = self.current, speed = self.speed, "playing");
    }

    pub fn pause(&mut self) {
        if self.status != PlaybackStatus::Running {
            return;
        }
        self.disarm();
        self.status = PlaybackStatus::Paused;
        debug!(index = self.current, "paused");
    }

    pub fn toggle(&mut self) {
        if self.is_running() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Handle a delivered timer tick. Returns whether it advanced playback.
    pub fn tick(&mut self, token: TickToken) -> bool {
        if self.status != PlaybackStatus::Running
            || token.generation != self.generation
            || token.epoch != self.epoch
        {
            trace!(
                ?token,
                generation = self.generation,
                epoch = self.epoch,
                "discarding stale tick"
            );
            return false;
        }

        self.pending = None;
        let last = self.last_index();
        self.current = (self.current + 1).min(last);
        if self.current >= last {
            self.disarm();
            self.status = PlaybackStatus::Finished;
            debug!(index = self.current, "auto-play finished");
        } else {
            self.arm();
            trace!(index = self.current, "advanced");
        }
        true
    }

    pub fn step_forward(&mut self) {
        let target = self.current.saturating_add(1);
        self.seek(target);
    }

    pub fn step_back(&mut self) {
        let target = self.current.saturating_sub(1);
        self.seek(target);
    }

    /// Move to `index`, clamped to the sequence. Ignored when idle.
    pub fn jump_to(&mut self, index: usize) {
        self.seek(index);
    }

    fn seek(&mut self, index: usize) {
        if self.status == PlaybackStatus::Idle {
            return;
        }
        self.disarm();
        self.current = index.min(self.last_index());
        self.status = PlaybackStatus::Paused;
        trace!(index = self.current, "seek");
    }

    /// Drop the sequence and return to `Idle`.
    pub fn reset(&mut self) {
        self.disarm();
        self.generation += 1;
        self.sequence = None;
        self.current = 0;
        self.status = PlaybackStatus::Idle;
        debug!(generation = self.generation, "reset");
    }

    /// Set the speed dial, clamped to the configured bounds. A running
    /// controller re-arms its timer with the new period.
    pub fn set_speed(&mut self, speed: u32) -> u32 {
        self.speed = self.config.clamp_speed(speed);
        if self.is_running() {
            self.arm();
        }
        debug!(speed = self.speed, period = ?self.period(), "speed changed");
        self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Operation, Topic};
    use crate::generator::generate;
    use crate::params::Params;
    use crate::scheduler::ManualScheduler;

    fn sequence() -> StepSequence {
        generate(Topic::Arrays, Operation::Traverse, &Params::default()).unwrap()
    }

    fn short_sequence() -> StepSequence {
        generate(Topic::Stack, Operation::Peek, &Params::default()).unwrap()
    }

    fn loaded() -> (PlaybackController<ManualScheduler>, ManualScheduler) {
        let clock = ManualScheduler::new();
        let mut ctl = PlaybackController::new(clock.clone());
        ctl.load(sequence());
        (ctl, clock)
    }

    /// Deliver every tick that comes due, the way a host event loop would.
    fn run_until_quiet(ctl: &mut PlaybackController<ManualScheduler>, clock: &ManualScheduler) {
        while let Some(token) = clock.fire_next() {
            ctl.tick(token);
        }
    }

    #[test]
    fn test_new_controller_is_idle() {
        let ctl = PlaybackController::new(ManualScheduler::new());
        assert_eq!(ctl.status(), PlaybackStatus::Idle);
        assert!(ctl.current_step().is_none());
        assert_eq!(ctl.speed(), 50);
    }

    #[test]
    fn test_idle_ignores_navigation() {
        let mut ctl = PlaybackController::new(ManualScheduler::new());
        ctl.play();
        ctl.step_forward();
        ctl.jump_to(3);
        assert_eq!(ctl.status(), PlaybackStatus::Idle);
        assert_eq!(ctl.current_index(), 0);
    }

    #[test]
    fn test_load_pauses_at_zero() {
        let (ctl, _) = loaded();
        assert_eq!(ctl.status(), PlaybackStatus::Paused);
        assert_eq!(ctl.current_step().map(|s| s.index), Some(0));
        assert!(!ctl.state().is_running);
    }

    #[test]
    fn test_step_forward_is_monotonic_and_clamped() {
        let (mut ctl, _) = loaded();
        let last = ctl.sequence().unwrap().last_index();
        let mut previous = ctl.current_index();
        for _ in 0..last + 5 {
            ctl.step_forward();
            let now = ctl.current_index();
            assert!(now >= previous);
            assert!(now <= last);
            previous = now;
        }
        assert_eq!(ctl.current_index(), last);
        assert_eq!(ctl.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn test_back_and_forward_are_symmetric() {
        let (mut ctl, _) = loaded();
        let last = ctl.sequence().unwrap().last_index();
        for start in 0..last {
            ctl.jump_to(start);
            let before = ctl.current_step().cloned();
            ctl.step_forward();
            ctl.step_back();
            assert_eq!(ctl.current_index(), start);
            assert_eq!(ctl.current_step().cloned(), before);
        }
        for start in 1..=last {
            ctl.jump_to(start);
            let before = ctl.current_step().cloned();
            ctl.step_back();
            ctl.step_forward();
            assert_eq!(ctl.current_step().cloned(), before, "round trip from {start}");
        }
        ctl.jump_to(0);
        ctl.step_back();
        assert_eq!(ctl.current_index(), 0);
    }

    #[test]
    fn test_jump_clamps() {
        let (mut ctl, _) = loaded();
        ctl.jump_to(10_000);
        assert_eq!(ctl.current_index(), ctl.sequence().unwrap().last_index());
    }

    #[test]
    fn test_auto_play_finishes_at_last_step() {
        let (mut ctl, clock) = loaded();
        let last = ctl.sequence().unwrap().last_index();
        ctl.play();
        assert!(ctl.is_running());
        assert_eq!(clock.next_due(), Some(Duration::from_secs(1)));

        run_until_quiet(&mut ctl, &clock);
        assert_eq!(ctl.status(), PlaybackStatus::Finished);
        assert_eq!(ctl.current_index(), last);
        assert_eq!(clock.pending(), 0);
        assert_eq!(clock.now(), Duration::from_secs(last as u64));
    }

    #[test]
    fn test_play_at_end_finishes_immediately() {
        let (mut ctl, clock) = loaded();
        ctl.jump_to(usize::MAX);
        ctl.play();
        assert_eq!(ctl.status(), PlaybackStatus::Finished);
        assert_eq!(clock.pending(), 0);
        ctl.play();
        assert_eq!(ctl.status(), PlaybackStatus::Finished);
    }

    #[test]
    fn test_pause_cancels_pending_tick() {
        let (mut ctl, clock) = loaded();
        ctl.play();
        ctl.pause();
        assert_eq!(ctl.status(), PlaybackStatus::Paused);
        assert_eq!(clock.pending(), 0);
        assert!(clock.advance(Duration::from_secs(10)).is_empty());
        assert_eq!(ctl.current_index(), 0);
    }

    #[test]
    fn test_toggle_flips_running() {
        let (mut ctl, _) = loaded();
        ctl.toggle();
        assert!(ctl.is_running());
        ctl.toggle();
        assert_eq!(ctl.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn test_stale_tick_after_reset_is_ignored() {
        let (mut ctl, clock) = loaded();
        ctl.play();
        // the timer fired but the host has not delivered it yet
        let in_flight = clock.advance(Duration::from_secs(1));
        assert_eq!(in_flight.len(), 1);

        ctl.reset();
        assert!(!ctl.tick(in_flight[0]));
        assert_eq!(ctl.status(), PlaybackStatus::Idle);
        assert_eq!(ctl.current_index(), 0);
        assert!(ctl.current_step().is_none());
    }

    #[test]
    fn test_stale_tick_after_load_is_ignored() {
        let (mut ctl, clock) = loaded();
        ctl.play();
        let in_flight = clock.advance(Duration::from_secs(1));

        ctl.load(short_sequence());
        assert!(!ctl.tick(in_flight[0]));
        assert_eq!(ctl.current_index(), 0);
        assert_eq!(ctl.status(), PlaybackStatus::Paused);
        assert_eq!(ctl.sequence().unwrap().topic(), Topic::Stack);

        // resuming on the new sequence still works
        ctl.play();
        run_until_quiet(&mut ctl, &clock);
        assert_eq!(ctl.status(), PlaybackStatus::Finished);
    }

    #[test]
    fn test_stale_tick_after_pause_resume_is_ignored() {
        let (mut ctl, clock) = loaded();
        ctl.play();
        let in_flight = clock.advance(Duration::from_secs(1));
        ctl.pause();
        ctl.play();
        assert!(!ctl.tick(in_flight[0]));
        assert_eq!(ctl.current_index(), 0);
        assert!(ctl.is_running());
        assert_eq!(clock.pending(), 1);
    }

    #[test]
    fn test_speed_change_reschedules() {
        let (mut ctl, clock) = loaded();
        ctl.play();
        assert_eq!(ctl.set_speed(100), 100);
        assert_eq!(clock.pending(), 1);
        assert_eq!(clock.next_due(), Some(Duration::from_millis(500)));

        assert_eq!(ctl.set_speed(1), 10);
        assert_eq!(ctl.set_speed(500), 100);
        assert_eq!(clock.pending(), 1);
    }

    #[test]
    fn test_speed_change_while_paused_keeps_timer_off() {
        let (mut ctl, clock) = loaded();
        ctl.set_speed(80);
        assert_eq!(clock.pending(), 0);
        assert_eq!(ctl.state().speed, 80);
    }

    #[test]
    fn test_manual_step_stops_auto_play() {
        let (mut ctl, clock) = loaded();
        ctl.play();
        ctl.step_forward();
        assert_eq!(ctl.status(), PlaybackStatus::Paused);
        assert_eq!(ctl.current_index(), 1);
        assert_eq!(clock.pending(), 0);
    }
}
