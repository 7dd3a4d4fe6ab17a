//! The inbound interface a presentation layer drives.
//!
//! [`Visualizer`] ties a topic/operation/params selection to a
//! [`PlaybackController`]. Selection changes regenerate the sequence; all
//! navigation is delegated to the controller, so whatever renders
//! [`Visualizer::current_step`] never sees an index outside the sequence.

use tracing::{debug, warn};

use crate::catalog::{Operation, Topic};
use crate::config::PlaybackConfig;
use crate::error::VizError;
use crate::generator::generate;
use crate::params::Params;
use crate::playback::{PlaybackController, PlaybackState, PlaybackStatus};
use crate::scheduler::{Scheduler, TickToken};
use crate::step::{Step, StepSequence};

pub struct Visualizer<S: Scheduler> {
    controller: PlaybackController<S>,
    topic: Option<Topic>,
    operation: Option<Operation>,
    params: Params,
}

impl<S: Scheduler> Visualizer<S> {
    pub fn new(scheduler: S) -> Self {
        Self::with_config(scheduler, PlaybackConfig::default())
    }

    pub fn with_config(scheduler: S, config: PlaybackConfig) -> Self {
        Self {
            controller: PlaybackController::with_config(scheduler, config),
            topic: None,
            operation: None,
            params: Params::default(),
        }
    }

    pub fn topic(&self) -> Option<Topic> {
        self.topic
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn controller(&self) -> &PlaybackController<S> {
        &self.controller
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.controller.status()
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.controller.current_step()
    }

    pub fn sequence(&self) -> Option<&StepSequence> {
        self.controller.sequence()
    }

    /// Switch topic. Clears the operation and returns to idle.
    pub fn select_topic(&mut self, topic: Topic) {
        debug!(%topic, "topic selected");
        self.controller.reset();
        self.topic = Some(topic);
        self.operation = None;
    }

    /// Choose an operation of the current topic and load its sequence.
    ///
    /// An operation outside the topic's set is rejected and leaves the
    /// controller idle with no operation selected.
    pub fn select_operation(&mut self, operation: Operation) -> Result<(), VizError> {
        let topic = self.topic.ok_or(VizError::NoTopicSelected)?;
        if !topic.supports(operation) {
            self.controller.reset();
            self.operation = None;
            warn!(%topic, %operation, "unsupported operation selected");
            return Err(VizError::UnsupportedOperation { topic, operation });
        }
        self.operation = Some(operation);
        self.reload()
    }

    /// Replace the parameters, regenerating if an operation is selected.
    pub fn set_params(&mut self, params: Params) -> Result<(), VizError> {
        self.params = params;
        if self.operation.is_some() {
            self.reload()
        } else {
            Ok(())
        }
    }

    /// Convenience for selecting everything at once.
    pub fn select(
        &mut self,
        topic: Topic,
        operation: Operation,
        params: Params,
    ) -> Result<(), VizError> {
        self.select_topic(topic);
        self.params = params;
        self.select_operation(operation)
    }

    /// Regenerate the current selection and load it at step 0.
    ///
    /// On failure the controller is left idle; the selection is kept so the
    /// caller can correct the parameters.
    pub fn reload(&mut self) -> Result<(), VizError> {
        let topic = self.topic.ok_or(VizError::NoTopicSelected)?;
        let Some(operation) = self.operation else {
            self.controller.reset();
            return Ok(());
        };
        match generate(topic, operation, &self.params) {
            Ok(sequence) => {
                self.controller.load(sequence);
                Ok(())
            }
            Err(err) => {
                warn!(%topic, %operation, error = %err, "generation failed");
                self.controller.reset();
                Err(err)
            }
        }
    }

    pub fn play(&mut self) {
        self.controller.play();
    }

    pub fn pause(&mut self) {
        self.controller.pause();
    }

    pub fn toggle(&mut self) {
        self.controller.toggle();
    }

    pub fn step_forward(&mut self) {
        self.controller.step_forward();
    }

    pub fn step_back(&mut self) {
        self.controller.step_back();
    }

    pub fn jump_to(&mut self, index: usize) {
        self.controller.jump_to(index);
    }

    /// Drop the loaded sequence. The selection survives, so [`reload`]
    /// starts it over.
    ///
    /// [`reload`]: Visualizer::reload
    pub fn reset(&mut self) {
        self.controller.reset();
    }

    pub fn set_speed(&mut self, speed: u32) -> u32 {
        self.controller.set_speed(speed)
    }

    pub fn tick(&mut self, token: TickToken) -> bool {
        self.controller.tick(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use crate::step::Value;

    fn visualizer() -> (Visualizer<ManualScheduler>, ManualScheduler) {
        let clock = ManualScheduler::new();
        (Visualizer::new(clock.clone()), clock)
    }

    #[test]
    fn test_operation_before_topic() {
        let (mut viz, _) = visualizer();
        assert_eq!(
            viz.select_operation(Operation::Push),
            Err(VizError::NoTopicSelected)
        );
        assert_eq!(viz.status(), PlaybackStatus::Idle);
    }

    #[test]
    fn test_select_loads_sequence_paused() {
        let (mut viz, _) = visualizer();
        viz.select_topic(Topic::Stack);
        viz.select_operation(Operation::Push).unwrap();
        assert_eq!(viz.status(), PlaybackStatus::Paused);
        assert_eq!(viz.current_step().map(|s| s.index), Some(0));
        assert_eq!(viz.sequence().unwrap().operation(), Operation::Push);
    }

    #[test]
    fn test_unsupported_operation_stays_idle() {
        let (mut viz, _) = visualizer();
        viz.select_topic(Topic::Stack);
        viz.select_operation(Operation::Push).unwrap();
        let err = viz.select_operation(Operation::InorderTraversal).unwrap_err();
        assert!(matches!(err, VizError::UnsupportedOperation { .. }));
        assert_eq!(viz.status(), PlaybackStatus::Idle);
        assert!(viz.current_step().is_none());
        assert_eq!(viz.operation(), None);
    }

    #[test]
    fn test_topic_change_resets_playback() {
        let (mut viz, clock) = visualizer();
        viz.select(Topic::Sorting, Operation::BubbleSort, Params::default())
            .unwrap();
        viz.play();
        assert_eq!(clock.pending(), 1);

        viz.select_topic(Topic::Graph);
        assert_eq!(viz.status(), PlaybackStatus::Idle);
        assert_eq!(viz.operation(), None);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_set_params_regenerates() {
        let (mut viz, _) = visualizer();
        viz.select(Topic::Stack, Operation::Push, Params::default())
            .unwrap();
        viz.jump_to(2);
        viz.set_params(Params::new().with_value(77)).unwrap();
        assert_eq!(viz.state().current_index, 0);
        let last = viz.sequence().unwrap().last().unwrap();
        assert_eq!(
            last.snapshot.get("stack").and_then(Value::as_ints).unwrap().last(),
            Some(&77)
        );
    }

    #[test]
    fn test_invalid_params_leave_idle_but_keep_selection() {
        let (mut viz, _) = visualizer();
        viz.select(Topic::Arrays, Operation::Delete, Params::default())
            .unwrap();
        let err = viz.set_params(Params::new().with_index(99)).unwrap_err();
        assert!(matches!(err, VizError::InvalidParams { .. }));
        assert_eq!(viz.status(), PlaybackStatus::Idle);
        assert_eq!(viz.operation(), Some(Operation::Delete));

        viz.set_params(Params::new().with_index(0)).unwrap();
        assert_eq!(viz.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn test_ticks_flow_through_facade() {
        let (mut viz, clock) = visualizer();
        viz.select(Topic::Queue, Operation::Dequeue, Params::default())
            .unwrap();
        viz.play();
        while let Some(token) = clock.fire_next() {
            viz.tick(token);
        }
        assert_eq!(viz.status(), PlaybackStatus::Finished);
        let last = viz.sequence().unwrap().last_index();
        assert_eq!(viz.current_step().map(|s| s.index), Some(last));
    }

    #[test]
    fn test_reset_then_reload_starts_over() {
        let (mut viz, _) = visualizer();
        viz.select(Topic::Tree, Operation::InorderTraversal, Params::default())
            .unwrap();
        viz.step_forward();
        viz.reset();
        assert!(viz.current_step().is_none());
        viz.reload().unwrap();
        assert_eq!(viz.state().current_index, 0);
        assert_eq!(viz.status(), PlaybackStatus::Paused);
    }
}
