//! # stepviz
//!
//! A step-based visualization engine for data-structure and algorithm
//! operations.
//!
//! ## Overview
//!
//! Visualizing an operation happens in three tiers:
//! - **Step generation**: a named operation such as "Insert" on an array is
//!   simulated against a small demo collection and recorded as an ordered
//!   list of [`Step`]s. Each step carries the highlighted line of a code
//!   listing, a snapshot of every visible variable, a plain-language
//!   description and, inside loops or recursion, an [`Annotation`].
//! - **Playback**: a [`PlaybackController`] walks the sequence with play,
//!   pause, step and jump controls. Auto-play is driven by one-shot timers
//!   from an injected [`Scheduler`].
//! - **Presentation**: the [`Visualizer`] facade is what a UI binds to. It
//!   only ever hands out steps that exist.
//!
//! ## Example
//!
//! ```
//! use stepviz::{ManualScheduler, Operation, Params, PlaybackStatus, Topic, Visualizer};
//!
//! let clock = ManualScheduler::new();
//! let mut viz = Visualizer::new(clock.clone());
//! viz.select(Topic::Arrays, Operation::Insert, Params::new().with_index(2).with_value(10))
//!     .unwrap();
//!
//! viz.play();
//! while let Some(token) = clock.fire_next() {
//!     viz.tick(token);
//! }
//!
//! assert_eq!(viz.status(), PlaybackStatus::Finished);
//! let last = viz.current_step().unwrap();
//! assert_eq!(last.snapshot.get("array").unwrap().to_string(), "[5, 2, 10, 8, 1, 9, 3]");
//! ```

pub mod assistant;
pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod params;
pub mod playback;
pub mod scheduler;
pub mod session;
pub mod step;
pub mod visualizer;

pub use assistant::{Assistant, CannedCompletion, CompletionService, Question};
pub use catalog::{Operation, Topic};
pub use config::PlaybackConfig;
pub use error::{AssistantError, VizError};
pub use generator::generate;
pub use params::{Params, parse_list};
pub use playback::{PlaybackController, PlaybackState, PlaybackStatus};
pub use scheduler::{ManualHandle, ManualScheduler, Scheduler, TickToken};
pub use session::{Access, SessionGate, StaticGate, check_access};
pub use step::{Annotation, AnnotationKind, Snapshot, Step, StepSequence, Value};
pub use visualizer::Visualizer;
