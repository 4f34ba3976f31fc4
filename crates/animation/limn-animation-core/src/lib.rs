//! limn animation core.
//!
//! Drives a compiled scene over time. The [`Scheduler`] owns the document
//! and registry produced by `limn-scene-core` and advances cooperatively,
//! one tick per frame:
//! - `easing`: the tween curve library (`(t, b, c, d)` parameterization)
//! - `track`: per-property interpolation tracks (scalar, color, transform,
//!   path), built from a live snapshot at spawn
//! - `task`: the animation task state machine
//! - `scheduler`: dispatch, loops, delays, cancellation, depend re-targeting
//! - `outputs`: the per-tick report of writes and lifecycle events
//!
//! Nothing here blocks or spawns threads; callers own the clock and feed
//! elapsed time into [`Scheduler::tick`].

pub mod easing;
pub mod error;
pub mod outputs;
pub mod scheduler;
pub mod task;
pub mod track;

pub use easing::Easing;
pub use error::AnimError;
pub use outputs::{AttrWrite, SchedEvent, TickReport};
pub use scheduler::Scheduler;
pub use task::{AnimSpec, AnimateOptions, Callback, CompletionAction, DependFn, TaskState};
pub use track::{PathPatch, PropTrack, TransformTrack, TransformTween};
