//! Animation task state machine.
//!
//! A task animates one element toward one property set. It samples the
//! element's attributes when it spawns (before any delay), steps once per
//! tick from the first active frame, and ends when elapsed time reaches the
//! duration, when its control flag is cleared, or when the target leaves the
//! document. The scheduler owns the surrounding bookkeeping; the task only
//! knows how to advance itself.

use indexmap::IndexMap;
use limn_scene_core::{Document, PropSet};
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::AnimError;
use crate::outputs::TickReport;
use crate::scheduler::Scheduler;
use crate::track::PropTrack;

/// How to animate one property set onto a target: duration and delay in
/// milliseconds, plus the raw target values keyed by attribute name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimSpec {
    pub duration: f64,
    pub easing: Easing,
    #[serde(default)]
    pub delay: f64,
    pub props: PropSet,
}

/// Re-derives a property set for the current viewport. Receives the task's
/// current targets plus the viewport width and height; the returned set
/// replaces the targets while begin values stay at the spawn snapshot.
pub type DependFn = Box<dyn FnMut(&PropSet, f64, f64) -> PropSet>;

/// Runs against the scheduler when its task ends, completed or aborted. The
/// callback is removed from the bookkeeping before it is invoked, so it may
/// freely fire events or start new animations.
pub type Callback = Box<dyn FnMut(&mut Scheduler)>;

/// Options for [`Scheduler::animate`].
#[derive(Default)]
pub struct AnimateOptions {
    /// Caller-chosen animation id; generated when absent.
    pub name: Option<String>,
    pub depend: Option<DependFn>,
    pub on_complete: Option<Callback>,
}

/// What a finished task triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionAction {
    /// Re-enter the named loop's driver for its next step.
    Loop(String),
    /// Invoke the callback stored under the task's control id.
    Callback,
}

/// Lifecycle of a task. Sampling happens inside [`Task::spawn`]; a task that
/// fails to sample is never constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    /// Spawned, waiting out the delay.
    Init,
    /// Past the first active frame, stepping every tick.
    Stepping,
    Completed,
    Aborted,
}

#[derive(Debug)]
pub(crate) struct Task {
    pub id: String,
    pub target: String,
    pub duration: f64,
    pub easing: Easing,
    pub delay: f64,
    pub spawned_at: f64,
    /// Set on the first frame past the delay; elapsed time counts from here.
    pub start: Option<f64>,
    pub tracks: IndexMap<String, PropTrack>,
    /// Current target values, replaced wholesale by depend re-derivation.
    pub props: PropSet,
    pub control_id: Option<String>,
    pub continuation: Option<CompletionAction>,
    pub state: TaskState,
}

impl Task {
    /// Sample `target`'s attributes and compile one track per property.
    /// Fails when the element is missing or any snapshot cannot be decoded
    /// into the target's shape.
    pub fn spawn(
        id: String,
        target: String,
        spec: AnimSpec,
        now: f64,
        document: &Document,
    ) -> Result<Self, AnimError> {
        let node = document
            .get(&target)
            .ok_or_else(|| AnimError::MissingElement(target.clone()))?;
        let mut tracks = IndexMap::with_capacity(spec.props.len());
        for (key, value) in &spec.props {
            let current = node.attrs.get(key).map(String::as_str);
            tracks.insert(key.clone(), PropTrack::build(key, current, value)?);
        }
        Ok(Self {
            id,
            target,
            duration: spec.duration,
            easing: spec.easing,
            delay: spec.delay,
            spawned_at: now,
            start: None,
            tracks,
            props: spec.props,
            control_id: None,
            continuation: None,
            state: TaskState::Init,
        })
    }

    /// Swap in a re-derived property set. Tracks keep their spawn snapshot
    /// as the begin side; properties dropped from the new set stop
    /// animating, properties the task never sampled are an error.
    pub fn retarget(&mut self, props: PropSet) -> Result<(), AnimError> {
        let mut tracks = IndexMap::with_capacity(props.len());
        for (key, value) in &props {
            let mut track = self
                .tracks
                .shift_remove(key)
                .ok_or_else(|| AnimError::MissingAttr { prop: key.clone() })?;
            track.retarget(key, value)?;
            tracks.insert(key.clone(), track);
        }
        self.tracks = tracks;
        self.props = props;
        Ok(())
    }

    /// Step to absolute time `now`. The first frame past the delay only
    /// anchors the clock; writes begin on the next. A cleared control flag
    /// still lets the current frame's writes land before the task ends.
    pub fn advance(
        &mut self,
        now: f64,
        control_ok: bool,
        document: &mut Document,
        report: &mut TickReport,
    ) {
        if matches!(self.state, TaskState::Completed | TaskState::Aborted) {
            return;
        }
        let start = match self.start {
            Some(start) => start,
            None => {
                if now < self.spawned_at + self.delay {
                    return;
                }
                self.start = Some(now);
                self.state = TaskState::Stepping;
                now
            }
        };
        if !document.contains(&self.target) {
            self.state = TaskState::Aborted;
            return;
        }
        let elapsed = (now - start).min(self.duration);
        if elapsed != 0.0 {
            for (key, track) in &self.tracks {
                let value = track.render(self.easing, elapsed, self.duration);
                document.set_attr(&self.target, key, &value);
                report.push_write(&self.target, key, &value);
            }
        }
        if elapsed >= self.duration {
            self.state = TaskState::Completed;
        } else if !control_ok {
            self.state = TaskState::Aborted;
        }
    }
}
