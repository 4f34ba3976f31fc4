//! Output contracts from the scheduler.
//!
//! A tick report carries the attribute writes applied to the document this
//! tick plus a separate list of semantic events. Hosts render from the
//! document (or replay the writes) and transport events however they like.

use serde::{Deserialize, Serialize};

/// One attribute written on an element this tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttrWrite {
    pub id: String,
    pub attr: String,
    pub value: String,
}

/// Discrete semantic signals emitted while stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SchedEvent {
    TaskStarted {
        anim: String,
        target: String,
    },
    TaskCompleted {
        anim: String,
        target: String,
    },
    TaskAborted {
        anim: String,
        target: String,
    },
    LoopStopped {
        name: String,
    },
    /// Recoverable failures inside a tick land here instead of unwinding.
    Error {
        message: String,
    },
}

/// Everything [`Scheduler::tick`](crate::Scheduler::tick) produced.
///
/// Writes and events raised outside a tick (from `fire`, `animate`,
/// callbacks) buffer until the next tick's report.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TickReport {
    #[serde(default)]
    pub writes: Vec<AttrWrite>,
    #[serde(default)]
    pub events: Vec<SchedEvent>,
}

impl TickReport {
    pub fn clear(&mut self) {
        self.writes.clear();
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.events.is_empty()
    }

    pub fn push_write(&mut self, id: &str, attr: &str, value: &str) {
        self.writes.push(AttrWrite {
            id: id.to_string(),
            attr: attr.to_string(),
            value: value.to_string(),
        });
    }

    pub fn push_event(&mut self, event: SchedEvent) {
        self.events.push(event);
    }
}
