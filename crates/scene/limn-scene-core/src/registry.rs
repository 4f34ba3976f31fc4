//! Event registry, loop state, dispatch tables.
//!
//! Compilation fills these; the animation layer reads them. An event name
//! maps to a list of entries, each owning a cyclic cursor over its property
//! sets. Loops keep their run state here so a scheduler can start, stop and
//! resume them by name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::descriptor::PropSet;

/// One registered reaction to an event: animate `owner_id` toward the
/// property set under the cursor, then advance the cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub owner_id: String,
    pub cursor: usize,
    pub duration: f64,
    pub ease: String,
    pub delay: f64,
    pub props: Vec<PropSet>,
}

impl RegistryEntry {
    pub fn current_props(&self) -> Option<&PropSet> {
        self.props.get(self.cursor)
    }

    /// Round-robin advance; the cursor wraps to the first set after the last.
    pub fn advance_cursor(&mut self) {
        if !self.props.is_empty() {
            self.cursor = (self.cursor + 1) % self.props.len();
        }
    }
}

/// Run state of one loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopState {
    /// Whether the loop auto-starts.
    pub start: bool,
    /// False once stopped; stepping halts at the next boundary.
    pub status: bool,
    /// True while a continuation chain is live.
    pub started: bool,
    /// Synthetic event ids, one per step, in sequence order.
    pub events: Vec<String>,
    /// Next step to run.
    pub index: usize,
}

/// A listener attachment: `event` fired on `target` reaches the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchBinding {
    pub event: String,
    pub target: String,
}

/// Where each event name should be listened for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dispatch {
    /// Window-scope event names, deduplicated.
    pub win: Vec<String>,
    /// Self-scope bindings (the declaring element listens on itself).
    #[serde(rename = "self")]
    pub self_: Vec<DispatchBinding>,
    /// Bindings against other elements, by resolved id.
    pub elm: Vec<DispatchBinding>,
}

impl Dispatch {
    pub fn push_win(&mut self, event: &str) {
        if !self.win.iter().any(|e| e == event) {
            self.win.push(event.to_string());
        }
    }
}

/// Everything compilation wires up besides the tree itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    pub events: IndexMap<String, Vec<RegistryEntry>>,
    pub loops: IndexMap<String, LoopState>,
    pub dispatch: Dispatch,
}

impl Registry {
    pub fn insert_event(&mut self, event: &str, entry: RegistryEntry) {
        self.events.entry(event.to_string()).or_default().push(entry);
    }

    pub fn entries(&self, event: &str) -> &[RegistryEntry] {
        self.events.get(event).map(Vec::as_slice).unwrap_or_default()
    }
}
