//! Typed view of the input JSON.
//!
//! A node description is a single-key object: the key is the tag, the body
//! holds properties plus the reserved keys (`id`, `children`, `defs`,
//! `events`, `loop`). [`NodeDesc::from_value`] peels those apart without
//! judging tags or property names; validation belongs to the builder.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SceneError;

/// Body keys that are structure, not properties.
pub const RESERVED_KEYS: &[&str] = &["children", "id", "events", "defs", "loop"];

/// One animation property set: property name to target value.
pub type PropSet = serde_json::Map<String, Value>;

/// A parsed node description.
#[derive(Debug, Clone, Default)]
pub struct NodeDesc {
    pub tag: String,
    pub id: Option<String>,
    /// Non-reserved body entries, in declaration order.
    pub props: Vec<(String, Value)>,
    pub children: Vec<NodeDesc>,
    pub defs: Vec<NodeDesc>,
    pub events: Vec<EventBinding>,
    pub r#loop: Option<LoopDeclaration>,
}

/// What an event binding listens on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventTarget {
    /// Window-scope events, fired without an owner filter.
    Window,
    /// The declaring node itself.
    Owner,
    /// Another element, named by reference (`#id`).
    Element(String),
}

impl Default for EventTarget {
    fn default() -> Self {
        EventTarget::Owner
    }
}

impl From<String> for EventTarget {
    fn from(s: String) -> Self {
        match s.as_str() {
            "window" => EventTarget::Window,
            "self" => EventTarget::Owner,
            _ => EventTarget::Element(s),
        }
    }
}

impl From<EventTarget> for String {
    fn from(t: EventTarget) -> Self {
        match t {
            EventTarget::Window => "window".to_string(),
            EventTarget::Owner => "self".to_string(),
            EventTarget::Element(s) => s,
        }
    }
}

/// An event declaration on a node: when `event` fires on `target`, animate
/// the declaring node toward the next entry of `prop`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBinding {
    pub event: String,
    #[serde(default)]
    pub target: EventTarget,
    #[serde(default)]
    pub duration: f64,
    #[serde(default = "default_ease")]
    pub ease: String,
    #[serde(default)]
    pub delay: f64,
    #[serde(default)]
    pub prop: Vec<PropSet>,
}

/// A node's loop block: an animation sequence replayed start to end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopDeclaration {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub start: bool,
    #[serde(default)]
    pub children: Vec<AnimationStep>,
}

/// One step of a loop sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationStep {
    #[serde(default)]
    pub duration: f64,
    #[serde(default = "default_ease")]
    pub ease: String,
    #[serde(default)]
    pub delay: f64,
    #[serde(default)]
    pub prop: PropSet,
}

fn default_ease() -> String {
    "linear".to_string()
}

fn default_true() -> bool {
    true
}

impl NodeDesc {
    /// Parse one description. The first key of the object is the tag; the
    /// body splits into reserved structure and ordered properties.
    pub fn from_value(value: &Value) -> Result<Self, SceneError> {
        let Value::Object(map) = value else {
            return Err(SceneError::InvalidNode);
        };
        let Some((tag, body)) = map.iter().next() else {
            return Err(SceneError::InvalidNode);
        };
        let Value::Object(body) = body else {
            return Err(SceneError::InvalidBody(tag.clone()));
        };

        let mut desc = NodeDesc {
            tag: tag.clone(),
            ..NodeDesc::default()
        };

        for (key, entry) in body {
            match key.as_str() {
                "id" => match entry {
                    Value::String(id) => desc.id = Some(id.clone()),
                    _ => return Err(SceneError::InvalidId(tag.clone())),
                },
                "children" => {
                    let Value::Array(items) = entry else {
                        return Err(SceneError::InvalidBody(tag.clone()));
                    };
                    desc.children = items
                        .iter()
                        .map(NodeDesc::from_value)
                        .collect::<Result<_, _>>()?;
                }
                "defs" => {
                    let Value::Array(items) = entry else {
                        return Err(SceneError::InvalidBody(tag.clone()));
                    };
                    desc.defs = items
                        .iter()
                        .map(NodeDesc::from_value)
                        .collect::<Result<_, _>>()?;
                }
                "events" => {
                    desc.events = serde_json::from_value(entry.clone())?;
                }
                "loop" => {
                    desc.r#loop = Some(serde_json::from_value(entry.clone())?);
                }
                _ => desc.props.push((key.clone(), entry.clone())),
            }
        }
        Ok(desc)
    }
}
