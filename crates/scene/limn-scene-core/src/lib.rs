//! limn scene core.
//!
//! Compiles a declarative JSON scene description into an attributed node
//! tree plus a dispatch registry:
//! - `descriptor`: typed view of the input JSON
//! - `rules`: per-tag property whitelists (elements, defs, defs children)
//! - `properties`: property serializers (descriptor value -> attribute string)
//! - `builder`: the two-phase compiler (assign ids, then build + wire)
//! - `document`: the compiled tree, attribute-level queries, SVG writer
//! - `registry`: event entries, loop state, dispatch bindings
//!
//! The animation layer consumes `Document` and `Registry`; nothing here
//! depends on time or scheduling.

pub mod builder;
pub mod config;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod ids;
pub mod properties;
pub mod registry;
pub mod rules;

pub use builder::{compile, CompiledScene};
pub use config::{BuildOptions, ValidationPolicy};
pub use descriptor::{AnimationStep, EventBinding, EventTarget, LoopDeclaration, NodeDesc, PropSet};
pub use document::{Document, ElementInfo, Node};
pub use error::SceneError;
pub use ids::IdGen;
pub use registry::{Dispatch, DispatchBinding, LoopState, Registry, RegistryEntry};
