use limn_api_core::CodecError;
use thiserror::Error;

/// Compilation failures. In lenient mode most of the `Unknown*` variants are
/// never produced (the offending content is dropped instead); strict mode
/// surfaces them.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("descriptor node must be a single-key object")]
    InvalidNode,

    #[error("node body for `{0}` must be an object")]
    InvalidBody(String),

    #[error("id on `{0}` must be a string")]
    InvalidId(String),

    #[error("unknown tag `{0}`")]
    UnknownTag(String),

    #[error("property `{prop}` is not allowed on `{tag}`")]
    UnknownProperty { tag: String, prop: String },

    #[error("unknown definition child `{child}` under `{def}`")]
    UnknownDefChild { def: String, child: String },

    #[error("duplicate id `{0}`")]
    DuplicateId(String),

    #[error("invalid value for property `{prop}`")]
    InvalidValue { prop: String },

    #[error("property `{prop}`: {source}")]
    Value {
        prop: String,
        #[source]
        source: CodecError,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
