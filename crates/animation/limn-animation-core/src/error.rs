use limn_api_core::CodecError;
use thiserror::Error;

/// Failures surfaced through the animation API. Failures inside a tick do
/// not return through here; they land in the tick report as error events.
#[derive(Debug, Error)]
pub enum AnimError {
    #[error("element `{0}` not found")]
    MissingElement(String),

    #[error("unknown easing `{0}`")]
    UnknownEasing(String),

    #[error("property `{prop}`: {source}")]
    Track {
        prop: String,
        #[source]
        source: CodecError,
    },

    #[error("property `{prop}` has no value to animate from")]
    MissingAttr { prop: String },

    #[error("property `{prop}` has an unusable target value")]
    BadTarget { prop: String },

    #[error("path patch index {0} is out of range")]
    PatchIndex(usize),
}
