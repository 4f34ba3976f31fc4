use thiserror::Error;

/// Failures produced while decoding or re-encoding serialized attribute
/// values. Every parser in this crate reports through this enum rather than
/// propagating NaN into downstream math.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("malformed matrix `{0}`")]
    Matrix(String),

    #[error("unknown path command `{0}`")]
    UnknownPathCommand(char),

    #[error("path command `{cmd}` takes {expected} parameters, found {found}")]
    PathArity {
        cmd: char,
        expected: usize,
        found: usize,
    },

    #[error("malformed path segment `{0}`")]
    PathSegment(String),

    #[error("malformed color `{0}`")]
    Color(String),

    #[error("malformed number `{0}`")]
    Number(String),

    #[error("malformed transform clause `{0}`")]
    Transform(String),
}
