//! Path mini-language codec.
//!
//! Grammar: space-separated segments, each a command letter followed by
//! comma-separated numeric parameters:
//!   "M10,20 L30,40 Z"
//! Parameter arity is fixed per command (case-insensitive lookup,
//! case-preserving output):
//!   m/l -> [x, y]      h -> [x]           v -> [y]
//!   c -> [x2, y2, x1, y1, x, y]           s -> [x2, y2, x, y]
//!   q -> [x1, y1, x, y]                   t -> [x, y]
//!   a -> [rx, ry, r, flag]                z -> []
//! Wrong arity, unknown commands and non-numeric parameters are decode
//! errors, never NaN.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// One decoded path command: the letter plus its positional parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub cmd: char,
    pub params: Vec<f64>,
}

impl PathSegment {
    /// Checked constructor: the command must be known and the parameter count
    /// must match its arity.
    pub fn new(cmd: char, params: Vec<f64>) -> Result<Self, CodecError> {
        let spec = params_for(cmd).ok_or(CodecError::UnknownPathCommand(cmd))?;
        if params.len() != spec.len() {
            return Err(CodecError::PathArity {
                cmd,
                expected: spec.len(),
                found: params.len(),
            });
        }
        Ok(Self { cmd, params })
    }
}

/// Named parameters for a command letter, in serialization order.
pub fn params_for(cmd: char) -> Option<&'static [&'static str]> {
    let names: &'static [&'static str] = match cmd.to_ascii_lowercase() {
        'm' | 'l' | 't' => &["x", "y"],
        'h' => &["x"],
        'v' => &["y"],
        'c' => &["x2", "y2", "x1", "y1", "x", "y"],
        's' => &["x2", "y2", "x", "y"],
        'q' => &["x1", "y1", "x", "y"],
        'a' => &["rx", "ry", "r", "flag"],
        'z' => &[],
        _ => return None,
    };
    Some(names)
}

/// Map a long-form descriptor command name to its letter
/// ("move" -> 'M', "curveRel" -> 'c', ...).
pub fn command_letter(name: &str) -> Option<char> {
    let cmd = match name {
        "move" => 'M',
        "moveRel" => 'm',
        "line" => 'L',
        "lineRel" => 'l',
        "horizontal" => 'H',
        "horizontalRel" => 'h',
        "vertical" => 'V',
        "verticalRel" => 'v',
        "curve" => 'C',
        "curveRel" => 'c',
        "smooth" => 'S',
        "smoothRel" => 's',
        "quadratic" => 'Q',
        "quadraticRel" => 'q',
        "shorthand" => 'T',
        "shorthandRel" => 't',
        "elliptical" => 'A',
        "ellipticalRel" => 'a',
        "close" => 'Z',
        "closeRel" => 'z',
        _ => return None,
    };
    Some(cmd)
}

/// Serialize a command list: `command + comma-joined params`, segments joined
/// by single spaces. `encode(&[M10,20, Z])` yields `"M10,20 Z"`.
pub fn encode(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for seg in segments {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push(seg.cmd);
        for (i, p) in seg.params.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&p.to_string());
        }
    }
    out
}

/// Decode a serialized path back into its command list.
pub fn decode(s: &str) -> Result<Vec<PathSegment>, CodecError> {
    let mut segments = Vec::new();
    for chunk in s.split_whitespace() {
        let mut chars = chunk.chars();
        let cmd = chars
            .next()
            .ok_or_else(|| CodecError::PathSegment(chunk.to_string()))?;
        let spec = params_for(cmd).ok_or(CodecError::UnknownPathCommand(cmd))?;
        let rest = chars.as_str();
        let params = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(',')
                .map(|p| {
                    p.trim()
                        .parse::<f64>()
                        .map_err(|_| CodecError::PathSegment(chunk.to_string()))
                })
                .collect::<Result<Vec<f64>, CodecError>>()?
        };
        if params.len() != spec.len() {
            return Err(CodecError::PathArity {
                cmd,
                expected: spec.len(),
                found: params.len(),
            });
        }
        segments.push(PathSegment { cmd, params });
    }
    Ok(segments)
}
