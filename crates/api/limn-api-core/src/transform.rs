//! `transform` attribute clause-list codec.
//!
//! Grammar: whitespace-separated `name(arg, arg, ...)` clauses, arguments
//! split on commas. `matrix(...)` is an ordinary clause at this layer;
//! callers wanting its components go through [`crate::Matrix`].

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformFn {
    pub name: String,
    pub args: Vec<f64>,
}

impl TransformFn {
    pub fn new(name: impl Into<String>, args: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Decode a serialized clause list into its functions, in order.
pub fn decode(s: &str) -> Result<Vec<TransformFn>, CodecError> {
    let mut out = Vec::new();
    let mut rest = s.trim();
    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| CodecError::Transform(rest.to_string()))?;
        let name = rest[..open].trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(CodecError::Transform(rest.to_string()));
        }
        let close = rest[open..]
            .find(')')
            .map(|i| open + i)
            .ok_or_else(|| CodecError::Transform(rest.to_string()))?;
        let body = rest[open + 1..close].trim();
        let args = if body.is_empty() {
            Vec::new()
        } else {
            body.split(',')
                .map(|a| {
                    a.trim()
                        .parse::<f64>()
                        .map_err(|_| CodecError::Transform(rest[..=close].to_string()))
                })
                .collect::<Result<Vec<f64>, CodecError>>()?
        };
        out.push(TransformFn::new(name, args));
        rest = rest[close + 1..].trim_start();
    }
    Ok(out)
}

/// Encode functions back into `name(a,b) name2(c)` form.
pub fn encode(fns: &[TransformFn]) -> String {
    let clauses: Vec<String> = fns
        .iter()
        .map(|f| {
            let args: Vec<String> = f.args.iter().map(|a| a.to_string()).collect();
            format!("{}({})", f.name, args.join(","))
        })
        .collect();
    clauses.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// it should decode mixed clause lists in order
    #[test]
    fn decode_mixed_clauses() {
        let fns = decode("translate(3,4) rotate(45) matrix(1, 0, 0, 1, 10, 20)").unwrap();
        assert_eq!(fns.len(), 3);
        assert_eq!(fns[0].name, "translate");
        assert_eq!(fns[0].args, vec![3.0, 4.0]);
        assert_eq!(fns[1].args, vec![45.0]);
        assert_eq!(fns[2].name, "matrix");
        assert_eq!(fns[2].args.len(), 6);
    }

    /// it should round-trip the compact encoding
    #[test]
    fn encode_round_trip() {
        let fns = vec![
            TransformFn::new("translate", vec![3.0, 4.0]),
            TransformFn::new("skewX", vec![12.5]),
        ];
        let s = encode(&fns);
        assert_eq!(s, "translate(3,4) skewX(12.5)");
        assert_eq!(decode(&s).unwrap(), fns);
    }

    /// it should reject clauses without parens or with junk args
    #[test]
    fn decode_rejects_malformed() {
        assert!(decode("rotate 45").is_err());
        assert!(decode("rotate(45").is_err());
        assert!(decode("rotate(abc)").is_err());
    }

    /// it should decode an empty string to no clauses
    #[test]
    fn decode_empty() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("   ").unwrap().is_empty());
    }
}
