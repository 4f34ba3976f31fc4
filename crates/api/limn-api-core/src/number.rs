//! Unit-suffixed scalars: `"12.5px"` splits into the numeric run and the
//! verbatim suffix. An empty suffix marks a bare number.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitValue {
    pub value: f64,
    pub suffix: String,
}

/// Split the leading signed numeric run from whatever trails it. No leading
/// numeric run (or a run that is not a valid float) is an error.
pub fn split_unit(s: &str) -> Result<UnitValue, CodecError> {
    let t = s.trim();
    let end = t
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(t.len());
    let (num, suffix) = t.split_at(end);
    let value = num
        .parse::<f64>()
        .map_err(|_| CodecError::Number(s.to_string()))?;
    Ok(UnitValue {
        value,
        suffix: suffix.to_string(),
    })
}
