//! Hex color parsing and per-channel interpolation support.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// True when the whole string is a `#`-prefixed 3- or 6-digit hex color.
/// The prefix is mandatory: bare numeric snapshots like `"100"` would
/// otherwise classify as colors, and substrings like `url(#abcdef)` must
/// not match either.
pub fn is_hex(s: &str) -> bool {
    s.strip_prefix('#')
        .is_some_and(|t| (t.len() == 3 || t.len() == 6) && t.chars().all(|ch| ch.is_ascii_hexdigit()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#rgb` or `#rrggbb` (leading `#` optional). Three-digit forms
    /// expand by doubling each digit.
    pub fn parse(s: &str) -> Result<Self, CodecError> {
        let t = s.strip_prefix('#').unwrap_or(s);
        let expanded: String = match t.len() {
            3 => t.chars().flat_map(|ch| [ch, ch]).collect(),
            6 => t.to_string(),
            _ => return Err(CodecError::Color(s.to_string())),
        };
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16).map_err(|_| CodecError::Color(s.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Build from eased channel values. Overshooting eases (back, elastic)
    /// can leave the 0..255 range; channels clamp instead of wrapping.
    pub fn from_eased(r: f64, g: f64, b: f64) -> Self {
        let clamp = |v: f64| v.clamp(0.0, 255.0) as u8;
        Self {
            r: clamp(r),
            g: clamp(g),
            b: clamp(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// it should parse six-digit hex with or without the hash
    #[test]
    fn parse_six_digit() {
        let c = Rgb::parse("#1a2b3c").unwrap();
        assert_eq!((c.r, c.g, c.b), (0x1a, 0x2b, 0x3c));
        assert_eq!(Rgb::parse("1a2b3c").unwrap(), c);
    }

    /// it should expand three-digit hex by doubling
    #[test]
    fn parse_three_digit() {
        let c = Rgb::parse("#f0a").unwrap();
        assert_eq!((c.r, c.g, c.b), (0xff, 0x00, 0xaa));
    }

    /// it should render lowercase #rrggbb
    #[test]
    fn to_hex_lowercase() {
        assert_eq!(Rgb { r: 255, g: 0, b: 10 }.to_hex(), "#ff000a");
    }

    /// it should only detect whole-string prefixed hex
    #[test]
    fn detection_is_whole_string() {
        assert!(is_hex("#fff"));
        assert!(is_hex("#0a0B0c"));
        assert!(!is_hex("0a0B0c"));
        assert!(!is_hex("100"));
        assert!(!is_hex("url(#abcdef)"));
        assert!(!is_hex("#ffff"));
        assert!(!is_hex("12px"));
    }

    /// it should clamp eased channels into range
    #[test]
    fn eased_channels_clamp() {
        let c = Rgb::from_eased(-12.0, 300.0, 127.9);
        assert_eq!((c.r, c.g, c.b), (0, 255, 127));
    }

    /// it should reject malformed colors
    #[test]
    fn parse_rejects_junk() {
        assert!(Rgb::parse("#ffgg00").is_err());
        assert!(Rgb::parse("#ffff").is_err());
        assert!(Rgb::parse("").is_err());
    }
}
