//! Shared attribute codecs for limn.
//!
//! Everything that turns a serialized SVG attribute value into structured
//! data and back lives here: the affine `matrix(...)` clause, the path
//! mini-language, hex colors, unit-suffixed scalars, and `transform` clause
//! lists. The scene builder and the animation scheduler both sit on top of
//! these codecs; neither re-implements any of the parsing.

pub mod color;
pub mod error;
pub mod matrix;
pub mod number;
pub mod path;
pub mod transform;

pub use color::Rgb;
pub use error::CodecError;
pub use matrix::{Decomposed, Matrix};
pub use number::{split_unit, UnitValue};
pub use path::PathSegment;
pub use transform::TransformFn;
