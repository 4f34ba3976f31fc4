//! 2D affine matrix in the `[a, b, c, d, tx, ty]` layout of the `transform`
//! attribute's `matrix(...)` clause.
//!
//! Composition methods mutate in place (new = transform ∘ current).
//! Decomposition uses the delta-transform-point method: push the unit basis
//! vectors through the linear part, read skew/rotation off `atan2` and scale
//! off the Euclidean norms. `Decomposed::to_matrix` is the exact algebraic
//! inverse of `decompose`, so easing decomposed components and recomposing
//! lands back on well-formed matrices.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Matrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Build from a `[a, b, c, d, tx, ty]` argument list, e.g. the args of a
    /// decoded `matrix(...)` transform clause.
    pub fn from_args(args: &[f64]) -> Result<Self, CodecError> {
        if args.len() != 6 {
            return Err(CodecError::Matrix(format!("{args:?}")));
        }
        Ok(Self::new(args[0], args[1], args[2], args[3], args[4], args[5]))
    }

    /// Parse a serialized `matrix(a, b, c, d, tx, ty)` clause. A bare
    /// comma-separated argument list is accepted too.
    pub fn parse(s: &str) -> Result<Self, CodecError> {
        let t = s.trim();
        let body = t
            .strip_prefix("matrix(")
            .and_then(|r| r.strip_suffix(')'))
            .unwrap_or(t);
        let args = body
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<f64>()
                    .map_err(|_| CodecError::Matrix(s.to_string()))
            })
            .collect::<Result<Vec<f64>, CodecError>>()?;
        if args.len() != 6 {
            return Err(CodecError::Matrix(s.to_string()));
        }
        Self::from_args(&args)
    }

    pub fn rotate(&mut self, deg: f64) {
        let (sin, cos) = deg.to_radians().sin_cos();
        let Matrix { a, b, c, d, .. } = *self;
        self.a = cos * a + sin * b;
        self.b = -sin * a + cos * b;
        self.c = cos * c + sin * d;
        self.d = -sin * c + cos * d;
    }

    pub fn translate(&mut self, xy: [f64; 2]) {
        self.tx += xy[0] * self.a + xy[1] * self.b;
        self.ty += xy[0] * self.c + xy[1] * self.d;
    }

    /// Rescale so the leading coefficients become `xy`. A `+inf` ratio
    /// (division by a zero prior coefficient) is applied as factor 1, not as
    /// an error.
    pub fn scale(&mut self, xy: [f64; 2]) {
        let mut sx = xy[0] / self.a;
        let mut sy = xy[1] / self.d;
        if sx == f64::INFINITY {
            sx = 1.0;
        }
        if sy == f64::INFINITY {
            sy = 1.0;
        }
        self.a *= sx;
        self.c *= sx;
        self.b *= sy;
        self.d *= sy;
    }

    pub fn skew_x(&mut self, deg: f64) {
        let shear = deg.to_radians().tan();
        self.b += shear * self.a;
        self.d += shear * self.c;
    }

    pub fn skew_y(&mut self, deg: f64) {
        let shear = deg.to_radians().tan();
        self.a += shear * self.b;
        self.c += shear * self.d;
    }

    /// Delta-transform-point decomposition. The images of `(1,0)` and `(0,1)`
    /// under the linear part carry the angles; their norms carry the scale.
    /// `rotate` always equals `skew_x` in this scheme.
    pub fn decompose(&self) -> Decomposed {
        let skew_x = self.d.atan2(self.c).to_degrees() - 90.0;
        let skew_y = self.b.atan2(self.a).to_degrees();
        Decomposed {
            translate: [self.tx, self.ty],
            scale: [self.a.hypot(self.b), self.c.hypot(self.d)],
            skew_x,
            skew_y,
            rotate: skew_x,
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix({}, {}, {}, {}, {}, {})",
            self.a, self.b, self.c, self.d, self.tx, self.ty
        )
    }
}

impl FromStr for Matrix {
    type Err = CodecError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Matrix::parse(s)
    }
}

/// Components of a decomposed affine matrix: translation, per-axis scale and
/// the skew/rotation angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decomposed {
    pub translate: [f64; 2],
    pub scale: [f64; 2],
    pub skew_x: f64,
    pub skew_y: f64,
    pub rotate: f64,
}

impl Decomposed {
    /// Rebuild the matrix these components came from:
    /// `a = sx·cos(skew_y)`, `b = sx·sin(skew_y)`, `c = −sy·sin(skew_x)`,
    /// `d = sy·cos(skew_x)`. `rotate` is redundant with `skew_x` and does not
    /// participate.
    pub fn to_matrix(&self) -> Matrix {
        let ay = self.skew_y.to_radians();
        let ax = self.skew_x.to_radians();
        // Adding 0.0 turns the negative zero from sin(0) into plain zero so
        // serialized clauses never read "-0".
        Matrix {
            a: self.scale[0] * ay.cos(),
            b: self.scale[0] * ay.sin() + 0.0,
            c: -self.scale[1] * ax.sin() + 0.0,
            d: self.scale[1] * ax.cos(),
            tx: self.translate[0],
            ty: self.translate[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_matrix_eq(m: &Matrix, n: &Matrix) {
        assert_relative_eq!(m.a, n.a, epsilon = 1e-9);
        assert_relative_eq!(m.b, n.b, epsilon = 1e-9);
        assert_relative_eq!(m.c, n.c, epsilon = 1e-9);
        assert_relative_eq!(m.d, n.d, epsilon = 1e-9);
        assert_relative_eq!(m.tx, n.tx, epsilon = 1e-9);
        assert_relative_eq!(m.ty, n.ty, epsilon = 1e-9);
    }

    /// it should decompose a standard rotation matrix into equal skew angles
    #[test]
    fn decompose_pure_rotation() {
        // matrix(cos t, sin t, -sin t, cos t) is the SVG rotation clause.
        let (sin, cos) = 30f64.to_radians().sin_cos();
        let m = Matrix::new(cos, sin, -sin, cos, 0.0, 0.0);
        let d = m.decompose();
        assert_relative_eq!(d.rotate, 30.0, epsilon = 1e-9);
        assert_relative_eq!(d.skew_x, 30.0, epsilon = 1e-9);
        assert_relative_eq!(d.skew_y, 30.0, epsilon = 1e-9);
        assert_relative_eq!(d.scale[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(d.scale[1], 1.0, epsilon = 1e-9);
    }

    /// it should round-trip decompose -> to_matrix -> decompose
    #[test]
    fn decompose_round_trip() {
        let samples = [
            Matrix::new(1.0, 0.0, 0.0, 1.0, 10.0, -4.0),
            Matrix::new(2.0, 0.5, -0.5, 1.5, 0.0, 0.0),
            Matrix::new(0.7, -0.7, 0.7, 0.7, 3.0, 9.0),
            Matrix::new(-1.0, 0.25, 0.1, -2.0, 5.5, 1.25),
        ];
        for m in samples {
            let rebuilt = m.decompose().to_matrix();
            assert_matrix_eq(&m, &rebuilt);
            let d1 = m.decompose();
            let d2 = rebuilt.decompose();
            assert_relative_eq!(d1.rotate, d2.rotate, epsilon = 1e-9);
            assert_relative_eq!(d1.skew_y, d2.skew_y, epsilon = 1e-9);
            assert_relative_eq!(d1.scale[0], d2.scale[0], epsilon = 1e-9);
            assert_relative_eq!(d1.scale[1], d2.scale[1], epsilon = 1e-9);
        }
    }

    /// it should treat an infinite scale ratio as factor 1
    #[test]
    fn scale_infinite_ratio_is_noop() {
        let mut m = Matrix::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        m.scale([2.0, 3.0]);
        assert_eq!(m.a, 0.0);
        assert_eq!(m.d, 0.0);
    }

    /// it should compose translate against the current linear part
    #[test]
    fn translate_composes_through_linear_part() {
        let mut m = Matrix::new(2.0, 0.0, 0.0, 3.0, 1.0, 1.0);
        m.translate([4.0, 5.0]);
        assert_relative_eq!(m.tx, 1.0 + 4.0 * 2.0);
        assert_relative_eq!(m.ty, 1.0 + 5.0 * 3.0);
    }

    /// it should render and re-parse the matrix clause
    #[test]
    fn display_parse_round_trip() {
        let m = Matrix::new(1.5, 0.0, -0.25, 1.0, 12.0, 7.5);
        let s = m.to_string();
        assert_eq!(s, "matrix(1.5, 0, -0.25, 1, 12, 7.5)");
        let back = Matrix::parse(&s).unwrap();
        assert_matrix_eq(&m, &back);
    }

    /// it should reject clauses without six arguments
    #[test]
    fn parse_rejects_bad_arity() {
        assert!(Matrix::parse("matrix(1, 2, 3)").is_err());
        assert!(Matrix::parse("matrix(1, 2, 3, x, 5, 6)").is_err());
    }
}
