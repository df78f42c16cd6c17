use std::ops::Mul;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tuning::Monzo;

/// Relative tolerance below which a determinant counts as zero.
///
/// Compared against the squared largest entry so the test does not depend on
/// the overall scale of the matrix.
pub const DETERMINANT_EPSILON: f64 = 1e-12;

/// A point or direction in the plane.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k)
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl From<Monzo> for Vector {
    fn from(monzo: Monzo) -> Self {
        let (x, y) = monzo.to_vector();
        Self { x, y }
    }
}

impl std::ops::Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Column-major 2×2 linear map.
///
/// ```text
/// | a  c |   | x |   | a·x + c·y |
/// | b  d | × | y | = | b·x + d·y |
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0);

    /// Mirrors the vertical axis; screen rows grow downwards.
    pub const FLIP_Y: Matrix = Matrix::new(1.0, 0.0, 0.0, -1.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    pub fn apply(&self, v: Vector) -> Vector {
        Vector {
            x: self.a * v.x + self.c * v.y,
            y: self.b * v.x + self.d * v.y,
        }
    }

    /// `self ∘ right`: apply `right` first, then `self`.
    pub fn multiply(&self, right: &Matrix) -> Matrix {
        Matrix {
            a: self.a * right.a + self.c * right.b,
            b: self.b * right.a + self.d * right.b,
            c: self.a * right.c + self.c * right.d,
            d: self.b * right.c + self.d * right.d,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d].iter().all(|x| x.is_finite())
    }

    /// True unless the determinant vanishes (relative to the entries) or
    /// any entry is not finite.
    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        let largest = self.a.abs().max(self.b.abs()).max(self.c.abs()).max(self.d.abs());

        det.is_finite() && largest > 0.0 && det.abs() > DETERMINANT_EPSILON * largest * largest
    }

    /// `None` for a degenerate matrix; callers treat that as "reject the edit".
    pub fn inverse(&self) -> Option<Matrix> {
        if !self.is_invertible() {
            return None;
        }
        let inv_det = 1.0 / self.determinant();

        Some(Matrix {
            a: self.d * inv_det,
            b: -self.b * inv_det,
            c: -self.c * inv_det,
            d: self.a * inv_det,
        })
    }

    /// Uniform zoom of all four entries.
    pub fn scale(&self, k: f64) -> Matrix {
        Matrix::new(self.a * k, self.b * k, self.c * k, self.d * k)
    }

    /// Rescaled so `|det| = 1`; degenerate matrices are returned as-is.
    pub fn normalize(&self) -> Matrix {
        if !self.is_invertible() {
            return *self;
        }
        self.scale(1.0 / self.determinant().abs().sqrt())
    }

    /// Images of the two lattice axes, `[1 0>` and `[0 1>`.
    pub fn columns(&self) -> (Vector, Vector) {
        (Vector::new(self.a, self.b), Vector::new(self.c, self.d))
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::IDENTITY
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        self.multiply(&rhs)
    }
}

impl Mul<Vector> for Matrix {
    type Output = Vector;

    fn mul(self, rhs: Vector) -> Vector {
        self.apply(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Vector, expected: Vector) {
        assert!(
            (actual - expected).length() < 1e-9,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn apply_is_column_major() {
        let m = Matrix::new(1.0, -2.0, 2.0, -3.0);
        assert_eq!(m.apply(Vector::new(1.0, 0.0)), Vector::new(1.0, -2.0));
        assert_eq!(m.apply(Vector::new(0.0, 1.0)), Vector::new(2.0, -3.0));
        assert_eq!(m * Vector::new(2.0, 1.0), Vector::new(4.0, -7.0));
    }

    #[test]
    fn multiply_applies_right_operand_first() {
        let rotate = Matrix::new(0.0, 1.0, -1.0, 0.0);
        let stretch = Matrix::new(2.0, 0.0, 0.0, 1.0);
        let v = Vector::new(1.0, 0.0);

        let composed = stretch.multiply(&rotate);
        assert_close(composed.apply(v), stretch.apply(rotate.apply(v)));
        assert_close(composed.apply(v), Vector::new(0.0, 1.0));
        assert_close((rotate * stretch).apply(v), Vector::new(0.0, 2.0));
    }

    #[test]
    fn inverse_undoes_apply() {
        let matrices = [
            Matrix::new(1.0, -2.0, 2.0, -3.0),
            Matrix::new(2.0, -1.0, -1.0, 1.0),
            Matrix::new(0.0, 1.0, 1.0, 1.0),
            Matrix::new(1e-3, 0.0, 0.0, 1e3),
        ];
        let vectors = [
            Vector::new(0.0, 0.0),
            Vector::new(-4.0, 3.0),
            Vector::new(11.0, -7.0),
            Vector::new(0.25, 1e4),
        ];

        for m in matrices {
            let inv = m.inverse().expect("invertible");
            for v in vectors {
                assert_close(inv.apply(m.apply(v)), v);
            }
            let product = m * inv;
            assert!((product.a - 1.0).abs() < 1e-12 && product.b.abs() < 1e-12);
            assert!(product.c.abs() < 1e-12 && (product.d - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn singular_matrices_have_no_inverse() {
        assert_eq!(Matrix::new(1.0, 2.0, 2.0, 4.0).inverse(), None);
        assert_eq!(Matrix::new(0.0, 0.0, 0.0, 0.0).inverse(), None);
        assert_eq!(Matrix::new(1.0, 1.0, 1.0, 1.0 + 1e-15).inverse(), None);
        assert_eq!(Matrix::new(f64::NAN, 0.0, 0.0, 1.0).inverse(), None);
        // small but well-conditioned is fine
        assert!(Matrix::IDENTITY.scale(1e-8).inverse().is_some());
    }

    #[test]
    fn normalize_gives_unit_determinant() {
        let m = Matrix::new(3.0, 1.0, -2.0, 4.0);
        let normalized = m.normalize();
        assert!((normalized.determinant().abs() - 1.0).abs() < 1e-12);

        let reflected = Matrix::new(0.0, 2.0, 2.0, 0.0).normalize();
        assert!((reflected.determinant() + 1.0).abs() < 1e-12);

        let singular = Matrix::new(1.0, 2.0, 2.0, 4.0);
        assert_eq!(singular.normalize(), singular);
    }

    #[test]
    fn scale_multiplies_every_entry() {
        let m = Matrix::new(1.0, -2.0, 2.0, -3.0).scale(100.0);
        assert_eq!(m, Matrix::new(100.0, -200.0, 200.0, -300.0));
    }
}
