//! Fixed-size 4x4 affine matrix used on every ray.
//!
//! Same equality contract as [`Matrix`] (epsilon, via [`MatrixRead`]), but
//! stack allocated with closed-form determinant and inverse. Column-vector
//! convention: `m * p` maps `p`, translation lives in column 3.

use std::fmt;
use std::ops::{Index, IndexMut, Mul};

use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::matrix::{approx_eq_matrices, Matrix, MatrixRead};
use crate::tuple::Tuple4;
use crate::approx_eq;

/// Smallest `|det| / hadamard_bound` accepted by [`Matrix4::inverse`].
const SINGULAR_RATIO: f64 = 1e-12;

/// A 4x4 matrix in row-major order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Matrix4 {
    storage: [[f64; 4]; 4],
}

impl Matrix4 {
    /// Matrix from rows.
    pub const fn new(storage: [[f64; 4]; 4]) -> Self {
        Self { storage }
    }

    /// All zeros.
    pub const fn zero() -> Self {
        Self::new([[0.0; 4]; 4])
    }

    /// The identity.
    pub const fn identity() -> Self {
        Self::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Translation by `(x, y, z)`.
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        let mut m = Self::identity();
        m[0][3] = x;
        m[1][3] = y;
        m[2][3] = z;
        m
    }

    /// Non-uniform scale by `(x, y, z)`.
    pub fn scaling(x: f64, y: f64, z: f64) -> Self {
        let mut m = Self::identity();
        m[0][0] = x;
        m[1][1] = y;
        m[2][2] = z;
        m
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::identity();
        m[1][1] = c;
        m[1][2] = -s;
        m[2][1] = s;
        m[2][2] = c;
        m
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::identity();
        m[0][0] = c;
        m[0][2] = s;
        m[2][0] = -s;
        m[2][2] = c;
        m
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::identity();
        m[0][0] = c;
        m[0][1] = -s;
        m[1][0] = s;
        m[1][1] = c;
        m
    }

    /// Shear: each coordinate moves in proportion to the other two.
    pub fn shearing(xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64) -> Self {
        Self::new([
            [1.0, xy, xz, 0.0],
            [yx, 1.0, yz, 0.0],
            [zx, zy, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// World-to-eye transform for an eye at `from` looking at `to`.
    pub fn view_transform(from: Tuple4, to: Tuple4, up: Tuple4) -> Result<Self> {
        from.require_point("view_transform")?;
        to.require_point("view_transform")?;
        let forward = (to - from).normalize()?;
        let left = forward.cross(&up.normalize()?)?;
        let true_up = left.cross(&forward)?;
        let orientation = Self::new([
            [left.x, left.y, left.z, 0.0],
            [true_up.x, true_up.y, true_up.z, 0.0],
            [-forward.x, -forward.y, -forward.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Ok(orientation * Self::translation(-from.x, -from.y, -from.z))
    }

    /// Compose: apply `self` first, then `next` (`next * self`).
    pub fn then(&self, next: &Matrix4) -> Matrix4 {
        *next * *self
    }

    /// Fluent form of `then(translation(..))`.
    pub fn translate(self, x: f64, y: f64, z: f64) -> Self {
        Self::translation(x, y, z) * self
    }

    /// Fluent form of `then(scaling(..))`.
    pub fn scale(self, x: f64, y: f64, z: f64) -> Self {
        Self::scaling(x, y, z) * self
    }

    /// Fluent form of `then(rotation_x(..))`.
    pub fn rotate_x(self, angle: f64) -> Self {
        Self::rotation_x(angle) * self
    }

    /// Fluent form of `then(rotation_y(..))`.
    pub fn rotate_y(self, angle: f64) -> Self {
        Self::rotation_y(angle) * self
    }

    /// Fluent form of `then(rotation_z(..))`.
    pub fn rotate_z(self, angle: f64) -> Self {
        Self::rotation_z(angle) * self
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Matrix4 {
        let mut out = Matrix4::zero();
        for r in 0..4 {
            for c in 0..4 {
                out[r][c] = self[c][r];
            }
        }
        out
    }

    /// True when every cell is within epsilon of the identity.
    pub fn is_identity(&self) -> bool {
        approx_eq_matrices(self, &Matrix4::identity())
    }

    /// True when the bottom row is (within epsilon) `[0, 0, 0, 1]`.
    pub fn is_affine(&self) -> bool {
        let [a, b, c, d] = self.storage[3];
        approx_eq(a, 0.0) && approx_eq(b, 0.0) && approx_eq(c, 0.0) && approx_eq(d, 1.0)
    }

    /// 2x2 sub-determinants of the top and bottom row pairs.
    fn sub_determinants(&self) -> ([f64; 6], [f64; 6]) {
        let a = &self.storage;
        let s = [
            a[0][0] * a[1][1] - a[1][0] * a[0][1],
            a[0][0] * a[1][2] - a[1][0] * a[0][2],
            a[0][0] * a[1][3] - a[1][0] * a[0][3],
            a[0][1] * a[1][2] - a[1][1] * a[0][2],
            a[0][1] * a[1][3] - a[1][1] * a[0][3],
            a[0][2] * a[1][3] - a[1][2] * a[0][3],
        ];
        let c = [
            a[2][0] * a[3][1] - a[3][0] * a[2][1],
            a[2][0] * a[3][2] - a[3][0] * a[2][2],
            a[2][0] * a[3][3] - a[3][0] * a[2][3],
            a[2][1] * a[3][2] - a[3][1] * a[2][2],
            a[2][1] * a[3][3] - a[3][1] * a[2][3],
            a[2][2] * a[3][3] - a[3][2] * a[2][3],
        ];
        (s, c)
    }

    fn det_from(s: &[f64; 6], c: &[f64; 6]) -> f64 {
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    /// Closed-form determinant.
    pub fn determinant(&self) -> f64 {
        let (s, c) = self.sub_determinants();
        Self::det_from(&s, &c)
    }

    /// Closed-form inverse, or [`MathError::Singular`].
    ///
    /// Singularity is judged against the Hadamard bound (product of row
    /// lengths), so uniformly small but well-conditioned matrices invert.
    pub fn inverse(&self) -> Result<Matrix4> {
        let (s, c) = self.sub_determinants();
        let det = Self::det_from(&s, &c);
        let bound: f64 = self
            .storage
            .iter()
            .map(|row| row.iter().map(|v| v * v).sum::<f64>().sqrt())
            .product();
        if det.is_nan() || det.abs() <= bound * SINGULAR_RATIO {
            return Err(MathError::Singular);
        }
        let inv = 1.0 / det;
        let a = &self.storage;

        Ok(Matrix4::new([
            [
                (a[1][1] * c[5] - a[1][2] * c[4] + a[1][3] * c[3]) * inv,
                (-a[0][1] * c[5] + a[0][2] * c[4] - a[0][3] * c[3]) * inv,
                (a[3][1] * s[5] - a[3][2] * s[4] + a[3][3] * s[3]) * inv,
                (-a[2][1] * s[5] + a[2][2] * s[4] - a[2][3] * s[3]) * inv,
            ],
            [
                (-a[1][0] * c[5] + a[1][2] * c[2] - a[1][3] * c[1]) * inv,
                (a[0][0] * c[5] - a[0][2] * c[2] + a[0][3] * c[1]) * inv,
                (-a[3][0] * s[5] + a[3][2] * s[2] - a[3][3] * s[1]) * inv,
                (a[2][0] * s[5] - a[2][2] * s[2] + a[2][3] * s[1]) * inv,
            ],
            [
                (a[1][0] * c[4] - a[1][1] * c[2] + a[1][3] * c[0]) * inv,
                (-a[0][0] * c[4] + a[0][1] * c[2] - a[0][3] * c[0]) * inv,
                (a[3][0] * s[4] - a[3][1] * s[2] + a[3][3] * s[0]) * inv,
                (-a[2][0] * s[4] + a[2][1] * s[2] - a[2][3] * s[0]) * inv,
            ],
            [
                (-a[1][0] * c[3] + a[1][1] * c[1] - a[1][2] * c[0]) * inv,
                (a[0][0] * c[3] - a[0][1] * c[1] + a[0][2] * c[0]) * inv,
                (-a[3][0] * s[3] + a[3][1] * s[1] - a[3][2] * s[0]) * inv,
                (a[2][0] * s[3] - a[2][1] * s[1] + a[2][2] * s[0]) * inv,
            ],
        ]))
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl MatrixRead for Matrix4 {
    fn rows(&self) -> usize {
        4
    }

    fn cols(&self) -> usize {
        4
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self.storage[row][col]
    }
}

impl<M: MatrixRead> PartialEq<M> for Matrix4 {
    fn eq(&self, other: &M) -> bool {
        approx_eq_matrices(self, other)
    }
}

impl Index<usize> for Matrix4 {
    type Output = [f64; 4];

    fn index(&self, index: usize) -> &[f64; 4] {
        &self.storage[index]
    }
}

impl IndexMut<usize> for Matrix4 {
    fn index_mut(&mut self, index: usize) -> &mut [f64; 4] {
        &mut self.storage[index]
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        let mut out = Matrix4::zero();
        for r in 0..4 {
            for c in 0..4 {
                out[r][c] = self[r][0] * rhs[0][c]
                    + self[r][1] * rhs[1][c]
                    + self[r][2] * rhs[2][c]
                    + self[r][3] * rhs[3][c];
            }
        }
        out
    }
}

impl Mul<Tuple4> for Matrix4 {
    type Output = Tuple4;

    fn mul(self, t: Tuple4) -> Tuple4 {
        let row = |r: usize| self[r][0] * t.x + self[r][1] * t.y + self[r][2] * t.z + self[r][3] * t.w;
        Tuple4::new(row(0), row(1), row(2), row(3))
    }
}

impl From<Matrix4> for Matrix {
    fn from(m: Matrix4) -> Self {
        m.to_matrix()
    }
}

impl TryFrom<&Matrix> for Matrix4 {
    type Error = MathError;

    fn try_from(m: &Matrix) -> Result<Self> {
        if m.rows() != 4 || m.cols() != 4 {
            return Err(MathError::DimensionMismatch {
                op: "into Matrix4",
                left: (m.rows(), m.cols()),
                right: (4, 4),
            });
        }
        let mut out = Matrix4::zero();
        for r in 0..4 {
            for c in 0..4 {
                out[r][c] = m.get(r, c);
            }
        }
        Ok(out)
    }
}

impl From<nalgebra::Matrix4<f64>> for Matrix4 {
    fn from(m: nalgebra::Matrix4<f64>) -> Self {
        let mut out = Matrix4::zero();
        for r in 0..4 {
            for c in 0..4 {
                out[r][c] = m[(r, c)];
            }
        }
        out
    }
}

impl From<Matrix4> for nalgebra::Matrix4<f64> {
    fn from(m: Matrix4) -> Self {
        nalgebra::Matrix4::from_fn(|r, c| m[r][c])
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.storage {
            writeln!(f, "| {:>10.5} {:>10.5} {:>10.5} {:>10.5} |", row[0], row[1], row[2], row[3])?;
        }
        Ok(())
    }
}
