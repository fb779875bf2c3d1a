#![warn(missing_docs)]

//! Linear algebra for the lumen ray caster.
//!
//! Homogeneous tuples, colors, a general dense matrix with two determinant
//! and inversion strategies, a fixed-size 4x4 fast path, cached affine
//! transforms and rays. All comparisons use a shared absolute tolerance,
//! [`EPSILON`].

mod color;
mod error;
mod matrix;
mod matrix4;
mod ray;
mod transform;
mod tuple;

pub use color::Color;
pub use error::{MathError, Result};
pub use matrix::{approx_eq_matrices, Matrix, MatrixRead, Strategy, Transposed};
pub use matrix4::Matrix4;
pub use ray::Ray;
pub use transform::Transform;
pub use tuple::{Tuple4, TupleKind};

/// Absolute tolerance for every floating-point equality in the workspace.
pub const EPSILON: f64 = 1e-5;

/// `|a - b| < EPSILON`.
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}
