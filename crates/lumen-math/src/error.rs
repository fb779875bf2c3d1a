//! Error types for tuple and matrix algebra.

use thiserror::Error;

use crate::tuple::TupleKind;

/// Errors raised when an algebraic operation's contract is violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Operand dimensions are incompatible for the requested operation.
    #[error("{op}: incompatible dimensions {left:?} and {right:?}")]
    DimensionMismatch {
        /// Operation that failed.
        op: &'static str,
        /// `(rows, cols)` of the left operand.
        left: (usize, usize),
        /// `(rows, cols)` of the right operand.
        right: (usize, usize),
    },

    /// Operation requires a square matrix.
    #[error("matrix is not square ({rows}x{cols})")]
    NotSquare {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// Matrix has a (near) zero determinant.
    #[error("matrix is singular")]
    Singular,

    /// Gauss elimination met a (near) zero pivot. Rows are never swapped.
    #[error("zero pivot at row {row} during Gauss elimination")]
    ZeroPivot {
        /// Row whose diagonal entry vanished.
        row: usize,
    },

    /// A point was passed where a vector is required, or vice versa.
    #[error("{op}: expected a {expected}, found a {found}")]
    WrongTupleKind {
        /// Operation that failed.
        op: &'static str,
        /// Required flavor.
        expected: TupleKind,
        /// Flavor that was supplied.
        found: TupleKind,
    },

    /// Normalizing a zero-length vector.
    #[error("cannot normalize a zero-length vector")]
    ZeroLength,

    /// Cell buffer does not match the declared shape.
    #[error("{len} cells cannot form a {rows}x{cols} matrix")]
    InvalidShape {
        /// Declared rows.
        rows: usize,
        /// Declared columns.
        cols: usize,
        /// Number of cells supplied.
        len: usize,
    },

    /// Row or column index past the matrix bounds.
    #[error("index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    IndexOutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// Transform matrix whose bottom row is not `[0, 0, 0, 1]`.
    #[error("matrix is not affine")]
    NotAffine,
}

/// Result type for math operations.
pub type Result<T> = std::result::Result<T, MathError>;
