//! Dense matrices with two interchangeable determinant/inverse strategies.
//!
//! [`Matrix`] is an immutable, arbitrarily sized row-major matrix. Square
//! matrices up to 3x3 use closed-form determinants; larger ones dispatch to
//! either cofactor expansion or Gauss elimination (see [`Strategy`]).
//!
//! Gauss elimination never reorders rows. A pivot that vanishes while a
//! non-zero entry remains below it yields [`MathError::ZeroPivot`] even when
//! the matrix is invertible; use [`Strategy::Cofactor`] for such inputs.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::{approx_eq, EPSILON};

/// Read access shared by every matrix representation.
///
/// Equality between any two implementors is cell-wise and epsilon based
/// (see [`approx_eq_matrices`]).
pub trait MatrixRead {
    /// Number of rows.
    fn rows(&self) -> usize;

    /// Number of columns.
    fn cols(&self) -> usize;

    /// Cell at `(row, col)`. Panics when out of range, like slice indexing.
    fn get(&self, row: usize, col: usize) -> f64;

    /// True when `rows == cols`.
    fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// Copy the cells into an owned [`Matrix`].
    fn to_matrix(&self) -> Matrix {
        let mut cells = Vec::with_capacity(self.rows() * self.cols());
        for r in 0..self.rows() {
            for c in 0..self.cols() {
                cells.push(self.get(r, c));
            }
        }
        Matrix {
            rows: self.rows(),
            cols: self.cols(),
            cells,
        }
    }
}

/// Epsilon equality over any two matrix representations.
pub fn approx_eq_matrices<A, B>(a: &A, b: &B) -> bool
where
    A: MatrixRead + ?Sized,
    B: MatrixRead + ?Sized,
{
    if a.rows() != b.rows() || a.cols() != b.cols() {
        return false;
    }
    (0..a.rows()).all(|r| (0..a.cols()).all(|c| approx_eq(a.get(r, c), b.get(r, c))))
}

/// Algorithm used for determinants (size >= 4) and inverses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Recursive Laplace expansion along row 0.
    Cofactor,
    /// Row reduction to upper-triangular form, without pivoting.
    #[default]
    Gauss,
}

/// An immutable dense matrix stored in row-major order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl Matrix {
    /// Build a matrix from row-major cells.
    pub fn new(rows: usize, cols: usize, cells: Vec<f64>) -> Result<Self> {
        if rows == 0 || cols == 0 || cells.len() != rows * cols {
            return Err(MathError::InvalidShape {
                rows,
                cols,
                len: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Build a matrix from a slice of equally long rows.
    pub fn from_rows(rows: &[&[f64]]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        let len: usize = rows.iter().map(|r| r.len()).sum();
        if rows.iter().any(|r| r.len() != cols) {
            return Err(MathError::InvalidShape {
                rows: rows.len(),
                cols,
                len,
            });
        }
        Self::new(rows.len(), cols, rows.concat())
    }

    /// The `n`x`n` identity.
    pub fn identity(n: usize) -> Self {
        let mut cells = vec![0.0; n * n];
        for i in 0..n {
            cells[i * n + i] = 1.0;
        }
        Self {
            rows: n,
            cols: n,
            cells,
        }
    }

    /// Row `r` as a slice.
    pub fn row(&self, r: usize) -> &[f64] {
        &self.cells[r * self.cols..(r + 1) * self.cols]
    }

    /// Every cell multiplied by `k`.
    pub fn scale(&self, k: f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(|v| v * k).collect(),
        }
    }

    /// Matrix product `self * other`.
    ///
    /// Requires `self.cols() == other.rows()`.
    pub fn multiply<M: MatrixRead + ?Sized>(&self, other: &M) -> Result<Matrix> {
        if self.cols != other.rows() {
            return Err(MathError::DimensionMismatch {
                op: "multiply",
                left: (self.rows, self.cols),
                right: (other.rows(), other.cols()),
            });
        }
        let mut cells = Vec::with_capacity(self.rows * other.cols());
        for r in 0..self.rows {
            for c in 0..other.cols() {
                let sum = (0..self.cols).map(|k| self.get(r, k) * other.get(k, c)).sum();
                cells.push(sum);
            }
        }
        Ok(Matrix {
            rows: self.rows,
            cols: other.cols(),
            cells,
        })
    }

    /// Materialized transpose.
    pub fn transpose(&self) -> Matrix {
        self.transposed().to_matrix()
    }

    /// Zero-copy transposed view.
    pub fn transposed(&self) -> Transposed<'_, Matrix> {
        Transposed::new(self)
    }

    /// Copy with row `row` and column `col` deleted.
    pub fn submatrix(&self, row: usize, col: usize) -> Result<Matrix> {
        if self.rows < 2 || self.cols < 2 {
            return Err(MathError::InvalidShape {
                rows: self.rows.saturating_sub(1),
                cols: self.cols.saturating_sub(1),
                len: 0,
            });
        }
        if row >= self.rows || col >= self.cols {
            return Err(MathError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let mut cells = Vec::with_capacity((self.rows - 1) * (self.cols - 1));
        for r in (0..self.rows).filter(|&r| r != row) {
            for c in (0..self.cols).filter(|&c| c != col) {
                cells.push(self.get(r, c));
            }
        }
        Ok(Matrix {
            rows: self.rows - 1,
            cols: self.cols - 1,
            cells,
        })
    }

    /// Determinant of the submatrix without `row` and `col`.
    pub fn minor(&self, row: usize, col: usize, strategy: Strategy) -> Result<f64> {
        self.submatrix(row, col)?.determinant(strategy)
    }

    /// Signed minor: negated when `row + col` is odd.
    pub fn cofactor(&self, row: usize, col: usize, strategy: Strategy) -> Result<f64> {
        let minor = self.minor(row, col, strategy)?;
        Ok(if (row + col) % 2 == 0 { minor } else { -minor })
    }

    /// Determinant. Closed form below 4x4, `strategy` otherwise.
    pub fn determinant(&self, strategy: Strategy) -> Result<f64> {
        self.require_square()?;
        let m = |r: usize, c: usize| self.get(r, c);
        match self.rows {
            1 => Ok(m(0, 0)),
            2 => Ok(m(0, 0) * m(1, 1) - m(0, 1) * m(1, 0)),
            3 => Ok(m(0, 0) * (m(1, 1) * m(2, 2) - m(1, 2) * m(2, 1))
                - m(0, 1) * (m(1, 0) * m(2, 2) - m(1, 2) * m(2, 0))
                + m(0, 2) * (m(1, 0) * m(2, 1) - m(1, 1) * m(2, 0))),
            _ => match strategy {
                Strategy::Cofactor => self.determinant_cofactor(),
                Strategy::Gauss => self.determinant_gauss(),
            },
        }
    }

    fn determinant_cofactor(&self) -> Result<f64> {
        let mut det = 0.0;
        for col in 0..self.cols {
            let a = self.get(0, col);
            if a == 0.0 {
                continue;
            }
            det += a * self.cofactor(0, col, Strategy::Cofactor)?;
        }
        Ok(det)
    }

    fn determinant_gauss(&self) -> Result<f64> {
        let n = self.rows;
        let mut work = self.cells.clone();
        match forward_eliminate(&mut work, n, n) {
            Ok(()) => Ok((0..n).map(|i| work[i * n + i]).product()),
            Err(Elimination::SingularColumn) => Ok(0.0),
            Err(Elimination::ZeroPivot(row)) => Err(MathError::ZeroPivot { row }),
        }
    }

    /// Inverse using `strategy`.
    ///
    /// Cofactor: `adjugate / det`, failing with [`MathError::Singular`] when
    /// the determinant is within epsilon of zero. Gauss: Gauss-Jordan on
    /// `[M | I]` without row exchanges.
    pub fn invert(&self, strategy: Strategy) -> Result<Matrix> {
        self.require_square()?;
        match strategy {
            Strategy::Cofactor => self.invert_cofactor(),
            Strategy::Gauss => self.invert_gauss(),
        }
    }

    /// Transposed cofactor matrix.
    pub fn adjugate(&self, strategy: Strategy) -> Result<Matrix> {
        self.require_square()?;
        let n = self.rows;
        if n == 1 {
            return Ok(Matrix::identity(1));
        }
        let mut cells = vec![0.0; n * n];
        for r in 0..n {
            for c in 0..n {
                cells[c * n + r] = self.cofactor(r, c, strategy)?;
            }
        }
        Ok(Matrix {
            rows: n,
            cols: n,
            cells,
        })
    }

    fn invert_cofactor(&self) -> Result<Matrix> {
        let det = self.determinant(Strategy::Cofactor)?;
        if det.abs() < EPSILON {
            return Err(MathError::Singular);
        }
        Ok(self.adjugate(Strategy::Cofactor)?.scale(1.0 / det))
    }

    fn invert_gauss(&self) -> Result<Matrix> {
        let n = self.rows;
        let width = 2 * n;
        let mut work = vec![0.0; n * width];
        for r in 0..n {
            work[r * width..r * width + n].copy_from_slice(self.row(r));
            work[r * width + n + r] = 1.0;
        }

        forward_eliminate(&mut work, n, width).map_err(|e| match e {
            Elimination::SingularColumn => MathError::Singular,
            Elimination::ZeroPivot(row) => MathError::ZeroPivot { row },
        })?;

        // Back elimination, indices mirrored from the end.
        for i in (0..n).rev() {
            let pivot = work[i * width + i];
            for r in (0..i).rev() {
                let factor = work[r * width + i] / pivot;
                if factor == 0.0 {
                    continue;
                }
                for c in 0..width {
                    work[r * width + c] -= factor * work[i * width + c];
                }
            }
        }

        let mut cells = Vec::with_capacity(n * n);
        for r in 0..n {
            let diag = work[r * width + r];
            cells.extend(work[r * width + n..(r + 1) * width].iter().map(|v| v / diag));
        }
        Ok(Matrix {
            rows: n,
            cols: n,
            cells,
        })
    }

    /// `self` raised to `exp` by square-and-multiply. `power(0)` is identity.
    pub fn power(&self, exp: u32) -> Result<Matrix> {
        self.require_square()?;
        let mut result = Matrix::identity(self.rows);
        let mut base = self.clone();
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result = result.multiply(&base)?;
            }
            e >>= 1;
            if e > 0 {
                base = base.multiply(&base)?;
            }
        }
        Ok(result)
    }

    fn require_square(&self) -> Result<()> {
        if self.is_square() {
            Ok(())
        } else {
            Err(MathError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
}

/// Why forward elimination stopped.
enum Elimination {
    /// Pivot and every entry below it vanished: the matrix is singular.
    SingularColumn,
    /// Pivot vanished but a lower row could have supplied one.
    ZeroPivot(usize),
}

/// Reduce the leading `n` columns of a row-major `n`x`width` buffer to
/// upper-triangular form in place. Rows are never exchanged.
fn forward_eliminate(work: &mut [f64], n: usize, width: usize) -> std::result::Result<(), Elimination> {
    for i in 0..n {
        let pivot = work[i * width + i];
        if pivot.abs() < EPSILON {
            let column_empty = (i + 1..n).all(|r| work[r * width + i].abs() < EPSILON);
            log::trace!("gauss: zero pivot at row {i} (column empty: {column_empty})");
            return Err(if column_empty {
                Elimination::SingularColumn
            } else {
                Elimination::ZeroPivot(i)
            });
        }
        for r in i + 1..n {
            let factor = work[r * width + i] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in i..width {
                work[r * width + c] -= factor * work[i * width + c];
            }
        }
    }
    Ok(())
}

impl MatrixRead for Matrix {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "matrix index out of range");
        self.cells[row * self.cols + col]
    }
}

impl<M: MatrixRead> PartialEq<M> for Matrix {
    fn eq(&self, other: &M) -> bool {
        approx_eq_matrices(self, other)
    }
}

impl Eq for Matrix {}

/// Only the shape is hashed: it is the one property that epsilon-equal
/// matrices are guaranteed to share.
impl Hash for Matrix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rows.hash(state);
        self.cols.hash(state);
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let row: Vec<String> = self.row(r).iter().map(|v| format!("{v:>10.5}")).collect();
            writeln!(f, "| {} |", row.join(" "))?;
        }
        Ok(())
    }
}

/// A lazy transposed view over another matrix.
#[derive(Debug)]
pub struct Transposed<'a, M: MatrixRead + ?Sized> {
    inner: &'a M,
}

impl<M: MatrixRead + ?Sized> Clone for Transposed<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: MatrixRead + ?Sized> Copy for Transposed<'_, M> {}

impl<'a, M: MatrixRead + ?Sized> Transposed<'a, M> {
    /// Wrap `inner` without copying.
    pub fn new(inner: &'a M) -> Self {
        Self { inner }
    }
}

impl<M: MatrixRead + ?Sized> MatrixRead for Transposed<'_, M> {
    fn rows(&self) -> usize {
        self.inner.cols()
    }

    fn cols(&self) -> usize {
        self.inner.rows()
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self.inner.get(col, row)
    }
}

impl<I: MatrixRead + ?Sized, M: MatrixRead> PartialEq<M> for Transposed<'_, I> {
    fn eq(&self, other: &M) -> bool {
        approx_eq_matrices(self, other)
    }
}
