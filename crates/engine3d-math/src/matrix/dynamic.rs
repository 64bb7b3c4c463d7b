use core::ops::{Index, IndexMut};
use std::fmt;

use crate::error::{MathError, Result, Shape};
use crate::kernel;

use super::Matrix;

/// Matrix whose shape is chosen at run time, stored row-major.
///
/// Shape requirements (equal shapes for `add`/`sub`, `self.cols ==
/// other.rows` for `multiply`, square for `determinant`/`transpose`) are
/// checked before anything is written; failures leave the receiver as it was.
/// `m[(row, col)]` indexes an entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatN {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl MatN {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 1.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f32) -> Self {
        Self { rows, cols, data: vec![value; rows * cols] }
    }

    /// `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut out = Self::zeros(n, n);
        for i in 0..n {
            out.data[i * n + i] = 1.0;
        }
        out
    }

    /// Builds a matrix from `rows * cols` values in row-major order.
    pub fn from_row_slice(rows: usize, cols: usize, values: &[f32]) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(MathError::mismatch(
                "from_row_slice",
                Shape::Len(rows * cols),
                Shape::Len(values.len()),
            ));
        }
        Ok(Self { rows, cols, data: values.to_vec() })
    }

    /// Builds a matrix from a list of rows, which must all have the same length.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(MathError::mismatch("from_rows", Shape::Len(cols), Shape::Len(row.len())));
            }
            data.extend_from_slice(row);
        }
        Ok(Self { rows: rows.len(), cols, data })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        Shape::Grid(self.rows, self.cols)
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Entries in row-major order.
    #[inline]
    pub fn as_flat_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    fn check_same_shape(&self, op: &'static str, other: &MatN) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(MathError::mismatch(op, self.shape(), other.shape()));
        }
        Ok(())
    }

    fn check_square(&self, op: &'static str) -> Result<()> {
        if !self.is_square() {
            return Err(MathError::degenerate(op, "matrix is not square"));
        }
        Ok(())
    }

    // ── in-place ─────────────────────────────────────────────────────────

    /// Sets every entry to 0, in place.
    pub fn zero(&mut self) -> &mut Self {
        self.data.fill(0.0);
        self
    }

    /// Sets every entry to 1, in place.
    pub fn fill_one(&mut self) -> &mut Self {
        self.data.fill(1.0);
        self
    }

    /// Resets a square matrix to the identity, in place.
    pub fn set_identity(&mut self) -> Result<&mut Self> {
        self.check_square("set_identity")?;
        *self = Self::identity(self.rows);
        Ok(self)
    }

    /// Copies `other`'s entries into `self`; shapes must match.
    pub fn set(&mut self, other: &MatN) -> Result<&mut Self> {
        self.check_same_shape("set", other)?;
        self.data.copy_from_slice(&other.data);
        Ok(self)
    }

    /// Adds `other` entry-wise, in place.
    pub fn add(&mut self, other: &MatN) -> Result<&mut Self> {
        self.check_same_shape("add", other)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
        Ok(self)
    }

    /// Subtracts `other` entry-wise, in place.
    pub fn sub(&mut self, other: &MatN) -> Result<&mut Self> {
        self.check_same_shape("sub", other)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a -= b;
        }
        Ok(self)
    }

    /// Multiplies every entry by `c`, in place.
    pub fn scale(&mut self, c: f32) -> &mut Self {
        for a in &mut self.data {
            *a *= c;
        }
        self
    }

    /// Replaces `self` with `self * other`, in place.
    ///
    /// Requires `self.cols() == other.rows()`; the result is
    /// `self.rows() x other.cols()`.
    pub fn multiply(&mut self, other: &MatN) -> Result<&mut Self> {
        if self.cols != other.rows {
            return Err(MathError::mismatch(
                "multiply",
                Shape::Grid(self.cols, other.cols),
                other.shape(),
            ));
        }
        let mut out = vec![0.0; self.rows * other.cols];
        kernel::multiply(&self.data, self.rows, self.cols, &other.data, other.cols, &mut out);
        self.cols = other.cols;
        self.data = out;
        Ok(self)
    }

    /// Transposes a square matrix in place.
    pub fn transpose(&mut self) -> Result<&mut Self> {
        self.check_square("transpose")?;
        kernel::transpose_square(&mut self.data, self.rows);
        Ok(self)
    }

    // ── value-producing ──────────────────────────────────────────────────

    /// `cols x rows` transpose of any matrix.
    pub fn transposed(&self) -> MatN {
        let mut out = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        out
    }

    /// Determinant by cofactor expansion along the last row.
    ///
    /// O(n!): only meant for small matrices. Non-square matrices, and orders
    /// above 64, are rejected as degenerate.
    pub fn determinant(&self) -> Result<f32> {
        self.check_square("determinant")?;
        if self.rows > kernel::MAX_DET_ORDER {
            return Err(MathError::degenerate("determinant", "order too large for cofactor expansion"));
        }
        Ok(kernel::determinant(&self.data, self.rows))
    }
}

impl<const R: usize, const C: usize> From<Matrix<R, C>> for MatN {
    fn from(m: Matrix<R, C>) -> Self {
        Self { rows: R, cols: C, data: m.as_flat_slice().to_vec() }
    }
}

impl<const R: usize, const C: usize> TryFrom<&MatN> for Matrix<R, C> {
    type Error = MathError;

    fn try_from(m: &MatN) -> Result<Self> {
        if m.rows != R || m.cols != C {
            return Err(MathError::mismatch("to fixed matrix", Shape::Grid(R, C), m.shape()));
        }
        Matrix::from_row_slice(&m.data)
    }
}

impl Index<(usize, usize)> for MatN {
    type Output = f32;
    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        assert!(row < self.rows && col < self.cols, "matrix index out of bounds");
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for MatN {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        assert!(row < self.rows && col < self.cols, "matrix index out of bounds");
        &mut self.data[row * self.cols + col]
    }
}

impl fmt::Display for MatN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for i in 0..self.rows {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str("{")?;
            for (j, v) in self.row(i).iter().enumerate() {
                if j > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{v}")?;
            }
            f.write_str("}")?;
        }
        f.write_str("}")
    }
}
