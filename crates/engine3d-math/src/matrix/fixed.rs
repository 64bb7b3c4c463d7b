use core::ops::{Index, IndexMut, Mul};
use std::fmt;

use crate::error::{MathError, Result, Shape};
use crate::kernel;
use crate::vector::Vector;

/// `R x C` matrix with its shape fixed at compile time, stored row-major.
///
/// `m[row][col]` indexes an entry. Methods taking `&mut self` mutate **in
/// place** and return `&mut Self`; [`multiply`](Self::multiply) and
/// [`transposed`](Self::transposed) return new matrices since their result
/// may have a different shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix<const R: usize, const C: usize> {
    m: [[f32; C]; R],
}

impl<const R: usize, const C: usize> Matrix<R, C> {
    pub const ROWS: usize = R;
    pub const COLS: usize = C;

    /// Builds a matrix from its rows.
    #[inline]
    pub const fn from_rows(rows: [[f32; C]; R]) -> Self {
        Self { m: rows }
    }

    /// Builds a matrix from `R * C` values in row-major order.
    pub fn from_row_slice(values: &[f32]) -> Result<Self> {
        if values.len() != R * C {
            return Err(MathError::mismatch(
                "from_row_slice",
                Shape::Len(R * C),
                Shape::Len(values.len()),
            ));
        }
        let mut out = Self::zeros();
        out.as_flat_mut_slice().copy_from_slice(values);
        Ok(out)
    }

    #[inline]
    pub const fn zeros() -> Self {
        Self { m: [[0.0; C]; R] }
    }

    #[inline]
    pub const fn ones() -> Self {
        Self { m: [[1.0; C]; R] }
    }

    #[inline]
    pub const fn rows(&self) -> usize {
        R
    }

    #[inline]
    pub const fn cols(&self) -> usize {
        C
    }

    /// Entries in row-major order.
    #[inline]
    pub fn as_flat_slice(&self) -> &[f32] {
        self.m.as_flattened()
    }

    #[inline]
    pub fn as_flat_mut_slice(&mut self) -> &mut [f32] {
        self.m.as_flattened_mut()
    }

    #[inline]
    pub const fn to_rows(self) -> [[f32; C]; R] {
        self.m
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.m.get(row).and_then(|r| r.get(col)).copied()
    }

    #[inline]
    pub fn row(&self, i: usize) -> Vector<C> {
        Vector::new(self.m[i])
    }

    pub fn col(&self, j: usize) -> Vector<R> {
        Vector::new(core::array::from_fn(|i| self.m[i][j]))
    }

    pub fn is_finite(&self) -> bool {
        self.as_flat_slice().iter().all(|v| v.is_finite())
    }

    // ── in-place ─────────────────────────────────────────────────────────

    /// Sets every entry to 0, in place.
    #[inline]
    pub fn zero(&mut self) -> &mut Self {
        self.m = [[0.0; C]; R];
        self
    }

    /// Sets every entry to 1, in place.
    #[inline]
    pub fn fill_one(&mut self) -> &mut Self {
        self.m = [[1.0; C]; R];
        self
    }

    #[inline]
    pub fn set(&mut self, other: &Self) -> &mut Self {
        self.m = other.m;
        self
    }

    /// Adds `other` entry-wise, in place.
    pub fn add(&mut self, other: &Self) -> &mut Self {
        for (a, b) in self.as_flat_mut_slice().iter_mut().zip(other.as_flat_slice()) {
            *a += b;
        }
        self
    }

    /// Subtracts `other` entry-wise, in place.
    pub fn sub(&mut self, other: &Self) -> &mut Self {
        for (a, b) in self.as_flat_mut_slice().iter_mut().zip(other.as_flat_slice()) {
            *a -= b;
        }
        self
    }

    /// Multiplies every entry by `c`, in place.
    pub fn scale(&mut self, c: f32) -> &mut Self {
        for a in self.as_flat_mut_slice() {
            *a *= c;
        }
        self
    }

    // ── value-producing ──────────────────────────────────────────────────

    /// Matrix product `self * other`.
    pub fn multiply<const K: usize>(&self, other: &Matrix<C, K>) -> Matrix<R, K> {
        let mut out = Matrix::<R, K>::zeros();
        kernel::multiply(
            self.as_flat_slice(),
            R,
            C,
            other.as_flat_slice(),
            K,
            out.as_flat_mut_slice(),
        );
        out
    }

    /// `C x R` transpose of `self`.
    pub fn transposed(&self) -> Matrix<C, R> {
        Matrix::from_rows(core::array::from_fn(|j| core::array::from_fn(|i| self.m[i][j])))
    }

    /// `self * v`.
    #[inline]
    pub fn transform(&self, v: &Vector<C>) -> Vector<R> {
        v.transformed(self)
    }
}

impl<const N: usize> Matrix<N, N> {
    /// Identity matrix: 1 on the main diagonal, 0 elsewhere.
    pub const fn identity() -> Self {
        let mut m = [[0.0; N]; N];
        let mut i = 0;
        while i < N {
            m[i][i] = 1.0;
            i += 1;
        }
        Self { m }
    }

    /// Resets to the identity, in place.
    #[inline]
    pub fn set_identity(&mut self) -> &mut Self {
        *self = Self::identity();
        self
    }

    /// Transposes in place.
    #[inline]
    pub fn transpose(&mut self) -> &mut Self {
        kernel::transpose_square(self.as_flat_mut_slice(), N);
        self
    }

    /// Determinant by cofactor expansion along the last row.
    ///
    /// Runs in O(N!) time; fine for the 2x2..4x4 matrices used for rendering.
    pub fn determinant(&self) -> f32 {
        const { assert!(N <= kernel::MAX_DET_ORDER, "determinant order too large") };
        kernel::determinant(self.as_flat_slice(), N)
    }
}

impl<const R: usize, const C: usize> Default for Matrix<R, C> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const R: usize, const C: usize> From<[[f32; C]; R]> for Matrix<R, C> {
    fn from(rows: [[f32; C]; R]) -> Self {
        Self::from_rows(rows)
    }
}

impl<const R: usize, const C: usize> Index<usize> for Matrix<R, C> {
    type Output = [f32; C];
    #[inline]
    fn index(&self, row: usize) -> &[f32; C] {
        &self.m[row]
    }
}

impl<const R: usize, const C: usize> IndexMut<usize> for Matrix<R, C> {
    #[inline]
    fn index_mut(&mut self, row: usize) -> &mut [f32; C] {
        &mut self.m[row]
    }
}

impl<const R: usize, const C: usize, const K: usize> Mul<Matrix<C, K>> for Matrix<R, C> {
    type Output = Matrix<R, K>;
    #[inline]
    fn mul(self, rhs: Matrix<C, K>) -> Matrix<R, K> {
        self.multiply(&rhs)
    }
}

impl<const R: usize, const C: usize> Mul<Vector<C>> for Matrix<R, C> {
    type Output = Vector<R>;
    #[inline]
    fn mul(self, rhs: Vector<C>) -> Vector<R> {
        rhs.transformed(&self)
    }
}

impl<const R: usize, const C: usize> Mul<f32> for Matrix<R, C> {
    type Output = Matrix<R, C>;
    #[inline]
    fn mul(mut self, rhs: f32) -> Matrix<R, C> {
        self.scale(rhs);
        self
    }
}

impl<const R: usize, const C: usize> fmt::Display for Matrix<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, row) in self.m.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str("{")?;
            for (j, v) in row.iter().enumerate() {
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
