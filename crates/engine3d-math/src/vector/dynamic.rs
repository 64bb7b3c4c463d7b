use core::ops::{Index, IndexMut};
use std::fmt;

use crate::error::{MathError, Result, Shape};
use crate::kernel;
use crate::matrix::MatN;

use super::Vector;

/// Vector whose size is chosen at run time.
///
/// Binary operations check that both operands have the same size before
/// touching anything; on mismatch they return
/// [`MathError::DimensionMismatch`] and both operands are left unmodified.
/// Methods taking `&mut self` work **in place** and return `&mut Self` so
/// successful calls can be chained with `?`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VecN {
    data: Vec<f32>,
}

impl VecN {
    /// All-zero vector of `size` components.
    pub fn zeros(size: usize) -> Self {
        Self::splat(size, 0.0)
    }

    /// `size` components, all set to `value`.
    pub fn splat(size: usize, value: f32) -> Self {
        Self { data: vec![value; size] }
    }

    pub fn from_slice(components: &[f32]) -> Self {
        Self { data: components.to_vec() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<f32> {
        self.data.get(i).copied()
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    fn check_same_size(&self, op: &'static str, other: &VecN) -> Result<()> {
        if self.len() != other.len() {
            return Err(MathError::mismatch(op, Shape::Len(self.len()), Shape::Len(other.len())));
        }
        Ok(())
    }

    // ── in-place ─────────────────────────────────────────────────────────

    /// Sets every component to 0, in place.
    pub fn zero(&mut self) -> &mut Self {
        self.data.fill(0.0);
        self
    }

    /// Copies `other`'s components into `self`.
    pub fn set(&mut self, other: &VecN) -> Result<&mut Self> {
        self.check_same_size("set", other)?;
        self.data.copy_from_slice(&other.data);
        Ok(self)
    }

    /// Adds `other` component-wise, in place.
    pub fn add(&mut self, other: &VecN) -> Result<&mut Self> {
        self.check_same_size("add", other)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
        Ok(self)
    }

    /// Subtracts `other` component-wise, in place.
    pub fn sub(&mut self, other: &VecN) -> Result<&mut Self> {
        self.check_same_size("sub", other)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a -= b;
        }
        Ok(self)
    }

    /// Multiplies every component by `c`, in place.
    pub fn scale(&mut self, c: f32) -> &mut Self {
        for a in &mut self.data {
            *a *= c;
        }
        self
    }

    pub fn negate(&mut self) -> &mut Self {
        self.scale(-1.0)
    }

    /// Scales to unit length, in place; zero-length or non-finite vectors are
    /// rejected and left unchanged.
    pub fn normalize(&mut self) -> Result<&mut Self> {
        if !kernel::normalize(&mut self.data) {
            return Err(MathError::degenerate("normalize", "zero-length or non-finite vector"));
        }
        Ok(self)
    }

    /// Moves toward `other` by `t`, in place. `t` is not clamped.
    pub fn lerp(&mut self, other: &VecN, t: f32) -> Result<&mut Self> {
        self.check_same_size("lerp", other)?;
        kernel::lerp(&mut self.data, &other.data, t);
        Ok(self)
    }

    /// Replaces `self` with `m * self`, in place.
    ///
    /// Requires `self.len() == m.cols()`; afterwards `self.len() == m.rows()`.
    pub fn apply_transform(&mut self, m: &MatN) -> Result<&mut Self> {
        if m.cols() != self.len() {
            return Err(MathError::mismatch(
                "apply_transform",
                Shape::Len(m.cols()),
                Shape::Len(self.len()),
            ));
        }
        // Write into a fresh buffer so every row reads the original components.
        let mut out = vec![0.0; m.rows()];
        kernel::transform(m.as_flat_slice(), m.rows(), &self.data, &mut out);
        self.data = out;
        Ok(self)
    }

    // ── value-producing ──────────────────────────────────────────────────

    pub fn dot(&self, other: &VecN) -> Result<f32> {
        self.check_same_size("dot", other)?;
        Ok(kernel::dot(&self.data, &other.data))
    }

    pub fn magnitude_squared(&self) -> f32 {
        kernel::dot(&self.data, &self.data)
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    pub fn distance_squared(&self, other: &VecN) -> Result<f32> {
        self.check_same_size("distance_squared", other)?;
        Ok(kernel::distance_squared(&self.data, &other.data))
    }

    pub fn distance(&self, other: &VecN) -> Result<f32> {
        self.distance_squared(other).map(f32::sqrt)
    }

    /// Angle to `other` in radians, in `[0, π]`.
    pub fn angle_to(&self, other: &VecN) -> Result<f32> {
        self.check_same_size("angle_to", other)?;
        kernel::angle(&self.data, &other.data)
            .ok_or_else(|| MathError::degenerate("angle_to", "zero-length operand"))
    }
}

impl From<Vec<f32>> for VecN {
    fn from(data: Vec<f32>) -> Self {
        Self { data }
    }
}

impl<const N: usize> From<Vector<N>> for VecN {
    fn from(v: Vector<N>) -> Self {
        Self::from_slice(v.as_slice())
    }
}

impl<const N: usize> TryFrom<&VecN> for Vector<N> {
    type Error = MathError;

    fn try_from(v: &VecN) -> Result<Self> {
        let data: [f32; N] = v
            .as_slice()
            .try_into()
            .map_err(|_| MathError::mismatch("to fixed vector", Shape::Len(N), Shape::Len(v.len())))?;
        Ok(Vector::new(data))
    }
}

impl Index<usize> for VecN {
    type Output = f32;
    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.data[i]
    }
}

impl IndexMut<usize> for VecN {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.data[i]
    }
}

impl fmt::Display for VecN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, c) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(c: &[f32]) -> VecN {
        VecN::from_slice(c)
    }

    // ── size checks ───────────────────────────────────────────────────────

    #[test]
    fn add_mismatch_leaves_both_untouched() {
        let mut a = v(&[1.0, 2.0, 3.0]);
        let b = v(&[1.0, 1.0, 1.0, 1.0]);
        let err = a.add(&b).unwrap_err();
        assert_eq!(
            err,
            MathError::DimensionMismatch { op: "add", expected: Shape::Len(3), found: Shape::Len(4) }
        );
        assert_eq!(a, v(&[1.0, 2.0, 3.0]));
        assert_eq!(b, v(&[1.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn every_binary_op_checks_size() {
        let mut a = v(&[1.0, 2.0]);
        let b = v(&[1.0, 2.0, 3.0]);
        assert!(a.set(&b).unwrap_err().is_dimension_mismatch());
        assert!(a.sub(&b).unwrap_err().is_dimension_mismatch());
        assert!(a.lerp(&b, 0.5).unwrap_err().is_dimension_mismatch());
        assert!(a.dot(&b).unwrap_err().is_dimension_mismatch());
        assert!(a.distance(&b).unwrap_err().is_dimension_mismatch());
        assert!(a.angle_to(&b).unwrap_err().is_dimension_mismatch());
        assert_eq!(a, v(&[1.0, 2.0]));
    }

    // ── chaining ──────────────────────────────────────────────────────────

    #[test]
    fn chained_in_place_ops() -> Result<()> {
        let mut a = v(&[1.0, 2.0]);
        a.add(&v(&[1.0, 1.0]))?.scale(3.0).sub(&v(&[6.0, 0.0]))?;
        assert_eq!(a, v(&[0.0, 9.0]));
        Ok(())
    }

    #[test]
    fn clone_is_independent() {
        let a = v(&[3.0, 4.0]);
        let mut b = a.clone();
        b.scale(10.0);
        assert_eq!(a.magnitude(), 5.0);
        assert_eq!(b.magnitude(), 50.0);
    }

    // ── normalize ─────────────────────────────────────────────────────────

    #[test]
    fn normalize_zero_is_degenerate() {
        let mut z = VecN::zeros(4);
        assert!(z.normalize().unwrap_err().is_degenerate());
        assert_eq!(z, VecN::zeros(4));
    }

    #[test]
    fn normalize_unit_length() {
        let mut a = v(&[2.0, 0.0, 0.0, 0.0, 0.0]);
        a.normalize().unwrap();
        assert_eq!(a, v(&[1.0, 0.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn normalize_survives_overflowing_squares() {
        let mut a = v(&[1e20, 1e20, 0.0]);
        a.normalize().unwrap();
        assert!((a[0] - core::f32::consts::FRAC_1_SQRT_2).abs() <= 1e-6);
        assert!((a[1] - core::f32::consts::FRAC_1_SQRT_2).abs() <= 1e-6);
        assert_eq!(a[2], 0.0);
    }

    // ── angle ─────────────────────────────────────────────────────────────

    #[test]
    fn angle_between_tiny_vectors() {
        let a = v(&[1e-12, 0.0, 0.0]);
        let b = v(&[0.0, 1e-12, 0.0]);
        assert!((a.angle_to(&b).unwrap() - core::f32::consts::FRAC_PI_2).abs() <= 1e-6);
    }

    #[test]
    fn angle_between_huge_vectors() {
        let a = v(&[1e10, 0.0, 0.0]);
        let b = v(&[1e10, 1.0, 0.0]);
        assert!(a.angle_to(&b).unwrap() < 1e-3);
    }

    // ── apply_transform ───────────────────────────────────────────────────

    #[test]
    fn apply_transform_changes_size() {
        let m = MatN::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 1.0]).unwrap();
        let mut a = v(&[1.0, 2.0, 3.0]);
        a.apply_transform(&m).unwrap();
        assert_eq!(a, v(&[1.0, 5.0]));
    }

    #[test]
    fn apply_transform_uses_original_components() {
        // Swap matrix: writing row 0 before reading it for row 1 would lose data.
        let m = MatN::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]).unwrap();
        let mut a = v(&[7.0, 9.0]);
        a.apply_transform(&m).unwrap();
        assert_eq!(a, v(&[9.0, 7.0]));
    }

    #[test]
    fn apply_transform_mismatch() {
        let m = MatN::identity(4);
        let mut a = v(&[1.0, 2.0, 3.0]);
        assert!(a.apply_transform(&m).unwrap_err().is_dimension_mismatch());
        assert_eq!(a, v(&[1.0, 2.0, 3.0]));
    }

    // ── conversions ───────────────────────────────────────────────────────

    #[test]
    fn fixed_conversion_checks_length() {
        let a = v(&[1.0, 2.0, 3.0]);
        let fixed: Vector<3> = Vector::try_from(&a).unwrap();
        assert_eq!(fixed.to_array(), [1.0, 2.0, 3.0]);
        assert!(Vector::<4>::try_from(&a).unwrap_err().is_dimension_mismatch());
        assert_eq!(VecN::from(fixed), a);
    }
}
