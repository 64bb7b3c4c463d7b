use core::ops::{Index, IndexMut, Mul, Neg};
use std::fmt;

use crate::error::{MathError, Result};
use crate::kernel;
use crate::matrix::Matrix;

/// Vector with `N` components known at compile time.
///
/// Methods taking `&mut self` mutate the vector **in place** and return
/// `&mut Self` so calls can be chained; nothing is copied behind the caller's
/// back. Value-producing variants are named explicitly (`normalized`,
/// `transformed`, `lerped`) or are operators.
///
/// Size mismatches between two `Vector`s cannot be expressed, so only
/// degenerate inputs (zero length) produce errors here.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vector<const N: usize> {
    data: [f32; N],
}

impl<const N: usize> Vector<N> {
    /// Number of components.
    pub const SIZE: usize = N;

    #[inline]
    pub const fn new(data: [f32; N]) -> Self {
        Self { data }
    }

    /// Vector with every component set to `value`.
    #[inline]
    pub const fn splat(value: f32) -> Self {
        Self { data: [value; N] }
    }

    /// All-zero vector.
    #[inline]
    pub const fn zeros() -> Self {
        Self::splat(0.0)
    }

    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    #[inline]
    pub const fn as_array(&self) -> &[f32; N] {
        &self.data
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
    pub const fn to_array(self) -> [f32; N] {
        self.data
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|c| c.is_finite())
    }

    // ── in-place ─────────────────────────────────────────────────────────

    /// Sets every component to 0, in place.
    #[inline]
    pub fn zero(&mut self) -> &mut Self {
        self.data = [0.0; N];
        self
    }

    /// Copies `other`'s components into `self`.
    #[inline]
    pub fn set(&mut self, other: &Self) -> &mut Self {
        self.data = other.data;
        self
    }

    /// Adds `other` component-wise, in place.
    #[inline]
    pub fn add(&mut self, other: &Self) -> &mut Self {
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += b;
        }
        self
    }

    /// Subtracts `other` component-wise, in place.
    #[inline]
    pub fn sub(&mut self, other: &Self) -> &mut Self {
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a -= b;
        }
        self
    }

    /// Multiplies every component by `c`, in place.
    #[inline]
    pub fn scale(&mut self, c: f32) -> &mut Self {
        for a in &mut self.data {
            *a *= c;
        }
        self
    }

    /// Same as `scale(-1.0)`.
    #[inline]
    pub fn negate(&mut self) -> &mut Self {
        self.scale(-1.0)
    }

    /// Scales to unit length, in place.
    ///
    /// A zero-length or non-finite vector has no direction: the call fails with
    /// [`MathError::DegenerateOperation`] and leaves the vector as is.
    pub fn normalize(&mut self) -> Result<&mut Self> {
        if !kernel::normalize(&mut self.data) {
            return Err(MathError::degenerate("normalize", "zero-length or non-finite vector"));
        }
        Ok(self)
    }

    /// Moves toward `other` by `t` (`v += (other - v) * t`), in place.
    ///
    /// `t` is not clamped; values outside [0, 1] extrapolate.
    #[inline]
    pub fn lerp(&mut self, other: &Self, t: f32) -> &mut Self {
        kernel::lerp(&mut self.data, &other.data, t);
        self
    }

    // ── value-producing ──────────────────────────────────────────────────

    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        kernel::dot(&self.data, &other.data)
    }

    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    #[inline]
    pub fn distance_squared(&self, other: &Self) -> f32 {
        kernel::distance_squared(&self.data, &other.data)
    }

    #[inline]
    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Angle to `other` in radians, in `[0, π]`.
    ///
    /// Fails with [`MathError::DegenerateOperation`] if either vector has zero length.
    pub fn angle_to(&self, other: &Self) -> Result<f32> {
        kernel::angle(&self.data, &other.data)
            .ok_or_else(|| MathError::degenerate("angle_to", "zero-length operand"))
    }

    /// Unit-length copy of `self`.
    pub fn normalized(&self) -> Result<Self> {
        let mut out = *self;
        out.normalize()?;
        Ok(out)
    }

    /// Copy of `self` moved toward `other` by `t`.
    #[inline]
    pub fn lerped(&self, other: &Self, t: f32) -> Self {
        let mut out = *self;
        out.lerp(other, t);
        out
    }

    /// `m * self`, producing a vector with one component per matrix row.
    ///
    /// The receiver is read, never written, so no aliasing can occur.
    #[inline]
    pub fn transformed<const R: usize>(&self, m: &Matrix<R, N>) -> Vector<R> {
        let mut out = [0.0; R];
        kernel::transform(m.as_flat_slice(), R, &self.data, &mut out);
        Vector::new(out)
    }

    /// Replaces `self` with `m * self`, in place.
    ///
    /// Only square matrices keep the size unchanged; for a size-changing
    /// transform use [`transformed`](Self::transformed).
    #[inline]
    pub fn apply_transform(&mut self, m: &Matrix<N, N>) -> &mut Self {
        // `transformed` reads from `self` into a fresh array before the write.
        self.data = self.transformed(m).data;
        self
    }

    /// Converts to another size, dropping trailing components or filling
    /// new ones with 0.
    pub fn resize<const M: usize>(&self) -> Vector<M> {
        let mut out = [0.0; M];
        let n = N.min(M);
        out[..n].copy_from_slice(&self.data[..n]);
        Vector::new(out)
    }
}

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const N: usize> From<[f32; N]> for Vector<N> {
    #[inline]
    fn from(data: [f32; N]) -> Self {
        Self::new(data)
    }
}

impl<const N: usize> From<Vector<N>> for [f32; N] {
    #[inline]
    fn from(v: Vector<N>) -> Self {
        v.data
    }
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f32;
    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.data[i]
    }
}

impl<const N: usize> IndexMut<usize> for Vector<N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.data[i]
    }
}

impl<const N: usize> Mul<f32> for Vector<N> {
    type Output = Vector<N>;
    #[inline]
    fn mul(mut self, rhs: f32) -> Vector<N> {
        self.scale(rhs);
        self
    }
}

impl<const N: usize> Neg for Vector<N> {
    type Output = Vector<N>;
    #[inline]
    fn neg(mut self) -> Vector<N> {
        self.negate();
        self
    }
}

impl<const N: usize> fmt::Display for Vector<N> {
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

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-5
    }

    // ── in-place chaining ─────────────────────────────────────────────────

    #[test]
    fn chained_ops_mutate_receiver() {
        let mut v = Vector::new([1.0, 2.0, 3.0]);
        v.add(&Vector::splat(1.0)).scale(2.0).negate();
        assert_eq!(v.to_array(), [-4.0, -6.0, -8.0]);
    }

    #[test]
    fn sub_and_set() {
        let mut v = Vector::new([5.0, 5.0]);
        v.sub(&Vector::new([1.0, 2.0]));
        assert_eq!(v.to_array(), [4.0, 3.0]);
        v.set(&Vector::new([9.0, 8.0]));
        assert_eq!(v.to_array(), [9.0, 8.0]);
    }

    #[test]
    fn zero_clears_all() {
        let mut v = Vector::new([1.0, -2.0, 3.0, 4.0]);
        v.zero();
        assert_eq!(v, Vector::zeros());
    }

    #[test]
    fn scale_by_zero_and_negative() {
        let mut v = Vector::new([1.0, -2.0]);
        v.scale(-3.0);
        assert_eq!(v.to_array(), [-3.0, 6.0]);
        v.scale(0.0);
        assert_eq!(v.magnitude(), 0.0);
    }

    // ── metric ────────────────────────────────────────────────────────────

    #[test]
    fn magnitude_and_distance() {
        let a = Vector::new([3.0, 4.0]);
        assert_eq!(a.magnitude_squared(), 25.0);
        assert_eq!(a.magnitude(), 5.0);
        assert_eq!(a.distance(&Vector::zeros()), 5.0);
        assert_eq!(a.distance_squared(&Vector::new([0.0, 4.0])), 9.0);
    }

    #[test]
    fn angle_between_axes() {
        let x = Vector::new([1.0, 0.0, 0.0]);
        let y = Vector::new([0.0, 2.0, 0.0]);
        assert!(close(x.angle_to(&y).unwrap(), core::f32::consts::FRAC_PI_2));
        assert!(close(x.angle_to(&(-x)).unwrap(), core::f32::consts::PI));
    }

    #[test]
    fn angle_between_tiny_vectors() {
        let x = Vector::new([1e-12, 0.0, 0.0]);
        let y = Vector::new([0.0, 1e-12, 0.0]);
        assert!(close(x.angle_to(&y).unwrap(), core::f32::consts::FRAC_PI_2));
    }

    #[test]
    fn angle_between_huge_vectors() {
        let a = Vector::new([1e10, 0.0, 0.0]);
        let b = Vector::new([1e10, 1.0, 0.0]);
        assert!(a.angle_to(&b).unwrap() < 1e-3);
    }

    #[test]
    fn angle_to_zero_vector_is_degenerate() {
        let x = Vector::new([1.0, 0.0]);
        assert!(x.angle_to(&Vector::zeros()).unwrap_err().is_degenerate());
    }

    // ── normalize ─────────────────────────────────────────────────────────

    #[test]
    fn normalize_divides_by_magnitude() {
        let mut v = Vector::new([0.0, 3.0, 4.0]);
        v.normalize().unwrap();
        assert!(close(v.magnitude(), 1.0));
        assert!(close(v[1], 0.6));
        assert!(close(v[2], 0.8));
    }

    #[test]
    fn normalize_zero_vector_fails_and_leaves_it_unchanged() {
        let mut v = Vector::<3>::zeros();
        let err = v.normalize().unwrap_err();
        assert!(err.is_degenerate());
        assert_eq!(v, Vector::zeros());
    }

    #[test]
    fn normalize_survives_overflowing_squares() {
        let mut v = Vector::new([1e20, 1e20, 0.0]);
        v.normalize().unwrap();
        assert!(close(v[0], core::f32::consts::FRAC_1_SQRT_2));
        assert!(close(v[1], core::f32::consts::FRAC_1_SQRT_2));
        assert_eq!(v[2], 0.0);
    }

    #[test]
    fn normalize_infinite_component_is_degenerate() {
        let mut v = Vector::new([f32::INFINITY, 1.0]);
        assert!(v.normalize().unwrap_err().is_degenerate());
        assert_eq!(v[1], 1.0);
    }

    // ── lerp ──────────────────────────────────────────────────────────────

    #[test]
    fn lerp_midpoint_and_extrapolation() {
        let a = Vector::new([0.0, 10.0]);
        let b = Vector::new([10.0, 20.0]);
        assert_eq!(a.lerped(&b, 0.5).to_array(), [5.0, 15.0]);
        assert_eq!(a.lerped(&b, 2.0).to_array(), [20.0, 30.0]);
        assert_eq!(a.lerped(&b, -1.0).to_array(), [-10.0, 0.0]);
    }

    // ── resize / display ──────────────────────────────────────────────────

    #[test]
    fn resize_truncates_and_zero_fills() {
        let v = Vector::new([1.0, 2.0, 3.0]);
        assert_eq!(v.resize::<2>().to_array(), [1.0, 2.0]);
        assert_eq!(v.resize::<5>().to_array(), [1.0, 2.0, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn display_matches_tuple_form() {
        assert_eq!(Vector::new([1.0, 2.5, -3.0]).to_string(), "(1,2.5,-3)");
    }

    #[test]
    fn operators_produce_new_values() {
        let v = Vector::new([1.0, 2.0]);
        let w = v * 2.0;
        assert_eq!(v.to_array(), [1.0, 2.0]);
        assert_eq!(w.to_array(), [2.0, 4.0]);
        assert_eq!((-v).to_array(), [-1.0, -2.0]);
    }
}
