//! Named-component views and size conversions for 2, 3 and 4 components.
//!
//! The accessors read and write the same backing array as indexing does:
//! `v.set_y(5.0)` and `v[1] = 5.0` are indistinguishable.

use crate::error::{MathError, Result};

use super::Vector;

pub type Vec2 = Vector<2>;
pub type Vec3 = Vector<3>;
pub type Vec4 = Vector<4>;

macro_rules! component {
    ($name:ident, $name_mut:ident, $setter:ident, $idx:expr) => {
        #[inline]
        pub const fn $name(&self) -> f32 {
            self.as_array()[$idx]
        }

        #[inline]
        pub fn $name_mut(&mut self) -> &mut f32 {
            &mut self.as_mut_slice()[$idx]
        }

        #[inline]
        pub fn $setter(&mut self, value: f32) -> &mut Self {
            self.as_mut_slice()[$idx] = value;
            self
        }
    };
}

impl Vector<2> {
    #[inline]
    pub const fn xy(x: f32, y: f32) -> Self {
        Self::new([x, y])
    }

    component!(x, x_mut, set_x, 0);
    component!(y, y_mut, set_y, 1);

    #[inline]
    pub fn to_vec3(&self) -> Vec3 {
        self.resize()
    }

    #[inline]
    pub fn to_vec4(&self) -> Vec4 {
        self.resize()
    }
}

impl Vector<3> {
    #[inline]
    pub const fn xyz(x: f32, y: f32, z: f32) -> Self {
        Self::new([x, y, z])
    }

    component!(x, x_mut, set_x, 0);
    component!(y, y_mut, set_y, 1);
    component!(z, z_mut, set_z, 2);

    /// Right-handed cross product `self × other`, in place.
    pub fn cross(&mut self, other: &Self) -> &mut Self {
        let [x0, y0, z0] = self.to_array();
        let [x1, y1, z1] = other.to_array();
        self.set(&Self::xyz(
            y0 * z1 - z0 * y1,
            z0 * x1 - x0 * z1,
            x0 * y1 - y0 * x1,
        ))
    }

    /// `self × other` as a new vector.
    #[inline]
    pub fn crossed(&self, other: &Self) -> Self {
        let mut out = *self;
        out.cross(other);
        out
    }

    #[inline]
    pub fn to_vec2(&self) -> Vec2 {
        self.resize()
    }

    /// Zero-fills `w`; use [`to_homogeneous`](Self::to_homogeneous) for a point.
    #[inline]
    pub fn to_vec4(&self) -> Vec4 {
        self.resize()
    }

    /// Point in homogeneous coordinates: `(x, y, z, 1)`.
    #[inline]
    pub fn to_homogeneous(&self) -> Vec4 {
        Vec4::xyzw(self.x(), self.y(), self.z(), 1.0)
    }
}

impl Vector<4> {
    #[inline]
    pub const fn xyzw(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self::new([x, y, z, w])
    }

    component!(x, x_mut, set_x, 0);
    component!(y, y_mut, set_y, 1);
    component!(z, z_mut, set_z, 2);
    component!(w, w_mut, set_w, 3);

    #[inline]
    pub fn to_vec2(&self) -> Vec2 {
        self.resize()
    }

    #[inline]
    pub fn to_vec3(&self) -> Vec3 {
        self.resize()
    }

    /// Perspective divide: `(x/w, y/w, z/w)`.
    pub fn perspective_divide(&self) -> Result<Vec3> {
        let w = self.w();
        if w == 0.0 {
            return Err(MathError::degenerate("perspective_divide", "w is zero"));
        }
        Ok(Vec3::xyz(self.x() / w, self.y() / w, self.z() / w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-4
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[test]
    fn named_accessors_alias_indices() {
        let mut v = Vec4::xyzw(1.0, 2.0, 3.0, 4.0);
        v.set_y(5.0);
        assert_eq!(v[1], 5.0);
        *v.w_mut() = 9.0;
        assert_eq!(v[3], 9.0);
        v[2] = -1.0;
        assert_eq!(v.z(), -1.0);
        assert_eq!(v.x(), 1.0);
    }

    #[test]
    fn setters_chain() {
        let mut v = Vec2::default();
        v.set_x(1.0).set_y(2.0);
        assert_eq!(v, Vec2::xy(1.0, 2.0));
    }

    // ── conversions ───────────────────────────────────────────────────────

    #[test]
    fn widening_zero_fills() {
        assert_eq!(Vec2::xy(1.0, 2.0).to_vec3(), Vec3::xyz(1.0, 2.0, 0.0));
        assert_eq!(Vec2::xy(1.0, 2.0).to_vec4(), Vec4::xyzw(1.0, 2.0, 0.0, 0.0));
        assert_eq!(Vec3::xyz(1.0, 2.0, 3.0).to_vec4(), Vec4::xyzw(1.0, 2.0, 3.0, 0.0));
    }

    #[test]
    fn narrowing_drops_trailing() {
        let v = Vec4::xyzw(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v.to_vec3(), Vec3::xyz(1.0, 2.0, 3.0));
        assert_eq!(v.to_vec2(), Vec2::xy(1.0, 2.0));
        assert_eq!(Vec3::xyz(1.0, 2.0, 3.0).to_vec2(), Vec2::xy(1.0, 2.0));
    }

    #[test]
    fn homogeneous_round_trip() {
        let p = Vec3::xyz(1.0, -2.0, 3.0).to_homogeneous();
        assert_eq!(p.w(), 1.0);
        let scaled = p * 2.0;
        assert_eq!(scaled.perspective_divide().unwrap(), Vec3::xyz(1.0, -2.0, 3.0));
    }

    #[test]
    fn homogeneous_divide_by_zero_w_fails() {
        let dir = Vec3::xyz(1.0, 0.0, 0.0).to_vec4();
        assert!(dir.perspective_divide().unwrap_err().is_degenerate());
    }

    // ── cross ─────────────────────────────────────────────────────────────

    #[test]
    fn cross_of_axes_is_right_handed() {
        let x = Vec3::xyz(1.0, 0.0, 0.0);
        let y = Vec3::xyz(0.0, 1.0, 0.0);
        assert_eq!(x.crossed(&y), Vec3::xyz(0.0, 0.0, 1.0));
        assert_eq!(y.crossed(&x), Vec3::xyz(0.0, 0.0, -1.0));
    }

    #[test]
    fn cross_in_place_reads_before_writing() {
        let mut a = Vec3::xyz(1.0, 2.0, 3.0);
        a.cross(&Vec3::xyz(4.0, 5.0, 6.0));
        assert_eq!(a, Vec3::xyz(-3.0, 6.0, -3.0));
    }

    #[test]
    fn cross_is_orthogonal() {
        let a = Vec3::xyz(0.3, -1.2, 2.0);
        let b = Vec3::xyz(4.0, 0.5, -0.7);
        let c = a.crossed(&b);
        assert!(close(c.dot(&a), 0.0));
        assert!(close(c.dot(&b), 0.0));
    }
}
