//! 2x2, 3x3 and 4x4 matrices: flattening for uniform upload plus the
//! transform constructors used by renderers.
//!
//! Transforms act on column vectors (`M * v`), so translation lives in the
//! last column of a homogeneous matrix.

use crate::vector::{Vec2, Vec3};

use super::Matrix;

pub type Mat2 = Matrix<2, 2>;
pub type Mat3 = Matrix<3, 3>;
pub type Mat4 = Matrix<4, 4>;

macro_rules! flat_array {
    ($len:expr) => {
        /// Row-major copy of every entry, ready for a uniform upload.
        #[inline]
        pub fn to_flat_array(&self) -> [f32; $len] {
            let mut out = [0.0; $len];
            out.copy_from_slice(self.as_flat_slice());
            out
        }
    };
}

impl Matrix<2, 2> {
    flat_array!(4);

    /// Counter-clockwise rotation by `theta` radians.
    pub fn from_rotation(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_rows([[c, -s], [s, c]])
    }

    /// Diagonal scale matrix.
    pub const fn from_scale(sx: f32, sy: f32) -> Self {
        Self::from_rows([[sx, 0.0], [0.0, sy]])
    }

    /// Overwrites `self` with a rotation by `theta` radians.
    pub fn set_rotation(&mut self, theta: f32) -> &mut Self {
        self.set(&Self::from_rotation(theta))
    }

    /// Overwrites `self` with a diagonal scale.
    pub fn set_scale(&mut self, sx: f32, sy: f32) -> &mut Self {
        self.set(&Self::from_scale(sx, sy))
    }
}

impl Matrix<3, 3> {
    flat_array!(9);

    /// Embeds a 2x2 linear map in the upper-left corner, 1 in the corner.
    pub fn from_mat2(m: &Mat2) -> Self {
        let [[a, b], [c, d]] = m.to_rows();
        Self::from_rows([[a, b, 0.0], [c, d, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Homogeneous 2D translation.
    pub fn from_translation_2d(t: Vec2) -> Self {
        Self::from_rows([[1.0, 0.0, t.x()], [0.0, 1.0, t.y()], [0.0, 0.0, 1.0]])
    }
}

impl Matrix<4, 4> {
    flat_array!(16);

    /// Embeds a 3x3 linear map in the upper-left corner, 1 in the corner.
    pub fn from_mat3(m: &Mat3) -> Self {
        let mut out = Self::identity();
        for i in 0..3 {
            out[i][..3].copy_from_slice(&m[i]);
        }
        out
    }

    pub fn from_translation(t: Vec3) -> Self {
        let mut out = Self::identity();
        out[0][3] = t.x();
        out[1][3] = t.y();
        out[2][3] = t.z();
        out
    }

    pub fn from_scale(s: Vec3) -> Self {
        Self::from_rows([
            [s.x(), 0.0, 0.0, 0.0],
            [0.0, s.y(), 0.0, 0.0],
            [0.0, 0.0, s.z(), 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation by `theta` radians about +Z.
    pub fn from_rotation_z(theta: f32) -> Self {
        Self::from_mat3(&Mat3::from_mat2(&Mat2::from_rotation(theta)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec4;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-5
    }

    // ── flattening ────────────────────────────────────────────────────────

    #[test]
    fn flat_arrays_are_row_major() {
        let m = Mat2::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(m.to_flat_array(), [1.0, 2.0, 3.0, 4.0]);

        let m = Mat3::from_row_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).unwrap();
        assert_eq!(m.to_flat_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn flat_identity_4x4() {
        assert_eq!(
            Mat4::identity().to_flat_array(),
            [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    // ── 2x2 transforms ────────────────────────────────────────────────────

    #[test]
    fn rotation_quarter_turn() {
        let mut m = Mat2::identity();
        m.set_rotation(core::f32::consts::FRAC_PI_2);
        let v = m * Vec2::xy(1.0, 0.0);
        assert!(close(v.x(), 0.0));
        assert!(close(v.y(), 1.0));
        assert!(close(m.determinant(), 1.0));
    }

    #[test]
    fn scale_matrix() {
        let mut m = Mat2::zeros();
        m.set_scale(2.0, -3.0);
        assert_eq!(m.to_flat_array(), [2.0, 0.0, 0.0, -3.0]);
        assert_eq!(m * Vec2::xy(1.0, 1.0), Vec2::xy(2.0, -3.0));
        assert_eq!(m.determinant(), -6.0);
    }

    // ── homogeneous ───────────────────────────────────────────────────────

    #[test]
    fn translation_moves_points_not_directions() {
        let t = Mat4::from_translation(Vec3::xyz(1.0, 2.0, 3.0));
        let p = t * Vec3::xyz(1.0, 1.0, 1.0).to_homogeneous();
        assert_eq!(p, Vec4::xyzw(2.0, 3.0, 4.0, 1.0));
        let d = t * Vec3::xyz(1.0, 1.0, 1.0).to_vec4();
        assert_eq!(d, Vec4::xyzw(1.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn translation_2d() {
        let t = Mat3::from_translation_2d(Vec2::xy(5.0, -1.0));
        assert_eq!(t * Vec3::xyz(1.0, 1.0, 1.0), Vec3::xyz(6.0, 0.0, 1.0));
    }

    #[test]
    fn compose_scale_then_rotate() {
        let s = Mat4::from_scale(Vec3::xyz(2.0, 2.0, 2.0));
        let r = Mat4::from_rotation_z(core::f32::consts::PI);
        let p = (r * s) * Vec4::xyzw(1.0, 0.0, 0.0, 1.0);
        assert!(close(p.x(), -2.0));
        assert!(close(p.y(), 0.0));
        assert!(close(p.w(), 1.0));
        assert!(close((r * s).determinant(), 8.0));
    }

    #[test]
    fn embedding_keeps_linear_part() {
        let m2 = Mat2::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        let m3 = Mat3::from_mat2(&m2);
        assert_eq!(m3.to_rows(), [[1.0, 2.0, 0.0], [3.0, 4.0, 0.0], [0.0, 0.0, 1.0]]);
        let m4 = Mat4::from_mat3(&m3);
        assert_eq!(m4[3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(m4[1], [3.0, 4.0, 0.0, 0.0]);
        assert!(close(m4.determinant(), -2.0));
    }
}
