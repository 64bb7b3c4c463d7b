//! Vector and matrix algebra for the engine3d renderer.
//!
//! Everything here runs on the host; renderers only receive the flattened
//! results (`Mat4::to_flat_array`, `Vector::to_array`).
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`vector`] | `Vector<N>`, `Vec2`/`Vec3`/`Vec4`, runtime-sized `VecN` |
//! | [`matrix`] | `Matrix<R, C>`, `Mat2`/`Mat3`/`Mat4`, runtime-sized `MatN` |
//! | [`error`] | `MathError`, `Shape` |
//!
//! Operations taking `&mut self` work in place and return `&mut Self` so they
//! chain. Compile-time-sized types reject size mismatches at compile time;
//! runtime-sized types return [`MathError::DimensionMismatch`] and leave their
//! operands untouched.
//!
//! # Quick start
//!
//! ```rust
//! use engine3d_math::{Mat2, Mat3, Vec3};
//!
//! let mut p = Vec3::xyz(1.0, 0.0, 1.0);
//! let spin = Mat3::from_mat2(&Mat2::from_rotation(std::f32::consts::FRAC_PI_2));
//! p.apply_transform(&spin).scale(2.0);
//! assert!((p.y() - 2.0).abs() < 1e-6);
//! ```

pub mod error;
pub mod matrix;
pub mod vector;

mod kernel;

pub use error::{MathError, Result, Shape};
pub use matrix::{Mat2, Mat3, Mat4, MatN, Matrix};
pub use vector::{Vec2, Vec3, Vec4, VecN, Vector};
