//! Matrices, row-major.
//!
//! - [`Matrix<R, C>`]: shape fixed at compile time, `Copy`; [`Mat2`], [`Mat3`]
//!   and [`Mat4`] add flattening and transform constructors.
//! - [`MatN`]: shape chosen at run time; incompatible shapes are reported as
//!   errors instead of compile failures.

mod dynamic;
mod fixed;
mod named;

pub use dynamic::MatN;
pub use fixed::Matrix;
pub use named::{Mat2, Mat3, Mat4};
