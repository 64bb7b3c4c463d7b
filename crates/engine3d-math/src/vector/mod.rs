//! Vectors.
//!
//! - [`Vector<N>`]: size fixed at compile time, `Copy`, with named-component
//!   views for 2, 3 and 4 components ([`Vec2`], [`Vec3`], [`Vec4`]).
//! - [`VecN`]: size chosen at run time; size mismatches are reported as
//!   [`MathError::DimensionMismatch`](crate::MathError::DimensionMismatch).

mod dynamic;
mod fixed;
mod named;

pub use dynamic::VecN;
pub use fixed::Vector;
pub use named::{Vec2, Vec3, Vec4};
