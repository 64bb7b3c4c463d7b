//! Window and runtime loop.
//!
//! Owns the `winit` event loop and a single window bound to its
//! [`Gpu`](crate::device::Gpu).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
