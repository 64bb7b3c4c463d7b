//! engine3d engine crate.
//!
//! Platform and GPU runtime for the math core: window loop, wgpu context
//! bootstrap, frame timing, and shader programs with typed uniform upload.

pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
