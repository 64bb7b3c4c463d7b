//! Rendering context bootstrap.
//!
//! Creates the wgpu instance, adapter, device and queue, configures the
//! window surface and its depth buffer, and hands out per-frame encoders.
//! There is no global context: everything goes through a [`Gpu`] value.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
