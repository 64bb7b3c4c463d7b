//! GPU rendering subsystem.
//!
//! Renderers receive an explicit [`RenderCtx`] and draw into a
//! [`RenderTarget`]; each owns its GPU resources (pipelines, buffers).
//!
//! Convention:
//! - Geometry is in clip space or transformed into it by a uniform matrix.
//! - Matrices are uploaded row-major, so WGSL applies them as `v * m`.
//! - Counter-clockwise triangles face front.

mod ctx;
mod mesh;
mod shader;
mod uniform;
mod viewport;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{Mesh, Vertex};
pub use shader::{ShaderProgram, ShaderSource};
pub use uniform::{UniformBlock, UniformError, UniformKind, UniformLayout, UniformSlot, UniformValue};
pub use viewport::Viewport;
