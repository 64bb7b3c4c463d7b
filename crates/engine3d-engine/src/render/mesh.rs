use bytemuck::{Pod, Zeroable};
use engine3d_math::Vec3;
use wgpu::util::DeviceExt;

use super::RenderCtx;

/// Vertex with a position only, bound at shader location 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

impl From<Vec3> for Vertex {
    fn from(v: Vec3) -> Self {
        Self { position: v.to_array() }
    }
}

/// Triangle-list vertex buffer living on the GPU.
pub struct Mesh {
    vbo: wgpu::Buffer,
    vertex_count: u32,
}

impl Mesh {
    pub fn from_positions(ctx: &RenderCtx<'_>, label: &str, positions: &[Vec3]) -> Self {
        let vertices: Vec<Vertex> = positions.iter().copied().map(Vertex::from).collect();

        let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            vbo,
            vertex_count: vertices.len() as u32,
        }
    }

    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vbo
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(Vertex::layout().array_stride, 12);
        let v = Vertex::from(Vec3::xyz(1.0, 2.0, 3.0));
        assert_eq!(bytemuck::cast_slice::<Vertex, f32>(&[v]), &[1.0, 2.0, 3.0]);
    }
}
