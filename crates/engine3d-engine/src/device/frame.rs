/// A surface texture acquired for one frame, plus the encoder recording it.
///
/// Hand it back to [`Gpu::submit`](super::Gpu::submit) promptly: the next
/// frame cannot be acquired while this one is held.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
