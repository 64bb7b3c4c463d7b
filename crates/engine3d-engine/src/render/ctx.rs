use super::Viewport;

/// Everything a renderer needs from the GPU layer for one frame.
///
/// Passed explicitly; there is no ambient rendering context.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// `None` when depth testing is disabled.
    pub depth_format: Option<wgpu::TextureFormat>,
    pub cull_back_faces: bool,
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            depth_format: None,
            cull_back_faces: false,
            viewport,
        }
    }

    #[inline]
    pub fn with_depth(mut self, depth_format: Option<wgpu::TextureFormat>) -> Self {
        self.depth_format = depth_format;
        self
    }

    #[inline]
    pub fn with_back_face_culling(mut self, enabled: bool) -> Self {
        self.cull_back_faces = enabled;
        self
    }
}

/// Attachments to draw into (encoder, color view and optional depth view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: Option<&'a wgpu::TextureView>,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        depth_view: Option<&'a wgpu::TextureView>,
    ) -> Self {
        Self {
            encoder,
            color_view,
            depth_view,
        }
    }
}
