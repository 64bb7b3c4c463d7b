/// Parameters for bringing up the rendering context.
///
/// Defaults match a plain 3D viewer: sRGB output, vsync, depth testing and
/// back-face culling on, cleared to opaque black every frame.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when the surface offers one.
    pub prefer_srgb: bool,

    /// Swap behavior. FIFO is supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Requested alpha mode; ignored if the surface does not support it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Features the device must support. Keep empty unless a renderer needs one.
    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Hint only; honored depending on platform/backend.
    pub desired_maximum_frame_latency: u32,

    /// Allocate a depth buffer and enable `Less` depth testing in pipelines.
    pub depth_test: bool,

    /// Cull back faces (counter-clockwise triangles face front).
    pub cull_back_faces: bool,

    /// Color every frame starts from.
    pub clear_color: wgpu::Color,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            depth_test: true,
            cull_back_faces: true,
            clear_color: wgpu::Color::BLACK,
        }
    }
}
