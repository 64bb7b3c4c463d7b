use std::collections::HashSet;

use anyhow::Result;

use super::mesh::{Mesh, Vertex};
use super::uniform::{UniformBlock, UniformError, UniformKind, UniformLayout, UniformValue};
use super::{RenderCtx, RenderTarget};

/// WGSL sources for one program: a vertex stage (`vs_main`) and a
/// fragment stage (`fs_main`).
#[derive(Debug, Clone, Copy)]
pub struct ShaderSource<'a> {
    pub label: &'a str,
    pub vertex: &'a str,
    pub fragment: &'a str,
}

/// Pipeline state that forces a rebuild when it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PipelineKey {
    surface_format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,
    cull_back_faces: bool,
}

/// A vertex and fragment module linked into one render pipeline, with a
/// single uniform block at group 0, binding 0.
///
/// Pipeline and bindings are built lazily on the first draw and rebuilt when
/// the target formats change or a uniform is declared.
pub struct ShaderProgram {
    label: String,
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,

    uniforms: UniformBlock,

    pipeline_key: Option<PipelineKey>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    ubo: Option<wgpu::Buffer>,

    warned_unknown: HashSet<String>,
}

impl ShaderProgram {
    /// Compiles both stages. Fails with the compiler messages if either
    /// stage does not compile.
    pub fn new(ctx: &RenderCtx<'_>, src: ShaderSource<'_>) -> Result<Self> {
        let vertex = compile(ctx.device, src.label, "vertex", src.vertex)?;
        let fragment = compile(ctx.device, src.label, "fragment", src.fragment)?;
        log::debug!("shader program `{}` compiled", src.label);

        Ok(Self {
            label: src.label.to_owned(),
            vertex,
            fragment,
            uniforms: UniformBlock::new(),
            pipeline_key: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            ubo: None,
            warned_unknown: HashSet::new(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn uniform_layout(&self) -> &UniformLayout {
        self.uniforms.layout()
    }

    /// Declares a uniform member. Members must be declared in the order the
    /// WGSL struct lists them.
    pub fn add_uniform(&mut self, name: &str, kind: UniformKind) -> Result<(), UniformError> {
        let offset = self.uniforms.declare(name, kind)?;
        log::trace!("{}: uniform `{name}` ({kind}) at offset {offset}", self.label);

        // Buffer size and possibly the pipeline layout changed.
        self.pipeline = None;
        self.pipeline_key = None;
        self.bind_group_layout = None;
        self.bind_group = None;
        self.ubo = None;
        Ok(())
    }

    /// Stages a new value; it reaches the GPU on the next draw.
    pub fn update_uniform(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        let res = self.uniforms.set(name, value);
        if let Err(UniformError::UnknownUniform(_)) = &res {
            if self.warned_unknown.insert(name.to_owned()) {
                log::warn!("{}: update of undeclared uniform `{name}`", self.label);
            }
        }
        res
    }

    /// Draws `mesh` as a triangle list into `target`, keeping its contents.
    pub fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, mesh: &Mesh) {
        if mesh.vertex_count() == 0 {
            return;
        }

        let depth = ctx.depth_format.zip(target.depth_view);
        let key = PipelineKey {
            surface_format: ctx.surface_format,
            depth_format: depth.map(|(format, _)| format),
            cull_back_faces: ctx.cull_back_faces,
        };

        self.ensure_pipeline(ctx, key);
        self.ensure_bindings(ctx);
        self.flush_uniforms(ctx);

        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(self.label.as_str()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: depth.map(|(_, view)| {
                wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        if let Some(bind_group) = self.bind_group.as_ref() {
            rpass.set_bind_group(0, bind_group, &[]);
        }
        rpass.set_vertex_buffer(0, mesh.vertex_buffer().slice(..));
        rpass.draw(0..mesh.vertex_count(), 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, key: PipelineKey) {
        if self.pipeline_key == Some(key) && self.pipeline.is_some() {
            return;
        }

        let bind_group_layout = (!self.uniforms.layout().is_empty()).then(|| {
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("engine3d uniform bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                self.uniforms.layout().size() as u64,
                            ),
                        },
                        count: None,
                    }],
                })
        });

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> =
            bind_group_layout.iter().collect();
        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("engine3d pipeline layout"),
                bind_group_layouts: &bind_group_layouts,
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(self.label.as_str()),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &self.vertex,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &self.fragment,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: key.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: key.cull_back_faces.then_some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: key.depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("{}: pipeline built for {key:?}", self.label);

        self.pipeline_key = Some(key);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = bind_group_layout;

        self.bind_group = None;
        self.ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("engine3d uniform buffer"),
            size: self.uniforms.layout().size() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("engine3d uniform bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        // A fresh buffer holds nothing yet.
        ctx.queue.write_buffer(&ubo, 0, self.uniforms.bytes());
        self.uniforms.take_dirty();

        self.ubo = Some(ubo);
        self.bind_group = Some(bind_group);
    }

    fn flush_uniforms(&mut self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.ubo.as_ref() else { return };
        if let Some(bytes) = self.uniforms.take_dirty() {
            ctx.queue.write_buffer(ubo, 0, bytes);
        }
    }
}

fn compile(
    device: &wgpu::Device,
    label: &str,
    stage: &str,
    source: &str,
) -> Result<wgpu::ShaderModule> {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(format!("{label} {stage}").as_str()),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let info = pollster::block_on(module.get_compilation_info());
    let mut errors = Vec::new();
    for msg in &info.messages {
        if matches!(msg.message_type, wgpu::CompilationMessageType::Error) {
            errors.push(msg.message.clone());
        } else {
            log::warn!("{label} {stage} shader: {}", msg.message);
        }
    }

    anyhow::ensure!(
        errors.is_empty(),
        "unable to compile {stage} shader `{label}`: {}",
        errors.join("; ")
    );
    Ok(module)
}
