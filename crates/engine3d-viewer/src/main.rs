use anyhow::Result;

use engine3d_engine::core::{App, AppControl, FrameCtx};
use engine3d_engine::device::GpuInit;
use engine3d_engine::logging::{init_logging, LoggingConfig};
use engine3d_engine::render::{Mesh, ShaderProgram, ShaderSource, UniformKind, UniformValue};
use engine3d_engine::window::{Runtime, RuntimeConfig};
use engine3d_math::{Mat4, Vec3, Vec4};
use winit::dpi::LogicalSize;

/// Counter-clockwise, so it survives back-face culling.
const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.6, 0.0], [-0.5, -0.4, 0.0], [0.5, -0.4, 0.0]];

/// Rotate about Z, pulse the size, then undo the window's aspect stretch.
fn triangle_transform(elapsed: f32, aspect: f32) -> Mat4 {
    let pulse = 0.8 + 0.2 * (elapsed * 2.0).sin();
    let scale = Mat4::from_scale(Vec3::splat(pulse));
    let rotation = Mat4::from_rotation_z(elapsed);
    let aspect_fix = Mat4::from_scale(Vec3::xyz(1.0 / aspect, 1.0, 1.0));

    aspect_fix.multiply(&rotation).multiply(&scale)
}

fn tint(elapsed: f32) -> Vec4 {
    let mut color = Vec4::xyzw(0.95, 0.45, 0.2, 1.0);
    color.lerp(&Vec4::xyzw(0.2, 0.55, 0.95, 1.0), 0.5 + 0.5 * (elapsed * 0.5).sin());
    color
}

struct Scene {
    program: ShaderProgram,
    mesh: Mesh,
}

impl Scene {
    fn new(ctx: &FrameCtx<'_, '_>) -> Result<Self> {
        let rctx = ctx.render_ctx();

        let mut program = ShaderProgram::new(
            &rctx,
            ShaderSource {
                label: "triangle",
                vertex: include_str!("../shaders/triangle_vs.wgsl"),
                fragment: include_str!("../shaders/triangle_fs.wgsl"),
            },
        )?;
        program.add_uniform("transform", UniformKind::Mat4)?;
        program.add_uniform("tint", UniformKind::Vec4)?;
        program.add_uniform("time", UniformKind::Scalar)?;
        log::debug!(
            "uniform block:\n{}",
            program.uniform_layout().wgsl_struct("Uniforms")
        );

        let positions = TRIANGLE.map(Vec3::new);
        let mesh = Mesh::from_positions(&rctx, "triangle vbo", &positions);

        Ok(Self { program, mesh })
    }

    fn update(&mut self, elapsed: f32, aspect: f32) -> Result<()> {
        let transform = triangle_transform(elapsed, aspect);
        self.program
            .update_uniform("transform", UniformValue::Mat4(transform))?;
        self.program.update_uniform("tint", tint(elapsed).into())?;
        self.program
            .update_uniform("time", UniformValue::Scalar(elapsed))?;
        Ok(())
    }
}

#[derive(Default)]
struct Viewer {
    scene: Option<Scene>,
}

impl App for Viewer {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.scene.is_none() {
            match Scene::new(ctx) {
                Ok(scene) => self.scene = Some(scene),
                Err(e) => {
                    log::error!("failed to set up scene: {e:#}");
                    return AppControl::Exit;
                }
            }
        }
        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Exit;
        };

        let aspect = ctx.window.viewport().aspect();
        if let Err(e) = scene.update(ctx.time.elapsed, aspect) {
            log::error!("uniform upload failed: {e:#}");
            return AppControl::Exit;
        }

        ctx.render(|rctx, target| scene.program.draw(rctx, target, &scene.mesh))
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "engine3d viewer".to_string(),
        initial_size: LogicalSize::new(960.0, 720.0),
    };
    let gpu_init = GpuInit {
        clear_color: wgpu::Color {
            r: 0.02,
            g: 0.02,
            b: 0.03,
            a: 1.0,
        },
        ..GpuInit::default()
    };

    log::info!("starting viewer");
    Runtime::run(config, gpu_init, Viewer::default())
}
