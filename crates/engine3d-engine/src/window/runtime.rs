use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::render::Viewport;
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl RuntimeConfig {
    fn window_attributes(&self) -> WindowAttributes {
        Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.initial_size)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "engine3d".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Single-window driver: one window, one [`Gpu`], one [`FrameClock`].
pub struct Runtime;

impl Runtime {
    /// Opens the window and runs `app` until the window closes or the app
    /// returns [`AppControl::Exit`].
    ///
    /// Window or GPU creation failures end the loop and are returned here.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut handler = Handler {
            config,
            gpu_init,
            app,
            surface: None,
            error: None,
        };

        event_loop
            .run_app(&mut handler)
            .context("winit event loop terminated with error")?;

        handler.error.map_or(Ok(()), Err)
    }
}

/// The window and the GPU state that borrows it.
#[self_referencing]
struct Surface {
    clock: FrameClock,
    window: Window,
    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl Surface {
    fn open(event_loop: &ActiveEventLoop, config: &RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let window = event_loop
            .create_window(config.window_attributes())
            .context("failed to create window")?;

        SurfaceTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    fn id(&self) -> WindowId {
        self.with_window(|w| w.id())
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }

    fn sync_size(&mut self) {
        let size = self.with_window(|w| w.inner_size());
        self.with_gpu_mut(|gpu| gpu.resize(size));
    }

    /// Ticks the clock and hands one frame to `app`. A minimized window
    /// (zero-sized surface) skips the frame without advancing time.
    fn frame<A: App>(&mut self, app: &mut A) -> AppControl {
        self.with_mut(|fields| {
            if !Viewport::from(fields.gpu.size()).is_valid() {
                return AppControl::Continue;
            }
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                gpu: fields.gpu,
                time: fields.clock.tick(),
            };
            app.on_frame(&mut ctx)
        })
    }
}

struct Handler<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    surface: Option<Surface>,
    error: Option<anyhow::Error>,
}

impl<A: App> Handler<A> {
    /// Drops the window (and its GPU state) and stops the loop.
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.take().is_some() {
            log::info!("window closed");
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error.get_or_insert(err);
        self.close(event_loop);
    }
}

impl<A: App + 'static> ApplicationHandler for Handler<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(surface) = self.surface.as_mut() {
            surface.with_clock_mut(|c| c.reset());
            return;
        }

        match Surface::open(event_loop, &self.config, self.gpu_init.clone()) {
            Ok(surface) => {
                log::info!("window {:?} opened", surface.id());
                surface.request_redraw();
                self.surface = Some(surface);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(surface) = &self.surface {
            surface.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.surface.as_ref().map(Surface::id) != Some(window_id) {
            return;
        }
        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.close(event_loop);
            return;
        }

        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => self.close(event_loop),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                surface.sync_size();
                surface.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                if surface.frame(&mut self.app) == AppControl::Exit {
                    self.close(event_loop);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::Size;

    #[test]
    fn default_config() {
        let config = RuntimeConfig::default();
        assert_eq!(config.title, "engine3d");
        assert_eq!(config.initial_size, LogicalSize::new(1280.0, 720.0));
    }

    #[test]
    fn window_attributes_carry_title_and_size() {
        let config = RuntimeConfig {
            title: "viewer".to_string(),
            initial_size: LogicalSize::new(640.0, 480.0),
        };
        let attrs = config.window_attributes();
        assert_eq!(attrs.title, "viewer");
        assert_eq!(attrs.inner_size, Some(Size::Logical(LogicalSize::new(640.0, 480.0))));
    }
}
