//! Platform layer: windowing & event loop.
//!
//! - The window and its GPU context are created on `resumed`.
//! - Escape or a close request ends the loop.
//! - Redraws are requested continuously; each one drives a [`Scene`] frame.

use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use renderer::{Frame, GpuContext, GpuInit, Resource};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowId,
};

mod window;

pub use window::AppWindow;

#[derive(Clone, Debug)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub gpu: GpuInit,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "tawy".to_owned(),
            width: 800,
            height: 600,
            gpu: GpuInit::default(),
        }
    }
}

/// What the application draws.
pub trait Scene {
    /// Called once the window and GPU context exist. An error aborts the run.
    fn init(&mut self, ctx: &GpuContext, window: &AppWindow) -> Result<()>;

    /// Record one frame into the cleared main pass.
    fn frame(&mut self, ctx: &GpuContext, pass: &mut wgpu::RenderPass<'_>, dt: f32) -> Result<()>;

    fn resized(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Release resources before the window goes away.
    fn shutdown(&mut self) {}
}

struct Runtime<S: Scene> {
    config: PlatformConfig,
    scene: S,
    window: Option<AppWindow>,
    gpu: Option<GpuContext>,
    last_frame: Instant,
    error: Option<anyhow::Error>,
}

impl<S: Scene> Runtime<S> {
    fn new(config: PlatformConfig, scene: S) -> Self {
        Self {
            config,
            scene,
            window: None,
            gpu: None,
            last_frame: Instant::now(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = AppWindow::new(event_loop, &self.config)?;
        let gpu = pollster::block_on(GpuContext::new(window.handle(), &self.config.gpu))?;
        self.scene
            .init(&gpu, &window)
            .context("Scene initialization failed")?;
        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let Some(mut frame) = Frame::begin(gpu).context("Failed to acquire frame")? else {
            return Ok(());
        };
        {
            let mut pass = frame.render_pass(gpu);
            self.scene.frame(gpu, &mut pass, dt)?;
        }
        frame.present(gpu);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl<S: Scene> ApplicationHandler for Runtime<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                if let Some(w) = self.window.as_mut() {
                    w.request_close();
                }
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                if let Some(w) = self.window.as_mut() {
                    w.request_close();
                }
            }
            WindowEvent::Resized(new_size) => {
                log::info!("Resized: {}x{}", new_size.width, new_size.height);
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.scene.resized(new_size.width.max(1), new_size.height.max(1));
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }

        if self.window.as_ref().is_some_and(|w| w.should_close()) {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(w) = self.window.as_ref() {
            w.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.scene.shutdown();
        self.gpu = None;
        if let Some(w) = self.window.take() {
            log::info!("Collecting window '{}'", w.label());
        }
    }
}

/// Open the window and drive `scene` until the window closes.
pub fn run<S: Scene>(config: PlatformConfig, scene: S) -> Result<()> {
    let event_loop: EventLoop<()> = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runtime = Runtime::new(config, scene);
    event_loop
        .run_app(&mut runtime)
        .map_err(|e| anyhow!("Event loop error: {e:?}"))?;

    match runtime.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
