//! Native window host for the particle field.
//!
//! The host owns one [`Canvas`] sized to the window, attaches a
//! [`ParticleField`] to it on startup, forwards every resize, and detaches
//! when the window closes. Frames are driven by winit redraw requests
//! through [`RedrawScheduler`]; the canvas is presented with [`GpuState`].
//!
//! Keys:
//! - `P` writes a PNG snapshot of the canvas
//! - `Escape` closes the window

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::canvas::Canvas;
use crate::config::FieldConfig;
use crate::error::RunError;
use crate::field::ParticleField;
use crate::gpu::GpuState;
use crate::scheduler::{FrameRequest, FrameScheduler};
use crate::surface::Rgba;
use crate::time::FrameClock;

/// Settings for the host window.
#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub title: String,
    /// Initial logical width.
    pub width: u32,
    /// Initial logical height.
    pub height: u32,
    /// Color behind the particle canvas.
    pub background: Rgba,
    /// Where `P` snapshots are written.
    pub snapshot_dir: PathBuf,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Particle Field".to_string(),
            width: 1280,
            height: 720,
            background: Rgba::rgb(5, 8, 20),
            snapshot_dir: PathBuf::from("."),
        }
    }
}

impl WindowConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }
}

/// Frame scheduler backed by winit redraw requests.
///
/// At most one request is outstanding; it fires on the next
/// `RedrawRequested` event unless cancelled first.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    window: Option<Arc<Window>>,
    next_id: u64,
    pending: Option<FrameRequest>,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route future requests to `window`.
    pub fn bind(&mut self, window: Arc<Window>) {
        if self.pending.is_some() {
            window.request_redraw();
        }
        self.window = Some(window);
    }

    /// Take the request a redraw should execute, if any.
    pub fn take_due(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest::from_raw(self.next_id);
        self.next_id += 1;
        self.pending = Some(request);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }
}

struct App {
    window_config: WindowConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    field: ParticleField<Canvas, RedrawScheduler>,
    clock: FrameClock,
    error: Option<RunError>,
}

impl App {
    fn new(field_config: FieldConfig, window_config: WindowConfig) -> Self {
        Self {
            window_config,
            window: None,
            gpu_state: None,
            field: ParticleField::new(field_config, RedrawScheduler::new()),
            clock: FrameClock::new(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.window_config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu_state = pollster::block_on(GpuState::new(
            window.clone(),
            self.window_config.background,
        ))?;

        let size = window.inner_size();
        self.field.scheduler_mut().bind(window.clone());
        self.field.attach(Canvas::new(), size.width, size.height)?;

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RunError) {
        error!(error = %err, "Shutting down");
        self.error = Some(err);
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.field.detach();
        event_loop.exit();
    }

    fn snapshot(&self) {
        let Some(canvas) = self.field.surface() else {
            return;
        };
        let path = self
            .window_config
            .snapshot_dir
            .join(format!("snapshot-{}.png", self.field.stats().frames));
        if let Err(e) = canvas.save_png(&path) {
            warn!(error = %e, path = %path.display(), "Snapshot failed");
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(request) = self.field.scheduler_mut().take_due() {
            self.field.run_frame(request);
        }

        let (Some(gpu_state), Some(canvas)) = (&mut self.gpu_state, self.field.surface()) else {
            return;
        };
        match gpu_state.render(canvas) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                self.shutdown(event_loop);
                return;
            }
            Err(e) => warn!(error = ?e, "Render error"),
        }

        if self.clock.tick() {
            if let Some(window) = &self.window {
                window.set_title(&format!(
                    "{} - {} particles - {:.0} FPS",
                    self.window_config.title,
                    self.field.particles().len(),
                    self.clock.fps()
                ));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                self.field.resize(physical_size.width, physical_size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => self.shutdown(event_loop),
                KeyCode::KeyP => self.snapshot(),
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.field.detach();
    }
}

/// Open a window and animate a particle field until it is closed.
pub fn run(field_config: FieldConfig, window_config: WindowConfig) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    info!(title = %window_config.title, "Starting particle field");
    let mut app = App::new(field_config, window_config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
