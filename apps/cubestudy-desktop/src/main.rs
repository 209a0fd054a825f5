use anyhow::Result;
use clap::Parser;
use cubestudy_app::{App, Container, FrameScheduler, Host, HostEvents, Lesson, LessonConfig, Resize};
use cubestudy_common::Viewport;
use cubestudy_input::{PointerButton, PointerEvent};
use cubestudy_render_wgpu::{RendererOptions, WgpuRenderer};
use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Pixels one wheel notch counts for, matching a browser's line-mode delta.
const LINE_DELTA_PX: f32 = 100.0;

#[derive(Parser)]
#[command(name = "cubestudy-desktop", about = "Run a cubestudy lesson in a window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Lesson to run: basic or geometry
    #[arg(short, long, default_value = "basic")]
    lesson: Lesson,

    /// Lesson config file (YAML, or JSON by extension)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// The window's client area, standing in for the lesson's container element.
#[derive(Clone)]
struct WindowContainer {
    window: Arc<Window>,
}

impl Container for WindowContainer {
    fn viewport(&self) -> Viewport {
        let scale = self.window.scale_factor();
        let size: LogicalSize<u32> = self.window.inner_size().to_logical(scale);
        Viewport::new(size.width, size.height).with_pixel_ratio(scale as f32)
    }
}

/// A host with a single container: the window, found under the configured
/// selector.
struct WindowHost {
    selector: String,
    container: WindowContainer,
}

impl Host for WindowHost {
    type Container = WindowContainer;

    fn query_selector(&self, selector: &str) -> Option<WindowContainer> {
        (selector == self.selector).then(|| self.container.clone())
    }
}

/// Frame requests become redraw requests; winit answers with one
/// `RedrawRequested` each.
struct RedrawScheduler {
    window: Arc<Window>,
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }
}

struct DesktopApp {
    lesson: Lesson,
    config: LessonConfig,
    events: HostEvents,
    window: Option<Arc<Window>>,
    scheduler: Option<RedrawScheduler>,
    app: Option<App<WgpuRenderer, WindowContainer>>,
    started: Instant,
    cursor: Vec2,
    error: Option<anyhow::Error>,
}

impl DesktopApp {
    fn new(lesson: Lesson, config: LessonConfig) -> Self {
        Self {
            lesson,
            config,
            events: HostEvents::new(),
            window: None,
            scheduler: None,
            app: None,
            started: Instant::now(),
            cursor: Vec2::ZERO,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.shutdown(event_loop);
        self.error = Some(error);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(app) = self.app.take() {
            app.stop_handle().stop();
        }
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(format!("cubestudy: {}", self.lesson))
            .with_inner_size(LogicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let host = WindowHost {
            selector: self.config.container_selector.clone(),
            container: WindowContainer {
                window: Arc::clone(&window),
            },
        };
        let mut scheduler = RedrawScheduler {
            window: Arc::clone(&window),
        };
        let options = RendererOptions {
            antialias: self.config.antialias,
            ..RendererOptions::default()
        };

        let app = App::new(
            &host,
            &self.config,
            self.lesson,
            &self.events,
            &mut scheduler,
            |container: &WindowContainer| {
                let size = container.window.inner_size();
                WgpuRenderer::new(
                    Arc::clone(&container.window),
                    size.width,
                    size.height,
                    options,
                )
            },
        )?;

        self.started = Instant::now();
        self.window = Some(window);
        self.scheduler = Some(scheduler);
        self.app = Some(app);
        Ok(())
    }

    fn pointer(&self, event: PointerEvent) {
        self.events.pointer.emit(&event);
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested");
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.events.resize.emit(&Resize);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                let logical = position.to_logical::<f32>(scale);
                self.cursor = Vec2::new(logical.x, logical.y);
                self.pointer(PointerEvent::Move {
                    position: self.cursor,
                });
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = pointer_button(button) else {
                    return;
                };
                let event = match state {
                    ElementState::Pressed => PointerEvent::Down {
                        button,
                        position: self.cursor,
                    },
                    ElementState::Released => PointerEvent::Up { button },
                };
                self.pointer(event);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports wheel-up as positive; pointer events use
                // positive for scrolling down.
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_DELTA_PX,
                    MouseScrollDelta::PixelDelta(p) => -p.y as f32,
                };
                self.pointer(PointerEvent::Wheel { delta_y });
            }
            WindowEvent::RedrawRequested => {
                let (Some(app), Some(scheduler)) = (&mut self.app, &mut self.scheduler) else {
                    return;
                };
                let timestamp_ms = self.started.elapsed().as_secs_f64() * 1000.0;
                if let Err(e) = app.on_frame(timestamp_ms, scheduler) {
                    self.fail(event_loop, e.into());
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => LessonConfig::load(path)?,
        None => LessonConfig::default(),
    };

    tracing::info!(lesson = %cli.lesson, "cubestudy-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = DesktopApp::new(cli.lesson, config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
