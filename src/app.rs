use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use tracing::{debug, error, info, warn};
use winit::{
    event::{DeviceEvent, ElementState, Event, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use crate::{
    config::ViewerConfig,
    renderer::Renderer,
    viewer::{ViewerCommand, ViewerState},
};

/// Number of pixels one line of mouse wheel scrolling is treated as.
const PIXELS_PER_SCROLL_LINE: f64 = 20.0;

/// Dispatches events coming from the window to the viewer and draws the
/// viewer's scene.
pub struct ViewerHost<'a> {
    renderer: Renderer<'a>,
    viewer: ViewerState,
    window_title: String,
    /// Why the last file the user picked was not opened, if it was rejected
    /// before loading started.
    rejected: Option<String>,
}

impl<'a> ViewerHost<'a> {
    pub fn new(renderer: Renderer<'a>, viewer: ViewerState, window_title: String) -> Self {
        let mut host = Self {
            renderer,
            viewer,
            window_title,
            rejected: None,
        };

        host.refresh_title();
        host
    }

    /// Open a model or material library. Loads run to completion before the
    /// next frame is drawn.
    pub fn open_file(&mut self, path: PathBuf) {
        match self.viewer.begin_load(path) {
            Ok(ticket) => {
                self.rejected = None;

                if let Err(e) = pollster::block_on(self.viewer.load(ticket)) {
                    debug!("load failed: {e}");
                }
            }
            Err(e) => {
                warn!("{e}");
                self.rejected = Some(e.to_string());
            }
        }

        self.refresh_title();
    }

    /// Handle a window event that is not consumed by the event loop itself.
    pub fn input(&mut self, event: &WindowEvent) -> bool {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if let Some(command) = ViewerCommand::from_key_event(event) {
                self.command(command);
                return true;
            }
        }

        self.viewer.camera_input(event)
    }

    pub fn command(&mut self, command: ViewerCommand) {
        debug!("applying command {command:?}");

        if let Err(e) = self.viewer.apply(command) {
            warn!("command failed: {e}");
        }

        self.refresh_title();
    }

    pub fn render(&mut self, delta: Duration) {
        self.viewer.update_camera(delta);

        if let Err(e) = self.viewer.sync_surface(&mut self.renderer) {
            error!("failed to upload scene for drawing: {e:?}");
        }

        match self.renderer.render(self.viewer.camera()) {
            Ok(_) => {}
            // Reconfigure surface when lost:
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                warn!("handling surface lost or outdated event by re-applying current window size");
                let window_size = self.renderer.window_size();
                self.renderer.resize(window_size.width, window_size.height);
            }
            // System is out of memory - bail out!
            Err(wgpu::SurfaceError::OutOfMemory) => {
                panic!("WGPU out of memory error")
            }
            // Other errors (timeout) should be resolved by next frame
            Err(e) => {
                error!("WGPU error, will skip frame and try to ignore: {e:?}");
            }
        }
    }

    /// Handles when the window is resized.
    pub fn window_resized(&mut self, new_width: u32, new_height: u32) {
        self.renderer.resize(new_width, new_height);
        self.viewer.resize(new_width, new_height);
    }

    /// Handles when the window's DPI scaling is changed.
    pub fn scale_factor_changed(&mut self) {
        let new_size = self.renderer.window().inner_size();
        self.window_resized(new_size.width, new_size.height)
    }

    pub fn mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        self.viewer.mouse_motion(delta_x, delta_y)
    }

    pub fn mouse_scroll_wheel(&mut self, delta: MouseScrollDelta) {
        let (x, y) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x as f64, y as f64),
            MouseScrollDelta::PixelDelta(p) => {
                (p.x / PIXELS_PER_SCROLL_LINE, p.y / PIXELS_PER_SCROLL_LINE)
            }
        };

        self.viewer.mouse_scroll_wheel(x, y)
    }

    pub fn request_redraw(&self) {
        self.renderer.window().request_redraw()
    }

    fn refresh_title(&mut self) {
        let status = match &self.rejected {
            Some(reason) => format!("error: {reason}"),
            None => self.viewer.status_line(),
        };

        self.renderer
            .window()
            .set_title(&format!("{} - {status}", self.window_title));
    }
}

/// Create the main window and run the viewer until the window is closed.
/// `initial_files` are opened in order before the first frame.
pub fn run(config: ViewerConfig, initial_files: Vec<PathBuf>) -> anyhow::Result<()> {
    info!("creating main window for rendering");

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(&config.window_title)
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window_width,
            config.window_height,
        ))
        .build(&event_loop)?;

    let renderer = pollster::block_on(Renderer::new(&window, &config.appearance))?;
    let mut viewer = ViewerState::new(&config);
    let size = window.inner_size();
    viewer.resize(size.width, size.height);

    let mut host = ViewerHost::new(renderer, viewer, config.window_title.clone());

    for path in initial_files {
        host.open_file(path);
    }

    info!("starting main window event loop");
    let mut last_frame = Instant::now();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => elwt.exit(),
            WindowEvent::Resized(new_size) => {
                host.window_resized(new_size.width, new_size.height)
            }
            WindowEvent::ScaleFactorChanged { .. } => host.scale_factor_changed(),
            WindowEvent::DroppedFile(path) => host.open_file(path),
            WindowEvent::MouseWheel { delta, .. } => host.mouse_scroll_wheel(delta),
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                host.render(now - last_frame);
                last_frame = now;
            }
            other => {
                host.input(&other);
            }
        },
        Event::DeviceEvent {
            event: DeviceEvent::MouseMotion { delta },
            ..
        } => host.mouse_motion(delta.0, delta.1),
        Event::AboutToWait => host.request_redraw(),
        _ => {}
    })?;

    Ok(())
}
