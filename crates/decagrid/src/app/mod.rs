//! Application window and event loop management.

mod input;
mod render;

pub(crate) use render::draw_frame;

pub(super) use std::sync::Arc;

pub(super) use pollster::FutureExt;
pub(super) use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

pub(super) use decagrid_core::{LocalProjection, Options, Vec2};
pub(super) use decagrid_render::{GridVisual, PanZoomCamera, RenderEngine};

pub(super) use crate::error::{DecagridError, Result};

/// The viewer application state.
pub struct App {
    pub(super) window: Option<Arc<Window>>,
    pub(super) engine: Option<RenderEngine>,
    pub(super) grid: Option<GridVisual>,
    pub(super) options: Options,
    pub(super) camera: PanZoomCamera,
    pub(super) projection: LocalProjection,
    pub(super) close_requested: bool,
    // Fatal error raised inside the event loop
    pub(super) error: Option<DecagridError>,
    pub(super) mouse_pos: Vec2,
    pub(super) left_mouse_down: bool,
    // Modifier keys
    pub(super) shift_down: bool,
    pub(super) ctrl_down: bool,
    // Screenshot state
    pub(super) screenshot_pending: Option<String>,
    pub(super) screenshot_counter: u32,
}

impl App {
    /// Creates a new application.
    pub fn new(options: Options) -> Self {
        let [width, height] = options.window_size;
        let camera = PanZoomCamera::new(
            Vec2::new(width as f32, height as f32),
            options.initial_center,
            options.initial_zoom,
        );
        Self {
            window: None,
            engine: None,
            grid: None,
            projection: options.projection,
            options,
            camera,
            close_requested: false,
            error: None,
            mouse_pos: Vec2::ZERO,
            left_mouse_down: false,
            shift_down: false,
            ctrl_down: false,
            screenshot_pending: None,
            screenshot_counter: 0,
        }
    }

    /// Requests a screenshot with an auto-generated filename.
    pub fn request_auto_screenshot(&mut self) {
        let filename = format!("screenshot_{:04}.png", self.screenshot_counter);
        self.screenshot_counter += 1;
        self.screenshot_pending = Some(filename);
    }

    /// Switches between cartesian and polar local coordinates.
    pub fn toggle_projection(&mut self) {
        self.projection = match self.projection {
            LocalProjection::Cartesian => LocalProjection::Polar,
            LocalProjection::Polar => LocalProjection::Cartesian,
        };
        log::info!("local projection: {:?}", self.projection);
    }

    pub(super) fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Runs the viewer until the window closes.
pub fn run_app(options: Options) -> Result<()> {
    options.validate()?;
    let event_loop = EventLoop::new()?;
    let mut app = App::new(options);

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decagrid_core::GridError;

    #[test]
    fn test_bad_zoom_step_fails_before_event_loop() {
        let options = Options {
            zoom_step: 0.0,
            ..Options::default()
        };
        let err = run_app(options).unwrap_err();
        assert!(matches!(
            err,
            DecagridError::Grid(GridError::InvalidZoomStep(step)) if step <= 0.0
        ));
    }
}
