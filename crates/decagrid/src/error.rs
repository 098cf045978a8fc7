//! Error type for the viewer and the headless renderer.

use decagrid_core::GridError;
use decagrid_render::{RenderError, ScreenshotError};
use thiserror::Error;

/// Errors returned by [`show`](crate::show) and the headless functions.
#[derive(Error, Debug)]
pub enum DecagridError {
    /// Invalid configuration or canvas.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// GPU setup or drawing failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Frame readback or image export failed.
    #[error("screenshot error: {0}")]
    Screenshot(#[from] ScreenshotError),

    /// The window could not be created.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// The event loop could not start or exited with an error.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

impl DecagridError {
    /// True when no graphics adapter is available on this machine.
    pub fn is_adapter_unavailable(&self) -> bool {
        matches!(self, Self::Render(RenderError::AdapterCreationFailed))
    }
}

/// A specialized Result type for the facade.
pub type Result<T> = std::result::Result<T, DecagridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_errors_keep_their_kind() {
        let err = DecagridError::from(RenderError::ShaderCompilationFailed("bad".into()));
        assert!(!err.is_adapter_unavailable());
        assert!(matches!(
            err,
            DecagridError::Render(RenderError::ShaderCompilationFailed(_))
        ));

        let err = DecagridError::from(RenderError::AdapterCreationFailed);
        assert!(err.is_adapter_unavailable());
    }

    #[test]
    fn test_grid_errors_are_transparent() {
        let err = DecagridError::from(GridError::InvalidZoomStep(0.0));
        assert_eq!(err.to_string(), GridError::InvalidZoomStep(0.0).to_string());
    }
}
