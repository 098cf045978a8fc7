//! Error types for decagrid.

use thiserror::Error;

/// The main error type for decagrid operations.
#[derive(Error, Debug)]
pub enum GridError {
    /// Grid scale components must be strictly positive and finite.
    #[error("invalid grid scale ({x}, {y}): components must be finite and > 0")]
    InvalidScale { x: f32, y: f32 },

    /// Canvas dimensions must be non-zero.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvasSize { width: u32, height: u32 },

    /// The wheel zoom step must be finite and > 1.
    #[error("invalid zoom step {0}: must be finite and > 1")]
    InvalidZoomStep(f32),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for decagrid operations.
pub type Result<T> = std::result::Result<T, GridError>;
