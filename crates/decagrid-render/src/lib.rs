//! Rendering backend for decagrid.
//!
//! This crate provides the wgpu side of the grid:
//! - The render engine (windowed or headless) and frame readback
//! - WGSL template linking with [`ShaderFunction`](decagrid_core::ShaderFunction) bindings
//! - The [`GridVisual`] and the [`PanZoomCamera`] that drives it

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Pixel dimensions are converted to float coordinates throughout
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod buffer;
pub mod camera;
pub mod engine;
pub mod error;
pub mod grid;
pub mod screenshot;
pub mod shader;

pub use camera::{PanZoomCamera, MAX_ZOOM, MIN_ZOOM};
pub use engine::{Frame, RenderEngine, HEADLESS_FORMAT};
pub use error::{RenderError, RenderResult};
pub use grid::{GridUniforms, GridVisual, GRID_SHADER, QUAD_VERTICES};
pub use screenshot::{save_image, save_to_buffer, ScreenshotError};
pub use shader::{FunctionParams, LinkedShader, ShaderBuilder, ShaderProgram};

use decagrid_core::TransformContext;

/// Render context passed to visuals during drawing.
pub struct RenderContext<'a> {
    /// The wgpu device.
    pub device: &'a wgpu::Device,
    /// The wgpu queue.
    pub queue: &'a wgpu::Queue,
    /// The command encoder.
    pub encoder: &'a mut wgpu::CommandEncoder,
    /// The target texture view.
    pub view: &'a wgpu::TextureView,
    /// Coordinate mappings for this frame.
    pub transforms: &'a dyn TransformContext,
}
