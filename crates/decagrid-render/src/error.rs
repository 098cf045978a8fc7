//! Rendering error types.

use pollster::FutureExt;
use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create surface.
    #[error("failed to create surface: {0}")]
    SurfaceCreationFailed(#[from] wgpu::CreateSurfaceError),

    /// Surface configuration failed.
    #[error("surface configuration failed")]
    SurfaceConfigurationFailed,

    /// Shader compilation failed.
    #[error("shader compilation failed: {0}")]
    ShaderCompilationFailed(String),

    /// A `$name` placeholder in shader source has no function bound to it.
    #[error("no shader function bound to placeholder '${0}'")]
    UnboundShaderFunction(String),

    /// A snippet refers to a parameter slot it does not provide.
    #[error("shader function '{function}' has no parameter ${index}")]
    UnknownShaderParam { function: String, index: String },

    /// The bound functions need more parameter slots than a program has.
    #[error("shader functions need {requested} parameter slots, at most {available} are available")]
    TooManyShaderParams { requested: usize, available: usize },

    /// Pipeline creation failed.
    #[error("pipeline creation failed: {0}")]
    PipelineCreationFailed(String),

    /// Buffer creation failed.
    #[error("buffer creation failed: {0}")]
    BufferCreationFailed(String),

    /// Surface lost.
    #[error("surface lost")]
    SurfaceLost,

    /// Surface outdated.
    #[error("surface outdated")]
    SurfaceOutdated,

    /// Out of memory.
    #[error("out of memory")]
    OutOfMemory,

    /// Timeout waiting for GPU.
    #[error("timeout waiting for GPU")]
    Timeout,
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Runs `f` inside a wgpu error scope and returns the first captured error.
///
/// On native backends errors are reported synchronously, so the scope
/// resolves immediately.
pub(crate) fn capture_errors<T>(
    device: &wgpu::Device,
    filter: wgpu::ErrorFilter,
    f: impl FnOnce() -> T,
) -> Result<T, wgpu::Error> {
    device.push_error_scope(filter);
    let value = f();
    match device.pop_error_scope().block_on() {
        Some(error) => Err(error),
        None => Ok(value),
    }
}
