//! decagrid: a scale-adaptive decade grid for pannable, zoomable 2D canvases.
//!
//! The grid draws faint lines at a power-of-ten spacing chosen per pixel from
//! the local extent that pixel covers, with every hundredth-scale line
//! emphasised. Zooming never needs new geometry: the spacing follows the
//! camera.
//!
//! # Quick Start
//!
//! ```no_run
//! use decagrid::*;
//!
//! fn main() -> Result<()> {
//!     show(Options::default().with_window_title("my grid"))
//! }
//! ```
//!
//! # Controls
//!
//! - Left drag: pan
//! - Wheel: zoom about the cursor (Shift: x only, Ctrl: y only)
//! - `R`: reset view, `P`: toggle polar layout, `F12`: screenshot, `Esc`: quit

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Pixel dimensions are converted to float coordinates throughout
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

mod app;
mod error;
mod headless;
mod view;

pub use decagrid_core::{
    rasterize, CoordinateSpace, GridError, GridScale, LocalProjection, Options, STTransform,
    Transform, TransformContext, TransformSystem, Vec2, Vec3,
};
pub use decagrid_render::{PanZoomCamera, RenderEngine, RenderError, ScreenshotError};
pub use error::{DecagridError, Result};
pub use headless::{render_to_file, render_to_image};
pub use view::{local_to_canvas, View};

/// Opens a window showing the grid and runs until it is closed.
pub fn show(options: Options) -> Result<()> {
    let _ = env_logger::try_init();
    log::info!("starting decagrid viewer");
    app::run_app(options)
}
