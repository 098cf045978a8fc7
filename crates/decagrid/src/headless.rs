//! Headless rendering API.
//!
//! Renders a [`View`] to an image buffer or file without opening a window.
//! Useful for integration tests, batch processing, and automated screenshot
//! generation.

use std::path::Path;

use pollster::FutureExt;

use decagrid_render::{GridVisual, RenderEngine};

use crate::app::draw_frame;
use crate::error::Result;
use crate::View;

/// Renders a view to a file.
///
/// Creates a headless GPU context, renders one frame and saves the result as
/// a PNG or JPEG image.
///
/// # Example
/// ```no_run
/// use decagrid::*;
///
/// let view = View::default().with_camera(Vec2::ZERO, Vec2::splat(250.0));
/// render_to_file("grid.png", 800, 600, &view).unwrap();
/// ```
pub fn render_to_file(
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    view: &View,
) -> Result<()> {
    let data = render_to_image(width, height, view)?;
    decagrid_render::save_image(path, &data, width, height)?;
    Ok(())
}

/// Renders a view to a raw RGBA pixel buffer.
///
/// The returned buffer holds `width * height * 4` bytes, ordered row by row
/// from the top-left corner. Headless targets are linear, so over a black
/// background every channel of a pixel equals its grid alpha.
///
/// # Example
/// ```no_run
/// use decagrid::*;
///
/// let pixels = render_to_image(800, 600, &View::default()).unwrap();
/// assert_eq!(pixels.len(), 800 * 600 * 4);
/// ```
pub fn render_to_image(width: u32, height: u32, view: &View) -> Result<Vec<u8>> {
    let transforms = view.transforms(width, height)?;

    let mut engine = RenderEngine::new_headless(width, height).block_on()?;
    let mut grid = GridVisual::new(&engine.device, engine.target_format(), view.grid_scale);

    let frame = engine.acquire_frame()?;
    draw_frame(
        &engine,
        &mut grid,
        &transforms,
        view.background_color,
        &frame.view,
    )?;

    Ok(engine.capture_frame()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecagridError, GridError};

    #[test]
    fn test_empty_canvas_fails_before_gpu() {
        let err = render_to_image(0, 16, &View::default()).unwrap_err();
        assert!(matches!(
            err,
            DecagridError::Grid(GridError::InvalidCanvasSize {
                width: 0,
                height: 16
            })
        ));
    }
}
