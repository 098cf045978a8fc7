use decagrid_core::{TransformSystem, Vec3};
use decagrid_render::{save_image, RenderContext, RenderError, RenderResult};

use super::{App, GridVisual, RenderEngine};
use crate::view::local_to_canvas;

/// Clears `target` to `background` and draws the grid over it.
pub(crate) fn draw_frame(
    engine: &RenderEngine,
    grid: &mut GridVisual,
    transforms: &TransformSystem,
    background: Vec3,
    target: &wgpu::TextureView,
) -> RenderResult<()> {
    let mut encoder = engine
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame encoder"),
        });

    engine.clear(&mut encoder, target, background);
    grid.draw(&mut RenderContext {
        device: &engine.device,
        queue: &engine.queue,
        encoder: &mut encoder,
        view: target,
        transforms,
    })?;

    engine.queue.submit(std::iter::once(encoder.finish()));
    Ok(())
}

impl App {
    /// Renders one frame to the window, plus a screenshot if one is pending.
    pub(super) fn render(&mut self) {
        let Some((width, height)) = self.engine.as_ref().map(RenderEngine::dimensions) else {
            return;
        };
        let transforms = match TransformSystem::new(
            width,
            height,
            local_to_canvas(&self.camera, self.projection),
        ) {
            Ok(transforms) => transforms,
            Err(e) => {
                log::error!("cannot render frame: {e}");
                return;
            }
        };
        let background = self.options.background_color;
        let screenshot = self.screenshot_pending.take();

        let (Some(engine), Some(grid)) = (&mut self.engine, &mut self.grid) else {
            return;
        };

        if let Some(filename) = screenshot {
            let target = engine.capture_target();
            let saved = draw_frame(engine, grid, &transforms, background, &target)
                .map_err(|e| e.to_string())
                .and_then(|()| engine.capture_frame().map_err(|e| e.to_string()))
                .and_then(|data| {
                    save_image(&filename, &data, width, height).map_err(|e| e.to_string())
                });
            match saved {
                Ok(()) => log::info!("Screenshot saved to {filename}"),
                Err(e) => log::error!("Failed to save screenshot {filename}: {e}"),
            }
        }

        let frame = match engine.acquire_frame() {
            Ok(frame) => frame,
            Err(RenderError::SurfaceLost | RenderError::SurfaceOutdated) => {
                log::warn!("surface lost or outdated, reconfiguring");
                engine.resize(width, height);
                self.request_redraw();
                return;
            }
            Err(e) => {
                log::error!("failed to acquire frame: {e}");
                return;
            }
        };

        if let Err(e) = draw_frame(engine, grid, &transforms, background, &frame.view) {
            log::error!("failed to render frame: {e}");
        }
        frame.present();
    }
}
