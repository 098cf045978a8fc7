//! What a frame shows: camera, local layout, grid scale and background.

use std::sync::Arc;

use decagrid_core::{
    ChainTransform, GridScale, LocalProjection, Options, PolarTransform, Result, Transform,
    TransformSystem, Vec2, Vec3,
};
use decagrid_render::PanZoomCamera;

/// A complete description of one rendered view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    /// Local point at the canvas centre.
    pub center: Vec2,
    /// Canvas pixels per local unit.
    pub zoom: Vec2,
    /// Local coordinate layout.
    pub projection: LocalProjection,
    /// Grid spacing multiplier.
    pub grid_scale: GridScale,
    /// Background color.
    pub background_color: Vec3,
}

impl Default for View {
    fn default() -> Self {
        Self::from(&Options::default())
    }
}

impl From<&Options> for View {
    fn from(options: &Options) -> Self {
        Self {
            center: options.initial_center,
            zoom: options.initial_zoom,
            projection: options.projection,
            grid_scale: options.grid_scale,
            background_color: options.background_color,
        }
    }
}

impl View {
    /// Sets the camera.
    #[must_use]
    pub fn with_camera(mut self, center: Vec2, zoom: Vec2) -> Self {
        self.center = center;
        self.zoom = zoom;
        self
    }

    /// Sets the local coordinate layout.
    #[must_use]
    pub fn with_projection(mut self, projection: LocalProjection) -> Self {
        self.projection = projection;
        self
    }

    /// Sets the grid scale.
    #[must_use]
    pub fn with_grid_scale(mut self, grid_scale: GridScale) -> Self {
        self.grid_scale = grid_scale;
        self
    }

    /// Sets the background color.
    #[must_use]
    pub fn with_background_color(mut self, color: Vec3) -> Self {
        self.background_color = color;
        self
    }

    /// A camera for a canvas of the given size.
    pub fn camera(&self, width: u32, height: u32) -> PanZoomCamera {
        PanZoomCamera::new(
            Vec2::new(width as f32, height as f32),
            self.center,
            self.zoom,
        )
    }

    /// The transform context for a canvas of the given size.
    pub fn transforms(&self, width: u32, height: u32) -> Result<TransformSystem> {
        TransformSystem::new(
            width,
            height,
            local_to_canvas(&self.camera(width, height), self.projection),
        )
    }
}

/// Local-to-canvas mapping for a camera and local layout.
pub fn local_to_canvas(camera: &PanZoomCamera, projection: LocalProjection) -> Arc<dyn Transform> {
    let camera = Arc::new(camera.local_to_canvas());
    match projection {
        LocalProjection::Cartesian => camera,
        LocalProjection::Polar => Arc::new(ChainTransform::new(vec![
            Arc::new(PolarTransform),
            camera,
        ])),
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use decagrid_core::TransformContext;

    #[test]
    fn test_center_is_canvas_center() {
        let view = View::default().with_camera(Vec2::new(3.0, -2.0), Vec2::splat(10.0));
        let system = view.transforms(400, 300).unwrap();
        let canvas = system.canvas_transform().map_point(Vec2::new(3.0, -2.0));
        assert!((canvas - Vec2::new(200.0, 150.0)).length() < 1e-4);
    }

    #[test]
    fn test_polar_layout() {
        let view = View::default()
            .with_camera(Vec2::ZERO, Vec2::splat(10.0))
            .with_projection(LocalProjection::Polar);
        let system = view.transforms(400, 300).unwrap();
        // theta = pi/2, r = 5 lands 50 px above the centre.
        let canvas = system
            .canvas_transform()
            .map_point(Vec2::new(FRAC_PI_2, 5.0));
        assert!((canvas - Vec2::new(200.0, 100.0)).length() < 1e-3);
        assert!(!system.canvas_transform().is_linear());
    }

    #[test]
    fn test_rejects_empty_canvas() {
        assert!(View::default().transforms(0, 300).is_err());
    }

    #[test]
    fn test_from_options() {
        let options = Options::new()
            .with_view(Vec2::new(1.0, 2.0), Vec2::new(5.0, 6.0))
            .with_projection(LocalProjection::Polar);
        let view = View::from(&options);
        assert_eq!(view.center, Vec2::new(1.0, 2.0));
        assert_eq!(view.zoom, Vec2::new(5.0, 6.0));
        assert_eq!(view.projection, LocalProjection::Polar);
    }
}
