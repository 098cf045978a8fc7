//! Pan/zoom camera for 2D views.

use decagrid_core::STTransform;
use glam::Vec2;

/// Smallest allowed zoom, in canvas pixels per local unit.
pub const MIN_ZOOM: f32 = 1e-6;

/// Largest allowed zoom, in canvas pixels per local unit.
pub const MAX_ZOOM: f32 = 1e9;

/// A 2D camera that maps local coordinates onto the canvas with a per-axis
/// zoom. Local y points up, canvas y points down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanZoomCamera {
    /// Local point shown at the canvas centre.
    pub center: Vec2,
    /// Canvas pixels per local unit, per axis.
    pub zoom: Vec2,
    viewport: Vec2,
    home: (Vec2, Vec2),
}

impl PanZoomCamera {
    /// Creates a camera for a viewport of the given size in pixels.
    pub fn new(viewport: Vec2, center: Vec2, zoom: Vec2) -> Self {
        let zoom = clamp_zoom(zoom);
        Self {
            center,
            zoom,
            viewport,
            home: (center, zoom),
        }
    }

    /// Viewport size in pixels.
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Sets the viewport size. The centre stays put.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width as f32, height as f32);
    }

    /// The local-to-canvas mapping for the current view.
    pub fn local_to_canvas(&self) -> STTransform {
        let scale = self.signed_zoom();
        STTransform::new_2d(scale, self.viewport * 0.5 - self.center * scale)
    }

    /// Converts a canvas position to local coordinates.
    pub fn canvas_to_local(&self, canvas: Vec2) -> Vec2 {
        (canvas - self.viewport * 0.5) / self.signed_zoom() + self.center
    }

    /// Moves the view by a canvas-space drag delta. The content follows the
    /// cursor.
    pub fn pan(&mut self, delta: Vec2) {
        self.center -= delta / self.signed_zoom();
    }

    /// Multiplies the zoom by `factor`, keeping the local point under
    /// `anchor` (canvas pixels) fixed.
    pub fn zoom_at(&mut self, factor: Vec2, anchor: Vec2) {
        let fixed = self.canvas_to_local(anchor);
        let zoom = clamp_zoom(self.zoom * factor);
        if zoom != self.zoom * factor {
            log::warn!("zoom clamped to {zoom:?}");
        }
        self.zoom = zoom;
        self.center = fixed - (anchor - self.viewport * 0.5) / self.signed_zoom();
    }

    /// Restores the initial view.
    pub fn reset(&mut self) {
        (self.center, self.zoom) = self.home;
    }

    fn signed_zoom(&self) -> Vec2 {
        Vec2::new(self.zoom.x, -self.zoom.y)
    }
}

fn clamp_zoom(zoom: Vec2) -> Vec2 {
    zoom.clamp(Vec2::splat(MIN_ZOOM), Vec2::splat(MAX_ZOOM))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn zoom_keeps_anchor(
            fx in 0.25f32..4.0,
            fy in 0.25f32..4.0,
            ax in 0.0f32..800.0,
            ay in 0.0f32..600.0,
        ) {
            let mut camera = PanZoomCamera::new(
                Vec2::new(800.0, 600.0),
                Vec2::new(-3.0, 5.0),
                Vec2::new(40.0, 80.0),
            );
            let anchor = Vec2::new(ax, ay);
            let before = camera.canvas_to_local(anchor);
            camera.zoom_at(Vec2::new(fx, fy), anchor);
            let after = camera.canvas_to_local(anchor);
            prop_assert!((after - before).abs().max_element() < 1e-3);
        }

        #[test]
        fn zoom_stays_in_range(f in -30.0f32..30.0) {
            let mut camera = PanZoomCamera::new(Vec2::splat(100.0), Vec2::ZERO, Vec2::ONE);
            camera.zoom_at(Vec2::splat(10f32.powf(f)), Vec2::splat(50.0));
            prop_assert!(camera.zoom.min_element() >= MIN_ZOOM);
            prop_assert!(camera.zoom.max_element() <= MAX_ZOOM);
        }
    }
}
