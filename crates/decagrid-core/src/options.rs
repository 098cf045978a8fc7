//! Configuration options for decagrid.

use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::grid::GridScale;

/// How the visual's local coordinates are laid out on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LocalProjection {
    /// Local `(x, y)` maps to the canvas through the pan/zoom camera.
    #[default]
    Cartesian,
    /// Local `(theta, radius)` is converted to cartesian before the camera.
    Polar,
}

/// Global configuration options for decagrid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Window title.
    pub window_title: String,

    /// Initial window size in logical pixels.
    pub window_size: [u32; 2],

    /// Background color.
    pub background_color: Vec3,

    /// Multiplier applied to the computed decade spacing.
    pub grid_scale: GridScale,

    /// Local point shown at the canvas centre.
    pub initial_center: Vec2,

    /// Initial zoom in canvas pixels per local unit.
    pub initial_zoom: Vec2,

    /// Local coordinate layout.
    pub projection: LocalProjection,

    /// Zoom factor applied per mouse wheel line. Must be finite and > 1.
    pub zoom_step: f32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            window_title: "decagrid".to_string(),
            window_size: [1280, 720],
            background_color: Vec3::new(0.1, 0.1, 0.12),
            grid_scale: GridScale::ONE,
            initial_center: Vec2::ZERO,
            initial_zoom: Vec2::splat(100.0),
            projection: LocalProjection::Cartesian,
            zoom_step: 1.1,
        }
    }
}

impl Options {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Checks values the type system cannot rule out.
    pub fn validate(&self) -> Result<()> {
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            return Err(GridError::InvalidZoomStep(self.zoom_step));
        }
        Ok(())
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let options = Self::from_json_str(&json)?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Serializes the options as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the grid scale.
    pub fn with_grid_scale(mut self, scale: GridScale) -> Self {
        self.grid_scale = scale;
        self
    }

    /// Sets the background color.
    pub fn with_background_color(mut self, color: Vec3) -> Self {
        self.background_color = color;
        self
    }

    /// Sets the initial view.
    pub fn with_view(mut self, center: Vec2, zoom: Vec2) -> Self {
        self.initial_center = center;
        self.initial_zoom = zoom;
        self
    }

    /// Sets the local coordinate layout.
    pub fn with_projection(mut self, projection: LocalProjection) -> Self {
        self.projection = projection;
        self
    }

    /// Sets the window title.
    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let options = Options::default();
        assert_eq!(options.grid_scale, GridScale::ONE);
        assert_eq!(options.projection, LocalProjection::Cartesian);
        assert_eq!(options.window_size, [1280, 720]);
        assert!(options.zoom_step > 1.0);
    }

    #[test]
    fn test_options_builder() {
        let options = Options::new()
            .with_grid_scale(GridScale::new(2.0, 5.0).unwrap())
            .with_projection(LocalProjection::Polar)
            .with_window_title("polar grid");
        assert_eq!(options.grid_scale.as_vec2(), Vec2::new(2.0, 5.0));
        assert_eq!(options.projection, LocalProjection::Polar);
        assert_eq!(options.window_title, "polar grid");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options =
            Options::from_json_str(r#"{ "grid_scale": [2.0, 2.0], "projection": "Polar" }"#)
                .unwrap();
        assert_eq!(options.grid_scale.as_vec2(), Vec2::splat(2.0));
        assert_eq!(options.projection, LocalProjection::Polar);
        assert_eq!(options.window_title, "decagrid");
    }

    #[test]
    fn test_json_rejects_bad_scale() {
        assert!(Options::from_json_str(r#"{ "grid_scale": [-1.0, 2.0] }"#).is_err());
    }

    #[test]
    fn test_json_rejects_bad_zoom_step() {
        for step in ["0.0", "-2.0", "1.0", "0.5"] {
            let json = format!(r#"{{ "zoom_step": {step} }}"#);
            let err = Options::from_json_str(&json).unwrap_err();
            assert!(matches!(err, GridError::InvalidZoomStep(_)), "{step}: {err}");
        }
        assert!(Options::from_json_str(r#"{ "zoom_step": 1.25 }"#).is_ok());
    }

    #[test]
    fn test_validate_rejects_nan_zoom_step() {
        let options = Options {
            zoom_step: f32::NAN,
            ..Options::default()
        };
        assert!(matches!(
            options.validate(),
            Err(GridError::InvalidZoomStep(step)) if step.is_nan()
        ));
        assert!(Options::default().validate().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Options::load("/nonexistent/decagrid.json").unwrap_err();
        assert!(matches!(err, GridError::IoError(_)));
    }

    #[test]
    fn test_to_json_reparses() {
        let options = Options::new().with_view(Vec2::new(3.0, -1.0), Vec2::new(20.0, 40.0));
        let json = options.to_json().unwrap();
        assert_eq!(Options::from_json_str(&json).unwrap(), options);
    }
}
