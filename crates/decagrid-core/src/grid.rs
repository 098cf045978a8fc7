//! Adaptive decade grid: the CPU reference kernel.
//!
//! This module is a line-for-line twin of the fragment stage in the render
//! crate's `grid.wgsl`. The GPU evaluates it once per pixel; here it is used
//! by tests, by the headless comparison test, and by [`rasterize`] for
//! software rendering.
//!
//! Per fragment:
//! 1. map NDC to canvas pixels and canvas pixels to local coordinates,
//! 2. measure how far one canvas pixel reaches in local units along each
//!    local axis ([`pixel_footprint`]),
//! 3. round that reach up to the next decade ([`decade_spacing`]) and scale it,
//! 4. test each axis against the coarse (×100) and fine (×10) lines
//!    ([`tier_alpha`]),
//! 5. keep the stronger of the two axis opacities.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::transform_system::{CoordinateSpace, TransformContext};

/// Upper bound of any per-axis opacity.
pub const MAX_ALPHA: f32 = 0.4;

/// Coarse lines sit on multiples of `MAJOR_MULTIPLE * spacing`.
pub const MAJOR_MULTIPLE: f32 = 100.0;

/// Fine lines sit on multiples of `MINOR_MULTIPLE * spacing`.
pub const MINOR_MULTIPLE: f32 = 10.0;

/// Opacity factor of fine lines relative to coarse ones.
pub const MINOR_FADE: f32 = 0.1;

/// Smallest pixel footprint fed to the logarithm.
pub const MIN_PIXEL_EXTENT: f32 = 1e-30;

/// Largest pixel footprint fed to the logarithm.
pub const MAX_PIXEL_EXTENT: f32 = 1e30;

/// Per-axis multiplier applied to the computed decade spacing.
///
/// Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f32; 2]", into = "[f32; 2]")]
pub struct GridScale(Vec2);

impl GridScale {
    /// Scale `(1, 1)`.
    pub const ONE: Self = Self(Vec2::ONE);

    /// Creates a scale, rejecting zero, negative and non-finite components.
    pub fn new(x: f32, y: f32) -> Result<Self> {
        if !(x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0) {
            return Err(GridError::InvalidScale { x, y });
        }
        Ok(Self(Vec2::new(x, y)))
    }

    /// Creates the same scale on both axes.
    pub fn uniform(s: f32) -> Result<Self> {
        Self::new(s, s)
    }

    /// Returns the scale as a vector.
    pub fn as_vec2(self) -> Vec2 {
        self.0
    }

    /// Returns the scale with x and y exchanged.
    #[must_use]
    pub fn swapped(self) -> Self {
        Self(Vec2::new(self.0.y, self.0.x))
    }
}

impl Default for GridScale {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<[f32; 2]> for GridScale {
    type Error = GridError;

    fn try_from(value: [f32; 2]) -> Result<Self> {
        Self::new(value[0], value[1])
    }
}

impl From<GridScale> for [f32; 2] {
    fn from(scale: GridScale) -> Self {
        scale.0.to_array()
    }
}

/// Which gridline a coordinate falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridTier {
    /// Not within one pixel of a line.
    #[default]
    None,
    /// On a multiple of `MINOR_MULTIPLE * spacing`.
    Minor,
    /// On a multiple of `MAJOR_MULTIPLE * spacing`.
    Major,
}

/// Local position of a canvas pixel and the local extent of one pixel step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelFootprint {
    pub local_pos: Vec4,
    pub extent: Vec2,
}

/// Grid evaluation along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLine {
    /// Scaled decade spacing (0 if the footprint was not finite).
    pub spacing: f32,
    pub tier: GridTier,
    pub alpha: f32,
}

impl AxisLine {
    const HIDDEN: Self = Self {
        spacing: 0.0,
        tier: GridTier::None,
        alpha: 0.0,
    };
}

/// Everything the kernel computed for one fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentSample {
    pub canvas_pos: Vec4,
    pub footprint: PixelFootprint,
    pub x: AxisLine,
    pub y: AxisLine,
}

impl FragmentSample {
    /// Output alpha: the stronger of the two axes.
    pub fn alpha(&self) -> f32 {
        self.x.alpha.max(self.y.alpha)
    }

    /// Output colour: white with [`FragmentSample::alpha`].
    pub fn color(&self) -> Vec4 {
        Vec4::new(1.0, 1.0, 1.0, self.alpha())
    }
}

/// Floored modulo, matching GLSL `mod`: the result has the sign of `y`.
pub fn floor_mod(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

/// Measures the local-space reach of one canvas pixel at `px_pos`.
///
/// Steps one pixel along canvas x and canvas y, maps both back to local
/// space and sums the absolute changes per local axis, so a rotated or
/// sheared mapping counts the motion a canvas step causes on both local axes.
pub fn pixel_footprint(canvas_to_local: impl Fn(Vec4) -> Vec4, px_pos: Vec4) -> PixelFootprint {
    let local_pos = canvas_to_local(px_pos);
    let dx = canvas_to_local(px_pos + Vec4::X) - local_pos;
    let dy = canvas_to_local(px_pos + Vec4::Y) - local_pos;
    PixelFootprint {
        local_pos,
        extent: Vec2::new(dx.x.abs() + dy.x.abs(), dx.y.abs() + dy.y.abs()),
    }
}

/// Clamps a finite pixel extent into the range the logarithm can handle.
pub fn clamp_extent(px: f32) -> f32 {
    px.clamp(MIN_PIXEL_EXTENT, MAX_PIXEL_EXTENT)
}

/// The next power of ten above `px`: `10^(floor(log10(px)) + 1)`.
pub fn decade_spacing(px: f32) -> f32 {
    10f32.powf(clamp_extent(px).log10().floor() + 1.0)
}

/// Coarse/fine line test for one coordinate.
///
/// The coarse test has priority: the fine test only runs when the coarse
/// one fails.
pub fn tier_alpha(coord: f32, px: f32, spacing: f32) -> (GridTier, f32) {
    if floor_mod(coord, MAJOR_MULTIPLE * spacing) < px {
        (GridTier::Major, (spacing / px).clamp(0.0, MAX_ALPHA))
    } else if floor_mod(coord, MINOR_MULTIPLE * spacing) < px {
        (GridTier::Minor, (MINOR_FADE * spacing / px).clamp(0.0, MAX_ALPHA))
    } else {
        (GridTier::None, 0.0)
    }
}

/// Evaluates one axis: decade selection plus the tier test.
///
/// A non-finite coordinate or footprint (a singular mapping) hides the line.
pub fn axis_line(coord: f32, raw_px: f32, scale: f32) -> AxisLine {
    if !(coord.is_finite() && raw_px.is_finite()) {
        return AxisLine::HIDDEN;
    }
    let px = clamp_extent(raw_px);
    let spacing = decade_spacing(px) * scale;
    let (tier, alpha) = tier_alpha(coord, px, spacing);
    AxisLine {
        spacing,
        tier,
        alpha: if alpha.is_finite() { alpha } else { 0.0 },
    }
}

/// Evaluates the grid at a canvas position.
pub fn evaluate_canvas(
    canvas_pos: Vec4,
    canvas_to_local: impl Fn(Vec4) -> Vec4,
    scale: GridScale,
) -> FragmentSample {
    let footprint = pixel_footprint(canvas_to_local, canvas_pos);
    let scale = scale.as_vec2();
    FragmentSample {
        canvas_pos,
        footprint,
        x: axis_line(footprint.local_pos.x, footprint.extent.x, scale.x),
        y: axis_line(footprint.local_pos.y, footprint.extent.y, scale.y),
    }
}

/// Evaluates the grid for a fragment at NDC position `ndc`.
pub fn evaluate_fragment(
    ndc: Vec4,
    ndc_to_canvas: impl Fn(Vec4) -> Vec4,
    canvas_to_local: impl Fn(Vec4) -> Vec4,
    scale: GridScale,
) -> FragmentSample {
    evaluate_canvas(ndc_to_canvas(ndc), canvas_to_local, scale)
}

/// Evaluates the grid at every pixel centre of a `width` x `height` canvas.
///
/// Returns row-major alpha values, top row first, going through NDC exactly
/// like the GPU path.
pub fn rasterize(
    width: u32,
    height: u32,
    ctx: &dyn TransformContext,
    scale: GridScale,
) -> Vec<f32> {
    let canvas_to_ndc = ctx.entity_transform(CoordinateSpace::Canvas, CoordinateSpace::Ndc);
    let local_to_canvas = ctx.canvas_transform();

    let mut alphas = Vec::with_capacity(width as usize * height as usize);
    for row in 0..height {
        for col in 0..width {
            let center = Vec4::new(col as f32 + 0.5, row as f32 + 0.5, 0.0, 1.0);
            let ndc = canvas_to_ndc.map(center);
            let sample = evaluate_fragment(
                ndc,
                |p| canvas_to_ndc.imap(p),
                |p| local_to_canvas.imap(p),
                scale,
            );
            alphas.push(sample.alpha());
        }
    }
    alphas
}
