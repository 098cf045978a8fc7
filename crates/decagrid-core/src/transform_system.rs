//! Per-frame transform context.
//!
//! A visual never owns its transforms. Each frame the host hands it a
//! [`TransformContext`] describing how the visual's local space relates to
//! the canvas and to normalized device coordinates, and the visual pulls the
//! mappings it needs from there.

use std::sync::Arc;

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::transforms::{ChainTransform, NullTransform, STTransform, Transform};

/// The coordinate spaces a visual is drawn through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSpace {
    /// The visual's own data coordinates.
    Local,
    /// Canvas pixels, origin top-left, y down.
    Canvas,
    /// Normalized device coordinates, [-1, 1] with y up.
    Ndc,
}

/// Supplies the coordinate mappings for one frame.
pub trait TransformContext {
    /// Returns the mapping from space `from` to space `to`.
    fn entity_transform(&self, from: CoordinateSpace, to: CoordinateSpace)
        -> Arc<dyn Transform>;

    /// Returns the local-to-canvas mapping.
    fn canvas_transform(&self) -> Arc<dyn Transform> {
        self.entity_transform(CoordinateSpace::Local, CoordinateSpace::Canvas)
    }
}

/// The standard transform context: a local-to-canvas mapping (usually a
/// pan/zoom camera) plus a canvas-to-NDC mapping derived from the canvas size.
#[derive(Debug, Clone)]
pub struct TransformSystem {
    canvas_size: UVec2,
    local_to_canvas: Arc<dyn Transform>,
}

impl TransformSystem {
    /// Creates a transform system for a canvas of the given size.
    pub fn new(width: u32, height: u32, local_to_canvas: Arc<dyn Transform>) -> Result<Self> {
        validate_size(width, height)?;
        Ok(Self {
            canvas_size: UVec2::new(width, height),
            local_to_canvas,
        })
    }

    /// Creates a system whose local space is the canvas itself.
    pub fn identity(width: u32, height: u32) -> Result<Self> {
        Self::new(width, height, Arc::new(NullTransform))
    }

    /// Canvas size in pixels.
    pub fn canvas_size(&self) -> UVec2 {
        self.canvas_size
    }

    /// Updates the canvas size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        validate_size(width, height)?;
        self.canvas_size = UVec2::new(width, height);
        Ok(())
    }

    /// Replaces the local-to-canvas mapping.
    pub fn set_local_to_canvas(&mut self, transform: Arc<dyn Transform>) {
        self.local_to_canvas = transform;
    }

    /// The canvas-to-NDC mapping: `(0, 0)` is the top-left corner at
    /// `(-1, 1)`, `(width, height)` the bottom-right corner at `(1, -1)`.
    pub fn canvas_to_ndc(&self) -> STTransform {
        STTransform::from_mapping(
            (Vec2::ZERO, self.canvas_size.as_vec2()),
            (Vec2::new(-1.0, 1.0), Vec2::new(1.0, -1.0)),
        )
    }

    fn local_to_ndc(&self) -> ChainTransform {
        ChainTransform::new(vec![
            Arc::clone(&self.local_to_canvas),
            Arc::new(self.canvas_to_ndc()),
        ])
    }
}

fn validate_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(GridError::InvalidCanvasSize { width, height });
    }
    Ok(())
}

impl TransformContext for TransformSystem {
    fn entity_transform(
        &self,
        from: CoordinateSpace,
        to: CoordinateSpace,
    ) -> Arc<dyn Transform> {
        use CoordinateSpace::{Canvas, Local, Ndc};

        match (from, to) {
            (Local, Local) | (Canvas, Canvas) | (Ndc, Ndc) => Arc::new(NullTransform),
            (Local, Canvas) => Arc::clone(&self.local_to_canvas),
            (Canvas, Local) => self.local_to_canvas.inverse(),
            (Canvas, Ndc) => Arc::new(self.canvas_to_ndc()),
            (Ndc, Canvas) => self.canvas_to_ndc().inverse(),
            (Local, Ndc) => Arc::new(self.local_to_ndc()),
            (Ndc, Local) => self.local_to_ndc().inverse(),
        }
    }

    fn canvas_transform(&self) -> Arc<dyn Transform> {
        Arc::clone(&self.local_to_canvas)
    }
}
