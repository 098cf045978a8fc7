//! Core abstractions for decagrid.
//!
//! This crate provides the pieces of the adaptive grid that do not touch the GPU:
//! - [`Transform`] implementations and their WGSL counterparts ([`ShaderFunction`])
//! - The per-frame [`TransformContext`] and the standard [`TransformSystem`]
//! - The CPU reference of the grid kernel ([`grid`])
//! - Configuration [`Options`] and error types

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod grid;
pub mod options;
pub mod shader_function;
pub mod transform_system;
pub mod transforms;

pub use error::{GridError, Result};
pub use grid::{
    evaluate_canvas, evaluate_fragment, rasterize, AxisLine, FragmentSample, GridScale, GridTier,
    PixelFootprint, MAX_ALPHA,
};
pub use options::{LocalProjection, Options};
pub use shader_function::{ShaderFunction, MAX_FUNCTION_PARAMS};
pub use transform_system::{CoordinateSpace, TransformContext, TransformSystem};
pub use transforms::{
    AffineTransform, ChainTransform, InverseTransform, NullTransform, PolarTransform,
    STTransform, Transform,
};

// Re-export glam types for convenience
pub use glam::{Mat4, UVec2, Vec2, Vec3, Vec4};
