//! Coordinate transforms between a visual's local space, canvas pixels and
//! normalized device coordinates.
//!
//! Every transform can be evaluated on the CPU ([`Transform::map`],
//! [`Transform::imap`]) and exported to the GPU as a [`ShaderFunction`]
//! ([`Transform::shader_map`], [`Transform::shader_imap`]). The two paths
//! must agree; the grid kernel tests rely on it.

mod affine;
mod chain;
mod inverse;
mod null;
mod polar;
mod st;

use std::fmt;
use std::sync::Arc;

use glam::{Vec2, Vec4};

use crate::shader_function::ShaderFunction;

pub use affine::AffineTransform;
pub use chain::ChainTransform;
pub use inverse::InverseTransform;
pub use null::NullTransform;
pub use polar::PolarTransform;
pub use st::STTransform;

/// A bidirectional coordinate mapping.
///
/// Positions are homogeneous `Vec4`s; 2D points use `z = 0, w = 1`.
pub trait Transform: fmt::Debug + Send + Sync {
    /// Maps a position forward.
    fn map(&self, p: Vec4) -> Vec4;

    /// Maps a position backward.
    fn imap(&self, p: Vec4) -> Vec4;

    /// WGSL equivalent of [`Transform::map`].
    fn shader_map(&self) -> ShaderFunction;

    /// WGSL equivalent of [`Transform::imap`].
    fn shader_imap(&self) -> ShaderFunction;

    /// Returns the inverse transform.
    fn inverse(&self) -> Arc<dyn Transform>;

    /// Whether the mapping is affine.
    fn is_linear(&self) -> bool {
        true
    }

    /// Maps a 2D point forward.
    fn map_point(&self, p: Vec2) -> Vec2 {
        self.map(p.extend(0.0).extend(1.0)).truncate().truncate()
    }

    /// Maps a 2D point backward.
    fn imap_point(&self, p: Vec2) -> Vec2 {
        self.imap(p.extend(0.0).extend(1.0)).truncate().truncate()
    }
}
