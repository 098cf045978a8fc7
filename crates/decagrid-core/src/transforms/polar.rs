use std::sync::Arc;

use glam::Vec4;

use super::{InverseTransform, Transform};
use crate::shader_function::ShaderFunction;

const POLAR_MAP: &str = "return vec4<f32>(p.y * cos(p.x), p.y * sin(p.x), p.z, p.w);";
const POLAR_IMAP: &str = "return vec4<f32>(atan2(p.y, p.x), length(p.xy), p.z, p.w);";

/// Maps `(theta, radius)` to cartesian `(x, y)`.
///
/// Non-affine: the size of one pixel in `(theta, radius)` units depends on
/// where the pixel is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolarTransform;

impl Transform for PolarTransform {
    fn map(&self, p: Vec4) -> Vec4 {
        let (sin, cos) = p.x.sin_cos();
        Vec4::new(p.y * cos, p.y * sin, p.z, p.w)
    }

    fn imap(&self, p: Vec4) -> Vec4 {
        Vec4::new(p.y.atan2(p.x), p.truncate().truncate().length(), p.z, p.w)
    }

    fn shader_map(&self) -> ShaderFunction {
        ShaderFunction::snippet("polar_map", POLAR_MAP, Vec::new())
    }

    fn shader_imap(&self) -> ShaderFunction {
        ShaderFunction::snippet("polar_imap", POLAR_IMAP, Vec::new())
    }

    fn inverse(&self) -> Arc<dyn Transform> {
        Arc::new(InverseTransform::new(Arc::new(*self)))
    }

    fn is_linear(&self) -> bool {
        false
    }
}
