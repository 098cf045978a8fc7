use std::sync::Arc;

use glam::Vec4;

use super::Transform;
use crate::shader_function::ShaderFunction;

/// The identity transform.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NullTransform;

impl Transform for NullTransform {
    fn map(&self, p: Vec4) -> Vec4 {
        p
    }

    fn imap(&self, p: Vec4) -> Vec4 {
        p
    }

    fn shader_map(&self) -> ShaderFunction {
        ShaderFunction::identity()
    }

    fn shader_imap(&self) -> ShaderFunction {
        ShaderFunction::identity()
    }

    fn inverse(&self) -> Arc<dyn Transform> {
        Arc::new(NullTransform)
    }
}
