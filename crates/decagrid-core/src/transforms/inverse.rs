use std::sync::Arc;

use glam::Vec4;

use super::Transform;
use crate::shader_function::ShaderFunction;

/// Swaps the forward and backward directions of another transform.
#[derive(Debug, Clone)]
pub struct InverseTransform {
    inner: Arc<dyn Transform>,
}

impl InverseTransform {
    pub fn new(inner: Arc<dyn Transform>) -> Self {
        Self { inner }
    }
}

impl Transform for InverseTransform {
    fn map(&self, p: Vec4) -> Vec4 {
        self.inner.imap(p)
    }

    fn imap(&self, p: Vec4) -> Vec4 {
        self.inner.map(p)
    }

    fn shader_map(&self) -> ShaderFunction {
        self.inner.shader_imap()
    }

    fn shader_imap(&self) -> ShaderFunction {
        self.inner.shader_map()
    }

    fn inverse(&self) -> Arc<dyn Transform> {
        Arc::clone(&self.inner)
    }

    fn is_linear(&self) -> bool {
        self.inner.is_linear()
    }
}
