//! Sequential composition of transforms.

use std::sync::Arc;

use glam::Vec4;

use super::Transform;
use crate::shader_function::ShaderFunction;

/// A sequence of transforms.
///
/// [`Transform::map`] applies the transforms in list order;
/// [`Transform::imap`] undoes them in reverse order.
#[derive(Debug, Clone, Default)]
pub struct ChainTransform {
    transforms: Vec<Arc<dyn Transform>>,
}

impl ChainTransform {
    /// Creates a chain; `transforms[0]` is applied first.
    pub fn new(transforms: Vec<Arc<dyn Transform>>) -> Self {
        Self { transforms }
    }

    /// Appends a transform applied after the existing ones.
    pub fn push(&mut self, transform: Arc<dyn Transform>) {
        self.transforms.push(transform);
    }

    /// Returns the transforms in application order.
    pub fn transforms(&self) -> &[Arc<dyn Transform>] {
        &self.transforms
    }
}

impl Transform for ChainTransform {
    fn map(&self, p: Vec4) -> Vec4 {
        self.transforms.iter().fold(p, |p, t| t.map(p))
    }

    fn imap(&self, p: Vec4) -> Vec4 {
        self.transforms.iter().rev().fold(p, |p, t| t.imap(p))
    }

    fn shader_map(&self) -> ShaderFunction {
        if self.transforms.is_empty() {
            return ShaderFunction::identity();
        }
        ShaderFunction::Chain(self.transforms.iter().map(|t| t.shader_map()).collect())
    }

    fn shader_imap(&self) -> ShaderFunction {
        if self.transforms.is_empty() {
            return ShaderFunction::identity();
        }
        ShaderFunction::Chain(
            self.transforms
                .iter()
                .rev()
                .map(|t| t.shader_imap())
                .collect(),
        )
    }

    fn inverse(&self) -> Arc<dyn Transform> {
        Arc::new(ChainTransform::new(
            self.transforms.iter().rev().map(|t| t.inverse()).collect(),
        ))
    }

    fn is_linear(&self) -> bool {
        self.transforms.iter().all(|t| t.is_linear())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_util::approx_eq;
    use crate::transforms::{PolarTransform, STTransform};
    use glam::Vec2;

    fn polar_then_zoom() -> ChainTransform {
        ChainTransform::new(vec![
            Arc::new(PolarTransform),
            Arc::new(STTransform::new_2d(Vec2::splat(10.0), Vec2::new(100.0, 50.0))),
        ])
    }

    #[test]
    fn test_chain_map_order() {
        let chain = polar_then_zoom();
        let p = chain.map_point(Vec2::new(0.0, 2.0));
        assert!((p - Vec2::new(120.0, 50.0)).length() < 1e-4);
    }

    #[test]
    fn test_chain_imap_reverses() {
        let chain = polar_then_zoom();
        let p = Vec4::new(0.4, 1.5, 0.0, 1.0);
        assert!(approx_eq(chain.imap(chain.map(p)), p, 1e-5));
        assert!(approx_eq(chain.inverse().map(chain.map(p)), p, 1e-5));
    }

    #[test]
    fn test_chain_shader_imap_reverses() {
        let ShaderFunction::Chain(functions) = polar_then_zoom().shader_imap() else {
            panic!("expected a chain");
        };
        assert_eq!(functions.len(), 2);
        assert!(matches!(functions[0], ShaderFunction::Snippet { label: "st_imap", .. }));
        assert!(matches!(functions[1], ShaderFunction::Snippet { label: "polar_imap", .. }));
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = ChainTransform::default();
        let p = Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert_eq!(chain.map(p), p);
        assert_eq!(chain.shader_imap(), ShaderFunction::identity());
        assert!(chain.is_linear());
        assert!(!polar_then_zoom().is_linear());
    }
}
