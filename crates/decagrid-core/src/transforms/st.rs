//! Scale-translate transform.

use std::sync::Arc;

use glam::{Vec2, Vec3, Vec4};

use super::Transform;
use crate::shader_function::ShaderFunction;

const ST_MAP: &str = "return vec4<f32>(p.xyz * $0.xyz + $1.xyz * p.w, p.w);";
const ST_IMAP: &str = "return vec4<f32>((p.xyz - $1.xyz * p.w) / $0.xyz, p.w);";

/// Per-axis scale followed by a translation.
///
/// This is what a pan/zoom camera and the canvas-to-NDC mapping reduce to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct STTransform {
    pub scale: Vec3,
    pub translate: Vec3,
}

impl Default for STTransform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            translate: Vec3::ZERO,
        }
    }
}

impl STTransform {
    /// Creates a new scale-translate transform.
    pub fn new(scale: Vec3, translate: Vec3) -> Self {
        Self { scale, translate }
    }

    /// Creates a 2D scale-translate transform (z untouched).
    pub fn new_2d(scale: Vec2, translate: Vec2) -> Self {
        Self::new(scale.extend(1.0), translate.extend(0.0))
    }

    /// Creates the transform mapping rectangle `from` onto rectangle `to`.
    ///
    /// Each rectangle is given by two opposite corners; corner order decides
    /// orientation, so `((0, 0), (w, h)) -> ((-1, 1), (1, -1))` flips y.
    pub fn from_mapping(from: (Vec2, Vec2), to: (Vec2, Vec2)) -> Self {
        let scale = (to.1 - to.0) / (from.1 - from.0);
        let translate = to.0 - from.0 * scale;
        Self::new_2d(scale, translate)
    }

    /// Returns the 2D scale component.
    pub fn scale_2d(&self) -> Vec2 {
        self.scale.truncate()
    }

    /// Returns the 2D translation component.
    pub fn translate_2d(&self) -> Vec2 {
        self.translate.truncate()
    }

    fn params(&self) -> Vec<Vec4> {
        vec![self.scale.extend(1.0), self.translate.extend(0.0)]
    }
}

impl Transform for STTransform {
    fn map(&self, p: Vec4) -> Vec4 {
        (p.truncate() * self.scale + self.translate * p.w).extend(p.w)
    }

    fn imap(&self, p: Vec4) -> Vec4 {
        ((p.truncate() - self.translate * p.w) / self.scale).extend(p.w)
    }

    fn shader_map(&self) -> ShaderFunction {
        ShaderFunction::snippet("st_map", ST_MAP, self.params())
    }

    fn shader_imap(&self) -> ShaderFunction {
        ShaderFunction::snippet("st_imap", ST_IMAP, self.params())
    }

    fn inverse(&self) -> Arc<dyn Transform> {
        let scale = Vec3::ONE / self.scale;
        Arc::new(STTransform::new(scale, -self.translate * scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_util::approx_eq;

    #[test]
    fn test_st_map_imap() {
        let st = STTransform::new_2d(Vec2::new(2.0, -4.0), Vec2::new(10.0, 3.0));
        let p = Vec4::new(1.5, -2.0, 0.0, 1.0);
        let mapped = st.map(p);
        assert_eq!(mapped, Vec4::new(13.0, 11.0, 0.0, 1.0));
        assert!(approx_eq(st.imap(mapped), p, 1e-6));
    }

    #[test]
    fn test_st_inverse() {
        let st = STTransform::new_2d(Vec2::new(0.5, 8.0), Vec2::new(-3.0, 1.0));
        let inv = st.inverse();
        let p = Vec4::new(7.0, 2.0, 0.0, 1.0);
        assert!(approx_eq(inv.map(st.map(p)), p, 1e-5));
        assert!(approx_eq(inv.imap(p), st.map(p), 1e-5));
    }

    #[test]
    fn test_from_mapping_canvas_to_ndc() {
        let st = STTransform::from_mapping(
            (Vec2::ZERO, Vec2::new(800.0, 600.0)),
            (Vec2::new(-1.0, 1.0), Vec2::new(1.0, -1.0)),
        );
        let close = |a: Vec2, b: Vec2| (a - b).length() < 1e-5;
        assert!(close(st.map_point(Vec2::ZERO), Vec2::new(-1.0, 1.0)));
        assert!(close(st.map_point(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0)));
        assert!(close(st.map_point(Vec2::new(400.0, 300.0)), Vec2::ZERO));
    }

    #[test]
    fn test_shader_params_layout() {
        let st = STTransform::new_2d(Vec2::new(2.0, 3.0), Vec2::new(4.0, 5.0));
        let ShaderFunction::Snippet { params, .. } = st.shader_imap() else {
            panic!("expected a snippet");
        };
        assert_eq!(params[0], Vec4::new(2.0, 3.0, 1.0, 1.0));
        assert_eq!(params[1], Vec4::new(4.0, 5.0, 0.0, 0.0));
    }
}
