//! General affine transform.

use std::sync::Arc;

use glam::{Mat4, Vec4};

use super::Transform;
use crate::shader_function::ShaderFunction;

const MATRIX_MAP: &str = "return mat4x4<f32>($0, $1, $2, $3) * p;";

/// An arbitrary 4x4 matrix transform (rotation, shear, anisotropic scale).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub matrix: Mat4,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }
}

impl AffineTransform {
    /// Creates a transform from a matrix.
    pub fn new(matrix: Mat4) -> Self {
        Self { matrix }
    }

    /// A rotation about the z axis, in radians.
    pub fn rotation_z(angle: f32) -> Self {
        Self::new(Mat4::from_rotation_z(angle))
    }

    fn columns(matrix: &Mat4) -> Vec<Vec4> {
        vec![matrix.x_axis, matrix.y_axis, matrix.z_axis, matrix.w_axis]
    }
}

impl Transform for AffineTransform {
    fn map(&self, p: Vec4) -> Vec4 {
        self.matrix * p
    }

    fn imap(&self, p: Vec4) -> Vec4 {
        self.matrix.inverse() * p
    }

    fn shader_map(&self) -> ShaderFunction {
        ShaderFunction::snippet("affine_map", MATRIX_MAP, Self::columns(&self.matrix))
    }

    fn shader_imap(&self) -> ShaderFunction {
        ShaderFunction::snippet(
            "affine_imap",
            MATRIX_MAP,
            Self::columns(&self.matrix.inverse()),
        )
    }

    fn inverse(&self) -> Arc<dyn Transform> {
        Arc::new(AffineTransform::new(self.matrix.inverse()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_util::approx_eq;
    use glam::{Vec2, Vec3};

    #[test]
    fn test_rotation_round_trip() {
        let rot = AffineTransform::rotation_z(std::f32::consts::FRAC_PI_2);
        let p = rot.map_point(Vec2::X);
        assert!((p - Vec2::Y).length() < 1e-6);
        assert!((rot.imap_point(p) - Vec2::X).length() < 1e-6);
    }

    #[test]
    fn test_inverse_matches_imap() {
        let t = AffineTransform::new(Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 0.5, 1.0),
            glam::Quat::from_rotation_z(0.3),
            Vec3::new(5.0, -1.0, 0.0),
        ));
        let p = Vec4::new(3.0, 4.0, 0.0, 1.0);
        assert!(approx_eq(t.inverse().map(p), t.imap(p), 1e-5));
    }

    #[test]
    fn test_shader_imap_uses_inverse_columns() {
        let t = AffineTransform::new(Mat4::from_scale(Vec3::new(4.0, 2.0, 1.0)));
        let ShaderFunction::Snippet { params, .. } = t.shader_imap() else {
            panic!("expected a snippet");
        };
        assert_eq!(params.len(), 4);
        assert_eq!(params[0], Vec4::new(0.25, 0.0, 0.0, 0.0));
        assert_eq!(params[1], Vec4::new(0.0, 0.5, 0.0, 0.0));
    }
}
