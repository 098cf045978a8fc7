//! Shader-hostable coordinate mapping functions.
//!
//! A [`ShaderFunction`] is the GPU-side counterpart of a
//! [`Transform`](crate::Transform) mapping. It carries a WGSL function body
//! and the parameter values that body reads, so the renderer can link it into
//! a program under a template placeholder (e.g. `$map_canvas_to_local`) and
//! upload the parameters every frame without recompiling.
//!
//! Snippet bodies see the input position as `p: vec4<f32>` and must `return`
//! a `vec4<f32>`. Parameters are referenced as `$0`, `$1`, ... and resolved
//! to uniform slots at link time.

use glam::Vec4;

/// Number of `vec4<f32>` parameter slots shared by all functions bound into
/// one program.
pub const MAX_FUNCTION_PARAMS: usize = 32;

/// A WGSL mapping `vec4<f32> -> vec4<f32>` plus its parameter values.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderFunction {
    /// A single function body.
    Snippet {
        /// Prefix for the generated WGSL function name.
        label: &'static str,
        /// WGSL statements; input is `p`, parameters are `$0`..`$n`.
        body: &'static str,
        /// Values for the parameter slots, in slot order.
        params: Vec<Vec4>,
    },
    /// Functions applied in sequence, first element first.
    Chain(Vec<ShaderFunction>),
}

impl ShaderFunction {
    /// Creates a snippet function.
    pub fn snippet(label: &'static str, body: &'static str, params: Vec<Vec4>) -> Self {
        Self::Snippet {
            label,
            body,
            params,
        }
    }

    /// The identity mapping.
    pub fn identity() -> Self {
        Self::snippet("identity", "return p;", Vec::new())
    }

    /// Total number of parameter slots used by this function and its children.
    pub fn param_count(&self) -> usize {
        match self {
            Self::Snippet { params, .. } => params.len(),
            Self::Chain(functions) => functions.iter().map(Self::param_count).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_has_no_params() {
        assert_eq!(ShaderFunction::identity().param_count(), 0);
    }

    #[test]
    fn test_param_count_sums_chain() {
        let a = ShaderFunction::snippet("a", "return p * $0;", vec![Vec4::ONE]);
        let b = ShaderFunction::snippet("b", "return p + $0 + $1;", vec![Vec4::X, Vec4::Y]);
        let chain = ShaderFunction::Chain(vec![a, ShaderFunction::Chain(vec![b])]);
        assert_eq!(chain.param_count(), 3);
    }
}
