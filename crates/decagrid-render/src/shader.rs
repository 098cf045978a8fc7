//! Shader management.
//!
//! Program sources are WGSL templates. A `$name` placeholder in a stage
//! source is bound to a [`ShaderFunction`] with [`ShaderBuilder::with_function`].
//! Linking emits one WGSL function per snippet, rewrites every placeholder to
//! the generated name, and redirects the snippets' `$k` parameters to slots of
//! a shared uniform array. Swapping parameter values therefore never changes
//! the linked source; only a different function structure does.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use decagrid_core::{ShaderFunction, MAX_FUNCTION_PARAMS};
use glam::Vec4;

use crate::error::{capture_errors, RenderError, RenderResult};

/// Binding index of the function parameter block in group 0.
pub const FUNCTION_PARAMS_BINDING: u32 = 1;

/// GPU layout of the function parameter block.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FunctionParams {
    /// Parameter slots, assigned in link order.
    pub slots: [[f32; 4]; MAX_FUNCTION_PARAMS],
}

/// A compiled shader program.
pub struct ShaderProgram {
    /// The render pipeline.
    pub pipeline: wgpu::RenderPipeline,
    /// The linked source the pipeline was built from.
    pub source: String,
}

/// The output of linking a template.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedShader {
    /// Label for debugging.
    pub label: Option<String>,
    /// Complete WGSL source with all placeholders resolved.
    pub source: String,
    /// Vertex shader entry point.
    pub vertex_entry: String,
    /// Fragment shader entry point.
    pub fragment_entry: String,
    /// Parameter values in slot order.
    pub params: Vec<Vec4>,
}

impl LinkedShader {
    /// Packs the parameter values into the uniform layout.
    pub fn param_block(&self) -> FunctionParams {
        let mut block: FunctionParams = bytemuck::Zeroable::zeroed();
        for (slot, value) in block.slots.iter_mut().zip(&self.params) {
            *slot = value.to_array();
        }
        block
    }

    /// Compiles the linked source into a shader module.
    pub fn create_module(&self, device: &wgpu::Device) -> RenderResult<wgpu::ShaderModule> {
        capture_errors(device, wgpu::ErrorFilter::Validation, || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: self.label.as_deref(),
                source: wgpu::ShaderSource::Wgsl(self.source.as_str().into()),
            })
        })
        .map_err(|error| RenderError::ShaderCompilationFailed(error.to_string()))
    }
}

/// Builder for creating shader programs.
pub struct ShaderBuilder {
    vertex_source: Option<String>,
    fragment_source: Option<String>,
    vertex_entry: String,
    fragment_entry: String,
    label: Option<String>,
    functions: BTreeMap<String, ShaderFunction>,
}

impl ShaderBuilder {
    /// Creates a new shader builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertex_source: None,
            fragment_source: None,
            vertex_entry: "vs_main".to_string(),
            fragment_entry: "fs_main".to_string(),
            label: None,
            functions: BTreeMap::new(),
        }
    }

    /// Sets the vertex shader source (WGSL).
    pub fn with_vertex(mut self, source: impl Into<String>) -> Self {
        self.vertex_source = Some(source.into());
        self
    }

    /// Sets the fragment shader source (WGSL).
    pub fn with_fragment(mut self, source: impl Into<String>) -> Self {
        self.fragment_source = Some(source.into());
        self
    }

    /// Sets the vertex shader entry point.
    pub fn with_vertex_entry(mut self, entry: impl Into<String>) -> Self {
        self.vertex_entry = entry.into();
        self
    }

    /// Sets the fragment shader entry point.
    pub fn with_fragment_entry(mut self, entry: impl Into<String>) -> Self {
        self.fragment_entry = entry.into();
        self
    }

    /// Sets the shader label for debugging.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Binds `function` to the `$name` placeholder. Rebinding replaces the
    /// previous function.
    pub fn with_function(mut self, name: impl Into<String>, function: ShaderFunction) -> Self {
        self.functions.insert(name.into(), function);
        self
    }

    /// Resolves all placeholders and returns the complete program.
    pub fn link(&self) -> RenderResult<LinkedShader> {
        let stages = self.combined_source()?;

        let mut linker = FunctionLinker::default();
        let body = expand_placeholders(&stages, |name| {
            let function = self
                .functions
                .get(name)
                .ok_or_else(|| RenderError::UnboundShaderFunction(name.to_string()))?;
            linker.bind(name, function)
        })?;

        let mut source = params_header();
        source.push_str(&linker.definitions);
        source.push_str(&body);

        Ok(LinkedShader {
            label: self.label.clone(),
            source,
            vertex_entry: self.vertex_entry.clone(),
            fragment_entry: self.fragment_entry.clone(),
            params: linker.params,
        })
    }

    fn combined_source(&self) -> RenderResult<String> {
        let vertex = self
            .vertex_source
            .as_ref()
            .ok_or_else(|| RenderError::ShaderCompilationFailed("missing vertex shader".into()))?;

        let fragment = self.fragment_source.as_ref().ok_or_else(|| {
            RenderError::ShaderCompilationFailed("missing fragment shader".into())
        })?;

        // If sources are the same file, just return one
        if vertex == fragment {
            return Ok(vertex.clone());
        }

        // Otherwise combine them
        Ok(format!("{vertex}\n\n{fragment}"))
    }
}

impl Default for ShaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// WGSL declaration of [`FunctionParams`] and its binding.
fn params_header() -> String {
    format!(
        "struct FunctionParams {{\n    slots: array<vec4<f32>, {MAX_FUNCTION_PARAMS}>,\n}}\n\n\
         @group(0) @binding({FUNCTION_PARAMS_BINDING}) var<uniform> fn_params: FunctionParams;\n\n"
    )
}

/// Emits generated functions and assigns parameter slots.
#[derive(Default)]
struct FunctionLinker {
    definitions: String,
    params: Vec<Vec4>,
    bound: HashMap<String, String>,
    next_id: usize,
}

impl FunctionLinker {
    /// Returns the generated name for the placeholder `name`, emitting the
    /// function on first use.
    fn bind(&mut self, name: &str, function: &ShaderFunction) -> RenderResult<String> {
        if let Some(generated) = self.bound.get(name) {
            return Ok(generated.clone());
        }
        let requested = self.params.len() + function.param_count();
        if requested > MAX_FUNCTION_PARAMS {
            return Err(RenderError::TooManyShaderParams {
                requested,
                available: MAX_FUNCTION_PARAMS,
            });
        }
        let generated = self.emit(function)?;
        self.bound.insert(name.to_string(), generated.clone());
        Ok(generated)
    }

    fn emit(&mut self, function: &ShaderFunction) -> RenderResult<String> {
        match function {
            ShaderFunction::Snippet {
                label,
                body,
                params,
            } => {
                let offset = self.params.len();
                let body = expand_placeholders(body, |token| {
                    token
                        .parse::<usize>()
                        .ok()
                        .filter(|index| *index < params.len())
                        .map(|index| format!("fn_params.slots[{}]", offset + index))
                        .ok_or_else(|| RenderError::UnknownShaderParam {
                            function: (*label).to_string(),
                            index: token.to_string(),
                        })
                })?;
                self.params.extend_from_slice(params);
                let name = self.fresh_name(label);
                let _ = writeln!(
                    self.definitions,
                    "fn {name}(p: vec4<f32>) -> vec4<f32> {{\n    {body}\n}}\n"
                );
                Ok(name)
            }
            ShaderFunction::Chain(functions) => {
                let mut steps = Vec::with_capacity(functions.len());
                for function in functions {
                    steps.push(self.emit(function)?);
                }
                let name = self.fresh_name("chain");
                let mut expr = "p".to_string();
                for step in &steps {
                    expr = format!("{step}({expr})");
                }
                let _ = writeln!(
                    self.definitions,
                    "fn {name}(p: vec4<f32>) -> vec4<f32> {{\n    return {expr};\n}}\n"
                );
                Ok(name)
            }
        }
    }

    fn fresh_name(&mut self, label: &str) -> String {
        let name = format!("mapping_{}_{label}", self.next_id);
        self.next_id += 1;
        name
    }
}

/// Replaces every `$token` (a run of ASCII alphanumerics and underscores)
/// with the value returned by `resolve`.
fn expand_placeholders(
    template: &str,
    mut resolve: impl FnMut(&str) -> RenderResult<String>,
) -> RenderResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if len == 0 {
            return Err(RenderError::ShaderCompilationFailed(
                "'$' without a placeholder name".into(),
            ));
        }
        out.push_str(&resolve(&after[..len])?);
        rest = &after[len..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "fn f(p: vec4<f32>) -> vec4<f32> { return $warp($warp(p)); }";

    fn scale_by(v: Vec4) -> ShaderFunction {
        ShaderFunction::snippet("scale", "return p * $0;", vec![v])
    }

    #[test]
    fn test_link_resolves_placeholder() {
        let linked = ShaderBuilder::new()
            .with_vertex(TEMPLATE)
            .with_fragment(TEMPLATE)
            .with_function("warp", scale_by(Vec4::splat(2.0)))
            .link()
            .unwrap();

        assert!(!linked.source.contains('$'));
        assert!(linked.source.contains("return mapping_0_scale(mapping_0_scale(p));"));
        assert!(linked.source.contains("return p * fn_params.slots[0];"));
        // The same placeholder used twice is emitted once.
        assert_eq!(linked.source.matches("fn mapping_0_scale").count(), 1);
        assert_eq!(linked.params, vec![Vec4::splat(2.0)]);
    }

    #[test]
    fn test_params_do_not_change_source() {
        let link = |v| {
            ShaderBuilder::new()
                .with_vertex(TEMPLATE)
                .with_fragment(TEMPLATE)
                .with_function("warp", scale_by(v))
                .link()
                .unwrap()
        };
        let a = link(Vec4::ONE);
        let b = link(Vec4::new(3.0, 4.0, 5.0, 1.0));
        assert_eq!(a.source, b.source);
        assert_ne!(a.params, b.params);
        assert_eq!(b.param_block().slots[0], [3.0, 4.0, 5.0, 1.0]);
        assert_eq!(b.param_block().slots[1], [0.0; 4]);
    }

    #[test]
    fn test_chain_offsets_params() {
        let template = "fn f(p: vec4<f32>) -> vec4<f32> { return $a($b(p)); }";
        let chain = ShaderFunction::Chain(vec![
            scale_by(Vec4::X),
            ShaderFunction::snippet("shift", "return p + $0 - $1;", vec![Vec4::Y, Vec4::Z]),
        ]);
        let linked = ShaderBuilder::new()
            .with_vertex(template)
            .with_fragment(template)
            .with_function("a", scale_by(Vec4::W))
            .with_function("b", chain)
            .link()
            .unwrap();

        // $a is linked first and takes slot 0.
        assert_eq!(linked.params, vec![Vec4::W, Vec4::X, Vec4::Y, Vec4::Z]);
        assert!(linked.source.contains("return p * fn_params.slots[1];"));
        assert!(linked
            .source
            .contains("return p + fn_params.slots[2] - fn_params.slots[3];"));
        assert!(linked
            .source
            .contains("return mapping_2_shift(mapping_1_scale(p));"));
    }

    #[test]
    fn test_unbound_placeholder() {
        let err = ShaderBuilder::new()
            .with_vertex(TEMPLATE)
            .with_fragment(TEMPLATE)
            .link()
            .unwrap_err();
        assert!(matches!(err, RenderError::UnboundShaderFunction(name) if name == "warp"));
    }

    #[test]
    fn test_unknown_param() {
        let err = ShaderBuilder::new()
            .with_vertex(TEMPLATE)
            .with_fragment(TEMPLATE)
            .with_function(
                "warp",
                ShaderFunction::snippet("bad", "return p * $1;", vec![Vec4::ONE]),
            )
            .link()
            .unwrap_err();
        assert!(matches!(err, RenderError::UnknownShaderParam { index, .. } if index == "1"));
    }

    #[test]
    fn test_too_many_params() {
        let wide = ShaderFunction::snippet(
            "wide",
            "return p;",
            vec![Vec4::ZERO; MAX_FUNCTION_PARAMS + 1],
        );
        let err = ShaderBuilder::new()
            .with_vertex(TEMPLATE)
            .with_fragment(TEMPLATE)
            .with_function("warp", wide)
            .link()
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::TooManyShaderParams { requested, .. } if requested == MAX_FUNCTION_PARAMS + 1
        ));
    }

    #[test]
    fn test_too_many_params_across_functions() {
        let template = "fn f(p: vec4<f32>) -> vec4<f32> { return $a($b(p)); }";
        let half = ShaderFunction::snippet(
            "half",
            "return p;",
            vec![Vec4::ZERO; MAX_FUNCTION_PARAMS / 2 + 1],
        );
        let err = ShaderBuilder::new()
            .with_vertex(template)
            .with_fragment(template)
            .with_function("a", half.clone())
            .with_function("b", half)
            .link()
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::TooManyShaderParams { requested, available }
                if requested == 2 * (MAX_FUNCTION_PARAMS / 2 + 1) && available == MAX_FUNCTION_PARAMS
        ));
    }

    #[test]
    fn test_params_header_matches_layout() {
        let header = params_header();
        assert!(header.contains(&format!("array<vec4<f32>, {MAX_FUNCTION_PARAMS}>")));
        assert!(header.contains(&format!("@binding({FUNCTION_PARAMS_BINDING})")));
        assert_eq!(
            std::mem::size_of::<FunctionParams>(),
            MAX_FUNCTION_PARAMS * std::mem::size_of::<[f32; 4]>()
        );
    }

    #[test]
    fn test_missing_stage() {
        let err = ShaderBuilder::new().with_vertex(TEMPLATE).link().unwrap_err();
        assert!(matches!(err, RenderError::ShaderCompilationFailed(_)));
    }

    #[test]
    fn test_distinct_stages_are_concatenated() {
        let linked = ShaderBuilder::new()
            .with_vertex("// vertex")
            .with_fragment("// fragment")
            .with_vertex_entry("main_v")
            .with_fragment_entry("main_f")
            .link()
            .unwrap();
        assert!(linked.source.ends_with("// vertex\n\n// fragment"));
        assert_eq!(linked.vertex_entry, "main_v");
        assert_eq!(linked.fragment_entry, "main_f");
        assert!(linked.params.is_empty());
    }
}
