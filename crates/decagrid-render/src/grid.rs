//! Grid visual.
//!
//! Draws a full-viewport quad whose fragment shader classifies every pixel
//! against the decade grid of the visual's local coordinates. The canvas and
//! local mappings are pulled from the frame's [`TransformContext`] on each
//! draw and linked into the program as shader functions.

use std::sync::OnceLock;

use decagrid_core::{CoordinateSpace, GridScale, TransformContext};

use crate::buffer::{create_uniform_buffer, create_vertex_buffer, update_buffer};
use crate::error::{capture_errors, RenderError, RenderResult};
use crate::shader::{
    FunctionParams, LinkedShader, ShaderBuilder, ShaderProgram, FUNCTION_PARAMS_BINDING,
};
use crate::RenderContext;

/// WGSL source of the grid program.
pub const GRID_SHADER: &str = include_str!("shaders/grid.wgsl");

/// Placeholder bound to the NDC-to-canvas mapping.
pub const MAP_ND_TO_CANVAS: &str = "map_nd_to_canvas";

/// Placeholder bound to the canvas-to-local mapping.
pub const MAP_CANVAS_TO_LOCAL: &str = "map_canvas_to_local";

/// Two triangles covering clip space.
pub const QUAD_VERTICES: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

/// GPU representation of grid uniforms.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GridUniforms {
    pub scale: [f32; 2],
    pub _padding: [f32; 2],
}

impl From<GridScale> for GridUniforms {
    fn from(scale: GridScale) -> Self {
        Self {
            scale: scale.as_vec2().to_array(),
            _padding: [0.0; 2],
        }
    }
}

/// Grid render resources.
pub struct GridVisual {
    scale: GridScale,
    target_format: wgpu::TextureFormat,
    quad: OnceLock<wgpu::Buffer>,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    params_buffer: wgpu::Buffer,
    program: Option<ShaderProgram>,
}

impl GridVisual {
    /// Creates a grid drawing into targets of `target_format`.
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat, scale: GridScale) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Grid Bind Group Layout"),
            entries: &[uniform_entry(0), uniform_entry(FUNCTION_PARAMS_BINDING)],
        });

        let uniform_buffer = create_uniform_buffer(
            device,
            &GridUniforms::from(scale),
            Some("Grid Uniform Buffer"),
        );
        let params_buffer = create_uniform_buffer(
            device,
            &<FunctionParams as bytemuck::Zeroable>::zeroed(),
            Some("Grid Function Params Buffer"),
        );

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Grid Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: FUNCTION_PARAMS_BINDING,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        log::debug!("created grid visual with scale {:?}", scale.as_vec2());

        Self {
            scale,
            target_format,
            quad: OnceLock::new(),
            bind_group_layout,
            bind_group,
            params_buffer,
            program: None,
        }
    }

    /// The spacing multiplier this grid was created with.
    pub fn scale(&self) -> GridScale {
        self.scale
    }

    /// The shared full-viewport quad, created on first use.
    pub fn quad(&self, device: &wgpu::Device) -> RenderResult<&wgpu::Buffer> {
        if let Some(quad) = self.quad.get() {
            return Ok(quad);
        }
        let buffer = create_vertex_buffer(device, &QUAD_VERTICES, Some("Grid Quad"))?;
        Ok(self.quad.get_or_init(|| buffer))
    }

    /// Links the grid template against the context's current mappings.
    pub fn link(transforms: &dyn TransformContext) -> RenderResult<LinkedShader> {
        let nd_to_canvas = transforms
            .entity_transform(CoordinateSpace::Canvas, CoordinateSpace::Ndc)
            .shader_imap();
        let canvas_to_local = transforms.canvas_transform().shader_imap();

        ShaderBuilder::new()
            .with_label("Grid Shader")
            .with_vertex(GRID_SHADER)
            .with_fragment(GRID_SHADER)
            .with_function(MAP_ND_TO_CANVAS, nd_to_canvas)
            .with_function(MAP_CANVAS_TO_LOCAL, canvas_to_local)
            .link()
    }

    /// Draws the grid over the current contents of `ctx.view`.
    pub fn draw(&mut self, ctx: &mut RenderContext) -> RenderResult<()> {
        let linked = Self::link(ctx.transforms)?;

        let stale = self
            .program
            .as_ref()
            .map_or(true, |program| program.source != linked.source);
        if stale {
            log::debug!(
                "building grid program ({} parameter slots)",
                linked.params.len()
            );
            self.program = Some(self.create_program(ctx.device, &linked)?);
        }
        update_buffer(ctx.queue, &self.params_buffer, &linked.param_block());

        let quad = self.quad(ctx.device)?;
        let Some(program) = self.program.as_ref() else {
            return Err(RenderError::PipelineCreationFailed(
                "grid program missing".into(),
            ));
        };

        let mut render_pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Grid Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: ctx.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&program.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, quad.slice(..));
        render_pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);

        Ok(())
    }

    fn create_program(
        &self,
        device: &wgpu::Device,
        linked: &LinkedShader,
    ) -> RenderResult<ShaderProgram> {
        let shader = linked.create_module(device)?;

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Grid Pipeline Layout"),
            bind_group_layouts: &[&self.bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = capture_errors(device, wgpu::ErrorFilter::Validation, || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Grid Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(linked.vertex_entry.as_str()),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                    }],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(linked.fragment_entry.as_str()),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.target_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        })
        .map_err(|error| RenderError::PipelineCreationFailed(error.to_string()))?;

        Ok(ShaderProgram {
            pipeline,
            source: linked.source.clone(),
        })
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}
