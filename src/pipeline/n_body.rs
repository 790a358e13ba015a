use crate::error::SetupResult;
use crate::gpu::{GpuBuffer, ResourceAllocator, check_binding_size};
use crate::params::{RenderParamsUniform, UniformBuffer};
use crate::pipeline::uniform_entry;
use crate::shaders;
use crate::simulation::types::ELEMENT_STRIDE;

const BODY_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x4];

/// Positions are bound per instance, one `vec4<f32>` per body.
pub const BODY_VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: ELEMENT_STRIDE,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &BODY_ATTRIBUTES,
};

/// Vertices emitted per body: two triangles forming a camera-facing quad
pub const VERTICES_PER_BODY: u32 = 6;

const ADDITIVE_BLENDING: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

fn storage_entry(
    binding: u32,
    read_only: bool,
    min_binding_size: Option<wgpu::BufferSize>,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size,
        },
        count: None,
    }
}

/// Layouts and pipelines for the n-body compute and render passes.
///
/// Everything here is created once at setup and never changes afterwards.
/// Fields drop in declaration order, pipelines ahead of the layouts they were built from.
pub struct NBodyPipelines {
    pub compute_pipeline: wgpu::ComputePipeline,
    pub render_pipeline: wgpu::RenderPipeline,
    _compute_pipeline_layout: wgpu::PipelineLayout,
    _render_pipeline_layout: wgpu::PipelineLayout,
    pub compute_bind_group_layout: wgpu::BindGroupLayout,
    pub render_bind_group_layout: wgpu::BindGroupLayout,
    min_body_binding: Option<wgpu::BufferSize>,
}

impl NBodyPipelines {
    pub fn new(
        allocator: &ResourceAllocator<'_>,
        surface_format: wgpu::TextureFormat,
        body_count: u32,
        workgroup_size: u32,
    ) -> SetupResult<Self> {
        // Every body buffer must hold at least `body_count` elements
        let min_body_binding = wgpu::BufferSize::new(ELEMENT_STRIDE * body_count as u64);

        let compute_bind_group_layout =
            allocator.bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("N-Body Compute Bind Group Layout"),
                entries: &[
                    // positions_in
                    storage_entry(0, true, min_body_binding),
                    // positions_out
                    storage_entry(1, false, min_body_binding),
                    // velocities
                    storage_entry(2, false, min_body_binding),
                ],
            })?;

        let render_bind_group_layout =
            allocator.bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("N-Body Render Bind Group Layout"),
                entries: &[
                    // render_params
                    uniform_entry(
                        0,
                        wgpu::ShaderStages::VERTEX,
                        UniformBuffer::<RenderParamsUniform>::binding_size(),
                    ),
                ],
            })?;

        let compute_pipeline_layout = allocator.pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("N-Body Compute Pipeline Layout"),
            bind_group_layouts: &[&compute_bind_group_layout],
            push_constant_ranges: &[],
        })?;

        let render_pipeline_layout = allocator.pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("N-Body Render Pipeline Layout"),
            bind_group_layouts: &[&render_bind_group_layout],
            push_constant_ranges: &[],
        })?;

        let compute_module =
            shaders::load(allocator, "n_body", &[("WORKGROUP_SIZE", workgroup_size)])?;
        let render_module = shaders::load(allocator, "n_body_render", &[])?;

        let compute_pipeline = allocator.compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("N-Body Compute Pipeline"),
            layout: Some(&compute_pipeline_layout),
            module: &compute_module,
            entry_point: Some("cs_main"),
            compilation_options: Default::default(),
            cache: None,
        })?;

        let render_pipeline = allocator.render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("N-Body Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &render_module,
                entry_point: Some("vs_main"),
                buffers: &[BODY_VERTEX_LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &render_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(ADDITIVE_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })?;

        Ok(Self {
            compute_pipeline,
            render_pipeline,
            _compute_pipeline_layout: compute_pipeline_layout,
            _render_pipeline_layout: render_pipeline_layout,
            compute_bind_group_layout,
            render_bind_group_layout,
            min_body_binding,
        })
    }

    /// Minimum size the compute layout declares for each body buffer
    pub fn min_body_binding(&self) -> Option<wgpu::BufferSize> {
        self.min_body_binding
    }

    pub fn render_bind_group(
        &self,
        allocator: &ResourceAllocator<'_>,
        render_params: &GpuBuffer,
    ) -> SetupResult<wgpu::BindGroup> {
        check_binding_size(
            render_params.label(),
            UniformBuffer::<RenderParamsUniform>::binding_size(),
            render_params.size(),
        )?;
        allocator.bind_group(&wgpu::BindGroupDescriptor {
            label: Some("N-Body Render Bind Group"),
            layout: &self.render_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: render_params.as_entire_binding(),
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_vertex_layout_is_one_vec4_per_instance() {
        assert_eq!(BODY_VERTEX_LAYOUT.array_stride, 16);
        assert_eq!(BODY_VERTEX_LAYOUT.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(BODY_VERTEX_LAYOUT.attributes.len(), 1);
        assert_eq!(BODY_VERTEX_LAYOUT.attributes[0].format, wgpu::VertexFormat::Float32x4);
    }

    #[test]
    fn blending_is_additive() {
        assert_eq!(ADDITIVE_BLENDING.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(ADDITIVE_BLENDING.color.dst_factor, wgpu::BlendFactor::One);
    }
}
