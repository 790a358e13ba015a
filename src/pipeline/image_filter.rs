use crate::error::SetupResult;
use crate::gpu::{GpuBuffer, ResourceAllocator, check_binding_size};
use crate::meshes::QuadVertex;
use crate::params::{QuadUniform, UniformBuffer};
use crate::pipeline::{sampler_entry, texture_entry, uniform_entry};
use crate::shaders;

/// Format of the filter's output storage texture
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Compute entry points, in the order the filter index selects them
pub const FILTERS: [&str; 3] = ["emboss", "edgedetect", "sharpen"];

/// Next filter index, wrapping after the last one
pub fn next_filter(index: usize) -> usize {
    (index + 1) % FILTERS.len()
}

/// One compute pipeline per filter sharing a layout, plus the quad renderer.
pub struct ImageFilterPipelines {
    compute_pipelines: Vec<wgpu::ComputePipeline>,
    pub render_pipeline: wgpu::RenderPipeline,
    _compute_pipeline_layout: wgpu::PipelineLayout,
    _render_pipeline_layout: wgpu::PipelineLayout,
    pub compute_layout: wgpu::BindGroupLayout,
    pub render_layout: wgpu::BindGroupLayout,
}

impl ImageFilterPipelines {
    pub fn new(
        allocator: &ResourceAllocator<'_>,
        surface_format: wgpu::TextureFormat,
        workgroup_size: u32,
    ) -> SetupResult<Self> {
        let compute_layout = allocator.bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Image Filter Compute Bind Group Layout"),
            entries: &[
                // input image, read with textureLoad
                texture_entry(0, wgpu::ShaderStages::COMPUTE, false),
                // filtered output
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: TARGET_FORMAT,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
            ],
        })?;

        let render_layout = allocator.bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Image Filter Render Bind Group Layout"),
            entries: &[
                uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX,
                    UniformBuffer::<QuadUniform>::binding_size(),
                ),
                texture_entry(1, wgpu::ShaderStages::FRAGMENT, true),
                sampler_entry(2, wgpu::SamplerBindingType::Filtering),
            ],
        })?;

        let compute_pipeline_layout = allocator.pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Image Filter Compute Pipeline Layout"),
            bind_group_layouts: &[&compute_layout],
            push_constant_ranges: &[],
        })?;

        let render_pipeline_layout = allocator.pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Image Filter Render Pipeline Layout"),
            bind_group_layouts: &[&render_layout],
            push_constant_ranges: &[],
        })?;

        let compute_module =
            shaders::load(allocator, "image_filter", &[("WORKGROUP_SIZE", workgroup_size)])?;
        let compute_pipelines = FILTERS
            .iter()
            .map(|&entry_point| {
                allocator.compute_pipeline(&wgpu::ComputePipelineDescriptor {
                    label: Some(entry_point),
                    layout: Some(&compute_pipeline_layout),
                    module: &compute_module,
                    entry_point: Some(entry_point),
                    compilation_options: Default::default(),
                    cache: None,
                })
            })
            .collect::<SetupResult<Vec<_>>>()?;

        let render_module = shaders::load(allocator, "textured_quad", &[])?;
        let render_pipeline = allocator.render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Image Filter Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &render_module,
                entry_point: Some("vs_main"),
                buffers: &[QuadVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &render_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })?;

        Ok(Self {
            compute_pipelines,
            render_pipeline,
            _compute_pipeline_layout: compute_pipeline_layout,
            _render_pipeline_layout: render_pipeline_layout,
            compute_layout,
            render_layout,
        })
    }

    pub fn compute_pipeline(&self, filter: usize) -> &wgpu::ComputePipeline {
        &self.compute_pipelines[filter % self.compute_pipelines.len()]
    }

    pub fn compute_bind_group(
        &self,
        allocator: &ResourceAllocator<'_>,
        input: &wgpu::TextureView,
        output: &wgpu::TextureView,
    ) -> SetupResult<wgpu::BindGroup> {
        allocator.bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Image Filter Compute Bind Group"),
            layout: &self.compute_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(input),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(output),
                },
            ],
        })
    }

    /// Bind group drawing `image` on the quad. Built once for the source image
    /// and once for the filtered target.
    pub fn render_bind_group(
        &self,
        allocator: &ResourceAllocator<'_>,
        label: &'static str,
        uniforms: &GpuBuffer,
        image: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> SetupResult<wgpu::BindGroup> {
        check_binding_size(
            uniforms.label(),
            UniformBuffer::<QuadUniform>::binding_size(),
            uniforms.size(),
        )?;
        allocator.bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.render_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(image),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }
}
