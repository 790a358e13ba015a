use crate::error::SetupResult;
use crate::gpu::{GpuBuffer, ResourceAllocator, check_binding_size};
use crate::meshes::PlaneVertex;
use crate::params::{GerstnerWavesUniform, SceneUniform, UniformBuffer};
use crate::pipeline::{sampler_entry, texture_entry, uniform_entry};
use crate::shaders;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Render pipeline for the wave surface: scene and wave uniforms in group 0,
/// sea color sampler and texture in group 1.
pub struct GerstnerPipeline {
    pub pipeline: wgpu::RenderPipeline,
    _pipeline_layout: wgpu::PipelineLayout,
    pub uniforms_layout: wgpu::BindGroupLayout,
    pub textures_layout: wgpu::BindGroupLayout,
    sample_count: u32,
}

impl GerstnerPipeline {
    pub fn new(
        allocator: &ResourceAllocator<'_>,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> SetupResult<Self> {
        let shared = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let uniforms_layout = allocator.bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Gerstner Uniforms Bind Group Layout"),
            entries: &[
                uniform_entry(0, shared, UniformBuffer::<SceneUniform>::binding_size()),
                uniform_entry(1, shared, UniformBuffer::<GerstnerWavesUniform>::binding_size()),
            ],
        })?;

        let textures_layout = allocator.bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Gerstner Textures Bind Group Layout"),
            entries: &[
                sampler_entry(0, wgpu::SamplerBindingType::NonFiltering),
                texture_entry(1, wgpu::ShaderStages::FRAGMENT, true),
            ],
        })?;

        let pipeline_layout = allocator.pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Gerstner Pipeline Layout"),
            bind_group_layouts: &[&uniforms_layout, &textures_layout],
            push_constant_ranges: &[],
        })?;

        let module = shaders::load(allocator, "gerstner_waves", &[])?;

        let pipeline = allocator.render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Gerstner Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vertex_main"),
                buffers: &[PlaneVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fragment_main"),
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
            // Closest fragment wins
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })?;

        Ok(Self {
            pipeline,
            _pipeline_layout: pipeline_layout,
            uniforms_layout,
            textures_layout,
            sample_count,
        })
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn uniforms_bind_group(
        &self,
        allocator: &ResourceAllocator<'_>,
        scene: &GpuBuffer,
        waves: &GpuBuffer,
    ) -> SetupResult<wgpu::BindGroup> {
        check_binding_size(
            scene.label(),
            UniformBuffer::<SceneUniform>::binding_size(),
            scene.size(),
        )?;
        check_binding_size(
            waves.label(),
            UniformBuffer::<GerstnerWavesUniform>::binding_size(),
            waves.size(),
        )?;
        allocator.bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Gerstner Uniforms Bind Group"),
            layout: &self.uniforms_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: waves.as_entire_binding(),
                },
            ],
        })
    }

    pub fn textures_bind_group(
        &self,
        allocator: &ResourceAllocator<'_>,
        sampler: &wgpu::Sampler,
        sea_color: &wgpu::TextureView,
    ) -> SetupResult<wgpu::BindGroup> {
        allocator.bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Gerstner Textures Bind Group"),
            layout: &self.textures_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(sea_color),
                },
            ],
        })
    }
}
