use glam::Mat4;

use crate::config::WaveConfig;
use crate::demos::textures::{rgba_texture, sea_color_gradient};
use crate::demos::{Demo, DemoKey, FrameInput, aspect_ratio};
use crate::error::SetupResult;
use crate::frame::{ComputeStep, FramePlan, SimulationContext, SimulationMode};
use crate::gpu::{GpuBuffer, ResourceAllocator};
use crate::meshes::PlaneMesh;
use crate::params::{
    GerstnerWavesUniform, SceneClock, SceneUniform, UniformBuffer, WaveParams, plane_model_matrix,
};
use crate::pipeline::GerstnerPipeline;
use crate::pipeline::gerstner::DEPTH_FORMAT;
use crate::rendering::OrbitCamera;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.3,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

const SEA_COLOR_WIDTH: u32 = 256;

/// Multisampled color and depth targets matching the surface size
struct Attachments {
    multisampled: Option<wgpu::TextureView>,
    depth: wgpu::TextureView,
}

impl Attachments {
    fn new(
        allocator: &ResourceAllocator<'_>,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> SetupResult<Self> {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let target = |label: &'static str, format: wgpu::TextureFormat| {
            allocator
                .texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size,
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .map(|texture| texture.create_view(&wgpu::TextureViewDescriptor::default()))
        };

        let multisampled = if sample_count > 1 {
            Some(target("Gerstner Multisampled Framebuffer", format)?)
        } else {
            None
        };
        Ok(Self {
            multisampled,
            depth: target("Gerstner Depth Buffer", DEPTH_FORMAT)?,
        })
    }
}

/// Ocean surface displaced per vertex by a sum of Gerstner waves.
pub struct GerstnerWavesDemo {
    config: WaveConfig,
    context: SimulationContext,
    camera: OrbitCamera,
    clock: SceneClock,
    wave_params: WaveParams,
    model: Mat4,
    aspect_ratio: f32,
    surface_format: wgpu::TextureFormat,
    index_count: u32,

    // Declaration order is release order
    uniforms_bind_group: wgpu::BindGroup,
    textures_bind_group: wgpu::BindGroup,
    pipeline: GerstnerPipeline,
    attachments: Attachments,
    _sampler: wgpu::Sampler,
    _sea_color: wgpu::TextureView,
    scene_buffer: UniformBuffer<SceneUniform>,
    waves_buffer: UniformBuffer<GerstnerWavesUniform>,
    vertex_buffer: GpuBuffer,
    index_buffer: GpuBuffer,
}

impl GerstnerWavesDemo {
    pub fn new(
        allocator: &ResourceAllocator<'_>,
        surface_format: wgpu::TextureFormat,
        size: (u32, u32),
        config: WaveConfig,
    ) -> SetupResult<Self> {
        config.validate()?;

        let mesh = PlaneMesh::new(
            config.plane_width,
            config.plane_height,
            config.plane_rows,
            config.plane_columns,
        );
        let vertex_buffer = allocator.buffer_init(
            "Gerstner Plane Vertices",
            bytemuck::cast_slice(&mesh.vertices),
            wgpu::BufferUsages::VERTEX,
        )?;
        let index_buffer = allocator.buffer_init(
            "Gerstner Plane Indices",
            bytemuck::cast_slice(&mesh.indices),
            wgpu::BufferUsages::INDEX,
        )?;

        let model = plane_model_matrix(mesh.width, mesh.height);
        let camera = OrbitCamera::new(config.orbit_radius);
        let aspect_ratio = aspect_ratio(size.0, size.1);

        let mut wave_params = WaveParams::new(&config.waves);
        let scene = SceneUniform::new(0.0, model, Mat4::IDENTITY, camera.view_position());
        let scene_buffer = UniformBuffer::new(allocator, "Gerstner Scene Uniforms", &scene)?;
        let waves_buffer =
            UniformBuffer::new(allocator, "Gerstner Wave Params", wave_params.update())?;

        let sea_color = rgba_texture(
            allocator,
            "Sea Color",
            SEA_COLOR_WIDTH,
            1,
            wgpu::TextureUsages::TEXTURE_BINDING,
            &sea_color_gradient(SEA_COLOR_WIDTH),
        )?
        .create_view(&wgpu::TextureViewDescriptor::default());

        // Nearest filtering everywhere, as the non-filtering binding requires
        let sampler = allocator.sampler(&wgpu::SamplerDescriptor {
            label: Some("Sea Color Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        })?;

        let pipeline = GerstnerPipeline::new(allocator, surface_format, config.sample_count)?;
        let uniforms_bind_group =
            pipeline.uniforms_bind_group(allocator, scene_buffer.buffer(), waves_buffer.buffer())?;
        let textures_bind_group = pipeline.textures_bind_group(allocator, &sampler, &sea_color)?;
        let attachments =
            Attachments::new(allocator, surface_format, size.0, size.1, config.sample_count)?;

        log::info!(
            "Gerstner waves demo ready: {} waves, {} indices, {}x MSAA",
            config.waves.len(),
            mesh.index_count(),
            config.sample_count
        );

        Ok(Self {
            context: SimulationContext::new(),
            camera,
            clock: SceneClock::default(),
            wave_params,
            model,
            aspect_ratio,
            surface_format,
            index_count: mesh.index_count(),
            uniforms_bind_group,
            textures_bind_group,
            pipeline,
            attachments,
            _sampler: sampler,
            _sea_color: sea_color,
            scene_buffer,
            waves_buffer,
            vertex_buffer,
            index_buffer,
            config,
        })
    }

    fn view_projection(&self) -> Mat4 {
        let projection = Mat4::perspective_rh(
            self.config.fov_y_degrees.to_radians(),
            self.aspect_ratio,
            self.config.near,
            self.config.far,
        );
        projection * self.camera.view_matrix()
    }
}

impl Demo for GerstnerWavesDemo {
    fn name(&self) -> &str {
        "Gerstner Waves"
    }

    fn description(&self) -> &str {
        "Analytic ocean surface displaced in the vertex shader"
    }

    fn context(&self) -> &SimulationContext {
        &self.context
    }

    fn resize(
        &mut self,
        allocator: &ResourceAllocator<'_>,
        width: u32,
        height: u32,
    ) -> SetupResult<()> {
        self.aspect_ratio = aspect_ratio(width, height);
        self.attachments = Attachments::new(
            allocator,
            self.surface_format,
            width,
            height,
            self.pipeline.sample_count(),
        )?;
        Ok(())
    }

    fn on_key(&mut self, _key: DemoKey) -> bool {
        false
    }

    fn prepare(&mut self, queue: &wgpu::Queue, input: &FrameInput) -> FramePlan {
        self.context.set_mode(SimulationMode::from_paused(input.paused));
        self.context.count_frame();
        self.camera.update(input.mouse_position, input.left_button);

        let elapsed = self.clock.advance(input.run_time, input.paused);
        let scene = SceneUniform::new(
            elapsed,
            self.model,
            self.view_projection(),
            self.camera.view_position(),
        );
        self.scene_buffer.write(queue, &scene);
        self.waves_buffer.write(queue, self.wave_params.update());

        FramePlan::render_only()
    }

    fn record_compute(&self, _encoder: &mut wgpu::CommandEncoder, _step: &ComputeStep) {}

    fn record_render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        _plan: &FramePlan,
    ) {
        // Render into the multisampled target and resolve into the surface
        let (view, resolve_target) = match &self.attachments.multisampled {
            Some(multisampled) => (multisampled, Some(target)),
            None => (target, None),
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Gerstner Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.attachments.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        render_pass.set_pipeline(&self.pipeline.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.raw().slice(..));
        render_pass.set_index_buffer(self.index_buffer.raw().slice(..), wgpu::IndexFormat::Uint32);
        render_pass.set_bind_group(0, &self.uniforms_bind_group, &[]);
        render_pass.set_bind_group(1, &self.textures_bind_group, &[]);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
