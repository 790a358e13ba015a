use crate::config::ImageFilterConfig;
use crate::demos::textures::{rgba_texture, source_image};
use crate::demos::{Demo, DemoKey, FrameInput, aspect_ratio};
use crate::error::SetupResult;
use crate::frame::{
    ComputeStep, FramePlan, FrameScheduler, SchedulePolicy, SimulationContext, workgroup_count,
};
use crate::gpu::{GpuBuffer, ResourceAllocator};
use crate::meshes::{QUAD_INDICES, QUAD_VERTICES};
use crate::params::{QuadUniform, UniformBuffer};
use crate::pipeline::ImageFilterPipelines;
use crate::pipeline::image_filter::{FILTERS, TARGET_FORMAT, next_filter};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.025,
    g: 0.025,
    b: 0.025,
    a: 1.0,
};

/// Runs a 3x3 convolution over an image every frame and shows the source on
/// the left half of the window and the result on the right.
pub struct ImageFilterDemo {
    config: ImageFilterConfig,
    context: SimulationContext,
    scheduler: FrameScheduler,
    filter: usize,
    viewport: (f32, f32),

    // Declaration order is release order
    compute_bind_group: wgpu::BindGroup,
    pre_compute_bind_group: wgpu::BindGroup,
    post_compute_bind_group: wgpu::BindGroup,
    pipelines: ImageFilterPipelines,
    _sampler: wgpu::Sampler,
    _source: wgpu::TextureView,
    _target: wgpu::TextureView,
    uniform_buffer: UniformBuffer<QuadUniform>,
    vertex_buffer: GpuBuffer,
    index_buffer: GpuBuffer,
}

impl ImageFilterDemo {
    pub fn new(
        allocator: &ResourceAllocator<'_>,
        surface_format: wgpu::TextureFormat,
        size: (u32, u32),
        config: ImageFilterConfig,
    ) -> SetupResult<Self> {
        config.validate()?;
        let image_size = config.image_size;

        let source = rgba_texture(
            allocator,
            "Filter Source Image",
            image_size,
            image_size,
            wgpu::TextureUsages::TEXTURE_BINDING,
            &source_image(image_size),
        )?
        .create_view(&wgpu::TextureViewDescriptor::default());

        let target = allocator
            .texture(&wgpu::TextureDescriptor {
                label: Some("Filter Target"),
                size: wgpu::Extent3d {
                    width: image_size,
                    height: image_size,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: TARGET_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::STORAGE_BINDING,
                view_formats: &[],
            })?
            .create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = allocator.sampler(&wgpu::SamplerDescriptor {
            label: Some("Filter Quad Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        })?;

        let vertex_buffer = allocator.buffer_init(
            "Filter Quad Vertices",
            bytemuck::cast_slice(&QUAD_VERTICES),
            wgpu::BufferUsages::VERTEX,
        )?;
        let index_buffer = allocator.buffer_init(
            "Filter Quad Indices",
            bytemuck::cast_slice(&QUAD_INDICES),
            wgpu::BufferUsages::INDEX,
        )?;

        let uniform = QuadUniform::new(config.fov_y_degrees, half_aspect_ratio(size), config.eye);
        let uniform_buffer = UniformBuffer::new(allocator, "Filter Quad Uniforms", &uniform)?;

        let pipelines =
            ImageFilterPipelines::new(allocator, surface_format, config.workgroup_size)?;
        let compute_bind_group = pipelines.compute_bind_group(allocator, &source, &target)?;
        let pre_compute_bind_group = pipelines.render_bind_group(
            allocator,
            "Filter Pre-Compute Bind Group",
            uniform_buffer.buffer(),
            &source,
            &sampler,
        )?;
        let post_compute_bind_group = pipelines.render_bind_group(
            allocator,
            "Filter Post-Compute Bind Group",
            uniform_buffer.buffer(),
            &target,
            &sampler,
        )?;

        let groups = workgroup_count(image_size, config.workgroup_size);
        log::info!(
            "Image filter demo ready: {image_size}x{image_size} image, {groups}x{groups} workgroups"
        );

        Ok(Self {
            config,
            context: SimulationContext::new(),
            scheduler: FrameScheduler::new(SchedulePolicy::EveryFrame, [groups, groups, 1]),
            filter: 0,
            viewport: (size.0.max(1) as f32, size.1.max(1) as f32),
            compute_bind_group,
            pre_compute_bind_group,
            post_compute_bind_group,
            pipelines,
            _sampler: sampler,
            _source: source,
            _target: target,
            uniform_buffer,
            vertex_buffer,
            index_buffer,
        })
    }

    pub fn filter(&self) -> usize {
        self.filter
    }

    pub fn filter_name(&self) -> &'static str {
        FILTERS[self.filter]
    }
}

/// Each quad is drawn into half the window width
fn half_aspect_ratio((width, height): (u32, u32)) -> f32 {
    aspect_ratio(width, height) * 0.5
}

impl Demo for ImageFilterDemo {
    fn name(&self) -> &str {
        "Compute Image Filter"
    }

    fn description(&self) -> &str {
        "Emboss, edge detect and sharpen kernels written to a storage texture"
    }

    fn context(&self) -> &SimulationContext {
        &self.context
    }

    fn resize(
        &mut self,
        _allocator: &ResourceAllocator<'_>,
        width: u32,
        height: u32,
    ) -> SetupResult<()> {
        self.viewport = (width.max(1) as f32, height.max(1) as f32);
        Ok(())
    }

    fn on_key(&mut self, key: DemoKey) -> bool {
        if key != DemoKey::NextFilter {
            return false;
        }
        self.filter = next_filter(self.filter);
        log::info!("Image filter switched to {}", self.filter_name());
        true
    }

    // The filter runs every frame, so pausing never reaches this context
    fn prepare(&mut self, queue: &wgpu::Queue, _input: &FrameInput) -> FramePlan {
        let (width, height) = self.viewport;
        let uniform =
            QuadUniform::new(self.config.fov_y_degrees, width * 0.5 / height, self.config.eye);
        self.uniform_buffer.write(queue, &uniform);
        self.scheduler.schedule(&mut self.context)
    }

    fn record_compute(&self, encoder: &mut wgpu::CommandEncoder, step: &ComputeStep) {
        let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Image Filter Compute Pass"),
            timestamp_writes: None,
        });
        compute_pass.set_pipeline(self.pipelines.compute_pipeline(self.filter));
        compute_pass.set_bind_group(0, &self.compute_bind_group, &[]);
        let [x, y, z] = step.workgroups;
        compute_pass.dispatch_workgroups(x, y, z);
    }

    fn record_render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        _plan: &FramePlan,
    ) {
        let (width, height) = self.viewport;
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Image Filter Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        render_pass.set_pipeline(&self.pipelines.render_pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.raw().slice(..));
        render_pass.set_index_buffer(self.index_buffer.raw().slice(..), wgpu::IndexFormat::Uint32);

        // Left half: source image
        render_pass.set_viewport(0.0, 0.0, width / 2.0, height, 0.0, 1.0);
        render_pass.set_bind_group(0, &self.pre_compute_bind_group, &[]);
        render_pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);

        // Right half: filter output
        render_pass.set_viewport(width / 2.0, 0.0, width / 2.0, height, 0.0, 1.0);
        render_pass.set_bind_group(0, &self.post_compute_bind_group, &[]);
        render_pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_covers_the_whole_image() {
        let config = ImageFilterConfig::default();
        let groups = workgroup_count(config.image_size, config.workgroup_size);
        assert_eq!(groups, 32);
        assert!(groups * config.workgroup_size >= config.image_size);
        assert_eq!(workgroup_count(500, 16), 32);
    }

    #[test]
    fn quads_use_half_the_window() {
        assert_eq!(half_aspect_ratio((1280, 640)), 1.0);
    }
}
