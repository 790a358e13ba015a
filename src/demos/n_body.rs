use glam::Mat4;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::NBodyConfig;
use crate::demos::{Demo, DemoKey, FrameInput, aspect_ratio};
use crate::error::SetupResult;
use crate::frame::{ComputeStep, FramePlan, FrameScheduler, SimulationContext, SimulationMode};
use crate::gpu::ResourceAllocator;
use crate::params::{RenderParams, RenderParamsUniform, UniformBuffer};
use crate::pipeline::n_body::VERTICES_PER_BODY;
use crate::pipeline::{NBodyPipelines, PingPongBindGroups};
use crate::simulation::{BodyLayout, SimulationStateStore};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.1,
    a: 1.0,
};

/// Brute-force gravity between every pair of bodies, advanced on the GPU with
/// two ping-ponged position buffers.
pub struct NBodyDemo {
    config: NBodyConfig,
    context: SimulationContext,
    scheduler: FrameScheduler,
    render_params: RenderParams,

    // Declaration order is release order
    compute_bind_groups: PingPongBindGroups,
    render_bind_group: wgpu::BindGroup,
    pipelines: NBodyPipelines,
    render_params_buffer: UniformBuffer<RenderParamsUniform>,
    state: SimulationStateStore,
}

impl NBodyDemo {
    pub fn new(
        allocator: &ResourceAllocator<'_>,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        size: (u32, u32),
        config: NBodyConfig,
    ) -> SetupResult<Self> {
        config.validate()?;

        let state =
            SimulationStateStore::allocate(allocator, config.body_count, BodyLayout::default())?;
        let mut rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        state.seed_initial_state(queue, config.seed_radius, &mut rng);

        let mut render_params = RenderParams::new(&config, aspect_ratio(size.0, size.1));
        let initial = render_params.take_upload().unwrap_or(RenderParamsUniform {
            view_projection_matrix: Mat4::IDENTITY.to_cols_array(),
        });
        let render_params_buffer = UniformBuffer::new(allocator, "N-Body Render Params", &initial)?;

        let pipelines = NBodyPipelines::new(
            allocator,
            surface_format,
            config.body_count,
            config.workgroup_size,
        )?;
        let compute_bind_groups = PingPongBindGroups::new(
            allocator,
            &pipelines.compute_bind_group_layout,
            &state,
            pipelines.min_body_binding(),
        )?;
        let render_bind_group =
            pipelines.render_bind_group(allocator, render_params_buffer.buffer())?;

        log::info!(
            "N-body demo ready: {} bodies, {} workgroups of {}",
            config.body_count,
            FrameScheduler::ping_pong(config.body_count, config.workgroup_size).workgroups()[0],
            config.workgroup_size
        );

        Ok(Self {
            config,
            context: SimulationContext::new(),
            scheduler: FrameScheduler::ping_pong(config.body_count, config.workgroup_size),
            render_params,
            compute_bind_groups,
            render_bind_group,
            pipelines,
            render_params_buffer,
            state,
        })
    }

    pub fn render_params(&self) -> &RenderParams {
        &self.render_params
    }
}

impl Demo for NBodyDemo {
    fn name(&self) -> &str {
        "N-Body Simulation"
    }

    fn description(&self) -> &str {
        "All-pairs gravity on ping-ponged storage buffers"
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
        self.render_params.set_aspect_ratio(aspect_ratio(width, height));
        Ok(())
    }

    fn on_key(&mut self, key: DemoKey) -> bool {
        match key {
            DemoKey::EyeForward => self.render_params.move_eye_z(self.config.eye_step),
            DemoKey::EyeBackward => self.render_params.move_eye_z(-self.config.eye_step),
            DemoKey::NextFilter => return false,
        }
        true
    }

    fn prepare(&mut self, _queue: &wgpu::Queue, input: &FrameInput) -> FramePlan {
        self.context.set_mode(SimulationMode::from_paused(input.paused));
        self.scheduler.schedule(&mut self.context)
    }

    fn record_compute(&self, encoder: &mut wgpu::CommandEncoder, step: &ComputeStep) {
        let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("N-Body Compute Pass"),
            timestamp_writes: None,
        });
        compute_pass.set_pipeline(&self.pipelines.compute_pipeline);
        compute_pass.set_bind_group(0, self.compute_bind_groups.get(step.bind_group), &[]);
        let [x, y, z] = step.workgroups;
        compute_pass.dispatch_workgroups(x, y, z);
    }

    fn record_render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        plan: &FramePlan,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("N-Body Render Pass"),
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
        render_pass.set_bind_group(0, &self.render_bind_group, &[]);
        // The buffer the latest dispatch wrote, or the seed if none has run
        render_pass.set_vertex_buffer(0, self.state.current(plan.render_slot).raw().slice(..));
        render_pass.draw(0..VERTICES_PER_BODY, 0..self.state.count());
    }

    fn after_submit(&mut self, queue: &wgpu::Queue) {
        if let Some(uniform) = self.render_params.take_upload() {
            log::debug!(
                "Re-uploading n-body render params, eye at {}",
                self.render_params.eye_position()
            );
            self.render_params_buffer.write(queue, &uniform);
        }
    }
}
