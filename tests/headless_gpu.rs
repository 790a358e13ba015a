use compute_sims::config::{ImageFilterConfig, NBodyConfig, WaveConfig};
use compute_sims::demos::{Demo, DemoKey, FrameInput, GerstnerWavesDemo, ImageFilterDemo, NBodyDemo};
use compute_sims::error::SetupError;
use compute_sims::frame::{ComputeStep, FramePlan, PassRecorder, record_frame};
use compute_sims::gpu::GpuContext;
use compute_sims::rendering::PauseOverlay;
use compute_sims::simulation::{BodyLayout, SimulationStateStore};

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Returns `None` on machines without a usable adapter. Any device error raised
/// outside the allocator's error scopes fails the test.
fn gpu() -> Option<GpuContext> {
    match pollster::block_on(GpuContext::headless()) {
        Ok(gpu) => {
            gpu.device.on_uncaptured_error(Box::new(|err: wgpu::Error| {
                panic!("uncaptured device error: {err}")
            }));
            Some(gpu)
        }
        Err(err) => {
            eprintln!("Skipping GPU test: {err}");
            None
        }
    }
}

fn offscreen_target(gpu: &GpuContext, width: u32, height: u32) -> wgpu::TextureView {
    gpu.device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

struct OffscreenRecorder<'a> {
    encoder: &'a mut wgpu::CommandEncoder,
    target: &'a wgpu::TextureView,
    demo: &'a dyn Demo,
    overlay: Option<(&'a PauseOverlay, (u32, u32))>,
}

impl PassRecorder for OffscreenRecorder<'_> {
    fn record_compute(&mut self, step: &ComputeStep) {
        self.demo.record_compute(self.encoder, step);
    }

    fn record_render(&mut self, plan: &FramePlan) {
        self.demo.record_render(self.encoder, self.target, plan);
    }

    fn record_overlay(&mut self) {
        if let Some((overlay, size)) = self.overlay {
            overlay.record(self.encoder, self.target, size);
        }
    }
}

/// One frame the way the window loop runs it: prepare, record, submit once,
/// then the post-submit uploads.
fn run_frame(
    gpu: &GpuContext,
    demo: &mut dyn Demo,
    overlay: &PauseOverlay,
    target: &wgpu::TextureView,
    size: (u32, u32),
    input: &FrameInput,
) -> FramePlan {
    let plan = demo.prepare(&gpu.queue, input);
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Test Frame Encoder"),
        });
    {
        let mut recorder = OffscreenRecorder {
            encoder: &mut encoder,
            target,
            demo: &*demo,
            overlay: demo.context().is_paused().then_some((overlay, size)),
        };
        record_frame(&plan, &mut recorder);
    }
    gpu.queue.submit(std::iter::once(encoder.finish()));
    demo.after_submit(&gpu.queue);
    plan
}

#[test]
fn n_body_with_a_partial_workgroup_runs_ten_frames() {
    let Some(gpu) = gpu() else {
        return;
    };
    let allocator = gpu.allocator();
    let size = (64, 48);
    let target = offscreen_target(&gpu, size.0, size.1);
    let overlay = PauseOverlay::new(&allocator, TARGET_FORMAT).unwrap();

    // 100 bodies leave most of the second workgroup out of bounds
    let config = NBodyConfig {
        body_count: 100,
        rng_seed: Some(3),
        ..Default::default()
    };
    let mut demo = NBodyDemo::new(&allocator, &gpu.queue, TARGET_FORMAT, size, config).unwrap();

    assert!(demo.on_key(DemoKey::EyeForward));
    assert!(demo.render_params().is_changed());

    let input = FrameInput::default();
    for frame in 0..10 {
        let plan = run_frame(&gpu, &mut demo, &overlay, &target, size, &input);
        let step = plan.compute.expect("running frames dispatch");
        assert_eq!(step.bind_group, frame % 2);
        assert_eq!(step.workgroups, [2, 1, 1]);
        assert_eq!(plan.render_slot, (frame + 1) % 2);
    }
    assert_eq!(demo.context().frame_idx(), 0);
    assert_eq!(demo.context().dispatches(), 10);
    assert!(!demo.render_params().is_changed());

    let paused = FrameInput {
        paused: true,
        ..Default::default()
    };
    for _ in 0..3 {
        let plan = run_frame(&gpu, &mut demo, &overlay, &target, size, &paused);
        assert!(plan.compute.is_none());
        assert_eq!(plan.render_slot, 0);
    }
    assert_eq!(demo.context().dispatches(), 10);
    gpu.drain();
}

#[test]
fn gerstner_waves_render_across_a_resize() {
    let Some(gpu) = gpu() else {
        return;
    };
    let allocator = gpu.allocator();
    let overlay = PauseOverlay::new(&allocator, TARGET_FORMAT).unwrap();
    let config = WaveConfig {
        plane_rows: 16,
        plane_columns: 16,
        ..Default::default()
    };
    let mut demo = GerstnerWavesDemo::new(&allocator, TARGET_FORMAT, (64, 48), config).unwrap();

    let target = offscreen_target(&gpu, 64, 48);
    for frame in 0..3 {
        let input = FrameInput {
            mouse_position: [frame as f32 * 4.0, 10.0],
            left_button: true,
            run_time: frame as f32 * 0.016,
            ..Default::default()
        };
        let plan = run_frame(&gpu, &mut demo, &overlay, &target, (64, 48), &input);
        assert!(plan.compute.is_none());
    }

    // The multisampled and depth attachments have to follow the new size
    demo.resize(&allocator, 80, 60).unwrap();
    let resized = offscreen_target(&gpu, 80, 60);
    let paused = FrameInput {
        paused: true,
        run_time: 1.0,
        ..Default::default()
    };
    for _ in 0..2 {
        run_frame(&gpu, &mut demo, &overlay, &resized, (80, 60), &paused);
    }
    assert!(demo.context().is_paused());
    assert_eq!(demo.context().frames(), 5);
    gpu.drain();
}

#[test]
fn image_filter_dispatches_every_frame_while_paused() {
    let Some(gpu) = gpu() else {
        return;
    };
    let allocator = gpu.allocator();
    let size = (96, 48);
    let target = offscreen_target(&gpu, size.0, size.1);
    let overlay = PauseOverlay::new(&allocator, TARGET_FORMAT).unwrap();

    // 100 is not a multiple of the 16x16 workgroup
    let config = ImageFilterConfig {
        image_size: 100,
        ..Default::default()
    };
    let mut demo = ImageFilterDemo::new(&allocator, TARGET_FORMAT, size, config).unwrap();

    let paused = FrameInput {
        paused: true,
        ..Default::default()
    };
    for filter in 0..3 {
        assert_eq!(demo.filter(), filter);
        let plan = run_frame(&gpu, &mut demo, &overlay, &target, size, &paused);
        assert_eq!(plan.compute.map(|step| step.workgroups), Some([7, 7, 1]));
        assert!(demo.on_key(DemoKey::NextFilter));
    }
    assert_eq!(demo.filter(), 0);
    assert_eq!(demo.context().dispatches(), 3);
    assert!(!demo.context().is_paused());
    gpu.drain();
}

#[test]
fn zero_bodies_fail_setup() {
    let Some(gpu) = gpu() else {
        return;
    };
    let result = SimulationStateStore::allocate(&gpu.allocator(), 0, BodyLayout::default());
    assert!(matches!(result, Err(SetupError::Config(_))));
}
