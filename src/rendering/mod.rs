//! Window surface, the per-frame loop and the passes drawn on top of every demo.

pub mod camera;
pub mod overlay;
mod render_pass;
mod surface;

use std::sync::Arc;
use std::time::Instant;

use winit::window::Window;

use crate::config::{ImageFilterConfig, NBodyConfig, WaveConfig};
use crate::demos::{
    Demo, DemoKey, DemoManager, FrameInput, GerstnerWavesDemo, ImageFilterDemo, NBodyDemo,
};
use crate::error::{FrameError, SetupError, SetupResult};
use crate::frame::{ComputeStep, FpsCounter, FramePlan, PassRecorder, record_frame};
use crate::gpu::GpuContext;

pub use camera::OrbitCamera;
pub use overlay::PauseOverlay;

/// Records one demo frame into a wgpu command encoder.
struct WgpuRecorder<'a> {
    encoder: &'a mut wgpu::CommandEncoder,
    target: &'a wgpu::TextureView,
    demo: &'a dyn Demo,
    // Present only while the demo is paused
    overlay: Option<(&'a PauseOverlay, (u32, u32))>,
}

impl PassRecorder for WgpuRecorder<'_> {
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

/// Mouse state sampled from window events between frames
#[derive(Debug, Default, Clone, Copy)]
struct MouseState {
    position: [f32; 2],
    left_button: bool,
}

pub struct Renderer {
    // Declaration order is release order, demos before the device that created them
    demos: DemoManager,
    overlay: PauseOverlay,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    gpu: GpuContext,
    window: Arc<Window>,

    paused: bool,
    mouse: MouseState,
    fps: FpsCounter,
    started: Instant,
}

impl Renderer {
    /// Creates the device, configures the surface and builds every demo up front.
    pub async fn new(window: Arc<Window>) -> SetupResult<Self> {
        let (gpu, surface) = GpuContext::with_window(window.clone()).await?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&gpu.adapter);
        let surface_format =
            surface::preferred_format(&surface_caps).ok_or(SetupError::UnsupportedSurface)?;
        // Pipelines target the sRGB view created every frame
        let target_format = surface_format.add_srgb_suffix();

        // Configure surface for the first time
        let surface_config = surface::surface_config(surface_format, size.width, size.height);
        surface.configure(&gpu.device, &surface_config);

        let allocator = gpu.allocator();
        let dimensions = (surface_config.width, surface_config.height);
        let demos: Vec<Box<dyn Demo>> = vec![
            Box::new(NBodyDemo::new(
                &allocator,
                &gpu.queue,
                target_format,
                dimensions,
                NBodyConfig::default(),
            )?),
            Box::new(GerstnerWavesDemo::new(
                &allocator,
                target_format,
                dimensions,
                WaveConfig::default(),
            )?),
            Box::new(ImageFilterDemo::new(
                &allocator,
                target_format,
                dimensions,
                ImageFilterConfig::default(),
            )?),
        ];
        let overlay = PauseOverlay::new(&allocator, target_format)?;

        let renderer = Self {
            demos: DemoManager::new(demos),
            overlay,
            surface,
            surface_config,
            gpu,
            window,
            paused: false,
            mouse: MouseState::default(),
            fps: FpsCounter::default(),
            started: Instant::now(),
        };
        renderer.update_title();
        Ok(renderer)
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    fn configure_surface(&self) {
        self.surface.configure(&self.gpu.device, &self.surface_config);
    }

    /// Reconfigures the surface and lets every demo rebuild its size-dependent targets.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) -> SetupResult<()> {
        if new_size.width == 0 || new_size.height == 0 {
            return Ok(());
        }
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.configure_surface();

        let allocator = self.gpu.allocator();
        for demo in self.demos.iter_mut() {
            demo.resize(&allocator, new_size.width, new_size.height)?;
        }
        Ok(())
    }

    pub fn switch_demo(&mut self, index: usize) {
        if self.demos.switch_to(index) {
            self.update_title();
        }
    }

    pub fn next_demo(&mut self) {
        if self.demos.next() {
            self.update_title();
        }
    }

    pub fn previous_demo(&mut self) {
        if self.demos.previous() {
            self.update_title();
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.update_title();
    }

    /// Forwards a key to the current demo.
    pub fn demo_key(&mut self, key: DemoKey) {
        if let Some(demo) = self.demos.current_mut() {
            demo.on_key(key);
        }
    }

    pub fn handle_mouse_move(&mut self, position: [f32; 2]) {
        self.mouse.position = position;
    }

    pub fn handle_mouse_button(&mut self, pressed: bool) {
        self.mouse.left_button = pressed;
    }

    /// Runs one frame: prepare, record compute, render and overlay into one
    /// command buffer, submit, then present.
    pub fn render(&mut self) -> Result<(), FrameError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(surface_texture) => surface_texture,
            Err(err) => {
                let err = FrameError::from(err);
                if err.needs_reconfigure() {
                    self.configure_surface();
                }
                return Err(err);
            }
        };
        let texture_view = surface_texture.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.surface_config.format.add_srgb_suffix()),
            ..Default::default()
        });

        let input = FrameInput {
            paused: self.paused,
            mouse_position: self.mouse.position,
            left_button: self.mouse.left_button,
            run_time: self.started.elapsed().as_secs_f32(),
        };
        let target_size = (self.surface_config.width, self.surface_config.height);

        let Some(demo) = self.demos.current_mut() else {
            // Nothing to draw, hand the texture back untouched
            surface_texture.present();
            return Ok(());
        };
        let plan = demo.prepare(&self.gpu.queue, &input);

        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Command Encoder"),
        });
        {
            let overlay = demo.context().is_paused().then_some((&self.overlay, target_size));
            let mut recorder = WgpuRecorder {
                encoder: &mut encoder,
                target: &texture_view,
                demo: &*demo,
                overlay,
            };
            record_frame(&plan, &mut recorder);
        }

        // One submission per frame, compute and render together
        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        demo.after_submit(&self.gpu.queue);

        self.window.pre_present_notify();
        surface_texture.present();

        if let Some(fps) = self.fps.tick(self.started.elapsed().as_secs_f64() * 1000.0) {
            log::debug!("{fps:.1} fps");
            self.update_title();
        }
        Ok(())
    }

    fn update_title(&self) {
        let name = self.demos.current().map(|demo| demo.name()).unwrap_or("No demo");
        let mut title = format!(
            "{name} ({}/{}) - {:.0} fps",
            self.demos.current_index() + 1,
            self.demos.len(),
            self.fps.fps()
        );
        if self.paused {
            title.push_str(" [paused]");
        }
        self.window.set_title(&title);
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        // Nothing in flight may reference the resources released below
        self.gpu.drain();
    }
}
