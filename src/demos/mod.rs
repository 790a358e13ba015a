//! The three compute-driven scenes and the manager that switches between them.

pub mod gerstner_waves;
pub mod image_filter;
pub mod manager;
pub mod n_body;
mod textures;

pub use gerstner_waves::GerstnerWavesDemo;
pub use image_filter::ImageFilterDemo;
pub use manager::DemoManager;
pub use n_body::NBodyDemo;

use crate::error::SetupResult;
use crate::frame::{ComputeStep, FramePlan, SimulationContext};
use crate::gpu::ResourceAllocator;

/// Input routed to the current demo
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DemoKey {
    /// Arrow up
    EyeForward,
    /// Arrow down
    EyeBackward,
    /// Tab
    NextFilter,
}

/// What the frame loop samples from the window before a frame
#[derive(Debug, Copy, Clone, Default)]
pub struct FrameInput {
    pub paused: bool,
    pub mouse_position: [f32; 2],
    pub left_button: bool,
    /// Seconds since the application started
    pub run_time: f32,
}

/// Interface every scene implements so the renderer can drive it.
///
/// Per frame the renderer calls `prepare`, records the returned plan through
/// `record_compute` and `record_render` into one encoder, submits it, and then
/// calls `after_submit`.
pub trait Demo {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Scheduling state, read by the overlay and the tests
    fn context(&self) -> &SimulationContext;

    /// Recreates size-dependent attachments and updates projections.
    fn resize(
        &mut self,
        allocator: &ResourceAllocator<'_>,
        width: u32,
        height: u32,
    ) -> SetupResult<()>;

    /// Returns true when the key was used.
    fn on_key(&mut self, key: DemoKey) -> bool;

    /// Uploads per-frame uniforms and decides what this frame records.
    fn prepare(&mut self, queue: &wgpu::Queue, input: &FrameInput) -> FramePlan;

    fn record_compute(&self, encoder: &mut wgpu::CommandEncoder, step: &ComputeStep);

    fn record_render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        plan: &FramePlan,
    );

    /// Uploads that should land after this frame's submission, visible next frame.
    fn after_submit(&mut self, _queue: &wgpu::Queue) {}
}

/// Width over height, guarding against a minimised window
pub(crate) fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}
