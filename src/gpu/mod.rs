//! Device ownership and the resource factory used by every demo.

mod allocator;

use std::sync::Arc;

use winit::window::Window;

use crate::error::SetupResult;

pub use allocator::{GpuBuffer, ResourceAllocator, check_binding_size};

/// Instance, adapter, device and queue for the lifetime of the application.
///
/// All work is submitted to the single `queue`. The compute pass that writes a
/// storage buffer and the render pass that reads it are recorded in order into
/// one command buffer, so in-queue ordering makes the writes visible without any
/// fence or host wait. Moving compute onto a second queue would need explicit
/// synchronization at that boundary.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub adapter: wgpu::Adapter,
    pub instance: wgpu::Instance,
}

impl GpuContext {
    /// Creates the device together with a surface for `window`.
    pub async fn with_window(window: Arc<Window>) -> SetupResult<(Self, wgpu::Surface<'static>)> {
        // The instance is a handle to our GPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        // The surface has to exist before the adapter request so the adapter can present to it
        let surface = instance.create_surface(window)?;
        let context = Self::from_instance(instance, Some(&surface)).await?;
        Ok((context, surface))
    }

    /// Creates a device without any presentation target.
    pub async fn headless() -> SetupResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        Self::from_instance(instance, None).await
    }

    async fn from_instance(
        instance: wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> SetupResult<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        log::info!("Using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Compute Sims Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(Self {
            device,
            queue,
            adapter,
            instance,
        })
    }

    pub fn allocator(&self) -> ResourceAllocator<'_> {
        ResourceAllocator::new(&self.device, &self.queue)
    }

    /// Blocks until every submitted command buffer has finished executing.
    /// Device objects may only be released once nothing in flight references them.
    pub fn drain(&self) {
        if let Err(err) = self.device.poll(wgpu::PollType::Wait) {
            log::warn!("Failed to drain the queue before teardown: {err}");
        }
    }
}
