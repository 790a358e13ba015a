use rand::Rng;

use crate::error::{SetupError, SetupResult};
use crate::gpu::{GpuBuffer, ResourceAllocator};
use crate::simulation::seed::sphere_surface;
use crate::simulation::types::{BodyLayout, BufferRole};

/// Device-resident body state: two ping-pong position buffers and a velocity buffer.
///
/// After `seed_initial_state` the host never touches these buffers again; every
/// later update happens on the device in the compute pass.
pub struct SimulationStateStore {
    positions_in: GpuBuffer,
    positions_out: GpuBuffer,
    velocities: GpuBuffer,
    count: u32,
}

impl SimulationStateStore {
    /// Creates the three buffers, each `count * layout.element_stride` bytes.
    /// Device buffers start zero-initialized.
    pub fn allocate(
        allocator: &ResourceAllocator<'_>,
        count: u32,
        layout: BodyLayout,
    ) -> SetupResult<Self> {
        if count == 0 {
            return Err(SetupError::Config("cannot allocate state for zero bodies".into()));
        }
        let size = layout.buffer_size(count);

        // Position buffers double as per-instance vertex buffers for the render pass
        let positions_in = allocator.buffer(
            "Positions In",
            size,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        )?;
        let positions_out = allocator.buffer(
            "Positions Out",
            size,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::VERTEX,
        )?;
        let velocities = allocator.buffer("Velocities", size, wgpu::BufferUsages::STORAGE)?;

        log::info!("Allocated simulation state for {count} bodies ({size} bytes per buffer)");

        Ok(Self {
            positions_in,
            positions_out,
            velocities,
            count,
        })
    }

    /// Writes the initial condition into `positions_in`. The upload is queued, not awaited.
    pub fn seed_initial_state<R: Rng>(&self, queue: &wgpu::Queue, radius: f32, rng: &mut R) {
        let positions = sphere_surface(self.count, radius, rng);
        queue.write_buffer(self.positions_in.raw(), 0, bytemuck::cast_slice(&positions));
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn buffer(&self, role: BufferRole) -> &GpuBuffer {
        match role {
            BufferRole::PositionsIn => &self.positions_in,
            BufferRole::PositionsOut => &self.positions_out,
        }
    }

    pub fn velocities(&self) -> &GpuBuffer {
        &self.velocities
    }

    /// The buffer the render pass reads for a given ping-pong index
    pub fn current(&self, frame_idx: usize) -> &GpuBuffer {
        self.buffer(BufferRole::for_frame_idx(frame_idx))
    }
}
