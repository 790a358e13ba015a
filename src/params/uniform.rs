use std::marker::PhantomData;

use bytemuck::Pod;

use crate::error::SetupResult;
use crate::gpu::{GpuBuffer, ResourceAllocator};

/// A uniform buffer sized for exactly one `T`.
pub struct UniformBuffer<T> {
    buffer: GpuBuffer,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformBuffer<T> {
    pub fn new(
        allocator: &ResourceAllocator<'_>,
        label: &'static str,
        initial: &T,
    ) -> SetupResult<Self> {
        let buffer = allocator.buffer_init(
            label,
            bytemuck::bytes_of(initial),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        )?;
        Ok(Self {
            buffer,
            _marker: PhantomData,
        })
    }

    /// Queues an upload. Nothing on the host reads the buffer back, so no
    /// acknowledgement is awaited.
    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(self.buffer.raw(), 0, bytemuck::bytes_of(value));
    }

    pub fn buffer(&self) -> &GpuBuffer {
        &self.buffer
    }

    pub fn binding_size() -> Option<wgpu::BufferSize> {
        wgpu::BufferSize::new(std::mem::size_of::<T>() as u64)
    }
}
