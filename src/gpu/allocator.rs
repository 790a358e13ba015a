use wgpu::util::DeviceExt;

use crate::error::{SetupError, SetupResult};

/// A device buffer together with the size it was created with.
///
/// The recorded size is what bind-group construction checks against the
/// minimum binding sizes declared by the layouts.
#[derive(Debug)]
pub struct GpuBuffer {
    raw: wgpu::Buffer,
    size: u64,
    label: &'static str,
}

impl GpuBuffer {
    pub fn raw(&self) -> &wgpu::Buffer {
        &self.raw
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn as_entire_binding(&self) -> wgpu::BindingResource<'_> {
        self.raw.as_entire_binding()
    }
}

/// Fails when a buffer is smaller than what a layout entry declares it needs.
pub fn check_binding_size(
    label: &str,
    required: Option<wgpu::BufferSize>,
    actual: u64,
) -> SetupResult<()> {
    match required {
        Some(required) if required.get() > actual => Err(SetupError::BindingSize {
            label: label.to_owned(),
            required: required.get(),
            actual,
        }),
        _ => Ok(()),
    }
}

/// Factory for every device object the demos create.
///
/// Each creation runs inside a validation and an out-of-memory error scope so
/// that an invalid handle turns into a `SetupError` instead of a later panic.
pub struct ResourceAllocator<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
}

impl<'a> ResourceAllocator<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self { device, queue }
    }

    fn scoped<T>(&self, label: &str, create: impl FnOnce(&wgpu::Device) -> T) -> SetupResult<T> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);

        let value = create(self.device);

        let out_of_memory = pollster::block_on(self.device.pop_error_scope());
        let validation = pollster::block_on(self.device.pop_error_scope());

        if out_of_memory.is_some() {
            return Err(SetupError::OutOfMemory {
                label: label.to_owned(),
            });
        }
        if let Some(err) = validation {
            return Err(SetupError::Validation {
                label: label.to_owned(),
                message: err.to_string(),
            });
        }
        Ok(value)
    }

    /// Creates a zero-initialized buffer.
    pub fn buffer(
        &self,
        label: &'static str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> SetupResult<GpuBuffer> {
        if size == 0 {
            return Err(SetupError::EmptyBuffer { label: label.into() });
        }
        let raw = self.scoped(label, |device| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage,
                mapped_at_creation: false,
            })
        })?;
        log::debug!("Allocated buffer '{label}' ({size} bytes)");
        Ok(GpuBuffer { raw, size, label })
    }

    /// Creates a buffer holding `contents`.
    pub fn buffer_init(
        &self,
        label: &'static str,
        contents: &[u8],
        usage: wgpu::BufferUsages,
    ) -> SetupResult<GpuBuffer> {
        if contents.is_empty() {
            return Err(SetupError::EmptyBuffer { label: label.into() });
        }
        let raw = self.scoped(label, |device| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
        })?;
        Ok(GpuBuffer {
            raw,
            size: contents.len() as u64,
            label,
        })
    }

    pub fn texture(&self, desc: &wgpu::TextureDescriptor<'_>) -> SetupResult<wgpu::Texture> {
        self.scoped(desc.label.unwrap_or("texture"), |device| device.create_texture(desc))
    }

    /// Creates a single-mip texture and uploads `data` into it.
    pub fn texture_with_data(
        &self,
        desc: &wgpu::TextureDescriptor<'_>,
        data: &[u8],
    ) -> SetupResult<wgpu::Texture> {
        self.scoped(desc.label.unwrap_or("texture"), |device| {
            device.create_texture_with_data(
                self.queue,
                desc,
                wgpu::util::TextureDataOrder::LayerMajor,
                data,
            )
        })
    }

    pub fn sampler(&self, desc: &wgpu::SamplerDescriptor<'_>) -> SetupResult<wgpu::Sampler> {
        self.scoped(desc.label.unwrap_or("sampler"), |device| device.create_sampler(desc))
    }

    pub fn shader_module(
        &self,
        desc: wgpu::ShaderModuleDescriptor<'_>,
    ) -> SetupResult<wgpu::ShaderModule> {
        let label = desc.label.unwrap_or("shader").to_owned();
        self.scoped(&label, |device| device.create_shader_module(desc))
    }

    pub fn bind_group_layout(
        &self,
        desc: &wgpu::BindGroupLayoutDescriptor<'_>,
    ) -> SetupResult<wgpu::BindGroupLayout> {
        self.scoped(desc.label.unwrap_or("bind group layout"), |device| {
            device.create_bind_group_layout(desc)
        })
    }

    pub fn bind_group(&self, desc: &wgpu::BindGroupDescriptor<'_>) -> SetupResult<wgpu::BindGroup> {
        self.scoped(desc.label.unwrap_or("bind group"), |device| device.create_bind_group(desc))
    }

    pub fn pipeline_layout(
        &self,
        desc: &wgpu::PipelineLayoutDescriptor<'_>,
    ) -> SetupResult<wgpu::PipelineLayout> {
        self.scoped(desc.label.unwrap_or("pipeline layout"), |device| {
            device.create_pipeline_layout(desc)
        })
    }

    pub fn compute_pipeline(
        &self,
        desc: &wgpu::ComputePipelineDescriptor<'_>,
    ) -> SetupResult<wgpu::ComputePipeline> {
        self.scoped(desc.label.unwrap_or("compute pipeline"), |device| {
            device.create_compute_pipeline(desc)
        })
    }

    pub fn render_pipeline(
        &self,
        desc: &wgpu::RenderPipelineDescriptor<'_>,
    ) -> SetupResult<wgpu::RenderPipeline> {
        self.scoped(desc.label.unwrap_or("render pipeline"), |device| {
            device.create_render_pipeline(desc)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_size_accepts_exact_and_larger_buffers() {
        let required = wgpu::BufferSize::new(1024);
        check_binding_size("positions", required, 1024).unwrap();
        check_binding_size("positions", required, 2048).unwrap();
    }

    #[test]
    fn binding_size_rejects_smaller_buffers() {
        let required = wgpu::BufferSize::new(1024);
        let err = check_binding_size("positions", required, 512).unwrap_err();
        assert!(matches!(
            err,
            SetupError::BindingSize {
                required: 1024,
                actual: 512,
                ..
            }
        ));
    }

    #[test]
    fn missing_minimum_accepts_anything() {
        check_binding_size("uniforms", None, 4).unwrap();
    }
}
