/// Picks the first format the surface reports, which is the adapter's preferred one.
pub(crate) fn preferred_format(
    capabilities: &wgpu::SurfaceCapabilities,
) -> Option<wgpu::TextureFormat> {
    capabilities.formats.first().copied()
}

/// Swap chain settings for a `width` x `height` window. Zero sizes are clamped to 1.
pub(crate) fn surface_config(
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> wgpu::SurfaceConfiguration {
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        // Request compatibility with the sRGB-format texture view we're going to create later.
        view_formats: vec![format.add_srgb_suffix()],
        alpha_mode: wgpu::CompositeAlphaMode::Auto,
        width: width.max(1),
        height: height.max(1),
        desired_maximum_frame_latency: 2,
        present_mode: wgpu::PresentMode::AutoVsync,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_format_is_srgb() {
        let config = surface_config(wgpu::TextureFormat::Bgra8Unorm, 800, 600);
        assert_eq!(config.view_formats, vec![wgpu::TextureFormat::Bgra8UnormSrgb]);
        assert_eq!((config.width, config.height), (800, 600));
    }

    #[test]
    fn minimised_window_keeps_a_valid_size() {
        let config = surface_config(wgpu::TextureFormat::Rgba8Unorm, 0, 0);
        assert_eq!((config.width, config.height), (1, 1));
    }
}
