//! Procedurally generated images, uploaded once at setup.

use crate::error::SetupResult;
use crate::gpu::ResourceAllocator;

/// Hue, saturation and lightness in [0, 1] to linear RGB
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match (h * 6.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}

fn to_rgba8([r, g, b]: [f32; 3]) -> [u8; 4] {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(r), channel(g), channel(b), 255]
}

/// One-row gradient from deep water at u = 0 to foam at u = 1
pub(crate) fn sea_color_gradient(width: u32) -> Vec<u8> {
    (0..width)
        .flat_map(|x| {
            let t = x as f32 / (width.max(2) - 1) as f32;
            let hue = 0.62 - 0.1 * t;
            let lightness = 0.12 + 0.73 * t * t;
            to_rgba8(hsl_to_rgb(hue, 0.75, lightness))
        })
        .collect()
}

/// Square test image: hue by angle around the centre, banded rings, and a
/// checkerboard so the filters have edges to work with.
pub(crate) fn source_image(size: u32) -> Vec<u8> {
    let half = size as f32 / 2.0;
    let checker = (size / 8).max(1);
    (0..size)
        .flat_map(|y| (0..size).map(move |x| (x, y)))
        .flat_map(|(x, y)| {
            let dx = x as f32 + 0.5 - half;
            let dy = y as f32 + 0.5 - half;
            let hue = (dy.atan2(dx) / std::f32::consts::TAU).rem_euclid(1.0);
            let ring = ((dx * dx + dy * dy).sqrt() / half * 6.0).floor() as u32;
            let dark = ((x / checker) + (y / checker)) % 2 == 0;
            let lightness = if dark { 0.35 } else { 0.55 } + if ring % 2 == 0 { 0.1 } else { 0.0 };
            to_rgba8(hsl_to_rgb(hue, 0.8, lightness))
        })
        .collect()
}

/// Creates a 2D RGBA8 texture holding `data`.
pub(crate) fn rgba_texture(
    allocator: &ResourceAllocator<'_>,
    label: &'static str,
    width: u32,
    height: u32,
    usage: wgpu::TextureUsages,
    data: &[u8],
) -> SetupResult<wgpu::Texture> {
    allocator.texture_with_data(
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: usage | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        data,
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn primary_hues() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert_abs_diff_eq!(red[0], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(red[1], 0.0, epsilon = 1e-5);
        let blue = hsl_to_rgb(2.0 / 3.0, 1.0, 0.5);
        assert_abs_diff_eq!(blue[2], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(blue[0], 0.0, epsilon = 1e-5);
    }

    #[test]
    fn gradient_gets_lighter() {
        let pixels = sea_color_gradient(256);
        assert_eq!(pixels.len(), 256 * 4);
        let brightness = |i: usize| {
            pixels[i * 4] as u32 + pixels[i * 4 + 1] as u32 + pixels[i * 4 + 2] as u32
        };
        assert!(brightness(255) > brightness(0));
        assert!(pixels.chunks(4).all(|texel| texel[3] == 255));
    }

    #[test]
    fn source_image_is_square_rgba() {
        let pixels = source_image(64);
        assert_eq!(pixels.len(), 64 * 64 * 4);
        assert!(pixels.chunks(4).all(|texel| texel[3] == 255));
    }
}
