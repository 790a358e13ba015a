use crate::error::SetupResult;
use crate::gpu::ResourceAllocator;
use crate::rendering::render_pass::create_overlay_render_pass;
use crate::shaders;

const ALPHA_BLENDING: wgpu::BlendState = wgpu::BlendState::ALPHA_BLENDING;

/// Pixel rectangle the overlay is clipped to
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRect {
    /// Clips the rect to a `target_width` x `target_height` target. `None` when nothing is left.
    fn clipped(self, target_width: u32, target_height: u32) -> Option<Self> {
        if self.x >= target_width || self.y >= target_height {
            return None;
        }
        let width = self.width.min(target_width - self.x);
        let height = self.height.min(target_height - self.y);
        (width > 0 && height > 0).then_some(Self { width, height, ..self })
    }
}

/// The two bars of a pause sign in the top-left corner, scaled with the window.
pub fn pause_bars(target_width: u32, target_height: u32) -> Vec<ScissorRect> {
    let bar_width = (target_width / 80).max(3);
    let bar_height = (target_height / 12).max(8);
    let margin = (target_height / 24).max(4);

    [margin, margin + 2 * bar_width]
        .into_iter()
        .filter_map(|x| {
            ScissorRect {
                x,
                y: margin,
                width: bar_width,
                height: bar_height,
            }
            .clipped(target_width, target_height)
        })
        .collect()
}

/// Pause indicator composited over the demo's output.
pub struct PauseOverlay {
    pipeline: wgpu::RenderPipeline,
    _pipeline_layout: wgpu::PipelineLayout,
}

impl PauseOverlay {
    pub fn new(
        allocator: &ResourceAllocator<'_>,
        format: wgpu::TextureFormat,
    ) -> SetupResult<Self> {
        let pipeline_layout = allocator.pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pause Overlay Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        })?;
        let module = shaders::load(allocator, "overlay", &[])?;

        let pipeline = allocator.render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Pause Overlay Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })?;

        Ok(Self {
            pipeline,
            _pipeline_layout: pipeline_layout,
        })
    }

    /// Records its own pass after the demo's render pass so it lands on top.
    pub fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        size: (u32, u32),
    ) {
        let mut render_pass = create_overlay_render_pass(encoder, target);
        render_pass.set_pipeline(&self.pipeline);
        for bar in pause_bars(size.0, size.1) {
            render_pass.set_scissor_rect(bar.x, bar.y, bar.width, bar.height);
            // Fullscreen triangle, clipped to the bar
            render_pass.draw(0..3, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_sit_side_by_side() {
        let bars = pause_bars(1280, 720);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].y, bars[1].y);
        assert!(bars[0].x + bars[0].width < bars[1].x);
        assert_eq!(bars[0].height, 60);
    }

    #[test]
    fn bars_stay_inside_the_target() {
        for (width, height) in [(1, 1), (10, 10), (64, 48), (1920, 1080)] {
            for bar in pause_bars(width, height) {
                assert!(bar.x + bar.width <= width);
                assert!(bar.y + bar.height <= height);
                assert!(bar.width > 0 && bar.height > 0);
            }
        }
    }

    #[test]
    fn tiny_target_drops_the_bars() {
        assert!(pause_bars(1, 1).is_empty());
    }
}
