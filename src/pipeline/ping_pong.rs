use crate::error::SetupResult;
use crate::gpu::{ResourceAllocator, check_binding_size};
use crate::simulation::{BufferRole, SimulationStateStore};

/// Which buffer each compute binding refers to in one of the two bind groups
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PingPongRoles {
    pub input: BufferRole,
    pub output: BufferRole,
}

impl PingPongRoles {
    /// Bind group `index` reads the buffer that is current for `frame_idx == index`
    /// and writes the other one.
    pub fn for_bind_group(index: usize) -> Self {
        let input = BufferRole::for_frame_idx(index);
        Self {
            input,
            output: input.other(),
        }
    }
}

/// Both compute bind groups, built once and selected by `frame_idx`.
pub struct PingPongBindGroups {
    groups: [wgpu::BindGroup; 2],
}

impl PingPongBindGroups {
    pub fn new(
        allocator: &ResourceAllocator<'_>,
        layout: &wgpu::BindGroupLayout,
        state: &SimulationStateStore,
        min_body_binding: Option<wgpu::BufferSize>,
    ) -> SetupResult<Self> {
        for buffer in [
            state.buffer(BufferRole::PositionsIn),
            state.buffer(BufferRole::PositionsOut),
            state.velocities(),
        ] {
            check_binding_size(buffer.label(), min_body_binding, buffer.size())?;
        }

        let create = |index: usize, label: &'static str| {
            let roles = PingPongRoles::for_bind_group(index);
            allocator.bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout,
                entries: &[
                    // positions_in
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: state.buffer(roles.input).as_entire_binding(),
                    },
                    // positions_out
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: state.buffer(roles.output).as_entire_binding(),
                    },
                    // velocities, updated in place by both groups
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: state.velocities().as_entire_binding(),
                    },
                ],
            })
        };

        Ok(Self {
            groups: [
                create(0, "N-Body Compute Bind Group 0")?,
                create(1, "N-Body Compute Bind Group 1")?,
            ],
        })
    }

    pub fn get(&self, frame_idx: usize) -> &wgpu::BindGroup {
        &self.groups[frame_idx % 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FrameScheduler, SimulationContext};

    #[test]
    fn input_and_output_never_alias() {
        for index in 0..2 {
            let roles = PingPongRoles::for_bind_group(index);
            assert_ne!(roles.input, roles.output);
        }
    }

    #[test]
    fn each_frame_reads_what_the_previous_frame_wrote() {
        let scheduler = FrameScheduler::ping_pong(100, 64);
        let mut context = SimulationContext::new();
        let mut previous_output = None;
        for _ in 0..10 {
            let plan = scheduler.schedule(&mut context);
            let step = plan.compute.expect("running frames dispatch");
            let roles = PingPongRoles::for_bind_group(step.bind_group);
            if let Some(output) = previous_output {
                assert_eq!(roles.input, output);
            }
            // The render pass reads the buffer that was just written
            assert_eq!(BufferRole::for_frame_idx(plan.render_slot), roles.output);
            previous_output = Some(roles.output);
        }
    }

    #[test]
    fn first_dispatch_reads_the_seed_buffer() {
        let roles = PingPongRoles::for_bind_group(0);
        assert_eq!(roles.input, BufferRole::PositionsIn);
        assert_eq!(roles.output, BufferRole::PositionsOut);
    }
}
