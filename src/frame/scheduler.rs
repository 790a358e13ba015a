use crate::frame::context::{SimulationContext, SimulationMode};

/// Number of workgroups needed to cover `items`, rounding up. The shader
/// bounds-checks the tail instead of the dispatch being shrunk.
///
/// # Panics
///
/// Panics when `workgroup_size` is zero. Config `validate()` rejects that before
/// any demo is built.
pub fn workgroup_count(items: u32, workgroup_size: u32) -> u32 {
    assert!(workgroup_size > 0, "workgroup size must be positive");
    items.div_ceil(workgroup_size)
}

/// One compute dispatch to record
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ComputeStep {
    /// Index into the compute bind groups
    pub bind_group: usize,
    pub workgroups: [u32; 3],
}

/// What the sequencer records for one frame
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FramePlan {
    pub compute: Option<ComputeStep>,
    /// Ping-pong slot the render pass reads, taken after any dispatch this frame
    pub render_slot: usize,
}

impl FramePlan {
    pub fn render_only() -> Self {
        Self {
            compute: None,
            render_slot: 0,
        }
    }
}

/// How a simulation's compute pass is scheduled
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SchedulePolicy {
    /// Dispatch while running using bind group `frame_idx`, then flip.
    /// Paused frames skip the dispatch and keep `frame_idx`.
    PingPong,
    /// Dispatch every frame with bind group 0, regardless of pause.
    EveryFrame,
}

/// Decides once per frame whether to dispatch and which buffer is current.
#[derive(Debug, Copy, Clone)]
pub struct FrameScheduler {
    policy: SchedulePolicy,
    workgroups: [u32; 3],
}

impl FrameScheduler {
    pub fn new(policy: SchedulePolicy, workgroups: [u32; 3]) -> Self {
        Self { policy, workgroups }
    }

    /// One-dimensional ping-pong scheduling over `body_count` bodies.
    /// Panics on a zero `workgroup_size`, see [`workgroup_count`].
    pub fn ping_pong(body_count: u32, workgroup_size: u32) -> Self {
        Self::new(
            SchedulePolicy::PingPong,
            [workgroup_count(body_count, workgroup_size), 1, 1],
        )
    }

    pub fn workgroups(&self) -> [u32; 3] {
        self.workgroups
    }

    pub fn schedule(&self, context: &mut SimulationContext) -> FramePlan {
        context.count_frame();
        match self.policy {
            SchedulePolicy::PingPong => {
                if context.mode() == SimulationMode::Paused {
                    return FramePlan {
                        compute: None,
                        render_slot: context.frame_idx(),
                    };
                }
                let step = ComputeStep {
                    bind_group: context.frame_idx(),
                    workgroups: self.workgroups,
                };
                context.count_dispatch();
                context.flip();
                FramePlan {
                    compute: Some(step),
                    render_slot: context.frame_idx(),
                }
            }
            SchedulePolicy::EveryFrame => {
                context.count_dispatch();
                FramePlan {
                    compute: Some(ComputeStep {
                        bind_group: 0,
                        workgroups: self.workgroups,
                    }),
                    render_slot: 0,
                }
            }
        }
    }
}
