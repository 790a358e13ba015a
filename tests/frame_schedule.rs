use compute_sims::frame::{
    ComputeStep, FramePlan, FrameScheduler, PassRecorder, SimulationContext, SimulationMode,
    record_frame,
};
use compute_sims::pipeline::PingPongRoles;
use compute_sims::simulation::BufferRole;

/// Collects what a frame recorded
#[derive(Default)]
struct Recorded {
    dispatches: Vec<ComputeStep>,
    render_slots: Vec<usize>,
    overlays: usize,
}

impl PassRecorder for Recorded {
    fn record_compute(&mut self, step: &ComputeStep) {
        self.dispatches.push(*step);
    }

    fn record_render(&mut self, plan: &FramePlan) {
        self.render_slots.push(plan.render_slot);
    }

    fn record_overlay(&mut self) {
        self.overlays += 1;
    }
}

fn run_frames(
    scheduler: &FrameScheduler,
    context: &mut SimulationContext,
    frames: usize,
    recorded: &mut Recorded,
) {
    for _ in 0..frames {
        let plan = scheduler.schedule(context);
        record_frame(&plan, recorded);
    }
}

#[test]
fn hundred_bodies_for_ten_frames() {
    let scheduler = FrameScheduler::ping_pong(100, 64);
    let mut context = SimulationContext::new();
    let mut recorded = Recorded::default();

    run_frames(&scheduler, &mut context, 10, &mut recorded);

    assert_eq!(context.frame_idx(), 0);
    assert_eq!(context.dispatches(), 10);
    assert!(recorded.dispatches.iter().all(|step| step.workgroups == [2, 1, 1]));

    let writes_to_positions_out = recorded
        .dispatches
        .iter()
        .filter(|step| {
            PingPongRoles::for_bind_group(step.bind_group).output == BufferRole::PositionsOut
        })
        .count();
    assert_eq!(writes_to_positions_out, 5);
    assert_eq!(recorded.overlays, 10);
}

#[test]
fn pausing_freezes_the_rendered_buffer() {
    let scheduler = FrameScheduler::ping_pong(8192, 64);
    let mut context = SimulationContext::new();
    let mut recorded = Recorded::default();

    run_frames(&scheduler, &mut context, 3, &mut recorded);
    let frozen = context.frame_idx();

    context.set_mode(SimulationMode::Paused);
    let mut paused = Recorded::default();
    run_frames(&scheduler, &mut context, 7, &mut paused);

    assert!(paused.dispatches.is_empty());
    assert_eq!(paused.render_slots, vec![frozen; 7]);
    assert_eq!(context.frame_idx(), frozen);
    assert_eq!(context.frames(), 10);

    // Resuming continues from the frozen buffer
    context.set_mode(SimulationMode::Running);
    let plan = scheduler.schedule(&mut context);
    assert_eq!(plan.compute.map(|step| step.bind_group), Some(frozen));
}

#[test]
fn each_dispatch_reads_what_the_previous_one_wrote() {
    let scheduler = FrameScheduler::ping_pong(8193, 64);
    let mut context = SimulationContext::new();
    let mut recorded = Recorded::default();

    run_frames(&scheduler, &mut context, 12, &mut recorded);

    let groups: Vec<usize> = recorded.dispatches.iter().map(|step| step.bind_group).collect();
    assert_eq!(groups, vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1]);
    assert_eq!(recorded.dispatches[0].workgroups, [129, 1, 1]);

    for pair in recorded.dispatches.windows(2) {
        let previous = PingPongRoles::for_bind_group(pair[0].bind_group);
        let current = PingPongRoles::for_bind_group(pair[1].bind_group);
        assert_eq!(current.input, previous.output);
    }

    // The render pass always shows the buffer the frame's dispatch wrote
    for (step, slot) in recorded.dispatches.iter().zip(&recorded.render_slots) {
        assert_eq!(
            BufferRole::for_frame_idx(*slot),
            PingPongRoles::for_bind_group(step.bind_group).output
        );
    }
}
