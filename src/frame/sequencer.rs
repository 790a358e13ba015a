use crate::frame::scheduler::{ComputeStep, FramePlan};

/// Receives the passes of one frame in recording order.
pub trait PassRecorder {
    fn record_compute(&mut self, step: &ComputeStep);
    fn record_render(&mut self, plan: &FramePlan);
    /// Composites on top of the render pass output
    fn record_overlay(&mut self);
}

/// Records one frame in the fixed order: compute (only if planned), render, overlay.
///
/// All three end up in the same command buffer, so the render pass observes
/// the compute pass's writes through queue ordering alone.
pub fn record_frame<R: PassRecorder + ?Sized>(plan: &FramePlan, recorder: &mut R) {
    if let Some(step) = &plan.compute {
        recorder.record_compute(step);
    }
    recorder.record_render(plan);
    recorder.record_overlay();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::context::{SimulationContext, SimulationMode};
    use crate::frame::scheduler::FrameScheduler;

    #[derive(Debug, PartialEq)]
    enum Event {
        Compute(usize),
        Render(usize),
        Overlay,
    }

    #[derive(Default)]
    struct Log(Vec<Event>);

    impl PassRecorder for Log {
        fn record_compute(&mut self, step: &ComputeStep) {
            self.0.push(Event::Compute(step.bind_group));
        }

        fn record_render(&mut self, plan: &FramePlan) {
            self.0.push(Event::Render(plan.render_slot));
        }

        fn record_overlay(&mut self) {
            self.0.push(Event::Overlay);
        }
    }

    #[test]
    fn compute_is_recorded_before_render_and_overlay_last() {
        let scheduler = FrameScheduler::ping_pong(100, 64);
        let mut context = SimulationContext::new();
        let mut log = Log::default();
        record_frame(&scheduler.schedule(&mut context), &mut log);
        assert_eq!(log.0, vec![Event::Compute(0), Event::Render(1), Event::Overlay]);
    }

    #[test]
    fn paused_frame_records_render_only() {
        let scheduler = FrameScheduler::ping_pong(100, 64);
        let mut context = SimulationContext::new();
        context.set_mode(SimulationMode::Paused);
        let mut log = Log::default();
        record_frame(&scheduler.schedule(&mut context), &mut log);
        assert_eq!(log.0, vec![Event::Render(0), Event::Overlay]);
    }

    #[test]
    fn render_only_plan_skips_compute() {
        let mut log = Log::default();
        record_frame(&FramePlan::render_only(), &mut log);
        assert_eq!(log.0, vec![Event::Render(0), Event::Overlay]);
    }
}
