//! Per-frame scheduling and command recording.

pub mod context;
pub mod fps;
pub mod scheduler;
pub mod sequencer;

pub use context::{SimulationContext, SimulationMode};
pub use fps::FpsCounter;
pub use scheduler::{ComputeStep, FramePlan, FrameScheduler, SchedulePolicy, workgroup_count};
pub use sequencer::{PassRecorder, record_frame};
