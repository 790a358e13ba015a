/// Whether the compute pass runs this frame
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SimulationMode {
    Paused,
    #[default]
    Running,
}

impl SimulationMode {
    pub fn from_paused(paused: bool) -> Self {
        if paused {
            SimulationMode::Paused
        } else {
            SimulationMode::Running
        }
    }
}

/// Per-simulation frame state, owned by the frame loop and passed into the
/// scheduler every frame.
#[derive(Debug, Clone, Default)]
pub struct SimulationContext {
    mode: SimulationMode,
    frame_idx: usize,
    frames: u64,
    dispatches: u64,
}

impl SimulationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SimulationMode) {
        if mode != self.mode {
            let state = if mode == SimulationMode::Paused {
                "paused"
            } else {
                "resumed"
            };
            log::info!("Simulation {state}");
            self.mode = mode;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.mode == SimulationMode::Paused
    }

    /// Ping-pong index, always 0 or 1
    pub fn frame_idx(&self) -> usize {
        self.frame_idx
    }

    /// Frames scheduled so far, paused or not
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Compute dispatches scheduled so far
    pub fn dispatches(&self) -> u64 {
        self.dispatches
    }

    pub(crate) fn count_frame(&mut self) {
        self.frames += 1;
    }

    pub(crate) fn count_dispatch(&mut self) {
        self.dispatches += 1;
    }

    pub(crate) fn flip(&mut self) {
        self.frame_idx = (self.frame_idx + 1) % 2;
    }
}
