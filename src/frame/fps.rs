/// Frames-per-second estimate refreshed at a fixed interval
#[derive(Debug, Clone)]
pub struct FpsCounter {
    update_interval_ms: f64,
    frames_since_update: u32,
    last_update_ms: Option<f64>,
    fps: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(500.0)
    }
}

impl FpsCounter {
    pub fn new(update_interval_ms: f64) -> Self {
        Self {
            update_interval_ms,
            frames_since_update: 0,
            last_update_ms: None,
            fps: 0.0,
        }
    }

    /// Counts a frame at `now_ms`. Returns the new estimate when one was computed.
    pub fn tick(&mut self, now_ms: f64) -> Option<f32> {
        let mut updated = None;
        match self.last_update_ms {
            Some(last) => {
                let elapsed = now_ms - last;
                if elapsed >= self.update_interval_ms {
                    self.fps = (self.frames_since_update as f64 / (elapsed / 1000.0)) as f32;
                    self.last_update_ms = Some(now_ms);
                    self.frames_since_update = 0;
                    updated = Some(self.fps);
                }
            }
            None => self.last_update_ms = Some(now_ms),
        }
        self.frames_since_update += 1;
        updated
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}
