use bytemuck::{Pod, Zeroable};

use crate::config::{MAX_WAVES, WaveDescriptor};

/// One wave in the uniform block. Uniform arrays need a 16-byte aligned stride,
/// so each entry is padded to 32 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GerstnerWave {
    pub wave_length: f32,
    pub amplitude: f32,
    pub steepness: f32,
    pub _padding1: f32,
    pub direction: [f32; 2],
    pub _padding2: [f32; 2],
}

const _: () = assert!(
    std::mem::size_of::<GerstnerWave>() == 32,
    "size of GerstnerWave does not match WGSL"
);

/// Uniform block read by the waves vertex and fragment shaders
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GerstnerWavesUniform {
    pub waves: [GerstnerWave; MAX_WAVES],
    pub amplitude_sum: f32,
    pub _padding: [f32; 3],
}

const _: () = assert!(
    std::mem::size_of::<GerstnerWavesUniform>() == 176,
    "size of GerstnerWavesUniform does not match WGSL"
);

impl From<&WaveDescriptor> for GerstnerWave {
    fn from(desc: &WaveDescriptor) -> Self {
        Self {
            wave_length: desc.wave_length,
            amplitude: desc.amplitude,
            steepness: desc.steepness,
            _padding1: 0.0,
            direction: desc.direction,
            _padding2: [0.0; 2],
        }
    }
}

/// Unused slots carry zero amplitude so they add no displacement.
const EMPTY_WAVE: GerstnerWave = GerstnerWave {
    wave_length: 1.0,
    amplitude: 0.0,
    steepness: 0.0,
    _padding1: 0.0,
    direction: [1.0, 0.0],
    _padding2: [0.0; 2],
};

fn normalize2([x, y]: [f32; 2]) -> [f32; 2] {
    let length = (x * x + y * y).sqrt();
    if length > 0.0 {
        [x / length, y / length]
    } else {
        [0.0, 0.0]
    }
}

/// Host copy of the wave parameters.
///
/// Directions are normalized and the amplitude sum computed on the first
/// `update` only; later calls reuse the stored block unchanged.
#[derive(Debug, Clone)]
pub struct WaveParams {
    uniform: GerstnerWavesUniform,
    wave_count: usize,
    normalized: bool,
}

impl WaveParams {
    /// `waves` must hold at most `MAX_WAVES` entries, which `WaveConfig::validate` checks.
    pub fn new(waves: &[WaveDescriptor]) -> Self {
        let mut uniform = GerstnerWavesUniform {
            waves: [EMPTY_WAVE; MAX_WAVES],
            amplitude_sum: 0.0,
            _padding: [0.0; 3],
        };
        for (slot, desc) in uniform.waves.iter_mut().zip(waves) {
            *slot = desc.into();
        }
        Self {
            uniform,
            wave_count: waves.len().min(MAX_WAVES),
            normalized: false,
        }
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub fn waves(&self) -> &[GerstnerWave] {
        &self.uniform.waves[..self.wave_count]
    }

    pub fn amplitude_sum(&self) -> f32 {
        self.uniform.amplitude_sum
    }

    /// Returns the block to upload this frame.
    pub fn update(&mut self) -> &GerstnerWavesUniform {
        if !self.normalized {
            let waves = &mut self.uniform.waves[..self.wave_count];
            for wave in waves.iter_mut() {
                wave.direction = normalize2(wave.direction);
            }
            self.uniform.amplitude_sum = waves.iter().map(|wave| wave.amplitude).sum();
            self.normalized = true;
            log::debug!(
                "Normalized {} wave directions, amplitude sum {}",
                self.wave_count,
                self.uniform.amplitude_sum
            );
        }
        &self.uniform
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::DEFAULT_WAVES;

    fn magnitude(direction: [f32; 2]) -> f32 {
        (direction[0] * direction[0] + direction[1] * direction[1]).sqrt()
    }

    #[test]
    fn first_update_normalizes_every_direction() {
        let mut params = WaveParams::new(&DEFAULT_WAVES);
        assert!(!params.is_normalized());
        params.update();
        assert!(params.is_normalized());
        for wave in params.waves() {
            assert_relative_eq!(magnitude(wave.direction), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn second_update_leaves_directions_and_sum_alone() {
        let mut params = WaveParams::new(&DEFAULT_WAVES);
        let first = *params.update();
        let second = *params.update();
        assert_eq!(first, second);
        for wave in params.waves() {
            assert_relative_eq!(magnitude(wave.direction), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn amplitude_sum_does_not_accumulate_across_frames() {
        let mut params = WaveParams::new(&DEFAULT_WAVES);
        for _ in 0..100 {
            params.update();
        }
        assert_relative_eq!(params.amplitude_sum(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn direction_keeps_its_heading() {
        let mut params = WaveParams::new(&[WaveDescriptor::new(8.0, 0.1, 1.0, [3.0, 4.0])]);
        params.update();
        assert_relative_eq!(params.waves()[0].direction[0], 0.6, epsilon = 1e-6);
        assert_relative_eq!(params.waves()[0].direction[1], 0.8, epsilon = 1e-6);
    }

    #[test]
    fn zero_direction_stays_zero() {
        let mut params = WaveParams::new(&[WaveDescriptor::new(8.0, 0.1, 1.0, [0.0, 0.0])]);
        params.update();
        assert_eq!(params.waves()[0].direction, [0.0, 0.0]);
    }

    #[test]
    fn fewer_waves_leave_silent_slots() {
        let mut params = WaveParams::new(&DEFAULT_WAVES[..2]);
        let uniform = params.update();
        assert_relative_eq!(uniform.amplitude_sum, 0.2, epsilon = 1e-6);
        assert_eq!(uniform.waves[4].amplitude, 0.0);
    }
}
