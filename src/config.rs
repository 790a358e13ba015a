use glam::Vec3;

use crate::error::{SetupError, SetupResult};

// Constants for the n-body simulation
pub const NUM_BODIES: u32 = 8192;
pub const COMPUTE_WORKGROUP_SIZE: u32 = 64;

// Gerstner waves can hold at most this many wave descriptors
pub const MAX_WAVES: usize = 5;

// Image filter compute target
pub const IMAGE_SIZE: u32 = 512;
pub const IMAGE_WORKGROUP_SIZE: u32 = 16;

/// Settings for the n-body simulation. Immutable once the demo is built.
#[derive(Debug, Clone, Copy)]
pub struct NBodyConfig {
    pub body_count: u32,
    pub workgroup_size: u32,
    /// Radius of the sphere the initial positions are placed on
    pub seed_radius: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub initial_eye: Vec3,
    /// Distance the eye moves along z per key press
    pub eye_step: f32,
    /// Fixed seed for reproducible initial conditions, entropy when `None`
    pub rng_seed: Option<u64>,
}

impl Default for NBodyConfig {
    fn default() -> Self {
        Self {
            body_count: NUM_BODIES,
            workgroup_size: COMPUTE_WORKGROUP_SIZE,
            seed_radius: 0.6,
            fov_y: 1.0,
            near: 0.1,
            far: 50.0,
            initial_eye: Vec3::new(0.0, 0.0, -1.5),
            eye_step: 0.025,
            rng_seed: None,
        }
    }
}

impl NBodyConfig {
    pub fn validate(&self) -> SetupResult<()> {
        if self.body_count == 0 {
            return Err(SetupError::Config("body count must be positive".into()));
        }
        if self.workgroup_size == 0 {
            return Err(SetupError::Config("workgroup size must be positive".into()));
        }
        if self.seed_radius <= 0.0 {
            return Err(SetupError::Config("seed radius must be positive".into()));
        }
        validate_clip_planes(self.near, self.far)
    }
}

/// One Gerstner wave as configured on the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveDescriptor {
    /// Distance between crests, must be positive
    pub wave_length: f32,
    pub amplitude: f32,
    /// Peak sharpness in [0, 1]
    pub steepness: f32,
    /// Travel direction, normalized on first upload
    pub direction: [f32; 2],
}

impl WaveDescriptor {
    pub const fn new(
        wave_length: f32,
        amplitude: f32,
        steepness: f32,
        direction: [f32; 2],
    ) -> Self {
        Self {
            wave_length,
            amplitude,
            steepness,
            direction,
        }
    }
}

pub const DEFAULT_WAVES: [WaveDescriptor; MAX_WAVES] = [
    WaveDescriptor::new(8.0, 0.1, 1.0, [1.0, 1.3]),
    WaveDescriptor::new(4.0, 0.1, 0.8, [-0.7, 0.0]),
    WaveDescriptor::new(5.0, 0.2, 1.0, [0.3, 0.2]),
    WaveDescriptor::new(10.0, 0.5, 1.0, [4.3, 1.2]),
    WaveDescriptor::new(3.0, 0.1, 1.0, [0.5, 0.5]),
];

/// Settings for the Gerstner waves demo
#[derive(Debug, Clone)]
pub struct WaveConfig {
    pub waves: Vec<WaveDescriptor>,
    pub plane_width: f32,
    pub plane_height: f32,
    pub plane_rows: u32,
    pub plane_columns: u32,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub orbit_radius: f32,
    pub sample_count: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            waves: DEFAULT_WAVES.to_vec(),
            plane_width: 12.0,
            plane_height: 12.0,
            plane_rows: 100,
            plane_columns: 100,
            fov_y_degrees: 50.0,
            near: 0.1,
            far: 100.0,
            orbit_radius: 15.0,
            sample_count: 4,
        }
    }
}

impl WaveConfig {
    pub fn validate(&self) -> SetupResult<()> {
        if self.waves.len() > MAX_WAVES {
            return Err(SetupError::Config(format!(
                "at most {MAX_WAVES} waves are supported, got {}",
                self.waves.len()
            )));
        }
        if self.waves.iter().any(|wave| wave.wave_length <= 0.0) {
            return Err(SetupError::Config("wave length must be positive".into()));
        }
        if self.plane_rows == 0 || self.plane_columns == 0 {
            return Err(SetupError::Config("plane needs at least one cell".into()));
        }
        validate_clip_planes(self.near, self.far)
    }
}

/// Settings for the compute image filter demo
#[derive(Debug, Clone, Copy)]
pub struct ImageFilterConfig {
    pub image_size: u32,
    pub workgroup_size: u32,
    pub fov_y_degrees: f32,
    pub eye: Vec3,
}

impl Default for ImageFilterConfig {
    fn default() -> Self {
        Self {
            image_size: IMAGE_SIZE,
            workgroup_size: IMAGE_WORKGROUP_SIZE,
            fov_y_degrees: 60.0,
            eye: Vec3::new(0.0, 0.0, -2.0),
        }
    }
}

impl ImageFilterConfig {
    pub fn validate(&self) -> SetupResult<()> {
        if self.image_size == 0 || self.workgroup_size == 0 {
            return Err(SetupError::Config(
                "image size and workgroup size must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn validate_clip_planes(near: f32, far: f32) -> SetupResult<()> {
    if near <= 0.0 || far <= near {
        return Err(SetupError::Config(format!(
            "clip planes must satisfy 0 < near < far (near = {near}, far = {far})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        NBodyConfig::default().validate().unwrap();
        WaveConfig::default().validate().unwrap();
        ImageFilterConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_bodies_is_rejected() {
        let config = NBodyConfig {
            body_count: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SetupError::Config(_))));
    }

    #[test]
    fn zero_workgroup_is_rejected() {
        let config = NBodyConfig {
            workgroup_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn six_waves_are_rejected() {
        let mut config = WaveConfig::default();
        config.waves.push(WaveDescriptor::new(2.0, 0.1, 0.5, [1.0, 0.0]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_clip_planes_are_rejected() {
        let config = NBodyConfig {
            near: 10.0,
            far: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
