use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Per-frame scene block for the waves shader
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SceneUniform {
    pub elapsed_time: f32,
    pub _padding: [f32; 3],
    pub model_matrix: [f32; 16],
    pub view_projection_matrix: [f32; 16],
    pub view_position: [f32; 3],
    pub _padding2: f32,
}

const _: () = assert!(
    std::mem::size_of::<SceneUniform>() == 160,
    "size of SceneUniform does not match WGSL"
);

impl SceneUniform {
    pub fn new(elapsed_time: f32, model: Mat4, view_projection: Mat4, view_position: Vec3) -> Self {
        Self {
            elapsed_time,
            _padding: [0.0; 3],
            model_matrix: model.to_cols_array(),
            view_projection_matrix: view_projection.to_cols_array(),
            view_position: view_position.to_array(),
            _padding2: 0.0,
        }
    }
}

/// Lays a `width × height` mesh built in the XY plane flat on XZ, centred on the origin.
pub fn plane_model_matrix(width: f32, height: f32) -> Mat4 {
    Mat4::from_rotation_x((-90.0f32).to_radians())
        * Mat4::from_translation(Vec3::new(-width / 2.0, -height / 2.0, 0.0))
}

/// Elapsed time since the first frame the scene was shown. Stops advancing while paused.
#[derive(Debug, Clone, Default)]
pub struct SceneClock {
    start: Option<f32>,
    elapsed: f32,
}

impl SceneClock {
    /// `run_time` is application time; the first call fixes the start offset.
    pub fn advance(&mut self, run_time: f32, paused: bool) -> f32 {
        let start = *self.start.get_or_insert(run_time);
        if !paused {
            self.elapsed = run_time - start;
        }
        self.elapsed
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Matrices for the image filter's textured quad
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadUniform {
    pub projection: [f32; 16],
    pub model_view: [f32; 16],
}

impl QuadUniform {
    /// `aspect_ratio` is that of one half of the window, since each quad gets half the width.
    pub fn new(fov_y_degrees: f32, aspect_ratio: f32, eye: Vec3) -> Self {
        Self {
            projection: Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect_ratio, 0.1, 256.0)
                .to_cols_array(),
            model_view: Mat4::from_translation(eye).to_cols_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::Vec4;

    use super::*;

    #[test]
    fn plane_corners_end_up_centred_on_xz() {
        let model = plane_model_matrix(12.0, 12.0);
        let near_corner = model * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let far_corner = model * Vec4::new(12.0, 12.0, 0.0, 1.0);
        assert_abs_diff_eq!(near_corner.x, -6.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far_corner.x, 6.0, epsilon = 1e-5);
        assert_abs_diff_eq!(near_corner.y, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far_corner.y, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(near_corner.z.abs(), 6.0, epsilon = 1e-5);
        assert_abs_diff_eq!(near_corner.z, -far_corner.z, epsilon = 1e-5);
    }

    #[test]
    fn wave_height_points_up() {
        let model = plane_model_matrix(12.0, 12.0);
        let up = model * Vec4::new(0.0, 0.0, 1.0, 0.0);
        assert_abs_diff_eq!(up.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn clock_freezes_while_paused() {
        let mut clock = SceneClock::default();
        assert_eq!(clock.advance(0.0, false), 0.0);
        assert_eq!(clock.advance(1.0, false), 1.0);
        assert_eq!(clock.advance(2.5, true), 1.0);
        assert_eq!(clock.advance(3.0, false), 3.0);
    }

    #[test]
    fn clock_starts_when_the_scene_is_first_shown() {
        let mut clock = SceneClock::default();
        assert_eq!(clock.advance(40.0, false), 0.0);
        assert_eq!(clock.advance(41.5, false), 1.5);
        assert_eq!(clock.elapsed(), 1.5);
    }

    #[test]
    fn clock_started_while_paused_stays_at_zero() {
        let mut clock = SceneClock::default();
        assert_eq!(clock.advance(12.0, true), 0.0);
        assert_eq!(clock.advance(14.0, false), 2.0);
    }

    #[test]
    fn quad_sits_in_front_of_the_camera() {
        let uniform = QuadUniform::new(60.0, 1.0, Vec3::new(0.0, 0.0, -2.0));
        let clip = Mat4::from_cols_array(&uniform.projection)
            * Mat4::from_cols_array(&uniform.model_view)
            * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc_z = clip.z / clip.w;
        assert!(clip.w > 0.0);
        assert!((0.0..=1.0).contains(&ndc_z));
    }
}
