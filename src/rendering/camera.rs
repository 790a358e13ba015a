use glam::{EulerRot, Mat4, Quat, Vec3};

/// Orbit angles in degrees the camera starts at
const INITIAL_ANGLES: [f32; 2] = [50.0, -25.0];
const MIN_PITCH: f32 = -90.0;
const MAX_PITCH: f32 = -10.0;

/// Camera orbiting the origin at a fixed radius, steered by left-mouse drags.
///
/// `angles[0]` turns around the Y axis and wraps at 360 degrees, `angles[1]`
/// tilts around the X axis and stays within [-90, -10] so the camera never
/// dips below the surface it looks at.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    radius: f32,
    angles: [f32; 2],

    // Mouse interaction state
    dragging: bool,
    last_mouse_position: [f32; 2],
}

impl OrbitCamera {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            angles: INITIAL_ANGLES,
            dragging: false,
            last_mouse_position: [0.0, 0.0],
        }
    }

    pub fn angles(&self) -> [f32; 2] {
        self.angles
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Feeds the mouse state sampled this frame.
    pub fn update(&mut self, position: [f32; 2], left_button: bool) {
        match (self.dragging, left_button) {
            (false, true) => {
                self.dragging = true;
                self.last_mouse_position = position;
            }
            (true, true) => {
                // Dragging right turns the scene left
                self.angles[0] -= position[0] - self.last_mouse_position[0];
                self.angles[1] -= position[1] - self.last_mouse_position[1];
                self.last_mouse_position = position;
            }
            (true, false) => self.dragging = false,
            (false, false) => {}
        }
        self.angles[0] %= 360.0;
        self.angles[1] = self.angles[1].clamp(MIN_PITCH, MAX_PITCH);
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.angles[0].to_radians(),
            self.angles[1].to_radians(),
            0.0,
        )
    }

    /// Inverse of rotating, then pushing the camera out by `radius` along +Z
    pub fn view_matrix(&self) -> Mat4 {
        let camera = Mat4::from_quat(self.rotation())
            * Mat4::from_translation(Vec3::new(0.0, 0.0, self.radius));
        camera.inverse()
    }

    /// World-space eye position, the translation of the inverse view matrix
    pub fn view_position(&self) -> Vec3 {
        self.view_matrix().inverse().w_axis.truncate()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn eye_stays_on_the_orbit() {
        let mut camera = OrbitCamera::new(15.0);
        assert_abs_diff_eq!(camera.view_position().length(), 15.0, epsilon = 1e-3);
        camera.update([0.0, 0.0], true);
        camera.update([123.0, -40.0], true);
        assert_abs_diff_eq!(camera.view_position().length(), 15.0, epsilon = 1e-3);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = OrbitCamera::new(15.0);
        camera.update([0.0, 0.0], true);
        camera.update([0.0, 500.0], true);
        assert_eq!(camera.angles()[1], MIN_PITCH);
        camera.update([0.0, -500.0], true);
        assert_eq!(camera.angles()[1], MAX_PITCH);
    }

    #[test]
    fn yaw_wraps() {
        let mut camera = OrbitCamera::new(15.0);
        camera.update([0.0, 0.0], true);
        camera.update([-400.0, 0.0], true);
        assert_abs_diff_eq!(camera.angles()[0], 90.0, epsilon = 1e-4);
    }

    #[test]
    fn moving_without_button_changes_nothing() {
        let mut camera = OrbitCamera::new(15.0);
        camera.update([10.0, 10.0], false);
        camera.update([90.0, 70.0], false);
        assert_eq!(camera.angles(), INITIAL_ANGLES);
        assert!(!camera.is_dragging());
    }

    #[test]
    fn release_ends_the_drag() {
        let mut camera = OrbitCamera::new(15.0);
        camera.update([0.0, 0.0], true);
        camera.update([5.0, 0.0], false);
        assert!(!camera.is_dragging());
        assert_eq!(camera.angles()[0], 50.0);
    }

    #[test]
    fn negative_pitch_puts_the_eye_above_the_plane() {
        let camera = OrbitCamera::new(15.0);
        assert!(camera.view_position().y > 0.0);
    }
}
