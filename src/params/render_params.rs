use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::config::NBodyConfig;

/// Uniform block read by the n-body vertex shader
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RenderParamsUniform {
    pub view_projection_matrix: [f32; 16],
}

/// Perspective projection with a [0, 1] depth range composed with a translation by `eye`.
pub fn view_projection(eye: Vec3, aspect_ratio: f32, fov_y: f32, near: f32, far: f32) -> Mat4 {
    let projection = Mat4::perspective_rh(fov_y, aspect_ratio, near, far);
    projection * Mat4::from_translation(eye)
}

/// Host copy of the n-body render parameters with a dirty flag gating uploads.
#[derive(Debug, Clone)]
pub struct RenderParams {
    eye_position: Vec3,
    aspect_ratio: f32,
    fov_y: f32,
    near: f32,
    far: f32,
    view_projection: Mat4,
    changed: bool,
}

impl RenderParams {
    /// Starts dirty so the first frame uploads a real matrix.
    pub fn new(config: &NBodyConfig, aspect_ratio: f32) -> Self {
        Self {
            eye_position: config.initial_eye,
            aspect_ratio,
            fov_y: config.fov_y,
            near: config.near,
            far: config.far,
            view_projection: Mat4::IDENTITY,
            changed: true,
        }
    }

    pub fn eye_position(&self) -> Vec3 {
        self.eye_position
    }

    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn move_eye_z(&mut self, delta: f32) {
        self.eye_position.z += delta;
        self.changed = true;
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if aspect_ratio != self.aspect_ratio {
            self.aspect_ratio = aspect_ratio;
            self.changed = true;
        }
    }

    /// Recomputes the matrix if something changed and hands back the block to
    /// upload, clearing the flag. Returns `None` when the device copy is current.
    pub fn take_upload(&mut self) -> Option<RenderParamsUniform> {
        if !self.changed {
            return None;
        }
        self.view_projection = view_projection(
            self.eye_position,
            self.aspect_ratio,
            self.fov_y,
            self.near,
            self.far,
        );
        self.changed = false;
        Some(RenderParamsUniform {
            view_projection_matrix: self.view_projection.to_cols_array(),
        })
    }
}
