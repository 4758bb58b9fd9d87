use crate::constants::{CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_HEIGHT, CAMERA_NEAR};
use crate::core::orbit::OrbitControls;
use glam::{Mat4, Vec3};

/// Perspective camera used when no XR session is driving the views.
pub struct InlineCamera {
    pub aspect: f32,
    pub orbit: OrbitControls,
}

impl InlineCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            aspect,
            orbit: OrbitControls::new(Vec3::new(0.0, CAMERA_HEIGHT, 0.0), Vec3::ZERO),
        }
    }

    /// Re-sync after the canvas changed size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh_gl(
            CAMERA_FOV_DEG.to_radians(),
            self.aspect,
            CAMERA_NEAR,
            CAMERA_FAR,
        );
        let view = Mat4::look_at_rh(self.orbit.eye(), self.orbit.target, Vec3::Y);
        proj * view
    }
}
