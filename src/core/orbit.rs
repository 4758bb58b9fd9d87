use super::constants::{ORBIT_MAX_POLAR, ORBIT_MIN_POLAR, ORBIT_MIN_RADIUS};
use glam::Vec3;
use std::f32::consts::TAU;

/// Spherical orbit around a target for the inline viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    radius: f32,
    /// Angle from +Y.
    polar: f32,
    /// Angle around +Y, measured from +Z toward +X.
    azimuth: f32,
}

impl OrbitControls {
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.length().max(ORBIT_MIN_RADIUS);
        let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
        let azimuth = offset.x.atan2(offset.z);
        let mut c = Self {
            target,
            radius,
            polar,
            azimuth,
        };
        c.clamp();
        c
    }

    fn clamp(&mut self) {
        self.polar = self.polar.clamp(ORBIT_MIN_POLAR, ORBIT_MAX_POLAR);
        self.azimuth = self.azimuth.rem_euclid(TAU);
    }

    #[inline]
    pub fn polar(&self) -> f32 {
        self.polar
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Drag by a pixel delta on a viewport `height` pixels tall.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, height: f32) {
        let h = height.max(1.0);
        self.azimuth -= TAU * dx / h;
        self.polar -= TAU * dy / h;
        self.clamp();
    }

    pub fn eye(&self) -> Vec3 {
        let (sp, cp) = self.polar.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        self.target + self.radius * Vec3::new(sp * sa, cp, sp * ca)
    }
}
