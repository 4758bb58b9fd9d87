use glam::{Mat4, Quat, Vec3};

/// Translation/rotation/scale triple, composed as T * R * S.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Column-major 16-float array as handed out by WebXR into a matrix.
#[inline]
pub fn mat4_from_slice(values: &[f32]) -> Option<Mat4> {
    let arr: [f32; 16] = values.get(..16)?.try_into().ok()?;
    let m = Mat4::from_cols_array(&arr);
    m.is_finite().then_some(m)
}
