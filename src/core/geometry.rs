use super::model::{Material, Primitive, Vertex};
use std::f32::consts::TAU;

/// Flat annulus lying in the XZ plane, facing +Y.
pub fn ring(inner: f32, outer: f32, segments: u32) -> Primitive {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments as usize + 1) * 2);
    for s in 0..=segments {
        let a = s as f32 / segments as f32 * TAU;
        let (sin, cos) = a.sin_cos();
        for (r, v) in [(inner, 0.0), (outer, 1.0)] {
            vertices.push(Vertex {
                // XY ring rotated -90 degrees about X: y -> -z
                position: [r * cos, 0.0, -r * sin],
                normal: [0.0, 1.0, 0.0],
                uv: [s as f32 / segments as f32, v],
            });
        }
    }
    let mut indices = Vec::with_capacity(segments as usize * 6);
    for s in 0..segments {
        let i = s * 2;
        indices.extend_from_slice(&[i, i + 1, i + 3, i, i + 3, i + 2]);
    }
    Primitive {
        vertices,
        indices,
        material: Material {
            metallic: 0.0,
            double_sided: true,
            ..Material::default()
        },
    }
}
