// Host-side tests for GLB decoding.

mod common;

use common::animation::{Interpolation, Keyframes};
use common::model::*;
use common::transform::mat4_from_slice;
use glam::{Mat4, Vec3};

#[test]
fn decodes_triangle_glb() {
    let asset = ModelAsset::from_glb(&common::triangle_glb()).unwrap();
    assert_eq!(asset.nodes.len(), 1);
    assert_eq!(asset.roots, vec![0]);
    assert_eq!(asset.nodes[0].name, "seat");
    assert_eq!(asset.nodes[0].mesh, Some(0));
    assert_eq!(asset.nodes[0].local.translation, Vec3::X);
    assert_eq!(asset.triangle_count(), 1);

    let prim = &asset.meshes[0].primitives[0];
    assert_eq!(prim.vertices.len(), 3);
    assert_eq!(prim.vertices[1].position, [1.0, 0.0, 0.0]);
    // No normals or UVs in the file: defaults are filled in.
    assert_eq!(prim.vertices[0].normal, [0.0, 1.0, 0.0]);
    assert_eq!(prim.vertices[0].uv, [0.0, 0.0]);
    // Non-indexed primitives get sequential indices.
    assert_eq!(prim.indices, vec![0, 1, 2]);
    assert_eq!(prim.material, Material::default());
}

#[test]
fn decodes_animation_clip() {
    let asset = ModelAsset::from_glb(&common::triangle_glb()).unwrap();
    assert_eq!(asset.clips.len(), 1);
    let clip = &asset.clips[0];
    assert_eq!(clip.name, "bounce");
    assert_eq!(clip.duration, 1.0);
    let ch = &clip.channels[0];
    assert_eq!(ch.node, 0);
    assert_eq!(ch.interpolation, Interpolation::Linear);
    assert_eq!(
        ch.values,
        Keyframes::Translation(vec![Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)])
    );
}

#[test]
fn rejects_non_finite_keyframe_times() {
    for times in [[f32::NAN, 1.0], [0.0, f32::INFINITY]] {
        assert!(matches!(
            ModelAsset::from_glb(&common::triangle_glb_with_times(times)),
            Err(ModelError::BadKeyframes {
                animation: 0,
                channel: 0
            })
        ));
    }
}

#[test]
fn rejects_descending_keyframe_times() {
    assert!(matches!(
        ModelAsset::from_glb(&common::triangle_glb_with_times([1.0, 0.5])),
        Err(ModelError::BadKeyframes { .. })
    ));
}

#[test]
fn accepts_repeated_keyframe_times() {
    let asset = ModelAsset::from_glb(&common::triangle_glb_with_times([0.5, 0.5])).unwrap();
    assert_eq!(asset.clips[0].duration, 0.5);
}

#[test]
fn rest_pose_matches_node_transforms() {
    let asset = ModelAsset::from_glb(&common::triangle_glb()).unwrap();
    let pose = asset.rest_pose();
    assert_eq!(pose.len(), 1);
    assert_eq!(pose[0], asset.nodes[0].local);
}

#[test]
fn rejects_garbage() {
    assert!(matches!(
        ModelAsset::from_glb(b"definitely not a model"),
        Err(ModelError::Gltf(_))
    ));
}

#[test]
fn rejects_external_buffers() {
    // Plain JSON glTF is accepted by the container parser too.
    let json = br#"{"asset":{"version":"2.0"},"buffers":[{"byteLength":4,"uri":"chair.bin"}],"nodes":[{}]}"#;
    assert!(matches!(
        ModelAsset::from_glb(json),
        Err(ModelError::ExternalUri(uri)) if uri == "chair.bin"
    ));
}

#[test]
fn rejects_files_without_nodes() {
    let json = br#"{"asset":{"version":"2.0"}}"#;
    assert!(matches!(ModelAsset::from_glb(json), Err(ModelError::Empty)));
}

#[test]
fn mat4_from_slice_reads_column_major() {
    let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(mat4_from_slice(&m.to_cols_array()), Some(m));
    assert_eq!(mat4_from_slice(&[0.0; 15]), None);
    let mut bad = m.to_cols_array();
    bad[5] = f32::NAN;
    assert_eq!(mat4_from_slice(&bad), None);
}
