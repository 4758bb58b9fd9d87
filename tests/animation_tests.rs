// Host-side tests for keyframe sampling and the looping mixer.

mod common;

use common::animation::*;
use common::transform::Transform;
use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

fn translation_clip(interpolation: Interpolation) -> AnimationClip {
    AnimationClip::new(
        "move",
        vec![Channel {
            node: 0,
            times: vec![0.0, 1.0, 2.0],
            values: Keyframes::Translation(vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0)]),
            interpolation,
        }],
    )
}

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-5
}

#[test]
fn clip_duration_is_latest_key() {
    let clip = AnimationClip::new(
        "two",
        vec![
            Channel {
                node: 0,
                times: vec![0.0, 0.5],
                values: Keyframes::Scale(vec![Vec3::ONE, Vec3::splat(2.0)]),
                interpolation: Interpolation::Linear,
            },
            Channel {
                node: 1,
                times: vec![0.0, 3.0],
                values: Keyframes::Translation(vec![Vec3::ZERO, Vec3::Y]),
                interpolation: Interpolation::Linear,
            },
        ],
    );
    assert_eq!(clip.duration, 3.0);
    assert_eq!(AnimationClip::new("empty", vec![]).duration, 0.0);
}

#[test]
fn linear_sampling_interpolates_and_clamps() {
    let clip = translation_clip(Interpolation::Linear);
    let ch = &clip.channels[0];
    let mut t = Transform::IDENTITY;
    ch.apply(0.5, &mut t);
    assert!(approx(t.translation, Vec3::new(0.5, 0.0, 0.0)));
    ch.apply(1.5, &mut t);
    assert!(approx(t.translation, Vec3::new(1.0, 0.5, 0.0)));
    ch.apply(-1.0, &mut t);
    assert!(approx(t.translation, Vec3::ZERO));
    ch.apply(9.0, &mut t);
    assert!(approx(t.translation, Vec3::new(1.0, 1.0, 0.0)));
}

#[test]
fn step_sampling_holds_previous_key() {
    let clip = translation_clip(Interpolation::Step);
    let mut t = Transform::IDENTITY;
    clip.channels[0].apply(0.99, &mut t);
    assert!(approx(t.translation, Vec3::ZERO));
    clip.channels[0].apply(1.0, &mut t);
    assert!(approx(t.translation, Vec3::X));
}

#[test]
fn rotation_channels_slerp() {
    let ch = Channel {
        node: 0,
        times: vec![0.0, 1.0],
        values: Keyframes::Rotation(vec![Quat::IDENTITY, Quat::from_rotation_y(FRAC_PI_2)]),
        interpolation: Interpolation::Linear,
    };
    let mut t = Transform::IDENTITY;
    ch.apply(0.5, &mut t);
    let expected = Quat::from_rotation_y(FRAC_PI_2 * 0.5);
    assert!(t.rotation.angle_between(expected) < 1e-4);
}

#[test]
fn channel_with_no_keys_leaves_target_alone() {
    let ch = Channel {
        node: 0,
        times: vec![],
        values: Keyframes::Translation(vec![]),
        interpolation: Interpolation::Linear,
    };
    let mut t = Transform::IDENTITY;
    t.translation = Vec3::splat(3.0);
    ch.apply(0.5, &mut t);
    assert_eq!(t.translation, Vec3::splat(3.0));
}

#[test]
fn mixer_loops_over_duration() {
    let clips = vec![translation_clip(Interpolation::Linear)];
    let mut mixer = AnimationMixer::play_all(clips.len());
    let mut pose = vec![Transform::IDENTITY];
    mixer.advance(2.5, &clips, &mut pose);
    assert!((mixer.time(0).unwrap() - 0.5).abs() < 1e-5);
    assert!(approx(pose[0].translation, Vec3::new(0.5, 0.0, 0.0)));
}

#[test]
fn mixer_ignores_negative_dt_and_missing_nodes() {
    let clip = AnimationClip::new(
        "far",
        vec![Channel {
            node: 7,
            times: vec![0.0, 1.0],
            values: Keyframes::Translation(vec![Vec3::ZERO, Vec3::X]),
            interpolation: Interpolation::Linear,
        }],
    );
    let clips = vec![clip];
    let mut mixer = AnimationMixer::play_all(1);
    let mut pose = vec![Transform::IDENTITY];
    mixer.advance(-1.0, &clips, &mut pose);
    assert_eq!(mixer.time(0), Some(0.0));
    assert_eq!(pose[0], Transform::IDENTITY);
}

#[test]
fn empty_mixer_is_a_no_op() {
    let mut mixer = AnimationMixer::default();
    assert!(mixer.is_empty());
    let mut pose = vec![Transform::IDENTITY];
    mixer.advance(1.0, &[], &mut pose);
    assert_eq!(mixer.time(0), None);
}

#[test]
fn malformed_times_sample_without_panicking() {
    let keys = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
    for times in [
        vec![f32::NAN, 1.0, 2.0],
        vec![f32::NAN, f32::NAN, f32::NAN],
        vec![0.0, 3.0, 1.0],
    ] {
        let ch = Channel {
            node: 0,
            times,
            values: Keyframes::Translation(keys.clone()),
            interpolation: Interpolation::Linear,
        };
        for at in [0.0, 0.5, 1.5, 2.5] {
            let mut t = Transform::IDENTITY;
            ch.apply(at, &mut t);
            assert!(t.translation.is_finite());
        }
    }
    let single = Channel {
        node: 0,
        times: vec![f32::NAN],
        values: Keyframes::Translation(vec![Vec3::X]),
        interpolation: Interpolation::Linear,
    };
    let mut t = Transform::IDENTITY;
    single.apply(0.5, &mut t);
    assert_eq!(t.translation, Vec3::X);
}
