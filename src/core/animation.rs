use super::transform::Transform;
use glam::{Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    Linear,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Keyframes {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

impl Keyframes {
    fn len(&self) -> usize {
        match self {
            Keyframes::Translation(v) | Keyframes::Scale(v) => v.len(),
            Keyframes::Rotation(v) => v.len(),
        }
    }
}

/// One animated property of one node.
#[derive(Clone, Debug)]
pub struct Channel {
    pub node: usize,
    pub times: Vec<f32>,
    pub values: Keyframes,
    pub interpolation: Interpolation,
}

#[derive(Clone, Debug)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub channels: Vec<Channel>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, channels: Vec<Channel>) -> Self {
        let duration = channels
            .iter()
            .filter_map(|c| c.times.last().copied())
            .fold(0.0_f32, f32::max);
        Self {
            name: name.into(),
            duration,
            channels,
        }
    }
}

// Index pair surrounding `t` plus the blend factor between them.
#[inline]
fn locate(times: &[f32], t: f32) -> (usize, usize, f32) {
    let last = times.len() - 1;
    if last == 0 || t <= times[0] {
        return (0, 0, 0.0);
    }
    if t >= times[last] {
        return (last, last, 0.0);
    }
    // Unsorted or NaN times can push the split to either end.
    let i1 = times.partition_point(|&k| k <= t).clamp(1, last);
    let i0 = i1 - 1;
    let span = times[i1] - times[i0];
    let alpha = if span > f32::EPSILON {
        (t - times[i0]) / span
    } else {
        0.0
    };
    (i0, i1, alpha)
}

impl Channel {
    /// Write this channel's value at time `t` into `target`.
    pub fn apply(&self, t: f32, target: &mut Transform) {
        let n = self.times.len().min(self.values.len());
        if n == 0 {
            return;
        }
        let (i0, i1, mut alpha) = locate(&self.times[..n], t);
        if self.interpolation == Interpolation::Step {
            alpha = 0.0;
        }
        match &self.values {
            Keyframes::Translation(v) => target.translation = v[i0].lerp(v[i1], alpha),
            Keyframes::Scale(v) => target.scale = v[i0].lerp(v[i1], alpha),
            Keyframes::Rotation(v) => target.rotation = v[i0].slerp(v[i1], alpha).normalize(),
        }
    }
}

/// Plays every clip of one model on loop.
#[derive(Clone, Debug, Default)]
pub struct AnimationMixer {
    times: Vec<f32>,
}

impl AnimationMixer {
    /// Start all `clip_count` clips from time zero.
    pub fn play_all(clip_count: usize) -> Self {
        Self {
            times: vec![0.0; clip_count],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    #[inline]
    pub fn time(&self, clip: usize) -> Option<f32> {
        self.times.get(clip).copied()
    }

    /// Step every clip by `dt_sec` and write sampled values into `pose`.
    pub fn advance(&mut self, dt_sec: f32, clips: &[AnimationClip], pose: &mut [Transform]) {
        for (t, clip) in self.times.iter_mut().zip(clips) {
            if clip.duration > 0.0 {
                *t = (*t + dt_sec.max(0.0)).rem_euclid(clip.duration);
            }
            for channel in &clip.channels {
                if let Some(target) = pose.get_mut(channel.node) {
                    channel.apply(*t, target);
                }
            }
        }
    }
}
