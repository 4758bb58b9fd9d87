// The main crate is wasm-only, so host tests include the pure-Rust core
// modules directly. Sibling modules resolve through `super::`.
#![allow(dead_code)]

pub mod animation {
    include!("../../src/core/animation.rs");
}
pub mod catalog {
    include!("../../src/core/catalog.rs");
}
pub mod constants {
    include!("../../src/core/constants.rs");
}
pub mod environment {
    include!("../../src/core/environment.rs");
}
pub mod geometry {
    include!("../../src/core/geometry.rs");
}
pub mod loader {
    include!("../../src/core/loader.rs");
}
pub mod model {
    include!("../../src/core/model.rs");
}
pub mod orbit {
    include!("../../src/core/orbit.rs");
}
pub mod placement {
    include!("../../src/core/placement.rs");
}
pub mod platform {
    include!("../../src/core/platform.rs");
}
pub mod scene {
    include!("../../src/core/scene.rs");
}
pub mod session {
    include!("../../src/core/session.rs");
}
pub mod sound {
    include!("../../src/core/sound.rs");
}
pub mod transform {
    include!("../../src/core/transform.rs");
}

use std::cell::RefCell;
use std::rc::Rc;

/// Records what the sound controller asked of its output.
#[derive(Clone, Debug, Default)]
pub struct MockAudio {
    pub log: Rc<RefCell<Vec<String>>>,
    pub installed: Option<&'static str>,
    pub playing: bool,
}

impl MockAudio {
    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.log.borrow_mut().clear();
    }
}

impl sound::SoundBackend for MockAudio {
    type Buffer = &'static str;

    fn install(&mut self, buffer: &'static str) {
        self.log.borrow_mut().push(format!("install {}", buffer));
        self.installed = Some(buffer);
    }

    fn play(&mut self) {
        self.log.borrow_mut().push("play".to_string());
        self.playing = true;
    }

    fn stop(&mut self) {
        self.log.borrow_mut().push("stop".to_string());
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn release(&mut self) {
        self.log.borrow_mut().push("release".to_string());
        self.playing = false;
        self.installed = None;
    }
}

/// Progress indicator that remembers its last state.
#[derive(Clone, Debug, Default)]
pub struct MockProgress {
    pub visible: bool,
    pub ratio: f32,
    pub updates: usize,
}

impl loader::ProgressIndicator for MockProgress {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_progress(&mut self, ratio: f32) {
        self.ratio = ratio;
        self.updates += 1;
    }
}

/// Minimal GLB: one triangle on node 0 (translated to x = 1) and a linear
/// translation clip moving it from the origin to (0, 2, 0) over one second.
pub fn triangle_glb() -> Vec<u8> {
    triangle_glb_with_times([0.0, 1.0])
}

/// `triangle_glb` with the clip's two keyframe times replaced.
pub fn triangle_glb_with_times(times: [f32; 2]) -> Vec<u8> {
    let mut bin: Vec<u8> = Vec::new();
    for v in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        for c in v {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for t in times {
        bin.extend_from_slice(&t.to_le_bytes());
    }
    for v in [[0.0f32, 0.0, 0.0], [0.0, 2.0, 0.0]] {
        for c in v {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    let json = format!(
        r#"{{
  "asset": {{"version": "2.0"}},
  "scene": 0,
  "scenes": [{{"nodes": [0]}}],
  "nodes": [{{"name": "seat", "mesh": 0, "translation": [1.0, 0.0, 0.0]}}],
  "meshes": [{{"primitives": [{{"attributes": {{"POSITION": 0}}}}]}}],
  "buffers": [{{"byteLength": {len}}}],
  "bufferViews": [
    {{"buffer": 0, "byteOffset": 0, "byteLength": 36}},
    {{"buffer": 0, "byteOffset": 36, "byteLength": 8}},
    {{"buffer": 0, "byteOffset": 44, "byteLength": 24}}
  ],
  "accessors": [
    {{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]}},
    {{"bufferView": 1, "componentType": 5126, "count": 2, "type": "SCALAR",
      "min": [0.0], "max": [1.0]}},
    {{"bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3"}}
  ],
  "animations": [{{
    "name": "bounce",
    "channels": [{{"sampler": 0, "target": {{"node": 0, "path": "translation"}}}}],
    "samplers": [{{"input": 1, "output": 2, "interpolation": "LINEAR"}}]
  }}]
}}"#,
        len = bin.len()
    );
    glb(json.into_bytes(), bin)
}

/// Wrap a JSON document and binary payload in a GLB container.
pub fn glb(mut json: Vec<u8>, mut bin: Vec<u8>) -> Vec<u8> {
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin);
    out
}
