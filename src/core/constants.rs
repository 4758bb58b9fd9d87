// Shared catalog and scene constants used by the session core and the web frontend.

// Asset layout
pub const DEFAULT_ASSETS_PATH: &str = "../../assets/models/";
pub const DEFAULT_HDR_PATH: &str = "../../assets/hdr/";
pub const DEFAULT_AUDIO_PATH: &str = "./assets/audio/";
pub const MODEL_FILE_PREFIX: &str = "ELE";
pub const LIGHT_PROBE_FILE: &str = "venice_sunset_1k.hdr";

// Per-model scale correction; anything not listed renders at scale 1.
pub const DEFAULT_SCALES: [(u32, [f32; 3]); 5] = [
    (1, [5.0, 5.0, 5.0]),
    (2, [0.01, 0.01, 0.01]),
    (3, [0.06, 0.06, 0.06]),
    (4, [0.03, 0.03, 0.03]),
    (5, [0.3, 0.3, 0.3]),
];
pub const FALLBACK_SCALE: [f32; 3] = [1.0, 1.0, 1.0];

// Per-model looping sound; model 5 is silent.
pub const DEFAULT_SOUNDS: [(u32, &str); 4] = [(1, "a.mp3"), (2, "b.mp3"), (3, "c.mp3"), (4, "d.mp3")];
pub const SOUND_VOLUME: f32 = 1.0;

// Largest up-front reservation for a streamed body
pub const MAX_PREALLOC_BYTES: u64 = 64 << 20;

// Reticle ring geometry (metres)
pub const RETICLE_INNER_RADIUS: f32 = 0.15;
pub const RETICLE_OUTER_RADIUS: f32 = 0.2;
pub const RETICLE_SEGMENTS: u32 = 32;

// Orbit limits for the inline viewer
pub const ORBIT_MIN_POLAR: f32 = std::f32::consts::FRAC_PI_4;
pub const ORBIT_MAX_POLAR: f32 = std::f32::consts::FRAC_PI_2;
pub const ORBIT_MIN_RADIUS: f32 = 0.1;
