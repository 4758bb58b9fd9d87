use super::constants::*;
use fnv::FnvHashMap;
use glam::Vec3;
use std::fmt;

/// Numeric furniture identifier chosen by the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub u32);

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("model {id}: scale {scale:?} must be finite and positive")]
    InvalidScale { id: ModelId, scale: [f32; 3] },
    #[error("model {id}: sound file name is empty")]
    EmptySound { id: ModelId },
    #[error("model {id}: sound file {file:?} must be a bare relative name")]
    NonRelativeSound { id: ModelId, file: String },
    #[error("{name} path is empty")]
    EmptyPath { name: &'static str },
}

/// Where assets live. Each base is joined with a file name as-is, so a
/// trailing slash is expected.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub assets_path: String,
    pub hdr_path: String,
    pub audio_path: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            assets_path: DEFAULT_ASSETS_PATH.to_string(),
            hdr_path: DEFAULT_HDR_PATH.to_string(),
            audio_path: DEFAULT_AUDIO_PATH.to_string(),
        }
    }
}

impl ViewerConfig {
    /// Apply page-level overrides looked up by key (`assetsPath`, `hdrPath`, `audioPath`).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("assetsPath") {
            self.assets_path = ensure_trailing_slash(v);
        }
        if let Some(v) = lookup("hdrPath") {
            self.hdr_path = ensure_trailing_slash(v);
        }
        if let Some(v) = lookup("audioPath") {
            self.audio_path = ensure_trailing_slash(v);
        }
        self
    }

    pub fn model_url(&self, id: ModelId) -> String {
        format!("{}{}{}.glb", self.assets_path, MODEL_FILE_PREFIX, id.0)
    }

    pub fn quick_look_url(&self, id: ModelId) -> String {
        format!("{}{}{}.usdz", self.assets_path, MODEL_FILE_PREFIX, id.0)
    }

    pub fn light_probe_url(&self) -> String {
        format!("{}{}", self.hdr_path, LIGHT_PROBE_FILE)
    }

    pub fn sound_url(&self, file: &str) -> String {
        format!("{}{}", self.audio_path, file)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for (name, value) in [
            ("assets", &self.assets_path),
            ("hdr", &self.hdr_path),
            ("audio", &self.audio_path),
        ] {
            if value.trim().is_empty() {
                return Err(CatalogError::EmptyPath { name });
            }
        }
        Ok(())
    }
}

fn ensure_trailing_slash(mut s: String) -> String {
    if !s.ends_with('/') {
        s.push('/');
    }
    s
}

/// Static per-model tables. Unknown IDs get scale 1 and no sound.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub config: ViewerConfig,
    scales: FnvHashMap<ModelId, Vec3>,
    sounds: FnvHashMap<ModelId, String>,
}

impl Default for Catalog {
    fn default() -> Self {
        let scales = DEFAULT_SCALES
            .iter()
            .map(|(id, s)| (ModelId(*id), Vec3::from_array(*s)))
            .collect();
        let sounds = DEFAULT_SOUNDS
            .iter()
            .map(|(id, f)| (ModelId(*id), f.to_string()))
            .collect();
        Self {
            config: ViewerConfig::default(),
            scales,
            sounds,
        }
    }
}

impl Catalog {
    pub fn empty(config: ViewerConfig) -> Self {
        Self {
            config,
            scales: FnvHashMap::default(),
            sounds: FnvHashMap::default(),
        }
    }

    pub fn with_config(mut self, config: ViewerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_scale(&mut self, id: ModelId, scale: Vec3) {
        self.scales.insert(id, scale);
    }

    pub fn set_sound(&mut self, id: ModelId, file: impl Into<String>) {
        self.sounds.insert(id, file.into());
    }

    #[inline]
    pub fn scale_for(&self, id: ModelId) -> Vec3 {
        self.scales
            .get(&id)
            .copied()
            .unwrap_or_else(|| Vec3::from_array(FALLBACK_SCALE))
    }

    #[inline]
    pub fn sound_for(&self, id: ModelId) -> Option<&str> {
        self.sounds.get(&id).map(String::as_str)
    }

    /// Check every table entry once, before the session starts using them.
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.config.validate()?;
        let mut scale_ids: Vec<_> = self.scales.keys().copied().collect();
        scale_ids.sort();
        for id in scale_ids {
            let s = self.scales[&id];
            if !s.is_finite() || s.min_element() <= 0.0 {
                return Err(CatalogError::InvalidScale {
                    id,
                    scale: s.to_array(),
                });
            }
        }
        let mut sound_ids: Vec<_> = self.sounds.keys().copied().collect();
        sound_ids.sort();
        for id in sound_ids {
            let file = &self.sounds[&id];
            if file.trim().is_empty() {
                return Err(CatalogError::EmptySound { id });
            }
            if file.starts_with('/') || file.contains("..") || file.contains("://") {
                return Err(CatalogError::NonRelativeSound {
                    id,
                    file: file.clone(),
                });
            }
        }
        Ok(())
    }
}
