use glam::Vec3;
use std::f32::consts::PI;

// Real spherical-harmonic basis constants, bands 0..=2.
const SH_C0: f32 = 0.282_095;
const SH_C1: f32 = 0.488_603;
const SH_C2: f32 = 1.092_548;
const SH_C3: f32 = 0.315_392;
const SH_C4: f32 = 0.546_274;

// Cosine-lobe convolution per band, divided by pi so the result reads as radiance.
const BAND_WEIGHTS: [f32; 3] = [1.0, 2.0 / 3.0, 0.25];

#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    #[error("hdr decode: {0}")]
    Decode(#[from] image::ImageError),
    #[error("panorama is {width}x{height} but has {len} floats")]
    SizeMismatch {
        width: u32,
        height: u32,
        len: usize,
    },
    #[error("panorama is empty")]
    Empty,
}

/// Linear RGB equirectangular panorama, row 0 at the zenith.
#[derive(Clone, Debug)]
pub struct Panorama {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<f32>,
}

impl Panorama {
    pub fn from_hdr(bytes: &[u8]) -> Result<Self, EnvironmentError> {
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Hdr)?;
        let rgb = img.to_rgb32f();
        Ok(Self {
            width: rgb.width(),
            height: rgb.height(),
            rgb: rgb.into_raw(),
        })
    }

    fn check(&self) -> Result<(), EnvironmentError> {
        if self.width == 0 || self.height == 0 {
            return Err(EnvironmentError::Empty);
        }
        let want = self.width as usize * self.height as usize * 3;
        if self.rgb.len() != want {
            return Err(EnvironmentError::SizeMismatch {
                width: self.width,
                height: self.height,
                len: self.rgb.len(),
            });
        }
        Ok(())
    }
}

/// Diffuse-prefiltered environment: nine SH coefficients per colour channel.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvironmentMap {
    pub sh: [Vec3; 9],
}

#[inline]
fn sh_basis(n: Vec3) -> [f32; 9] {
    [
        SH_C0,
        SH_C1 * n.y,
        SH_C1 * n.z,
        SH_C1 * n.x,
        SH_C2 * n.x * n.y,
        SH_C2 * n.y * n.z,
        SH_C3 * (3.0 * n.z * n.z - 1.0),
        SH_C2 * n.x * n.z,
        SH_C4 * (n.x * n.x - n.y * n.y),
    ]
}

impl EnvironmentMap {
    /// Radiance-equivalent diffuse lighting arriving at a surface facing `normal`.
    pub fn irradiance(&self, normal: Vec3) -> Vec3 {
        let basis = sh_basis(normal.normalize_or_zero());
        self.sh
            .iter()
            .zip(basis)
            .fold(Vec3::ZERO, |acc, (c, b)| acc + *c * b)
    }

    /// Flattened for a `vec3[9]` shader uniform.
    pub fn uniform_array(&self) -> [f32; 27] {
        let mut out = [0.0; 27];
        for (i, c) in self.sh.iter().enumerate() {
            out[i * 3..i * 3 + 3].copy_from_slice(&c.to_array());
        }
        out
    }
}

/// Projects panoramas onto SH. Holds per-row scratch that is reused across
/// calls with the same height; drop it once the environment is built.
#[derive(Debug, Default)]
pub struct EnvironmentGenerator {
    dims: (u32, u32),
    rows: Vec<(f32, f32, f32)>,
}

impl EnvironmentGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    // (sin theta, cos theta, solid angle weight) per row.
    fn prepare_rows(&mut self, width: u32, height: u32) {
        if self.dims == (width, height) && !self.rows.is_empty() {
            return;
        }
        self.dims = (width, height);
        let d_theta = PI / height as f32;
        let d_phi = 2.0 * PI / width as f32;
        self.rows = (0..height)
            .map(|j| {
                let theta = (j as f32 + 0.5) * d_theta;
                let (s, c) = theta.sin_cos();
                (s, c, s * d_theta * d_phi)
            })
            .collect();
    }

    pub fn from_equirectangular(&mut self, pano: &Panorama) -> Result<EnvironmentMap, EnvironmentError> {
        pano.check()?;
        self.prepare_rows(pano.width, pano.height);
        let w = pano.width as usize;
        let mut acc = [Vec3::ZERO; 9];
        let mut total_weight = 0.0_f32;
        for (j, &(sin_t, cos_t, weight)) in self.rows.iter().enumerate() {
            for i in 0..w {
                let phi = ((i as f32 + 0.5) / w as f32 - 0.5) * 2.0 * PI;
                let (sin_p, cos_p) = phi.sin_cos();
                let dir = Vec3::new(sin_t * cos_p, cos_t, sin_t * sin_p);
                let px = (j * w + i) * 3;
                let radiance = Vec3::new(pano.rgb[px], pano.rgb[px + 1], pano.rgb[px + 2]);
                if !radiance.is_finite() {
                    continue;
                }
                for (a, b) in acc.iter_mut().zip(sh_basis(dir)) {
                    *a += radiance * (b * weight);
                }
                total_weight += weight;
            }
        }
        // Renormalise the discrete quadrature to exactly 4 pi.
        let norm = if total_weight > 0.0 {
            4.0 * PI / total_weight
        } else {
            0.0
        };
        let mut sh = [Vec3::ZERO; 9];
        for (k, c) in sh.iter_mut().enumerate() {
            let band = match k {
                0 => 0,
                1..=3 => 1,
                _ => 2,
            };
            *c = acc[k] * norm * BAND_WEIGHTS[band];
        }
        Ok(EnvironmentMap { sh })
    }
}
