//! Texture images: decoded from disk, or generated when no file is usable.

use std::f64::consts::TAU;
use std::path::Path;

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Tightly packed RGBA8 pixels
#[derive(Debug, Clone)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Decode an image file into RGBA8
    pub fn load(path: &Path) -> Result<Self, String> {
        let image = image::open(path)
            .map_err(|e| format!("Failed to load texture {}: {}", path.display(), e))?
            .to_rgba8();

        Ok(Self {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }

    /// Single opaque white texel, for untextured materials
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }

    /// Load `path` if given, falling back to `fallback` on any failure
    pub fn load_or_else(path: Option<&Path>, fallback: impl FnOnce() -> Self) -> Self {
        match path.map(Self::load) {
            Some(Ok(image)) => {
                log::info!("Loaded texture {}x{}", image.width, image.height);
                image
            }
            Some(Err(e)) => {
                log::warn!("{}; using generated texture", e);
                fallback()
            }
            None => fallback(),
        }
    }

    /// Fractal cloud cover, white with noise-driven alpha
    ///
    /// Sampled on a cylinder so the left and right edges meet seamlessly when
    /// wrapped around a sphere.
    pub fn procedural_clouds(width: u32, height: u32, seed: u32) -> Self {
        let fbm = Fbm::<Perlin>::new(seed).set_octaves(5);
        let radius = 2.0;
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);

        for y in 0..height {
            let v = y as f64 / height as f64;
            for x in 0..width {
                let angle = x as f64 / width as f64 * TAU;
                let sample = fbm.get([angle.cos() * radius, angle.sin() * radius, v * 6.0]);
                let cover = ((sample + 0.1) * 1.6).clamp(0.0, 1.0);
                rgba.extend_from_slice(&[255, 255, 255, (cover * 255.0) as u8]);
            }
        }

        Self {
            width,
            height,
            rgba,
        }
    }
}
