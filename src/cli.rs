//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{NoiseParameters, RenderConfig, Tunables};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "skyterrain")]
#[command(about = "Fly over noise terrain under a day/night sky", long_about = None)]
pub struct Args {
    /// Seed for the terrain gradients (random when omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Cloud shell texture (generated when missing)
    #[arg(long, value_name = "PATH")]
    pub cloud_texture: Option<PathBuf>,

    /// Terrain texture, tinted brown (plain tint when missing)
    #[arg(long, value_name = "PATH")]
    pub terrain_texture: Option<PathBuf>,

    /// Terrain height multiplier (1-100)
    #[arg(long, value_name = "UNITS", default_value = "8")]
    pub amplitude: f32,

    /// World units per noise cell along X (1-30)
    #[arg(long, value_name = "UNITS", default_value = "2")]
    pub x_scale: f32,

    /// World units per noise cell along Y (1-30)
    #[arg(long, value_name = "UNITS", default_value = "2")]
    pub y_scale: f32,

    /// Exponential fog density (0-0.1)
    #[arg(long, value_name = "DENSITY", default_value = "0.02")]
    pub fog_density: f32,

    /// Initial window width (logical pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Initial window height (logical pixels)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,
}

impl Args {
    /// Starting tunables, clamped to their control ranges
    pub fn tunables(&self) -> Tunables {
        Tunables {
            noise: NoiseParameters {
                x_scale: self.x_scale,
                y_scale: self.y_scale,
                amplitude: self.amplitude,
            },
            fog_density: self.fog_density,
        }
        .clamped()
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width.max(1),
            window_height: self.height.max(1),
            ..RenderConfig::default()
        }
    }

    /// Gradient seed, drawn at random when not given
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tunables() {
        let args = Args::parse_from(["skyterrain"]);
        assert_eq!(args.tunables(), Tunables::default());
        assert_eq!(args.render_config().window_width, 1280);
        assert!(args.cloud_texture.is_none());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let args = Args::parse_from(["skyterrain", "--amplitude", "250", "--fog-density", "0.5"]);
        let tunables = args.tunables();
        assert_eq!(tunables.noise.amplitude, 100.0);
        assert_eq!(tunables.fog_density, 0.1);
    }

    #[test]
    fn test_nan_values_fall_back_to_defaults() {
        let args = Args::parse_from(["skyterrain", "--x-scale", "NaN", "--fog-density", "NaN"]);
        let tunables = args.tunables();
        assert_eq!(tunables.noise.x_scale, 2.0);
        assert_eq!(tunables.fog_density, 0.02);
    }

    #[test]
    fn test_explicit_seed_is_kept() {
        let args = Args::parse_from(["skyterrain", "--seed", "1234"]);
        assert_eq!(args.resolve_seed(), 1234);
    }
}
