//! Terrain layout and the runtime tunables.

use std::f32::consts::PI;
use std::ops::RangeInclusive;

/// Noise sampling parameters (user tunable)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParameters {
    /// Planar X divisor before sampling (world units per noise cell)
    pub x_scale: f32,

    /// Planar Y divisor before sampling (world units per noise cell)
    pub y_scale: f32,

    /// Height multiplier applied to each noise sample (world units)
    pub amplitude: f32,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self {
            x_scale: 2.0,
            y_scale: 2.0,
            amplitude: 8.0,
        }
    }
}

/// Fixed terrain plane layout
#[derive(Debug, Clone)]
pub struct TerrainLayout {
    /// Plane extent along local X (world units)
    pub width_m: f32,

    /// Plane extent along local Y (world units)
    pub depth_m: f32,

    /// Subdivisions along X (vertices per row = segments_x + 1)
    pub segments_x: usize,

    /// Subdivisions along Y
    pub segments_y: usize,

    /// World-space Y offset of the plane
    pub elevation_m: f32,

    /// Rotation about X that lays the plane flat (local +Z becomes world +Y)
    ///
    /// Exactly 3π/2; the rounded 4.68 rad leaves the plane about 1.8° off level.
    pub tilt_rad: f32,

    /// Base tint multiplied with the terrain texture (0xRRGGBB)
    pub tint: u32,
}

impl Default for TerrainLayout {
    fn default() -> Self {
        Self {
            width_m: 1000.0,
            depth_m: 1000.0,
            segments_x: 40,
            segments_y: 40,
            elevation_m: -15.0,
            tilt_rad: 1.5 * PI,
            tint: 0x7a4b22,
        }
    }
}

/// A single adjustable control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tunable {
    XScale,
    YScale,
    Amplitude,
    FogDensity,
}

impl Tunable {
    /// Allowed range of the control
    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            Tunable::XScale | Tunable::YScale => 1.0..=30.0,
            Tunable::Amplitude => 1.0..=100.0,
            Tunable::FogDensity => 0.0..=0.1,
        }
    }

    /// Increment applied per key press
    pub fn step(self) -> f32 {
        match self {
            Tunable::XScale | Tunable::YScale | Tunable::Amplitude => 1.0,
            Tunable::FogDensity => 0.005,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tunable::XScale => "x scale",
            Tunable::YScale => "y scale",
            Tunable::Amplitude => "noise",
            Tunable::FogDensity => "fog",
        }
    }

    /// Clamp into range; NaN falls back to the default value
    fn clamp(self, value: f32) -> f32 {
        if value.is_nan() {
            return Tunables::default().get(self);
        }
        let range = self.range();
        value.clamp(*range.start(), *range.end())
    }
}

/// What a tunable change requires from the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunableChange {
    /// Value hit its limit, nothing to do
    Unchanged,
    /// Noise parameters changed, terrain must be regenerated
    Terrain,
    /// Fog density changed, only the fog uniform is affected
    Fog,
}

/// Everything the user can adjust at runtime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tunables {
    pub noise: NoiseParameters,

    /// Exponential-squared fog density
    pub fog_density: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            noise: NoiseParameters::default(),
            fog_density: 0.02,
        }
    }
}

impl Tunables {
    pub fn get(&self, tunable: Tunable) -> f32 {
        match tunable {
            Tunable::XScale => self.noise.x_scale,
            Tunable::YScale => self.noise.y_scale,
            Tunable::Amplitude => self.noise.amplitude,
            Tunable::FogDensity => self.fog_density,
        }
    }

    /// Set a control, clamped to its range
    pub fn set(&mut self, tunable: Tunable, value: f32) -> TunableChange {
        let value = tunable.clamp(value);
        if value == self.get(tunable) {
            return TunableChange::Unchanged;
        }

        match tunable {
            Tunable::XScale => self.noise.x_scale = value,
            Tunable::YScale => self.noise.y_scale = value,
            Tunable::Amplitude => self.noise.amplitude = value,
            Tunable::FogDensity => {
                self.fog_density = value;
                return TunableChange::Fog;
            }
        }
        TunableChange::Terrain
    }

    /// Move a control by `steps` increments
    pub fn adjust(&mut self, tunable: Tunable, steps: i32) -> TunableChange {
        let value = self.get(tunable) + steps as f32 * tunable.step();
        self.set(tunable, value)
    }

    /// Clamp every value into its range
    pub fn clamped(mut self) -> Self {
        self.noise.x_scale = Tunable::XScale.clamp(self.noise.x_scale);
        self.noise.y_scale = Tunable::YScale.clamp(self.noise.y_scale);
        self.noise.amplitude = Tunable::Amplitude.clamp(self.noise.amplitude);
        self.fog_density = Tunable::FogDensity.clamp(self.fog_density);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_change_requests_terrain() {
        let mut tunables = Tunables::default();
        assert_eq!(
            tunables.adjust(Tunable::Amplitude, 1),
            TunableChange::Terrain
        );
        assert_eq!(tunables.noise.amplitude, 9.0);

        assert_eq!(tunables.adjust(Tunable::XScale, -1), TunableChange::Terrain);
        assert_eq!(tunables.noise.x_scale, 1.0);
    }

    #[test]
    fn test_fog_change_never_requests_terrain() {
        let mut tunables = Tunables::default();
        assert_eq!(tunables.adjust(Tunable::FogDensity, 2), TunableChange::Fog);
        assert!((tunables.fog_density - 0.03).abs() < 1e-6);
        assert_eq!(tunables.noise, NoiseParameters::default());
    }

    #[test]
    fn test_values_clamp_to_range() {
        let mut tunables = Tunables::default();
        tunables.set(Tunable::YScale, 1.0);
        assert_eq!(tunables.adjust(Tunable::YScale, -1), TunableChange::Unchanged);
        assert_eq!(tunables.noise.y_scale, 1.0);

        tunables.set(Tunable::Amplitude, 500.0);
        assert_eq!(tunables.noise.amplitude, 100.0);

        tunables.set(Tunable::FogDensity, -1.0);
        assert_eq!(tunables.fog_density, 0.0);
    }

    #[test]
    fn test_clamped_sanitizes_all_fields() {
        let tunables = Tunables {
            noise: NoiseParameters {
                x_scale: 0.0,
                y_scale: 99.0,
                amplitude: -3.0,
            },
            fog_density: 1.0,
        }
        .clamped();

        assert_eq!(tunables.noise.x_scale, 1.0);
        assert_eq!(tunables.noise.y_scale, 30.0);
        assert_eq!(tunables.noise.amplitude, 1.0);
        assert_eq!(tunables.fog_density, 0.1);
    }

    #[test]
    fn test_nan_falls_back_to_default() {
        let tunables = Tunables {
            noise: NoiseParameters {
                x_scale: f32::NAN,
                y_scale: f32::INFINITY,
                amplitude: f32::NAN,
            },
            fog_density: f32::NAN,
        }
        .clamped();

        assert_eq!(tunables.noise.x_scale, 2.0);
        assert_eq!(tunables.noise.y_scale, 30.0);
        assert_eq!(tunables.noise.amplitude, 8.0);
        assert_eq!(tunables.fog_density, 0.02);

        let mut tunables = Tunables::default();
        assert_eq!(
            tunables.set(Tunable::Amplitude, f32::NAN),
            TunableChange::Unchanged
        );
    }
}
