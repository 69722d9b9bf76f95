//! Day/night sky dome with its sun and ambient light.
//!
//! The clock is a single angle wrapped into [0, 2π). The sky shader receives
//! the raw angle and recomputes the color blend with the same formula as
//! [`SkyDome::sky_color`], using the endpoint colors pushed from here.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::color::{hsl_to_rgb, mix, Hsl};
use crate::params::SkyParams;

/// Directional light shining toward the origin
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Unit vector pointing from the scene toward the light
    pub direction: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Sky state: cycle clock plus the lights derived from it
pub struct SkyDome {
    time: f32,
    params: SkyParams,
    pub sun: DirectionalLight,
    pub ambient: AmbientLight,
}

impl SkyDome {
    pub fn new(params: SkyParams) -> Self {
        let sun = DirectionalLight {
            direction: Vec3::from_array(params.sun_position)
                .try_normalize()
                .unwrap_or(Vec3::Y),
            color: [1.0, 1.0, 1.0],
            intensity: params.initial_sun_intensity,
        };
        let ambient = AmbientLight {
            color: [1.0, 1.0, 1.0],
            intensity: params.ambient_intensity,
        };

        Self {
            time: 0.0,
            params,
            sun,
            ambient,
        }
    }

    /// Advance the cycle clock and refresh the sun
    pub fn update(&mut self, delta: f32) {
        self.time = (self.time + delta).rem_euclid(TAU);

        let intensity = self.sun_intensity();
        self.sun.intensity = intensity;
        self.sun.color = hsl_to_rgb(Hsl::new(
            self.params.sun_hue,
            self.params.sun_saturation,
            intensity * 0.8 + 0.2,
        ));
    }

    /// Cycle angle in [0, 2π)
    pub fn time(&self) -> f32 {
        self.time
    }

    /// 0 at full night, 1 at full day
    pub fn day_night_factor(&self) -> f32 {
        0.5 + 0.5 * self.time.sin()
    }

    pub fn sky_color(&self) -> [f32; 3] {
        mix(
            self.params.night_color,
            self.params.day_color,
            self.day_night_factor(),
        )
    }

    /// Sun intensity for the current clock, in [0.5, 1.5]
    pub fn sun_intensity(&self) -> f32 {
        1.0 + 0.5 * self.time.sin()
    }

    pub fn day_color(&self) -> [f32; 3] {
        self.params.day_color
    }

    pub fn night_color(&self) -> [f32; 3] {
        self.params.night_color
    }

    pub fn params(&self) -> &SkyParams {
        &self.params
    }
}
