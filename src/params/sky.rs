//! Sky dome, lighting and cloud shell parameters.

/// Sky dome and light parameters
#[derive(Debug, Clone)]
pub struct SkyParams {
    /// Sky color at full day (linear RGB)
    pub day_color: [f32; 3],

    /// Sky color at full night (linear RGB)
    pub night_color: [f32; 3],

    /// Radius of the sky sphere (world units)
    pub radius_m: f32,

    /// Sphere subdivisions (both directions)
    pub segments: usize,

    /// Clock advance per tick (radians of the day cycle)
    pub step: f32,

    /// Sun hue and saturation; lightness follows intensity
    pub sun_hue: f32,
    pub sun_saturation: f32,

    /// Sun intensity before the first update
    pub initial_sun_intensity: f32,

    /// Point the sun shines from (toward the origin)
    pub sun_position: [f32; 3],

    /// Ambient light intensity (white)
    pub ambient_intensity: f32,
}

impl Default for SkyParams {
    fn default() -> Self {
        Self {
            day_color: [0.5, 0.7, 1.0],
            night_color: [0.05, 0.05, 0.2],
            radius_m: 500.0,
            segments: 32,
            step: 0.01,
            sun_hue: 0.6,
            sun_saturation: 0.8,
            initial_sun_intensity: 1.2,
            sun_position: [0.0, 1.0, 0.0],
            ambient_intensity: 2.0,
        }
    }
}

/// Cloud shell parameters
#[derive(Debug, Clone)]
pub struct CloudParams {
    /// Radius of the cloud sphere, inside the sky (world units)
    pub radius_m: f32,

    /// Sphere subdivisions (both directions)
    pub segments: usize,

    /// Time advance per tick passed to the shell
    pub step: f32,

    /// Yaw gained per unit of time (radians)
    pub rotation_speed: f32,

    /// Material opacity
    pub opacity: f32,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            radius_m: 480.0,
            segments: 32,
            step: 0.1,
            rotation_speed: 0.02,
            opacity: 0.8,
        }
    }
}
