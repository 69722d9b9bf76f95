//! Rendering configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Initial window width (logical pixels)
    pub window_width: u32,

    /// Initial window height (logical pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane_m: f32,

    /// Far clipping plane (world units)
    /// Covers the sky sphere from anywhere inside it.
    pub far_plane_m: f32,

    /// Fog and clear color (0xRRGGBB)
    pub fog_color: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 40.0,
            near_plane_m: 0.1,
            far_plane_m: 1000.0,
            fog_color: 0xaaaaaa,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }
}
