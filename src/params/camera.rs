//! First-person camera configuration.

/// Free-flight camera parameters
#[derive(Debug, Clone)]
pub struct CameraParams {
    /// Starting position (world units)
    pub position: [f32; 3],

    /// Displacement per tick for each active direction key (world units)
    /// Diagonals are not normalized.
    pub speed: f32,

    /// Look rotation per pixel of pointer motion (radians)
    pub look_sensitivity: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            speed: 0.4,
            look_sensitivity: 0.002,
        }
    }
}
