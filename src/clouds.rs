//! Semi-transparent cloud shell spinning slowly inside the sky dome.

use glam::Mat4;

use crate::params::CloudParams;

pub struct CloudShell {
    /// Accumulated yaw (radians), never wrapped
    rotation_y: f32,
    params: CloudParams,
}

impl CloudShell {
    pub fn new(params: CloudParams) -> Self {
        Self {
            rotation_y: 0.0,
            params,
        }
    }

    pub fn update(&mut self, delta: f32) {
        self.rotation_y += delta * self.params.rotation_speed;
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation_y)
    }

    pub fn params(&self) -> &CloudParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_rotation_accumulates() {
        let mut clouds = CloudShell::new(CloudParams::default());
        for _ in 0..10 {
            clouds.update(0.1);
        }
        assert!((clouds.rotation_y() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_model_matrix_spins_about_y() {
        let mut clouds = CloudShell::new(CloudParams::default());
        clouds.update(50.0);

        let spun = clouds.model_matrix().transform_vector3(Vec3::X);
        assert!((spun.y).abs() < 1e-6);
        assert!((spun.x - 1.0f32.cos()).abs() < 1e-5);
    }
}
