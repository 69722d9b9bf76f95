//! First-person free-flight camera with pointer look.

use std::f32::consts::FRAC_PI_2;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::input::MotionFlags;
use crate::params::{CameraParams, RenderConfig};

/// Camera rig: position, yaw/pitch orientation and projection aspect
pub struct CameraRig {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    aspect: f32,
    params: CameraParams,
}

impl CameraRig {
    pub fn new(params: CameraParams, aspect: f32) -> Self {
        Self {
            position: Vec3::from_array(params.position),
            yaw: 0.0,
            pitch: 0.0,
            aspect,
            params,
        }
    }

    /// Orientation built from yaw then pitch (YXZ order, no roll)
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Apply pointer motion in pixels
    ///
    /// Moving right turns left-handed around +Y, moving down pitches down;
    /// pitch stops at straight up and straight down.
    pub fn look(&mut self, dx: f64, dy: f64) {
        let sensitivity = self.params.look_sensitivity;
        self.yaw -= dx as f32 * sensitivity;
        self.pitch = (self.pitch - dy as f32 * sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Move the camera by one tick of the held directions
    ///
    /// # Returns
    /// The world-space displacement that was applied
    pub fn update(&mut self, motion: &MotionFlags) -> Vec3 {
        let speed = self.params.speed;
        let mut local = Vec3::ZERO;
        if motion.forward {
            local.z -= speed;
        }
        if motion.backward {
            local.z += speed;
        }
        if motion.left {
            local.x -= speed;
        }
        if motion.right {
            local.x += speed;
        }

        let world = self.orientation() * local;
        self.position += world;
        world
    }

    /// Unit vector the camera looks along
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.position).inverse()
    }

    /// Create view-projection matrix for rendering
    pub fn create_view_proj_matrix(&self, render_config: &RenderConfig) -> Mat4 {
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            self.aspect,
            render_config.near_plane_m,
            render_config.far_plane_m,
        );

        proj * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(CameraParams::default(), 16.0 / 9.0)
    }

    #[test]
    fn test_forward_moves_by_speed_along_view() {
        let mut camera = rig();
        camera.look(300.0, -120.0);

        let start = camera.position;
        let motion = MotionFlags {
            forward: true,
            ..MotionFlags::default()
        };
        camera.update(&motion);

        let expected = camera.forward() * CameraParams::default().speed;
        let delta = camera.position - start;
        assert!((delta - expected).length() < 1e-6);
        assert!((delta.length() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_default_orientation_looks_down_negative_z() {
        let mut camera = rig();
        let motion = MotionFlags {
            backward: true,
            right: true,
            ..MotionFlags::default()
        };
        camera.update(&motion);
        assert!((camera.position - Vec3::new(0.4, 0.0, 0.4)).length() < 1e-6);
    }

    #[test]
    fn test_diagonal_is_not_normalized() {
        let mut camera = rig();
        let motion = MotionFlags {
            forward: true,
            left: true,
            ..MotionFlags::default()
        };
        let moved = camera.update(&motion);
        assert!((moved.length() - 0.4 * 2f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut camera = rig();
        let motion = MotionFlags {
            forward: true,
            backward: true,
            left: true,
            right: true,
        };
        assert_eq!(camera.update(&motion), Vec3::ZERO);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = rig();
        camera.look(0.0, -100_000.0);
        assert_eq!(camera.pitch, FRAC_PI_2);

        camera.look(0.0, 100_000.0);
        assert_eq!(camera.pitch, -FRAC_PI_2);
    }

    #[test]
    fn test_look_right_turns_toward_positive_x() {
        let mut camera = rig();
        camera.look(100.0, 0.0);
        assert!(camera.forward().x > 0.0);
    }

    #[test]
    fn test_view_proj_matrix_generation() {
        let camera = rig();
        let view_proj = camera.create_view_proj_matrix(&RenderConfig::default());

        assert_ne!(view_proj, Mat4::IDENTITY);
        assert_ne!(view_proj, Mat4::ZERO);

        // A point straight ahead lands in the middle of the screen
        let clip = view_proj * Vec3::new(0.0, 0.0, -10.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
