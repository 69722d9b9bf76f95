//! Keyboard state and key bindings.

use winit::keyboard::KeyCode;

use crate::params::Tunable;

/// Directional keys currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MotionFlags {
    /// Apply a key transition. Returns false for keys that are not directional.
    pub fn apply_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let flag = match key {
            KeyCode::KeyW => &mut self.forward,
            KeyCode::KeyS => &mut self.backward,
            KeyCode::KeyA => &mut self.left,
            KeyCode::KeyD => &mut self.right,
            _ => return false,
        };
        *flag = pressed;
        true
    }
}

/// Key bound to a tunable: which control and which direction
pub fn tunable_for_key(key: KeyCode) -> Option<(Tunable, i32)> {
    match key {
        KeyCode::Digit1 => Some((Tunable::XScale, -1)),
        KeyCode::Digit2 => Some((Tunable::XScale, 1)),
        KeyCode::Digit3 => Some((Tunable::YScale, -1)),
        KeyCode::Digit4 => Some((Tunable::YScale, 1)),
        KeyCode::Digit5 => Some((Tunable::Amplitude, -1)),
        KeyCode::Digit6 => Some((Tunable::Amplitude, 1)),
        KeyCode::Digit7 => Some((Tunable::FogDensity, -1)),
        KeyCode::Digit8 => Some((Tunable::FogDensity, 1)),
        _ => None,
    }
}

/// Input state owned by the frame loop
#[derive(Debug, Default)]
pub struct InputState {
    pub motion: MotionFlags,
    /// Pointer captured for mouse look
    pub pointer_locked: bool,
}
