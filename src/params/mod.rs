//! Parameter definitions with units and documented semantics.
//!
//! All scene constants live here with:
//! - Units (world units, radians, seconds per tick)
//! - Documented ranges and meanings
//! - Runtime-tunable values separated from fixed layout

mod camera;
mod render;
mod sky;
mod terrain;

// Re-export all types
pub use camera::CameraParams;
pub use render::RenderConfig;
pub use sky::{CloudParams, SkyParams};
pub use terrain::{NoiseParameters, TerrainLayout, Tunable, TunableChange, Tunables};
