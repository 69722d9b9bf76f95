//! Scene state and the per-frame tick.
//!
//! Everything here is GPU-free: the window driver calls [`SceneState::tick`]
//! once per redraw, then hands the result to the renderer.

use crate::camera::CameraRig;
use crate::clouds::CloudShell;
use crate::input::InputState;
use crate::params::{
    CameraParams, CloudParams, RenderConfig, SkyParams, TerrainLayout, Tunable, TunableChange,
    Tunables,
};
use crate::perlin::{GradientSource, NoiseField, RandomGradients};
use crate::sky::SkyDome;
use crate::terrain::TerrainGrid;

/// Drawable surface size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// A minimized window reports a zero extent
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// What the renderer must do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameUpdate {
    /// New surface size when the viewport changed since the previous tick
    pub resized: Option<Viewport>,
    /// Terrain vertices changed and must be re-uploaded
    pub terrain_dirty: bool,
    /// Surface has a non-zero extent and a frame can be presented
    pub drawable: bool,
}

/// All mutable scene state, owned by the frame loop
pub struct SceneState<G = RandomGradients> {
    pub noise: NoiseField<G>,
    pub terrain: TerrainGrid,
    pub sky: SkyDome,
    pub clouds: CloudShell,
    pub camera: CameraRig,
    pub tunables: Tunables,
    pub render_config: RenderConfig,
    viewport: Viewport,
    terrain_stale: bool,
}

/// Construction inputs for [`SceneState`]
#[derive(Debug, Clone, Default)]
pub struct SceneConfig {
    pub terrain: TerrainLayout,
    pub sky: SkyParams,
    pub clouds: CloudParams,
    pub camera: CameraParams,
    pub render: RenderConfig,
    pub tunables: Tunables,
}

impl<G: GradientSource> SceneState<G> {
    /// Build the scene and generate the initial terrain
    pub fn new(config: SceneConfig, mut noise: NoiseField<G>, viewport: Viewport) -> Self {
        let tunables = config.tunables.clamped();

        let mut terrain = TerrainGrid::new(&config.terrain);
        terrain.regenerate(&mut noise, &tunables.noise);

        let aspect = if viewport.is_empty() {
            config.render.aspect_ratio()
        } else {
            viewport.aspect_ratio()
        };

        Self {
            noise,
            terrain,
            sky: SkyDome::new(config.sky),
            clouds: CloudShell::new(config.clouds),
            camera: CameraRig::new(config.camera, aspect),
            tunables,
            render_config: config.render,
            viewport,
            terrain_stale: false,
        }
    }

    /// Adjust a tunable; noise changes schedule a terrain rebuild for the next tick
    pub fn adjust(&mut self, tunable: Tunable, steps: i32) -> TunableChange {
        let change = self.tunables.adjust(tunable, steps);
        if change == TunableChange::Terrain {
            self.terrain_stale = true;
        }
        change
    }

    /// Advance one frame
    ///
    /// Order: sky and clouds by fixed steps, viewport check, camera motion,
    /// then any pending terrain rebuild.
    pub fn tick(&mut self, input: &InputState, surface: Viewport) -> FrameUpdate {
        let sky_step = self.sky.params().step;
        let cloud_step = self.clouds.params().step;
        self.sky.update(sky_step);
        self.clouds.update(cloud_step);

        let resized = self.handle_resize(surface);

        self.camera.update(&input.motion);

        if self.terrain_stale {
            self.terrain.regenerate(&mut self.noise, &self.tunables.noise);
            self.terrain_stale = false;
        }

        FrameUpdate {
            resized,
            terrain_dirty: self.terrain.take_dirty(),
            drawable: !surface.is_empty(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn handle_resize(&mut self, surface: Viewport) -> Option<Viewport> {
        if surface == self.viewport || surface.is_empty() {
            return None;
        }

        self.viewport = surface;
        self.camera.set_aspect(surface.aspect_ratio());
        Some(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::NoiseParameters;

    fn scene() -> SceneState {
        SceneState::new(
            SceneConfig::default(),
            NoiseField::seeded(1),
            Viewport::new(800, 600),
        )
    }

    #[test]
    fn test_first_tick_uploads_initial_terrain() {
        let mut scene = scene();
        let input = InputState::default();

        let update = scene.tick(&input, Viewport::new(800, 600));
        assert!(update.terrain_dirty);
        assert_eq!(update.resized, None);

        let update = scene.tick(&input, Viewport::new(800, 600));
        assert!(!update.terrain_dirty);
    }

    #[test]
    fn test_resize_only_when_size_changes() {
        let mut scene = scene();
        let input = InputState::default();

        let update = scene.tick(&input, Viewport::new(1024, 512));
        assert_eq!(update.resized, Some(Viewport::new(1024, 512)));
        assert_eq!(scene.camera.aspect(), 2.0);

        let update = scene.tick(&input, Viewport::new(1024, 512));
        assert_eq!(update.resized, None);
        assert!(update.drawable);

        // Minimized windows keep the last size
        let update = scene.tick(&input, Viewport::new(0, 0));
        assert_eq!(update.resized, None);
        assert!(!update.drawable);
        assert_eq!(scene.viewport(), Viewport::new(1024, 512));
    }

    #[test]
    fn test_tick_advances_sky_and_clouds_by_fixed_steps() {
        let mut scene = scene();
        let input = InputState::default();
        for _ in 0..10 {
            scene.tick(&input, Viewport::new(800, 600));
        }

        assert!((scene.sky.time() - 0.1).abs() < 1e-5);
        assert!((scene.clouds.rotation_y() - 0.02).abs() < 1e-5);
    }

    #[test]
    fn test_tick_moves_camera_from_flags() {
        let mut scene = scene();
        let mut input = InputState::default();
        input.motion.forward = true;

        scene.tick(&input, Viewport::new(800, 600));
        scene.tick(&input, Viewport::new(800, 600));
        assert!((scene.camera.position.z + 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_amplitude_change_rebuilds_terrain() {
        let mut scene = scene();
        let input = InputState::default();
        scene.tick(&input, Viewport::new(800, 600));

        let before: Vec<f32> = scene.terrain.vertices.iter().map(|v| v.position[2]).collect();
        let amplitude = scene.tunables.noise.amplitude;

        assert_eq!(
            scene.adjust(Tunable::Amplitude, 8),
            TunableChange::Terrain
        );
        let update = scene.tick(&input, Viewport::new(800, 600));
        assert!(update.terrain_dirty);

        let ratio = scene.tunables.noise.amplitude / amplitude;
        for (vertex, h) in scene.terrain.vertices.iter().zip(before) {
            assert!((vertex.position[2] - h * ratio).abs() < 1e-4);
        }
    }

    #[test]
    fn test_fog_change_leaves_terrain_alone() {
        let mut scene = scene();
        let input = InputState::default();
        scene.tick(&input, Viewport::new(800, 600));

        assert_eq!(scene.adjust(Tunable::FogDensity, 1), TunableChange::Fog);
        let update = scene.tick(&input, Viewport::new(800, 600));
        assert!(!update.terrain_dirty);
        assert_eq!(scene.tunables.noise, NoiseParameters::default());
    }
}
