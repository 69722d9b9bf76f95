//! Skyterrain - fly over noise-generated hills while the sky cycles
//! between day and night and a cloud shell turns overhead.
//!
//! Click to capture the mouse, WASD to fly, Escape to release (again to quit).
//! Keys 1-8 step the terrain x/y scale, noise amplitude and fog density.

use std::sync::Arc;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use skyterrain::cli::Args;
use skyterrain::color::rgb_from_hex;
use skyterrain::input::{tunable_for_key, InputState};
use skyterrain::mesh;
use skyterrain::params::TunableChange;
use skyterrain::perlin::NoiseField;
use skyterrain::rendering::{Drawable, ObjectUniforms, RenderSystem, SceneAssets, SceneUniforms};
use skyterrain::scene::{SceneConfig, SceneState, Viewport};
use skyterrain::texture::TextureImage;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation state
    scene: SceneState,
    input: InputState,

    // Configuration
    args: Args,
    seed: u64,
}

impl App {
    fn new(args: Args) -> Self {
        let seed = args.resolve_seed();
        log::info!("Terrain seed: {}", seed);

        let config = SceneConfig {
            render: args.render_config(),
            tunables: args.tunables(),
            ..SceneConfig::default()
        };
        let viewport = Viewport::new(config.render.window_width, config.render.window_height);
        let scene = SceneState::new(config, NoiseField::seeded(seed), viewport);

        let noise = scene.tunables.noise;
        log::info!(
            "Terrain: x scale {}, y scale {}, amplitude {}, fog {}",
            noise.x_scale,
            noise.y_scale,
            noise.amplitude,
            scene.tunables.fog_density
        );

        Self {
            window: None,
            render_system: None,
            scene,
            input: InputState::default(),
            args,
            seed,
        }
    }

    /// Build GPU resources for the current scene
    fn create_render_system(&self, window: Arc<Window>) -> Result<RenderSystem, String> {
        let sky_params = self.scene.sky.params();
        let cloud_params = self.scene.clouds.params();

        let sky_mesh = mesh::sphere(sky_params.radius_m, sky_params.segments, sky_params.segments);
        let cloud_mesh = mesh::sphere(
            cloud_params.radius_m,
            cloud_params.segments,
            cloud_params.segments,
        );
        let terrain_mesh = self.scene.terrain.mesh_data();

        let terrain_texture =
            TextureImage::load_or_else(self.args.terrain_texture.as_deref(), TextureImage::white);
        // Fold the seed into the 32 bits the fractal noise accepts
        let cloud_seed = (self.seed ^ (self.seed >> 32)) as u32;
        let cloud_texture = TextureImage::load_or_else(self.args.cloud_texture.as_deref(), || {
            TextureImage::procedural_clouds(512, 256, cloud_seed)
        });

        let render_system = pollster::block_on(RenderSystem::new(
            window,
            SceneAssets {
                terrain: &terrain_mesh,
                sky: &sky_mesh,
                clouds: &cloud_mesh,
                terrain_texture: &terrain_texture,
                cloud_texture: &cloud_texture,
            },
            self.scene.render_config.fog_color,
        ))?;

        // Sky and terrain never move
        render_system.update_object_uniforms(
            Drawable::Sky,
            &ObjectUniforms::new(glam::Mat4::IDENTITY, [1.0; 3], 1.0),
        );
        render_system.update_object_uniforms(
            Drawable::Terrain,
            &ObjectUniforms::new(
                self.scene.terrain.model_matrix(),
                rgb_from_hex(self.scene.terrain.layout().tint),
                1.0,
            ),
        );

        Ok(render_system)
    }

    /// Capture or release the pointer for mouse look
    fn set_pointer_lock(&mut self, locked: bool) {
        let Some(window) = &self.window else {
            return;
        };

        if locked {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                log::warn!("Pointer lock unavailable: {}", e);
                return;
            }
            window.set_cursor_visible(false);
        } else {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                log::warn!("Failed to release pointer: {}", e);
            }
            window.set_cursor_visible(true);
        }

        self.input.pointer_locked = locked;
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode, event: &KeyEvent) {
        let pressed = event.state == ElementState::Pressed;

        if code == KeyCode::Escape {
            if pressed && !event.repeat {
                if self.input.pointer_locked {
                    self.set_pointer_lock(false);
                } else {
                    event_loop.exit();
                }
            }
            return;
        }

        if self.input.motion.apply_key(code, pressed) {
            return;
        }

        if !pressed || event.repeat {
            return;
        }

        if let Some((tunable, steps)) = tunable_for_key(code) {
            match self.scene.adjust(tunable, steps) {
                TunableChange::Unchanged => {
                    log::debug!("{} already at limit", tunable.label());
                }
                TunableChange::Terrain | TunableChange::Fog => {
                    log::info!("{}: {}", tunable.label(), self.scene.tunables.get(tunable));
                }
            }
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Skyterrain")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.scene.render_config.window_width,
                self.scene.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // Initialize rendering system
        match self.create_render_system(Arc::clone(&window)) {
            Ok(render_system) => self.render_system = Some(render_system),
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        }

        log::info!("Click to look around, WASD to fly, Escape to release or quit");

        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.handle_key(event_loop, code, &event);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if !self.input.pointer_locked {
                    self.set_pointer_lock(true);
                }
            }
            WindowEvent::Focused(false) => {
                // Key-up events are lost while unfocused
                self.input.motion = Default::default();
                if self.input.pointer_locked {
                    self.set_pointer_lock(false);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.input.pointer_locked {
                self.scene.camera.look(delta.0, delta.1);
            }
        }
    }
}

impl App {
    /// Advance the scene and render a single frame
    fn render_frame(&mut self) {
        let Some(size) = self.window.as_ref().map(|w| w.inner_size()) else {
            return;
        };

        let update = self
            .scene
            .tick(&self.input, Viewport::new(size.width, size.height));

        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        if let Some(viewport) = update.resized {
            render_system.resize(viewport);
            let current = self.scene.viewport();
            log::debug!("Resized to {}x{}", current.width, current.height);
        }

        if update.terrain_dirty {
            render_system.update_terrain_vertices(&self.scene.terrain.vertices);
        }

        // Minimized: keep ticking, skip presenting
        if !update.drawable {
            return;
        }

        let scene = &self.scene;
        let view_proj = scene.camera.create_view_proj_matrix(&scene.render_config);
        render_system.update_scene_uniforms(&SceneUniforms::new(
            view_proj,
            scene.camera.position,
            scene.camera.forward(),
            &scene.sky,
            scene.tunables.fog_density,
            scene.render_config.fog_color,
        ));

        let clouds = &scene.clouds;
        render_system.update_object_uniforms(
            Drawable::Clouds,
            &ObjectUniforms::new(clouds.model_matrix(), [1.0; 3], clouds.params().opacity),
        );

        match render_system.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut app = App::new(args);

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return;
        }
    };

    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
