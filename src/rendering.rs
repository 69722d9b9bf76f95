//! Rendering system with wgpu pipelines, buffers and textures.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::color::rgb_from_hex;
use crate::mesh::{MeshData, Vertex};
use crate::scene::Viewport;
use crate::sky::SkyDome;
use crate::texture::TextureImage;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame uniforms shared by every pipeline (camera, lights, fog, sky clock)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub fog_density: f32,
    pub fog_color: [f32; 3],
    pub time: f32,
    pub sun_direction: [f32; 3],
    pub sun_intensity: f32,
    pub sun_color: [f32; 3],
    pub ambient_intensity: f32,
    pub ambient_color: [f32; 3],
    pub _padding0: f32,
    pub day_color: [f32; 3],
    pub _padding1: f32,
    pub night_color: [f32; 3],
    pub _padding2: f32,
    pub camera_forward: [f32; 3],
    pub _padding3: f32,
}

impl SceneUniforms {
    pub fn new(
        view_proj: Mat4,
        camera_pos: Vec3,
        camera_forward: Vec3,
        sky: &SkyDome,
        fog_density: f32,
        fog_color: u32,
    ) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera_pos.to_array(),
            fog_density,
            fog_color: rgb_from_hex(fog_color),
            time: sky.time(),
            sun_direction: sky.sun.direction.to_array(),
            sun_intensity: sky.sun.intensity,
            sun_color: sky.sun.color,
            ambient_intensity: sky.ambient.intensity,
            ambient_color: sky.ambient.color,
            _padding0: 0.0,
            day_color: sky.day_color(),
            _padding1: 0.0,
            night_color: sky.night_color(),
            _padding2: 0.0,
            camera_forward: camera_forward.to_array(),
            _padding3: 0.0,
        }
    }
}

/// Per-object uniforms (model matrix + tint, alpha is opacity)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

impl ObjectUniforms {
    pub fn new(model: Mat4, tint: [f32; 3], opacity: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            tint: [tint[0], tint[1], tint[2], opacity],
        }
    }
}

/// Which drawable a call refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drawable {
    Sky,
    Terrain,
    Clouds,
}

/// Geometry and textures needed to build the renderer
pub struct SceneAssets<'a> {
    pub terrain: &'a MeshData,
    pub sky: &'a MeshData,
    pub clouds: &'a MeshData,
    pub terrain_texture: &'a TextureImage,
    pub cloud_texture: &'a TextureImage,
}

/// GPU resources of one mesh
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl GpuMesh {
    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Rendering system managing wgpu device, pipelines, and buffers
pub struct RenderSystem {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sky_pipeline: wgpu::RenderPipeline,
    terrain_pipeline: wgpu::RenderPipeline,
    cloud_pipeline: wgpu::RenderPipeline,
    scene_uniform_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    sky: GpuMesh,
    terrain: GpuMesh,
    clouds: GpuMesh,
    depth_view: wgpu::TextureView,
    clear_color: wgpu::Color,
}

impl RenderSystem {
    /// Create new rendering system
    pub async fn new(
        window: std::sync::Arc<winit::window::Window>,
        assets: SceneAssets<'_>,
        clear_color: u32,
    ) -> Result<Self, String> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance
            .create_surface(window)
            .map_err(|e| format!("Failed to create surface: {}", e))?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or("Failed to find suitable GPU adapter")?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        // Request device
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| format!("Failed to request device: {}", e))?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or("Surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, config.width, config.height);

        // Load shaders
        let lit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Lit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("lit.wgsl").into()),
        });

        let sky_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sky Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sky.wgsl").into()),
        });

        // Scene uniforms (group 0)
        let scene_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_uniform_buffer.as_entire_binding(),
            }],
        });

        // Object uniforms + texture (group 1)
        let object_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Object Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let white = TextureImage::white();
        let build_mesh = |label: &str, mesh: &MeshData, image: &TextureImage, writable: bool| {
            let texture_view = upload_texture(&device, &queue, label, image);
            create_gpu_mesh(
                &device,
                &object_bind_group_layout,
                &sampler,
                label,
                mesh,
                &texture_view,
                writable,
            )
        };

        let sky = build_mesh("Sky", assets.sky, &white, false);
        let terrain = build_mesh("Terrain", assets.terrain, assets.terrain_texture, true);
        let clouds = build_mesh("Clouds", assets.clouds, assets.cloud_texture, false);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout, &object_bind_group_layout],
            push_constant_ranges: &[],
        });

        // Sky is seen from inside the sphere
        let sky_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            PipelineSettings {
                label: "Sky Pipeline",
                shader: &sky_shader,
                format: config.format,
                cull_mode: Some(wgpu::Face::Front),
                blend: None,
                depth_write: true,
            },
        );

        let terrain_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            PipelineSettings {
                label: "Terrain Pipeline",
                shader: &lit_shader,
                format: config.format,
                cull_mode: Some(wgpu::Face::Back),
                blend: None,
                depth_write: true,
            },
        );

        // Transparent, double sided, drawn last without depth writes
        let cloud_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            PipelineSettings {
                label: "Cloud Pipeline",
                shader: &lit_shader,
                format: config.format,
                cull_mode: None,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth_write: false,
            },
        );

        let [r, g, b] = rgb_from_hex(clear_color);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sky_pipeline,
            terrain_pipeline,
            cloud_pipeline,
            scene_uniform_buffer,
            scene_bind_group,
            sky,
            terrain,
            clouds,
            depth_view,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
        })
    }

    /// Reconfigure the surface and depth buffer for a new drawable size
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, viewport.width, viewport.height);
    }

    /// Reapply the current configuration (after the surface was lost)
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Update terrain vertex buffer with new mesh data
    pub fn update_terrain_vertices(&self, vertices: &[Vertex]) {
        self.queue.write_buffer(
            &self.terrain.vertex_buffer,
            0,
            bytemuck::cast_slice(vertices),
        );
    }

    /// Update shared scene uniforms
    pub fn update_scene_uniforms(&self, uniforms: &SceneUniforms) {
        self.queue
            .write_buffer(&self.scene_uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Update one drawable's object uniforms
    pub fn update_object_uniforms(&self, drawable: Drawable, uniforms: &ObjectUniforms) {
        let mesh = match drawable {
            Drawable::Sky => &self.sky,
            Drawable::Terrain => &self.terrain,
            Drawable::Clouds => &self.clouds,
        };
        self.queue
            .write_buffer(&mesh.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Render a frame
    pub fn render(&self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

            // Opaque first: sky, then terrain
            render_pass.set_pipeline(&self.sky_pipeline);
            self.sky.draw(&mut render_pass);

            render_pass.set_pipeline(&self.terrain_pipeline);
            self.terrain.draw(&mut render_pass);

            // Transparent clouds last
            render_pass.set_pipeline(&self.cloud_pipeline);
            self.clouds.draw(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Knobs that differ between the scene pipelines
struct PipelineSettings<'a> {
    label: &'a str,
    shader: &'a wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    cull_mode: Option<wgpu::Face>,
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    settings: PipelineSettings<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(settings.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: settings.shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x3,
                    2 => Float32x2
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: settings.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: settings.format,
                blend: settings.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: settings.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: settings.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &TextureImage,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&format!("{} Texture", label)),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.rgba,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_gpu_mesh(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    mesh: &MeshData,
    texture_view: &wgpu::TextureView,
    writable: bool,
) -> GpuMesh {
    let mut vertex_usage = wgpu::BufferUsages::VERTEX;
    if writable {
        vertex_usage |= wgpu::BufferUsages::COPY_DST;
    }

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Vertex Buffer", label)),
        contents: bytemuck::cast_slice(&mesh.vertices),
        usage: vertex_usage,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Index Buffer", label)),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    let uniforms = ObjectUniforms::new(Mat4::IDENTITY, [1.0; 3], 1.0);
    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Uniform Buffer", label)),
        contents: bytemuck::bytes_of(&uniforms),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{} Bind Group", label)),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(texture_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: mesh.indices.len() as u32,
        uniform_buffer,
        bind_group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SkyParams;

    #[test]
    fn test_uniform_layouts_match_shaders() {
        // WGSL packs each vec3 with the following f32 into 16 bytes
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 64 + 8 * 16);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 80);
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn test_scene_uniforms_carry_sky_state() {
        let mut sky = SkyDome::new(SkyParams::default());
        sky.update(0.5);

        let uniforms = SceneUniforms::new(
            Mat4::IDENTITY,
            Vec3::ONE,
            Vec3::NEG_Z,
            &sky,
            0.02,
            0xaaaaaa,
        );
        assert_eq!(uniforms.time, sky.time());
        assert_eq!(uniforms.sun_intensity, sky.sun_intensity());
        assert_eq!(uniforms.day_color, SkyParams::default().day_color);
        assert_eq!(uniforms.night_color, SkyParams::default().night_color);
        assert_eq!(uniforms.fog_density, 0.02);
        assert_eq!(uniforms.camera_pos, [1.0, 1.0, 1.0]);
        assert_eq!(uniforms.camera_forward, [0.0, 0.0, -1.0]);
    }

    #[test]
    fn test_object_uniforms_pack_opacity() {
        let uniforms = ObjectUniforms::new(Mat4::IDENTITY, [0.1, 0.2, 0.3], 0.8);
        assert_eq!(uniforms.tint, [0.1, 0.2, 0.3, 0.8]);
    }
}
