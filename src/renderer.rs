mod gpu_meshes;
mod shaders;
mod textures;
mod uniforms_buffers;

use anyhow::Context;
use tracing::{debug, info, warn};
use winit::window::Window;

use crate::{
    appearance::Appearance, camera::Camera, color::Color, pipeline::PreparedScene,
    viewer::RenderSurface,
};

use gpu_meshes::{DrawStyle, GpuMesh};
use shaders::{BindGroupLayouts, PerFrameUniforms};
use textures::Texture;

/// Draws prepared scenes into a window.
pub struct Renderer<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    window_size: winit::dpi::PhysicalSize<u32>,
    depth_texture: Texture,
    layouts: BindGroupLayouts,
    front_pipeline: wgpu::RenderPipeline,
    double_sided_pipeline: wgpu::RenderPipeline,
    wireframe_pipeline: wgpu::RenderPipeline,
    per_frame_uniforms: PerFrameUniforms,
    /// Meshes of the attached scene. Empty when nothing is attached.
    meshes: Vec<GpuMesh>,
    clear_color: wgpu::Color,
    /// Must be the last field so it is dropped after `surface`, which refers
    /// to it.
    window: &'a Window,
}

impl<'a> Renderer<'a> {
    pub async fn new(window: &'a Window, appearance: &Appearance) -> anyhow::Result<Self> {
        let window_size = window.inner_size();

        // Create a WGPU instance that can use any supported graphics API.
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create the main rendering surface and then get an adapter that acts
        // as the handle to one of the machine's physical GPU(s).
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter is compatible with the main window")?;

        info!("using graphics adapter {:?}", adapter.get_info());

        // Get a communication channel to the graphics card and a queue for
        // submitting commands to.
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        // Set the main rendering surface to use an sRGB texture, and then allow
        // all shaders to assume they are writing to an sRGB back buffer.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the main rendering surface has no supported formats")?;

        if surface_format.is_srgb() {
            info!("rendering surface supports sRGB");
        } else {
            info!("no sRGB support found for the main rendering surface, defaulting to first available");
        }

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: window_size.width.max(1),
            height: window_size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);

        let layouts = BindGroupLayouts::new(&device);
        let mut per_frame_uniforms = PerFrameUniforms::new(&device, &layouts);
        per_frame_uniforms.set_lights(appearance);

        // Create a depth buffer to ensure fragments are correctly rendered
        // back to front.
        let depth_texture =
            Texture::create_depth_texture(&device, &surface_config, Some("depth buffer"));

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("standard shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("renderer/shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("standard pipeline layout"),
            bind_group_layouts: &[&layouts.per_frame_layout, &layouts.per_mesh_layout],
            push_constant_ranges: &[],
        });

        let create_pipeline = |label: &str, style: DrawStyle| {
            create_render_pipeline(
                &device,
                &pipeline_layout,
                &shader,
                surface_config.format,
                label,
                style,
            )
        };

        let front_pipeline = create_pipeline("front faces pipeline", DrawStyle::Front);
        let double_sided_pipeline = create_pipeline("double sided pipeline", DrawStyle::Double);
        let wireframe_pipeline = create_pipeline("wireframe pipeline", DrawStyle::Wireframe);

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            window_size,
            depth_texture,
            layouts,
            front_pipeline,
            double_sided_pipeline,
            wireframe_pipeline,
            per_frame_uniforms,
            meshes: Vec::new(),
            clear_color: clear_color(appearance.background),
            window,
        })
    }

    pub fn window(&self) -> &Window {
        self.window
    }

    pub fn window_size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.window_size
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width == 0 || new_height == 0 {
            warn!("invalid width of {new_width} or height {new_height} when resizing");
            return;
        }

        self.window_size = winit::dpi::PhysicalSize::new(new_width, new_height);
        self.surface_config.width = new_width;
        self.surface_config.height = new_height;
        self.surface.configure(&self.device, &self.surface_config);

        // Recreate the depth buffer to match the new window size.
        self.depth_texture =
            Texture::create_depth_texture(&self.device, &self.surface_config, Some("depth buffer"));
    }

    /// Draw the attached scene as seen by `camera`. Opaque meshes are drawn
    /// before translucent ones.
    pub fn render(&mut self, camera: &Camera) -> Result<(), wgpu::SurfaceError> {
        self.per_frame_uniforms
            .set_view_projection(camera.view_projection_matrix());
        self.per_frame_uniforms.buffer.update_gpu(&self.queue);

        let backbuffer = self.surface.get_current_texture()?;
        let view = backbuffer
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut command_encoder =
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render loop encoder"),
                });

        {
            let mut render_pass = command_encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.per_frame_uniforms.buffer.bind_group(), &[]);

            let opaque = self.meshes.iter().filter(|m| !m.is_translucent());
            let translucent = self.meshes.iter().filter(|m| m.is_translucent());

            for mesh in opaque.chain(translucent) {
                render_pass.set_pipeline(match mesh.style() {
                    DrawStyle::Front => &self.front_pipeline,
                    DrawStyle::Double => &self.double_sided_pipeline,
                    DrawStyle::Wireframe => &self.wireframe_pipeline,
                });

                mesh.draw(&mut render_pass);
            }
        }

        self.queue.submit(std::iter::once(command_encoder.finish()));
        backbuffer.present();

        Ok(())
    }
}

impl RenderSurface for Renderer<'_> {
    fn attach(&mut self, scene: &PreparedScene, _appearance: &Appearance) -> anyhow::Result<()> {
        for mesh in scene.graph.meshes() {
            match GpuMesh::new(&self.device, &self.layouts, &mesh) {
                Some(gpu_mesh) => self.meshes.push(gpu_mesh),
                None => debug!("skipping mesh {} with nothing to draw", mesh.node.name),
            }
        }

        debug!(
            "attached {} meshes: {:?}",
            self.meshes.len(),
            self.meshes.iter().map(GpuMesh::name).collect::<Vec<_>>()
        );

        Ok(())
    }

    fn detach(&mut self) {
        self.meshes.clear();
    }

    fn set_appearance(&mut self, appearance: &Appearance) {
        self.clear_color = clear_color(appearance.background);
        self.per_frame_uniforms.set_lights(appearance);
    }
}

/// The background color as a linear clear color for the sRGB back buffer.
fn clear_color(color: Color) -> wgpu::Color {
    let linear = color.to_linear();

    wgpu::Color {
        r: linear.x as f64,
        g: linear.y as f64,
        b: linear.z as f64,
        a: 1.0,
    }
}

fn create_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    label: &str,
    style: DrawStyle,
) -> wgpu::RenderPipeline {
    let (topology, cull_mode) = match style {
        DrawStyle::Front => (wgpu::PrimitiveTopology::TriangleList, Some(wgpu::Face::Back)),
        DrawStyle::Double => (wgpu::PrimitiveTopology::TriangleList, None),
        DrawStyle::Wireframe => (wgpu::PrimitiveTopology::LineList, None),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[shaders::Vertex::desc()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                // Opaque materials write an alpha of one, so blending only
                // affects translucent meshes.
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_TEXTURE_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less, // Fragments drawn front to back.
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
