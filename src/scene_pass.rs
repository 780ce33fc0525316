//! GPU rendering of the scene graph.
//!
//! [`ScenePass`] owns everything the draw step needs: one pipeline for the
//! textured, alpha-blended letter quads, one point-list pipeline for the
//! stars, the depth buffer, and the per-panel uniform buffers and glyph
//! textures built once at mount.
//!
//! Bind group layout, shared by both pipelines:
//! - **Group 0**: scene uniforms (view-projection matrix, lights)
//! - **Group 1**: per-draw model uniforms (model matrix, tint)
//! - **Group 2**: glyph texture and sampler (letter pipeline only)

use glam::Mat4;

use crate::camera::Camera;
use crate::error::SceneError;
use crate::gpu::GpuContext;
use crate::letters::{GLYPH_TEXTURE_SIZE, GlyphRasterizer, PANEL_HEIGHT, PANEL_WIDTH};
use crate::mesh::{Mesh, Vertex3d};
use crate::scene::SceneGraph;
use crate::texture::Texture;

/// Clear color: `0x0a0a1a` in sRGB, stored linearized because the surface
/// format is sRGB and `wgpu::Color` values are linear.
const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.003035,
    g: 0.003035,
    b: 0.010330,
    a: 1.0,
};

/// Scene-wide uniforms, uploaded once per draw.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 3],
    ambient: f32,
    directional: f32,
    emissive: f32,
    _pad: [f32; 2],
}

/// Per-draw model uniforms: one buffer per letter panel plus one for the
/// star cloud, each written every tick.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
    tint: [f32; 4],
}

/// GPU resources for one letter panel.
struct PanelResources {
    #[allow(dead_code)]
    texture: Texture,
    texture_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
}

/// Renders the scene graph: stars first, letter quads blended on top.
pub struct ScenePass {
    letter_pipeline: wgpu::RenderPipeline,
    star_pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    quad: Mesh,
    panels: Vec<PanelResources>,
    star_vertex_buffer: wgpu::Buffer,
    star_count: u32,
    star_model_buffer: wgpu::Buffer,
    star_model_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl ScenePass {
    /// Build all GPU resources for `scene`: pipelines, the shared quad, one
    /// glyph texture and model buffer per panel, and the star buffers.
    pub fn new(gpu: &GpuContext, scene: &SceneGraph) -> Result<Self, SceneError> {
        use wgpu::util::DeviceExt;

        let device = &gpu.device;

        let letter_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Letter Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/letters.wgsl").into()),
        });
        let star_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Star Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/stars.wgsl").into()),
        });

        // Scene uniforms (group 0)
        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
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
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        // Model uniforms (group 1), one buffer per drawn entity
        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Bind Group Layout"),
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

        // Glyph texture (group 2)
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Glyph Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let make_model_binding = |label: &str| {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<ModelUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &model_bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            (buffer, bind_group)
        };

        // One glyph texture and model binding per panel
        let rasterizer = GlyphRasterizer::new()?;
        let panels = scene
            .panels
            .iter()
            .map(|panel| {
                let pixels = rasterizer.rasterize(panel.glyph);
                let texture = Texture::from_rgba(
                    gpu,
                    &pixels,
                    GLYPH_TEXTURE_SIZE,
                    GLYPH_TEXTURE_SIZE,
                    "Glyph Texture",
                );
                let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Glyph Bind Group"),
                    layout: &texture_bind_group_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(&texture.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&texture.sampler),
                        },
                    ],
                });
                let (model_buffer, model_bind_group) = make_model_binding("Panel Model Uniforms");
                PanelResources {
                    texture,
                    texture_bind_group,
                    model_buffer,
                    model_bind_group,
                }
            })
            .collect();

        let quad = Mesh::panel(gpu, PANEL_WIDTH, PANEL_HEIGHT);

        // Star cloud: static positions, one model binding for the rotation
        let star_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Star Vertex Buffer"),
            contents: bytemuck::cast_slice(scene.stars.positions()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let (star_model_buffer, star_model_bind_group) = make_model_binding("Star Model Uniforms");

        // Pipelines
        let letter_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Letter Pipeline Layout"),
                bind_group_layouts: &[
                    &scene_bind_group_layout,
                    &model_bind_group_layout,
                    &texture_bind_group_layout,
                ],
                push_constant_ranges: &[],
            });

        let letter_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Letter Pipeline"),
            layout: Some(&letter_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &letter_shader,
                entry_point: Some("vs"),
                buffers: &[Vertex3d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &letter_shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let star_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Star Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        let star_vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        };

        let star_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Star Pipeline"),
            layout: Some(&star_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &star_shader,
                entry_point: Some("vs"),
                buffers: &[star_vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &star_shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::PointList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let (depth_texture, depth_view) = Self::create_depth_texture(gpu);

        Ok(Self {
            letter_pipeline,
            star_pipeline,
            scene_buffer,
            scene_bind_group,
            quad,
            panels,
            star_vertex_buffer,
            star_count: scene.stars.positions().len() as u32,
            star_model_buffer,
            star_model_bind_group,
            depth_texture,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        })
    }

    fn create_depth_texture(gpu: &GpuContext) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Recreate the depth buffer if the surface was resized since the last
    /// draw.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            let (texture, view) = Self::create_depth_texture(gpu);
            self.depth_texture = texture;
            self.depth_view = view;
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Draw one frame of the scene.
    ///
    /// Pure output step: uploads the current uniforms, clears to the
    /// background color, draws the star cloud and then the letter panels,
    /// and presents. Surface errors (lost/outdated frames) are returned for
    /// the controller to recover.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        scene: &SceneGraph,
        camera: &Camera,
    ) -> Result<(), wgpu::SurfaceError> {
        self.ensure_depth_size(gpu);

        let view_proj = camera.projection_matrix() * camera.view_matrix();
        let lights = scene.lights;
        let scene_uniforms = SceneUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            light_dir: lights.direction.to_array(),
            ambient: lights.ambient,
            directional: lights.directional,
            emissive: lights.emissive,
            _pad: [0.0; 2],
        };
        gpu.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(&[scene_uniforms]));

        for (panel, resources) in scene.panels.iter().zip(&self.panels) {
            let model = Mat4::from_translation(panel.position)
                * Mat4::from_rotation_y(panel.rotation_y);
            let uniforms = ModelUniforms {
                model: model.to_cols_array_2d(),
                tint: [1.0, 1.0, 1.0, 1.0],
            };
            gpu.queue
                .write_buffer(&resources.model_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        }

        let star_uniforms = ModelUniforms {
            model: scene.stars.model_matrix().to_cols_array_2d(),
            tint: [1.0, 1.0, 1.0, 1.0],
        };
        gpu.queue.write_buffer(
            &self.star_model_buffer,
            0,
            bytemuck::cast_slice(&[star_uniforms]),
        );

        let output = gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
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

            render_pass.set_pipeline(&self.star_pipeline);
            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
            render_pass.set_bind_group(1, &self.star_model_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.star_vertex_buffer.slice(..));
            render_pass.draw(0..self.star_count, 0..1);

            render_pass.set_pipeline(&self.letter_pipeline);
            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
            for resources in &self.panels {
                render_pass.set_bind_group(1, &resources.model_bind_group, &[]);
                render_pass.set_bind_group(2, &resources.texture_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.quad.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.quad.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.quad.index_count, 0, 0..1);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
