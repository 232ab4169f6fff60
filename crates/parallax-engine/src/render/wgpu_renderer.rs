use anyhow::Result;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::camera::Camera;
use crate::coords::Viewport;
use crate::core::{FrameStatus, Renderer};
use crate::device::{Gpu, GpuInit};
use crate::scene::Scene;

use super::mesh::{unit_cube, CameraUniform, MeshVertex, NodeInstance};

/// Reference renderer: draws every visible scene node as a lit box.
///
/// Output size is logical size times the pixel ratio; the surface is
/// reconfigured whenever either changes.
pub struct WgpuRenderer<'w> {
    window: &'w Window,
    gpu: Gpu<'w>,

    logical_size: (u32, u32),
    pixel_ratio: f64,

    pipeline: wgpu::RenderPipeline,
    camera_ubo: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    cube_vbo: wgpu::Buffer,
    cube_ibo: wgpu::Buffer,
    cube_index_count: u32,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
    instances: Vec<NodeInstance>,
}

impl<'w> WgpuRenderer<'w> {
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let gpu = Gpu::new(window, init).await?;
        let device = gpu.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("parallax mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let camera_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("parallax camera bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<CameraUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let camera_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("parallax camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("parallax camera bind group"),
            layout: &camera_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_ubo.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("parallax mesh pipeline layout"),
            bind_group_layouts: &[&camera_bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("parallax mesh pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[MeshVertex::layout(), NodeInstance::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.surface_format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: gpu.depth_format(),
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let (vertices, indices) = unit_cube();
        let cube_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("parallax cube vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("parallax cube ibo"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let size = gpu.size();
        Ok(Self {
            window,
            gpu,
            logical_size: (size.width, size.height),
            pixel_ratio: 1.0,
            pipeline,
            camera_ubo,
            camera_bind_group,
            cube_vbo,
            cube_ibo,
            cube_index_count: indices.len() as u32,
            instance_vbo: None,
            instance_capacity: 0,
            instances: Vec::new(),
        })
    }

    fn apply_output_size(&mut self) {
        let (w, h) = self.logical_size;
        let (pw, ph) = Viewport::new(w, h, self.pixel_ratio).physical_size();
        log::debug!("output buffer {pw}x{ph} ({w}x{h} @{})", self.pixel_ratio);
        self.gpu.resize(PhysicalSize::new(pw, ph));
    }

    fn ensure_instance_capacity(&mut self, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(64);
        self.instance_vbo = Some(self.gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("parallax instance vbo"),
            size: (new_cap * std::mem::size_of::<NodeInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

impl Renderer<Scene> for WgpuRenderer<'_> {
    fn render_frame(&mut self, scene: &Scene, camera: &Camera) -> FrameStatus {
        self.instances.clear();
        self.instances.extend(scene.visible().map(NodeInstance::from_node));
        if !self.instances.is_empty() {
            self.ensure_instance_capacity(self.instances.len());
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("surface unavailable: {err}");
                return self.gpu.handle_surface_error(err).frame_status();
            }
        };

        let queue = self.gpu.queue();
        queue.write_buffer(
            &self.camera_ubo,
            0,
            bytemuck::bytes_of(&CameraUniform::new(camera.view_projection())),
        );
        if let Some(vbo) = self.instance_vbo.as_ref() {
            queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.instances));
        }

        let bg = scene.background;
        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("parallax scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: bg.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.gpu.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let (Some(vbo), false) = (self.instance_vbo.as_ref(), self.instances.is_empty()) {
                rpass.set_pipeline(&self.pipeline);
                rpass.set_bind_group(0, &self.camera_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.cube_vbo.slice(..));
                rpass.set_vertex_buffer(1, vbo.slice(..));
                rpass.set_index_buffer(self.cube_ibo.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..self.cube_index_count, 0, 0..self.instances.len() as u32);
            }
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);
        FrameStatus::Presented
    }

    fn set_output_size(&mut self, width: u32, height: u32) {
        self.logical_size = (width, height);
        self.apply_output_size();
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
        self.apply_output_size();
    }
}
