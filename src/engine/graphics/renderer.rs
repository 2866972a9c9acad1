use std::sync::Arc;

use anyhow::Context;
use encase::ShaderType;
use glam::Mat4;
use image::RgbaImage;
use log::{debug, info, warn};
use wgpu::{
    BindGroup, Buffer, BufferUsages, Color, CommandEncoderDescriptor, CompareFunction,
    DepthBiasState, DepthStencilState, FragmentState, Instance, MultisampleState, Operations,
    PipelineLayoutDescriptor, PrimitiveState, RenderPassColorAttachment,
    RenderPassDepthStencilAttachment, RenderPassDescriptor, RenderPipeline,
    RenderPipelineDescriptor, Sampler, ShaderModule, StencilState, VertexState,
};
use winit::window::Window;

use crate::{
    config::CameraConfig,
    engine::{
        cameras::{Projection, SceneUniform, viewpoint::Pose},
        graphics::{
            GPUContext, MaterialUniform, RenderError,
            bindgroups::{BindGroupLayouts, material_bind_group, scene_bind_group},
            buffers::{create_buffer, create_buffer_with_data},
            shaders::load_gallery_shader,
            textures::{GpuTexture, create_sampler},
            viewports::{DEPTH_FORMAT, Viewport},
        },
        mesh::{Mesh, Vertex},
        scene::{Lighting, SceneDescription},
    },
    frame_loop::SceneBackend,
};

struct GpuSurface {
    label: String,
    mesh: Mesh,
    material_buffer: Buffer,
    _texture: GpuTexture,
    bind_group: BindGroup,
}

pub struct GalleryRenderer {
    gpu: GPUContext,
    viewport: Viewport,
    render_pipeline: RenderPipeline,
    layouts: BindGroupLayouts,
    sampler: Sampler,
    scene_buffer: Buffer,
    scene_bind_group: BindGroup,
    surfaces: Vec<GpuSurface>,
    lighting: Lighting,
    projection: Projection,
    view: Mat4,
}

impl GalleryRenderer {
    pub fn new(
        instance: &Instance,
        window: Arc<Window>,
        scene: &SceneDescription,
        camera: &CameraConfig,
    ) -> anyhow::Result<Self> {
        info!("creating surface");
        let surface = instance
            .create_surface(window.clone())
            .context("create window surface")?;
        let gpu = GPUContext::init(instance, &surface).context("initialise GPU")?;

        let background = Color {
            r: scene.background.x as f64,
            g: scene.background.y as f64,
            b: scene.background.z as f64,
            a: 1.0,
        };
        let viewport = Viewport::new(window, surface, &gpu.adapter, &gpu.device, background);
        let projection = Projection::new(camera, viewport.config.width, viewport.config.height);

        info!("creating bind group layouts");
        let layouts = BindGroupLayouts::new(&gpu.device);
        let sampler = create_sampler(&gpu.device);

        let shader = load_gallery_shader(&gpu.device);
        let render_pipeline = create_render_pipeline(&gpu, &viewport, &layouts, &shader);

        let scene_buffer = create_buffer(
            &gpu.device,
            "scene uniform",
            SceneUniform::min_size().get(),
            vec![BufferUsages::UNIFORM, BufferUsages::COPY_DST],
        );
        let scene_bind_group = scene_bind_group(&gpu.device, &layouts, &scene_buffer);

        info!("uploading {} surfaces", scene.surfaces.len());
        let mut surfaces = Vec::with_capacity(scene.surfaces.len());
        for surface in &scene.surfaces {
            let mesh = Mesh::quad(&gpu.device, &surface.label, surface.width, surface.height);
            let material_buffer = create_buffer_with_data(
                &gpu.device,
                &format!("{} material", surface.label),
                &MaterialUniform::for_surface(surface).to_bytes()?,
                vec![BufferUsages::UNIFORM, BufferUsages::COPY_DST],
            );
            let texture = GpuTexture::placeholder(&gpu.device, &gpu.queue, &surface.label);
            let bind_group = material_bind_group(
                &surface.label,
                &gpu.device,
                &layouts,
                &material_buffer,
                &texture.view,
                &sampler,
            );
            surfaces.push(GpuSurface {
                label: surface.label.clone(),
                mesh,
                material_buffer,
                _texture: texture,
                bind_group,
            });
        }

        Ok(Self {
            gpu,
            viewport,
            render_pipeline,
            layouts,
            sampler,
            scene_buffer,
            scene_bind_group,
            surfaces,
            lighting: scene.lighting.clone(),
            projection,
            view: Mat4::IDENTITY,
        })
    }

    pub fn max_texture_dimension(&self) -> u32 {
        self.gpu.max_texture_dimension()
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.viewport.window
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.viewport.resize(&self.gpu.device, width, height) {
            self.projection.resize(width, height);
            debug!("resized to {width}x{height}, aspect {:.3}", self.projection.aspect);
        }
    }

    /// Swaps a surface's placeholder for a decoded image.
    pub fn apply_texture(&mut self, surface: usize, image: &RgbaImage) {
        let Some(target) = self.surfaces.get_mut(surface) else {
            warn!("texture for unknown surface {surface}");
            return;
        };
        let limit = self.gpu.max_texture_dimension();
        if image.width() > limit || image.height() > limit {
            warn!(
                "{}x{} texture for {} exceeds the {limit} limit, keeping base colour",
                image.width(),
                image.height(),
                target.label
            );
            return;
        }
        let texture = GpuTexture::from_image(&self.gpu.device, &self.gpu.queue, &target.label, image);
        target.bind_group = material_bind_group(
            &target.label,
            &self.gpu.device,
            &self.layouts,
            &target.material_buffer,
            &texture.view,
            &self.sampler,
        );
        target._texture = texture;
        info!("applied texture to {}", target.label);
    }
}

impl SceneBackend for GalleryRenderer {
    type Error = RenderError;

    fn set_camera_pose(&mut self, pose: &Pose) {
        self.view = pose.view_matrix();
    }

    fn render(&mut self) -> Result<(), RenderError> {
        let uniform = SceneUniform::new(self.view, &self.projection, &self.lighting);
        self.gpu
            .queue
            .write_buffer(&self.scene_buffer, 0, &uniform.to_bytes()?);

        let output = match self.viewport.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                self.viewport.reconfigure(&self.gpu.device);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let view = output.texture.create_view(&Default::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("gallery frame encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("gallery render pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: wgpu::LoadOp::Clear(self.viewport.background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.viewport.depth.view,
                    depth_ops: Some(Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, Some(&self.scene_bind_group), &[]);

            for surface in &self.surfaces {
                render_pass.set_bind_group(1, Some(&surface.bind_group), &[]);
                render_pass.set_vertex_buffer(0, surface.mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(
                    surface.mesh.index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                render_pass.draw_indexed(0..surface.mesh.index_count, 0, 0..1);
            }
        }

        self.viewport.window.pre_present_notify();
        self.gpu.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn create_render_pipeline(
    gpu: &GPUContext,
    viewport: &Viewport,
    layouts: &BindGroupLayouts,
    shader: &ShaderModule,
) -> RenderPipeline {
    info!("creating rendering pipeline");
    let pipeline_layout = gpu
        .device
        .create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("gallery pipeline layout"),
            bind_group_layouts: &[&layouts.scene, &layouts.material],
            push_constant_ranges: &[],
        });

    gpu.device
        .create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("gallery render pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::create_buffer_layout()],
            },
            fragment: Some(FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(viewport.format().into())],
            }),
            // Walls are visible from both sides.
            primitive: PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: CompareFunction::Less,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        })
}
