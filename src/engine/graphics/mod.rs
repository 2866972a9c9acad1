use encase::{ShaderType, UniformBuffer};
use glam::{Mat4, Vec4};
use log::{error, info};
use pollster::FutureExt;
use thiserror::Error;
use wgpu::{
    Adapter, Device, DeviceDescriptor, Features, Instance, Limits, Queue, RequestAdapterOptions,
    Surface, Trace,
};

use crate::engine::scene::Surface as SceneSurface;

pub mod bindgroups;
pub mod buffers;
pub mod renderer;
pub mod shaders;
pub mod textures;
pub mod viewports;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("surface unavailable: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("failed to encode uniform: {0}")]
    Uniform(#[from] encase::internal::Error),
}

#[derive(Debug)]
pub struct GPUContext {
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
}

impl GPUContext {
    pub fn init(instance: &Instance, surface: &Surface) -> anyhow::Result<Self> {
        info!("requesting adapter");
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                compatible_surface: Some(surface),
                ..Default::default()
            })
            .block_on()?;
        info!("using adapter {:?}", adapter.get_info().name);

        info!("requesting device and queue");
        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("gallery device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: Trace::Off,
            })
            .block_on()?;
        device.on_uncaptured_error(Box::new(|err| error!("wgpu validation error: {err}")));
        info!(
            "max texture dimension {}",
            device.limits().max_texture_dimension_2d
        );

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}

/// Per-surface transform and material parameters (group 1, binding 0).
#[derive(Debug, Copy, Clone, ShaderType)]
pub struct MaterialUniform {
    pub model: Mat4,
    pub color: Vec4,
    pub lit: u32,
}

impl MaterialUniform {
    pub fn for_surface(surface: &SceneSurface) -> Self {
        Self {
            model: surface.model_matrix(),
            color: surface.material.color.extend(1.0),
            lit: u32::from(surface.material.lit),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RenderError> {
        let mut buffer = UniformBuffer::new(Vec::new());
        buffer.write(self)?;
        Ok(buffer.into_inner())
    }
}
