use std::sync::Arc;

use log::info;
use wgpu::{
    Adapter, Color, Device, Extent3d, Surface, SurfaceConfiguration, Texture, TextureFormat,
    TextureUsages, TextureView, wgt::TextureDescriptor,
};
use winit::window::Window;

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

#[derive(Debug)]
pub struct DepthResources {
    pub texture: Texture,
    pub view: TextureView,
}

impl DepthResources {
    pub fn new(device: &Device, config: &SurfaceConfiguration) -> Self {
        let size = Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&TextureDescriptor {
            label: Some("depth texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let view = texture.create_view(&Default::default());
        Self { texture, view }
    }
}

/// The window's swapchain surface plus its depth buffer.
#[derive(Debug)]
pub struct Viewport {
    pub window: Arc<Window>,
    pub background: Color,
    pub surface: Surface<'static>,
    pub config: SurfaceConfiguration,
    pub depth: DepthResources,
}

impl Viewport {
    pub fn new(
        window: Arc<Window>,
        surface: Surface<'static>,
        adapter: &Adapter,
        device: &Device,
        background: Color,
    ) -> Self {
        info!("building viewport");
        let size = window.inner_size();
        let capabilities = surface.get_capabilities(adapter);
        // Colours are computed in linear space and written to an sRGB target.
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(TextureFormat::is_srgb)
            .or_else(|| capabilities.formats.first().copied())
            .unwrap_or(TextureFormat::Bgra8UnormSrgb);

        let config = SurfaceConfiguration {
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            view_formats: vec![],
            usage: TextureUsages::RENDER_ATTACHMENT,
            desired_maximum_frame_latency: 2,
        };
        info!("configuring surface {}x{} {:?}", config.width, config.height, format);
        surface.configure(device, &config);
        let depth = DepthResources::new(device, &config);

        Self {
            window,
            background,
            surface,
            config,
            depth,
        }
    }

    pub fn format(&self) -> TextureFormat {
        self.config.format
    }

    /// Zero-sized windows are skipped; the surface keeps its last size.
    pub fn resize(&mut self, device: &Device, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            info!("window size is zero; skipping surface configuration");
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure(device);
        true
    }

    pub fn reconfigure(&mut self, device: &Device) {
        self.surface.configure(device, &self.config);
        self.depth = DepthResources::new(device, &self.config);
    }
}
