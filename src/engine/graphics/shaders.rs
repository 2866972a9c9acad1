use std::borrow::Cow;

use wgpu::{Device, ShaderModule, ShaderModuleDescriptor, ShaderSource};

const GALLERY_SHADER: &str = include_str!("../../shaders/gallery.wgsl");

pub fn load_gallery_shader(device: &Device) -> ShaderModule {
    device.create_shader_module(ShaderModuleDescriptor {
        label: Some("gallery shader"),
        source: ShaderSource::Wgsl(Cow::Borrowed(GALLERY_SHADER)),
    })
}
