use encase::ShaderType;
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingResource, BindingType, Buffer, Device, SamplerBindingType,
    ShaderStages, TextureSampleType, TextureViewDimension,
};

use crate::engine::{cameras::SceneUniform, graphics::MaterialUniform};

/// Group 0 carries the scene uniform, group 1 the per-surface material.
#[derive(Debug)]
pub struct BindGroupLayouts {
    pub scene: BindGroupLayout,
    pub material: BindGroupLayout,
}

impl BindGroupLayouts {
    pub fn new(device: &Device) -> Self {
        let scene = create_bind_group_layout(
            "scene bind group layout",
            device,
            &[BindGroupLayoutEntry {
                binding: 0,
                count: None,
                ty: BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(SceneUniform::min_size()),
                },
                visibility: ShaderStages::VERTEX_FRAGMENT,
            }],
        );

        let material = create_bind_group_layout(
            "material bind group layout",
            device,
            &[
                BindGroupLayoutEntry {
                    binding: 0,
                    count: None,
                    ty: BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(MaterialUniform::min_size()),
                    },
                    visibility: ShaderStages::VERTEX_FRAGMENT,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    count: None,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    visibility: ShaderStages::FRAGMENT,
                },
                BindGroupLayoutEntry {
                    binding: 2,
                    count: None,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    visibility: ShaderStages::FRAGMENT,
                },
            ],
        );

        Self { scene, material }
    }
}

pub fn create_bind_group_layout(
    label: &str,
    device: &Device,
    entries: &[BindGroupLayoutEntry],
) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some(label),
        entries,
    })
}

pub fn create_bind_group(
    label: &str,
    device: &Device,
    layout: &BindGroupLayout,
    entries: &[BindGroupEntry],
) -> BindGroup {
    device.create_bind_group(&BindGroupDescriptor {
        label: Some(label),
        layout,
        entries,
    })
}

pub fn scene_bind_group(device: &Device, layouts: &BindGroupLayouts, buffer: &Buffer) -> BindGroup {
    create_bind_group(
        "scene bind group",
        device,
        &layouts.scene,
        &[BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    )
}

pub fn material_bind_group(
    label: &str,
    device: &Device,
    layouts: &BindGroupLayouts,
    uniform: &Buffer,
    texture_view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> BindGroup {
    create_bind_group(
        label,
        device,
        &layouts.material,
        &[
            BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::TextureView(texture_view),
            },
            BindGroupEntry {
                binding: 2,
                resource: BindingResource::Sampler(sampler),
            },
        ],
    )
}
