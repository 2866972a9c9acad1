use wgpu::{
    Buffer, BufferDescriptor, BufferUsages, Device,
    util::{BufferInitDescriptor, DeviceExt},
};

fn combine(buffer_uses: &[BufferUsages]) -> BufferUsages {
    buffer_uses
        .iter()
        .fold(BufferUsages::empty(), |acc, &uses| acc | uses)
}

pub fn create_buffer(device: &Device, name: &str, size: u64, buffer_uses: Vec<BufferUsages>) -> Buffer {
    device.create_buffer(&BufferDescriptor {
        label: Some(name),
        size,
        usage: combine(&buffer_uses),
        mapped_at_creation: false,
    })
}

pub fn create_buffer_with_data(
    device: &Device,
    name: &str,
    data: &[u8],
    buffer_uses: Vec<BufferUsages>,
) -> Buffer {
    device.create_buffer_init(&BufferInitDescriptor {
        label: Some(name),
        contents: data,
        usage: combine(&buffer_uses),
    })
}
