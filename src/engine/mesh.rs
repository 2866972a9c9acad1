use wgpu::{Buffer, BufferUsages, Device, VertexBufferLayout, vertex_attr_array};

use crate::engine::graphics::buffers::create_buffer_with_data;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn create_buffer_layout<'a>() -> VertexBufferLayout<'a> {
        VertexBufferLayout {
            array_stride: size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// A `width` x `height` rectangle centred on the origin in the XY plane,
/// facing +Z, with the texture's top-left corner at the top-left vertex.
pub fn quad_vertices(width: f32, height: f32) -> [Vertex; 4] {
    let (w, h) = (width / 2.0, height / 2.0);
    let normal = [0.0, 0.0, 1.0];
    [
        Vertex { position: [-w, -h, 0.0], normal, uv: [0.0, 1.0] },
        Vertex { position: [w, -h, 0.0], normal, uv: [1.0, 1.0] },
        Vertex { position: [w, h, 0.0], normal, uv: [1.0, 0.0] },
        Vertex { position: [-w, h, 0.0], normal, uv: [0.0, 0.0] },
    ]
}

#[derive(Debug)]
pub struct Mesh {
    pub vertex_buffer: Buffer,
    pub index_buffer: Buffer,
    pub index_count: u32,
}

impl Mesh {
    pub fn quad(device: &Device, label: &str, width: f32, height: f32) -> Self {
        let vertices = quad_vertices(width, height);
        let vertex_buffer = create_buffer_with_data(
            device,
            &format!("{label} vertices"),
            bytemuck::cast_slice(&vertices),
            vec![BufferUsages::VERTEX],
        );
        let index_buffer = create_buffer_with_data(
            device,
            &format!("{label} indices"),
            bytemuck::cast_slice(&QUAD_INDICES),
            vec![BufferUsages::INDEX],
        );
        Self {
            vertex_buffer,
            index_buffer,
            index_count: QUAD_INDICES.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_spans_the_requested_size() {
        let vertices = quad_vertices(16.0, 3.5);
        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 8.0);
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), -8.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 1.75);
        assert!(vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn quad_winds_counter_clockwise_towards_its_normal() {
        let vertices = quad_vertices(2.0, 2.0);
        for tri in QUAD_INDICES.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| glam::Vec3::from(vertices[i as usize].position));
            assert!((b - a).cross(c - a).z > 0.0);
        }
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(size_of::<Vertex>(), 32);
        assert_eq!(Vertex::create_buffer_layout().array_stride, 32);
    }
}
