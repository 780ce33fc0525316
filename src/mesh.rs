//! GPU geometry for the letter panels: the vertex format and the shared
//! quad mesh.

use crate::gpu::GpuContext;

/// Vertex format for the letter quads: position, normal, texture coordinates.
/// 32 bytes, `#[repr(C)]` for direct GPU upload via bytemuck.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// Vertex buffer layout: position (loc 0), normal (loc 1), uv (loc 2).
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// GPU-resident geometry with vertex and index buffers. Immutable after
/// creation; all letter panels share one quad.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    pub fn new(gpu: &GpuContext, vertices: &[Vertex3d], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// A `width` × `height` quad in the XY plane, centered at the origin,
    /// facing +Z with CCW winding. UVs put texture row zero at the top edge,
    /// matching the rasterized glyph bitmaps.
    pub fn panel(gpu: &GpuContext, width: f32, height: f32) -> Self {
        let hw = width * 0.5;
        let hh = height * 0.5;
        let vertices = vec![
            Vertex3d::new([-hw, -hh, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
            Vertex3d::new([hw, -hh, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
            Vertex3d::new([hw, hh, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
            Vertex3d::new([-hw, hh, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
        ];
        let indices = vec![0, 1, 2, 2, 3, 0];

        Self::new(gpu, &vertices, &indices)
    }
}
