// GPU vertex formats and buffer packing for the quilt and the backdrop.

use crate::quilt::QuiltMesh;

// ============================================================================
// QUILT VERTEX
// ============================================================================

/// Interleaved quilt vertex:
///   @location(0) position: vec3<f32>
///   @location(1) uv:       vec2<f32>
///   @location(2) color:    vec4<f32>
/// Normals are constant across the quilt and stay on the CPU side.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuiltVertex {
    pub position: [f32; 3],
    pub uv:       [f32; 2],
    pub color:    [f32; 4],
}

impl QuiltVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuiltVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleave a quilt mesh into GPU vertices, in triangle-list order.
/// The quilt's index list is the identity, so no index buffer is needed.
pub fn pack_quilt(mesh: &QuiltMesh<'_>) -> Vec<QuiltVertex> {
    mesh.triangles
        .iter()
        .map(|&i| {
            let i = i as usize;
            QuiltVertex {
                position: mesh.vertices[i].to_array(),
                uv:       mesh.uvs[i].to_array(),
                color:    mesh.colors[i].to_rgba(),
            }
        })
        .collect()
}

/// Cast vertex slice to raw bytes for wgpu buffer upload.
pub fn vertex_bytes(vertices: &[QuiltVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

// ============================================================================
// UNIFORMS
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
}

impl Uniforms {
    pub fn new(view_proj: glam::Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}
