//! GPU-side vertex, instance and uniform layouts

use bytemuck::{Pod, Zeroable};
use nebula_core::MAT4_IDENTITY;
use nebula_gen::{MeshData, PointCloud};

/// A mesh vertex with position, normal and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// One point of a cloud, matching the WGSL `PointInstance` layout.
/// 32 bytes, 16-byte aligned (2 x vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub position: [f32; 4], // xyz, w unused
    pub color: [f32; 4],    // rgb, a = 1
}

/// Camera uniforms shared by every draw in a frame
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub right: [f32; 4],
    pub up: [f32; 4],
    pub params: [f32; 4], // x = tan(fov / 2)
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            view_proj: MAT4_IDENTITY,
            right: [1.0, 0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0, 0.0],
            params: [1.0, 0.0, 0.0, 0.0],
        }
    }
}

/// Per-node uniforms: world matrix and material parameters
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],   // rgb multiplier, a = opacity
    pub params: [f32; 4], // x = point size
}

impl DrawUniforms {
    pub fn new(opacity: f32, point_size: f32) -> Self {
        Self {
            model: MAT4_IDENTITY,
            tint: [1.0, 1.0, 1.0, opacity],
            params: [point_size, 0.0, 0.0, 0.0],
        }
    }
}

/// Interleave a cloud's flat position/color buffers into instances
pub fn point_instances(cloud: &PointCloud) -> Vec<PointInstance> {
    cloud
        .iter()
        .map(|(p, c)| PointInstance {
            position: [p[0], p[1], p[2], 1.0],
            color: [c[0], c[1], c[2], 1.0],
        })
        .collect()
}

/// Build the vertex array of a mesh; missing normals/colors default to +Y / white
pub fn mesh_vertices(mesh: &MeshData) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, position)| Vertex {
            position: *position,
            normal: mesh.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            color: mesh.colors.get(i).copied().unwrap_or([1.0; 4]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_match_wgsl() {
        assert_eq!(std::mem::size_of::<PointInstance>(), 32);
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 112);
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 96);
        assert_eq!(std::mem::size_of::<Vertex>(), 40);
    }

    #[test]
    fn largest_cloud_fits_default_storage_binding() {
        let bytes = nebula_gen::MAX_POINT_COUNT as u64 * std::mem::size_of::<PointInstance>() as u64;
        assert!(bytes <= wgpu::Limits::default().max_storage_buffer_binding_size as u64);
    }

    #[test]
    fn instances_keep_index_alignment() {
        let mut cloud = PointCloud::with_capacity(2);
        cloud.push([1.0, 2.0, 3.0], [0.1, 0.2, 0.3]);
        cloud.push([4.0, 5.0, 6.0], [0.4, 0.5, 0.6]);
        let instances = point_instances(&cloud);
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[1].position, [4.0, 5.0, 6.0, 1.0]);
        assert_eq!(instances[1].color, [0.4, 0.5, 0.6, 1.0]);
    }

    #[test]
    fn mesh_vertices_fill_missing_attributes() {
        let mesh = MeshData {
            positions: vec![[0.0; 3], [1.0, 0.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]],
            colors: Vec::new(),
            indices: vec![0, 1, 0],
        };
        let vertices = mesh_vertices(&mesh);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[1].normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[1].color, [1.0; 4]);
    }
}
