//! GPU-resident copies of scene nodes

use crate::pipeline::{PipelineKey, ScenePipelines};
use crate::primitives::{mesh_vertices, point_instances, DrawUniforms};
use nebula_scene::{Payload, SceneNode};
use wgpu::util::DeviceExt;

pub enum GpuGeometry {
    Points {
        instance_buffer: wgpu::Buffer,
        instance_count: u32,
    },
    Mesh {
        vertex_buffer: wgpu::Buffer,
        index_buffer: wgpu::Buffer,
        index_count: u32,
    },
}

/// Buffers and bind group for one drawable node. Dropping it frees the buffers.
pub struct GpuNode {
    pub key: PipelineKey,
    pub geometry: GpuGeometry,
    pub uniforms: DrawUniforms,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    bytes: u64,
}

impl GpuNode {
    /// Upload a node. Groups and empty geometry have nothing to draw.
    pub fn upload(
        device: &wgpu::Device,
        pipelines: &ScenePipelines,
        node: &SceneNode,
    ) -> Option<Self> {
        let key = PipelineKey::for_payload(&node.payload)?;
        let label = node.name.as_str();

        match &node.payload {
            Payload::Group => None,
            Payload::Points { cloud, style } => {
                if cloud.is_empty() {
                    return None;
                }
                let instances = point_instances(cloud);
                let bytes = std::mem::size_of_val(instances.as_slice()) as u64;
                let limit = device.limits().max_storage_buffer_binding_size as u64;
                if bytes > limit {
                    log::error!(
                        "[render] '{}' needs {} bytes, over the {} byte storage binding limit",
                        label,
                        bytes,
                        limit
                    );
                    return None;
                }
                let instance_buffer =
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(label),
                        contents: bytemuck::cast_slice(&instances),
                        usage: wgpu::BufferUsages::STORAGE,
                    });
                let uniforms = DrawUniforms::new(style.opacity, style.size);
                let uniform_buffer = uniform_buffer(device, label, &uniforms);
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &pipelines.point_bind_group_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniform_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: instance_buffer.as_entire_binding(),
                        },
                    ],
                    label: Some("Point Draw Bind Group"),
                });
                Some(Self {
                    key,
                    bytes: instance_buffer.size(),
                    geometry: GpuGeometry::Points {
                        instance_buffer,
                        instance_count: instances.len() as u32,
                    },
                    uniforms,
                    uniform_buffer,
                    bind_group,
                })
            }
            Payload::Mesh { mesh, material } => {
                if mesh.indices.is_empty() {
                    return None;
                }
                let vertices = mesh_vertices(mesh);
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                let uniforms = DrawUniforms::new(material.opacity, 0.0);
                let uniform_buffer = uniform_buffer(device, label, &uniforms);
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &pipelines.mesh_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                    label: Some("Mesh Draw Bind Group"),
                });
                Some(Self {
                    key,
                    bytes: vertex_buffer.size() + index_buffer.size(),
                    geometry: GpuGeometry::Mesh {
                        vertex_buffer,
                        index_buffer,
                        index_count: mesh.indices.len() as u32,
                    },
                    uniforms,
                    uniform_buffer,
                    bind_group,
                })
            }
        }
    }

    /// Geometry bytes held on the GPU
    pub fn byte_size(&self) -> u64 {
        self.bytes
    }

    /// Write a new world matrix if it changed since the last frame
    pub fn set_model(&mut self, queue: &wgpu::Queue, model: [[f32; 4]; 4]) {
        if self.uniforms.model == model {
            return;
        }
        self.uniforms.model = model;
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));
    }
}

fn uniform_buffer(device: &wgpu::Device, label: &str, uniforms: &DrawUniforms) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(uniforms),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}
