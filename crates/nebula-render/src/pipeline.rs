//! Point and mesh render pipelines, created on demand per material key
//!
//! Points are camera-facing quads drawn instanced from a storage buffer
//! (one instance per point, shared 6-index quad). Meshes are plain indexed
//! triangle lists. Each distinct blend/depth/culling combination gets its
//! own pipeline, built the first time a node needs it.

use crate::primitives::Vertex;
use nebula_scene::{BlendMode, Payload};
use std::collections::HashMap;
use wgpu::util::DeviceExt;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Render state a node's material selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKey {
    Points {
        blend: BlendMode,
        depth_write: bool,
    },
    Mesh {
        blend: BlendMode,
        depth_write: bool,
        double_sided: bool,
    },
}

impl PipelineKey {
    /// Key for a payload; groups draw nothing
    pub fn for_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Group => None,
            Payload::Points { style, .. } => Some(PipelineKey::Points {
                blend: style.blend,
                depth_write: style.depth_write,
            }),
            Payload::Mesh { material, .. } => Some(PipelineKey::Mesh {
                blend: material.blend,
                depth_write: material.depth_write,
                double_sided: material.double_sided,
            }),
        }
    }

    pub fn blend(&self) -> BlendMode {
        match *self {
            PipelineKey::Points { blend, .. } | PipelineKey::Mesh { blend, .. } => blend,
        }
    }

    /// Draw pass: opaque first, then additive, then alpha-blended
    pub fn pass(&self) -> u8 {
        match self.blend() {
            BlendMode::Opaque => 0,
            BlendMode::Additive => 1,
            BlendMode::Alpha => 2,
        }
    }
}

fn blend_state(mode: BlendMode) -> Option<wgpu::BlendState> {
    match mode {
        BlendMode::Opaque => None,
        BlendMode::Alpha => Some(wgpu::BlendState::ALPHA_BLENDING),
        // src_alpha + One
        BlendMode::Additive => Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        }),
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Shaders, layouts and the lazily-built pipeline table
pub struct ScenePipelines {
    format: wgpu::TextureFormat,
    point_shader: wgpu::ShaderModule,
    mesh_shader: wgpu::ShaderModule,
    point_layout: wgpu::PipelineLayout,
    mesh_layout: wgpu::PipelineLayout,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    pub point_bind_group_layout: wgpu::BindGroupLayout,
    pub mesh_bind_group_layout: wgpu::BindGroupLayout,
    pub quad_index_buffer: wgpu::Buffer,
}

impl ScenePipelines {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let point_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("points.wgsl").into()),
        });
        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
        });

        // Group 0: camera
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[uniform_entry(0)],
                label: Some("Camera Bind Group Layout"),
            });

        // Group 1 (points): draw uniforms + instance storage buffer (read-only)
        let point_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    uniform_entry(0),
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: true },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
                label: Some("Point Draw Bind Group Layout"),
            });

        // Group 1 (meshes): draw uniforms
        let mesh_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[uniform_entry(0)],
                label: Some("Mesh Draw Bind Group Layout"),
            });

        let point_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &point_bind_group_layout],
            push_constant_ranges: &[],
        });
        let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &mesh_bind_group_layout],
            push_constant_ranges: &[],
        });

        // Shared quad index buffer
        let quad_indices: [u32; 6] = [0, 1, 2, 2, 1, 3];
        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Quad Index Buffer"),
            contents: bytemuck::cast_slice(&quad_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            format,
            point_shader,
            mesh_shader,
            point_layout,
            mesh_layout,
            pipelines: HashMap::new(),
            camera_bind_group_layout,
            point_bind_group_layout,
            mesh_bind_group_layout,
            quad_index_buffer,
        }
    }

    /// Build the pipeline for `key` if it does not exist yet
    pub fn prepare(&mut self, device: &wgpu::Device, key: PipelineKey) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        let pipeline = self.create(device, key);
        log::debug!("[render] created pipeline {:?}", key);
        self.pipelines.insert(key, pipeline);
    }

    pub fn get(&self, key: &PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(key)
    }

    fn create(&self, device: &wgpu::Device, key: PipelineKey) -> wgpu::RenderPipeline {
        let vertex_buffers = [Vertex::desc()];
        let (label, layout, shader, vs, fs, buffers, depth_write, cull_mode) = match key {
            PipelineKey::Points { depth_write, .. } => (
                "Point Pipeline",
                &self.point_layout,
                &self.point_shader,
                "vs_points",
                "fs_points",
                &[][..],
                depth_write,
                None,
            ),
            PipelineKey::Mesh {
                depth_write,
                double_sided,
                ..
            } => (
                "Mesh Pipeline",
                &self.mesh_layout,
                &self.mesh_shader,
                "vs_mesh",
                "fs_mesh",
                &vertex_buffers[..],
                depth_write,
                if double_sided {
                    None
                } else {
                    Some(wgpu::Face::Back)
                },
            ),
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some(vs),
                buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(fs),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: blend_state(key.blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: depth_write,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}
