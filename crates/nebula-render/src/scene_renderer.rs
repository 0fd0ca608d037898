//! Scene renderer: mirrors the scene graph onto GPU buffers and draws it

use crate::camera::OrbitCamera;
use crate::context::{RenderContext, RenderError};
use crate::gpu_node::{GpuGeometry, GpuNode};
use crate::pipeline::{PipelineKey, ScenePipelines};
use crate::primitives::CameraUniforms;
use nebula_core::{NodeId, Result};
use nebula_runtime::{FrameRenderer, Viewport};
use nebula_scene::SceneGraph;
use std::collections::{HashMap, HashSet};
use wgpu::util::DeviceExt;

/// Renders a [`SceneGraph`] into a window surface.
///
/// GPU buffers are created the first frame a node is seen and dropped the
/// first frame it is gone, so a regenerated galaxy frees the old cloud's
/// buffers on the next render.
pub struct GalaxyRenderer {
    context: RenderContext,
    pipelines: ScenePipelines,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    nodes: HashMap<NodeId, GpuNode>,
}

impl GalaxyRenderer {
    pub fn new(context: RenderContext) -> Self {
        let pipelines = ScenePipelines::new(&context.device, context.format());

        let camera_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::bytes_of(&CameraUniforms::default()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &pipelines.camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("Camera Bind Group"),
        });

        Self {
            context,
            pipelines,
            camera_buffer,
            camera_bind_group,
            nodes: HashMap::new(),
        }
    }

    /// Drop buffers of removed nodes, upload new ones, refresh world matrices
    fn sync(&mut self, scene: &SceneGraph) {
        let plan = SyncPlan::new(self.nodes.keys().copied(), drawable_ids(scene));

        for id in &plan.free {
            if let Some(gpu) = self.nodes.remove(id) {
                log::debug!("[render] freed {} ({} bytes)", id, gpu.byte_size());
            }
        }
        if !plan.free.is_empty() {
            log::debug!("[render] {} GPU nodes after release", self.nodes.len());
        }

        for id in &plan.upload {
            let Some(node) = scene.get(*id) else {
                continue;
            };
            let Some(key) = PipelineKey::for_payload(&node.payload) else {
                continue;
            };
            self.pipelines.prepare(&self.context.device, key);
            if let Some(gpu) = GpuNode::upload(&self.context.device, &self.pipelines, node) {
                log::debug!(
                    "[render] uploaded '{}' {} ({} bytes)",
                    node.name,
                    node.id,
                    gpu.byte_size()
                );
                self.nodes.insert(node.id, gpu);
            }
        }

        for node in scene.iter() {
            if let (Some(gpu), Some(model)) =
                (self.nodes.get_mut(&node.id), scene.world_matrix(node.id))
            {
                gpu.set_model(&self.context.queue, model);
            }
        }
    }

    fn draw(&mut self, scene: &SceneGraph, camera: &OrbitCamera) -> std::result::Result<(), RenderError> {
        self.sync(scene);

        let uniforms = CameraUniforms {
            view_proj: camera.view_projection_matrix(),
            right: extend(camera.right_vector()),
            up: extend(camera.up_vector()),
            params: [camera.tan_half_fov(), 0.0, 0.0, 0.0],
        };
        self.context
            .queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniforms));

        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[render] surface lost, reconfiguring");
                self.context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => return Ok(()),
            Err(e) => return Err(RenderError::SurfaceError(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let order = draw_order(
            scene
                .iter()
                .filter_map(|n| self.nodes.get(&n.id).map(|gpu| (n.id, gpu.key))),
        );

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.context.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

            for id in &order {
                let Some(gpu) = self.nodes.get(id) else {
                    continue;
                };
                let Some(pipeline) = self.pipelines.get(&gpu.key) else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &gpu.bind_group, &[]);

                match &gpu.geometry {
                    GpuGeometry::Points { instance_count, .. } => {
                        render_pass.set_index_buffer(
                            self.pipelines.quad_index_buffer.slice(..),
                            wgpu::IndexFormat::Uint32,
                        );
                        render_pass.draw_indexed(0..6, 0, 0..*instance_count);
                    }
                    GpuGeometry::Mesh {
                        vertex_buffer,
                        index_buffer,
                        index_count,
                    } => {
                        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        render_pass.draw_indexed(0..*index_count, 0, 0..1);
                    }
                }
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl FrameRenderer for GalaxyRenderer {
    type Camera = OrbitCamera;

    fn resize(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.render_size();
        self.context.resize(width, height);
    }

    fn render(&mut self, scene: &SceneGraph, camera: &OrbitCamera) -> Result<()> {
        self.draw(scene, camera).map_err(Into::into)
    }

    fn release(&mut self) {
        let bytes: u64 = self.nodes.values().map(GpuNode::byte_size).sum();
        self.nodes.clear();
        log::debug!("[render] released all GPU nodes ({} bytes)", bytes);
    }
}

/// GPU buffers to drop and nodes to upload for one frame.
///
/// Frees are applied before uploads, so a replaced galaxy cloud is gone from
/// the GPU before its successor is created.
#[derive(Debug, Default, PartialEq)]
struct SyncPlan {
    free: Vec<NodeId>,
    upload: Vec<NodeId>,
}

impl SyncPlan {
    fn new(held: impl Iterator<Item = NodeId>, live: Vec<NodeId>) -> Self {
        let live_set: HashSet<NodeId> = live.iter().copied().collect();
        let held: HashSet<NodeId> = held.collect();

        let mut free: Vec<NodeId> = held.difference(&live_set).copied().collect();
        free.sort();
        let upload = live.into_iter().filter(|id| !held.contains(id)).collect();
        Self { free, upload }
    }
}

/// Ids of nodes with something to draw, in scene order
fn drawable_ids(scene: &SceneGraph) -> Vec<NodeId> {
    scene
        .iter()
        .filter(|n| PipelineKey::for_payload(&n.payload).is_some())
        .map(|n| n.id)
        .collect()
}

fn extend(v: [f32; 3]) -> [f32; 4] {
    [v[0], v[1], v[2], 0.0]
}

/// Stable order by draw pass; within a pass, scene insertion order
fn draw_order(nodes: impl Iterator<Item = (NodeId, PipelineKey)>) -> Vec<NodeId> {
    let mut keyed: Vec<(u8, NodeId)> = nodes.map(|(id, key)| (key.pass(), id)).collect();
    keyed.sort_by_key(|(pass, _)| *pass);
    keyed.into_iter().map(|(_, id)| id).collect()
}
