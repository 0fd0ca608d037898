//! Nebula Render - wgpu backend for the galaxy scene
//!
//! Draws point clouds as instanced camera-facing quads and meshes as unlit
//! vertex-colored triangles, through a damped orbit camera.

mod camera;
mod context;
mod gpu_node;
mod pipeline;
mod primitives;
mod scene_renderer;

pub use camera::{OrbitCamera, ZOOM_STEP};
pub use context::{RenderContext, RenderError};
pub use gpu_node::{GpuGeometry, GpuNode};
pub use pipeline::{PipelineKey, ScenePipelines, DEPTH_FORMAT};
pub use primitives::{mesh_vertices, point_instances, CameraUniforms, DrawUniforms, PointInstance, Vertex};
pub use scene_renderer::GalaxyRenderer;
