//! Seams to the camera controller and the render backend

use crate::Viewport;
use nebula_core::Result;
use nebula_scene::SceneGraph;

/// Orbit camera capability: turns buffered pointer/wheel input into a camera pose
pub trait OrbitControl {
    /// Per-frame update; applies damped pending motion
    fn update(&mut self);

    /// Width / height of the output
    fn set_aspect(&mut self, aspect: f32);
}

/// A render backend drawing the scene from a camera
pub trait FrameRenderer {
    type Camera;

    /// Match the output resolution to the viewport
    fn resize(&mut self, viewport: &Viewport);

    /// Draw one frame
    fn render(&mut self, scene: &SceneGraph, camera: &Self::Camera) -> Result<()>;

    /// Free every backend-side resource
    fn release(&mut self);
}
