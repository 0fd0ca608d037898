//! Scene nodes and their payloads

use nebula_core::{NodeId, Transform};
use nebula_gen::{decor, MeshData, PointCloud};

/// How a node's fragments combine with what is already drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    Opaque,
    Alpha,
    Additive,
}

/// Material of a point cloud
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    /// Point size in world units (shrinks with distance)
    pub size: f32,
    pub opacity: f32,
    pub blend: BlendMode,
    pub depth_write: bool,
}

impl PointStyle {
    /// Additive, vertex-colored galaxy points
    pub fn galaxy(size: f32) -> Self {
        Self {
            size,
            opacity: 1.0,
            blend: BlendMode::Additive,
            depth_write: false,
        }
    }

    pub fn wind() -> Self {
        Self {
            size: decor::WIND_POINT_SIZE,
            opacity: decor::WIND_OPACITY,
            blend: BlendMode::Alpha,
            depth_write: false,
        }
    }
}

/// Material of a triangle mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshMaterial {
    pub opacity: f32,
    pub blend: BlendMode,
    pub double_sided: bool,
    pub depth_write: bool,
}

impl MeshMaterial {
    /// Opaque, vertex-colored, front faces only
    pub fn opaque() -> Self {
        Self {
            opacity: 1.0,
            blend: BlendMode::Opaque,
            double_sided: false,
            depth_write: true,
        }
    }

    /// Translucent and double-sided; still writes depth like any basic material
    pub fn fog() -> Self {
        Self {
            opacity: decor::FOG_OPACITY,
            blend: BlendMode::Alpha,
            double_sided: true,
            depth_write: true,
        }
    }
}

/// What a node draws. Groups draw nothing and only carry a transform.
#[derive(Debug, Clone)]
pub enum Payload {
    Group,
    Points { cloud: PointCloud, style: PointStyle },
    Mesh { mesh: MeshData, material: MeshMaterial },
}

impl Payload {
    /// Heap bytes owned by the payload's buffers
    pub fn byte_size(&self) -> usize {
        match self {
            Payload::Group => 0,
            Payload::Points { cloud, .. } => cloud.byte_size(),
            Payload::Mesh { mesh, .. } => mesh.byte_size(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Group => "group",
            Payload::Points { .. } => "points",
            Payload::Mesh { .. } => "mesh",
        }
    }
}

/// A node in the scene graph.
///
/// The node exclusively owns its payload. A parent group only contributes
/// its transform; it never owns its children's data.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub transform: Transform,
    pub payload: Payload,
}

impl SceneNode {
    fn new(name: &str, payload: Payload) -> Self {
        Self {
            id: NodeId::new(),
            name: name.to_string(),
            parent: None,
            transform: Transform::IDENTITY,
            payload,
        }
    }

    pub fn group(name: &str) -> Self {
        Self::new(name, Payload::Group)
    }

    pub fn points(name: &str, cloud: PointCloud, style: PointStyle) -> Self {
        Self::new(name, Payload::Points { cloud, style })
    }

    pub fn mesh(name: &str, mesh: MeshData, material: MeshMaterial) -> Self {
        Self::new(name, Payload::Mesh { mesh, material })
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Take the point cloud out of a points node
    pub fn into_point_cloud(self) -> Option<PointCloud> {
        match self.payload {
            Payload::Points { cloud, .. } => Some(cloud),
            _ => None,
        }
    }

    pub fn point_cloud(&self) -> Option<&PointCloud> {
        match &self.payload {
            Payload::Points { cloud, .. } => Some(cloud),
            _ => None,
        }
    }
}
