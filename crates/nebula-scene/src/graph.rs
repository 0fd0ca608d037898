//! Scene graph: node storage, hierarchy and rotation updates

use crate::{LogTracker, ResourceTracker, SceneNode};
use nebula_core::{mat4_mul, NebulaError, NodeId, Result};
use std::collections::HashMap;

/// Owns every node in the scene.
///
/// Nodes are kept in insertion order so draw order is stable. Every node
/// that enters or leaves the graph is reported to the resource tracker.
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    order: Vec<NodeId>,
    tracker: Box<dyn ResourceTracker>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::with_tracker(Box::new(LogTracker::new()))
    }

    pub fn with_tracker(tracker: Box<dyn ResourceTracker>) -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
            tracker,
        }
    }

    /// Insert a node. Its parent, if any, must already be in the graph.
    pub fn add(&mut self, node: SceneNode) -> Result<NodeId> {
        if let Some(parent) = node.parent {
            if !self.nodes.contains_key(&parent) {
                return Err(NebulaError::NodeNotFound(parent));
            }
        }
        let id = node.id;
        self.tracker.attached(&node);
        self.order.push(id);
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Remove a node and hand its storage back to the caller.
    ///
    /// Descendants are removed and dropped along with it.
    pub fn detach(&mut self, id: NodeId) -> Result<SceneNode> {
        if !self.nodes.contains_key(&id) {
            return Err(NebulaError::NodeNotFound(id));
        }

        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            self.remove(child)?;
        }

        self.order.retain(|n| *n != id);
        let node = self
            .nodes
            .remove(&id)
            .ok_or(NebulaError::NodeNotFound(id))?;
        self.tracker.released(&node);
        Ok(node)
    }

    /// Remove a node (and its descendants) and release its storage
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        self.detach(id).map(drop)
    }

    /// Remove every node, children before parents
    pub fn clear(&mut self) {
        while let Some(&id) = self.order.last() {
            if self.remove(id).is_err() {
                self.order.pop();
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(move |n| n.parent == Some(parent))
            .map(|n| n.id)
    }

    /// Set the Y rotation of a node, in radians
    pub fn set_rotation_y(&mut self, id: NodeId, angle: f32) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(NebulaError::NodeNotFound(id))?;
        node.transform.rotation.y = angle;
        Ok(())
    }

    /// Add `delta` radians to the Y rotation of a node
    pub fn rotate_y(&mut self, id: NodeId, delta: f32) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(NebulaError::NodeNotFound(id))?;
        node.transform.rotation.y += delta;
        Ok(())
    }

    pub fn rotation_y(&self, id: NodeId) -> Option<f32> {
        self.nodes.get(&id).map(|n| n.transform.rotation.y)
    }

    /// Local-to-world matrix (column-major), composed through every ancestor
    pub fn world_matrix(&self, id: NodeId) -> Option<[[f32; 4]; 4]> {
        let node = self.nodes.get(&id)?;
        let local = node.transform.to_matrix();
        match node.parent {
            Some(parent) => {
                let parent_world = self.world_matrix(parent)?;
                Some(mat4_mul(&parent_world, &local))
            }
            None => Some(local),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::testing::{Event, RecordingTracker};
    use crate::{MeshMaterial, PointStyle};
    use nebula_core::{Transform, Vec3};
    use nebula_gen::{MeshData, PointCloud};

    fn cloud(n: usize) -> PointCloud {
        let mut cloud = PointCloud::with_capacity(n);
        for i in 0..n {
            cloud.push([i as f32, 0.0, 0.0], [1.0, 1.0, 1.0]);
        }
        cloud
    }

    #[test]
    fn add_and_remove_notify_tracker() {
        let (tracker, log) = RecordingTracker::new();
        let mut graph = SceneGraph::with_tracker(Box::new(tracker));

        let group = graph.add(SceneNode::group("g")).unwrap();
        let points = graph
            .add(SceneNode::points("p", cloud(3), PointStyle::wind()).with_parent(group))
            .unwrap();
        assert_eq!(graph.len(), 2);

        graph.remove(points).unwrap();
        assert!(!graph.contains(points));
        assert_eq!(
            log.borrow().as_slice(),
            &[
                Event::Attached(group),
                Event::Attached(points),
                Event::Released(points)
            ]
        );
    }

    #[test]
    fn parent_must_exist() {
        let mut graph = SceneGraph::new();
        let orphan = SceneNode::group("orphan").with_parent(NodeId::from_raw(u64::MAX));
        assert!(matches!(graph.add(orphan), Err(NebulaError::NodeNotFound(_))));
        assert!(graph.is_empty());
    }

    #[test]
    fn removing_group_releases_children() {
        let (tracker, log) = RecordingTracker::new();
        let mut graph = SceneGraph::with_tracker(Box::new(tracker));
        let group = graph.add(SceneNode::group("g")).unwrap();
        let mesh = graph
            .add(SceneNode::mesh("m", MeshData::default(), MeshMaterial::opaque()).with_parent(group))
            .unwrap();

        graph.remove(group).unwrap();
        assert!(graph.is_empty());
        let events = log.borrow();
        assert!(events.contains(&Event::Released(mesh)));
        assert_eq!(events.last(), Some(&Event::Released(group)));
    }

    #[test]
    fn detach_returns_payload() {
        let mut graph = SceneGraph::new();
        let id = graph
            .add(SceneNode::points("p", cloud(5), PointStyle::galaxy(0.02)))
            .unwrap();
        let node = graph.detach(id).unwrap();
        assert_eq!(node.into_point_cloud().map(|c| c.len()), Some(5));
        assert!(graph.detach(id).is_err());
    }

    #[test]
    fn rotation_updates() {
        let mut graph = SceneGraph::new();
        let id = graph.add(SceneNode::group("spin")).unwrap();

        graph.rotate_y(id, 0.5).unwrap();
        graph.rotate_y(id, 0.25).unwrap();
        assert_eq!(graph.rotation_y(id), Some(0.75));

        graph.set_rotation_y(id, 2.0).unwrap();
        assert_eq!(graph.rotation_y(id), Some(2.0));

        assert!(graph.set_rotation_y(NodeId::from_raw(u64::MAX), 1.0).is_err());
    }

    #[test]
    fn world_matrix_composes_parent() {
        let mut graph = SceneGraph::new();
        let parent = graph
            .add(SceneNode::group("parent").with_transform(
                Transform::IDENTITY.with_position(Vec3::new(1.0, 0.0, 0.0)),
            ))
            .unwrap();
        let child = graph
            .add(
                SceneNode::group("child")
                    .with_parent(parent)
                    .with_transform(Transform::IDENTITY.with_position(Vec3::new(0.0, 2.0, 0.0))),
            )
            .unwrap();

        let m = graph.world_matrix(child).unwrap();
        assert_eq!([m[3][0], m[3][1], m[3][2]], [1.0, 2.0, 0.0]);
    }

    #[test]
    fn clear_releases_everything() {
        let (tracker, log) = RecordingTracker::new();
        let mut graph = SceneGraph::with_tracker(Box::new(tracker));
        let group = graph.add(SceneNode::group("g")).unwrap();
        graph
            .add(SceneNode::points("p", cloud(2), PointStyle::wind()).with_parent(group))
            .unwrap();
        graph.add(SceneNode::group("h")).unwrap();

        graph.clear();
        assert!(graph.is_empty());
        let released = log
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Released(_)))
            .count();
        assert_eq!(released, 3);
    }
}
