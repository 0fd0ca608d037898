//! The galaxy slot: at most one galaxy point cloud in the scene

use crate::{PointStyle, SceneGraph, SceneNode};
use nebula_core::{NodeId, Result};
use nebula_gen::{regenerate_galaxy, GalaxyParams};
use rand::Rng;

/// Single named slot holding the galaxy point cloud under the galaxy group.
///
/// Regeneration detaches the current cloud, releases it, and only then
/// attaches the replacement, so the slot never holds two clouds.
pub struct GalaxySlot {
    group: NodeId,
    points: Option<NodeId>,
}

impl GalaxySlot {
    /// Empty slot whose clouds will hang under `group`
    pub fn new(group: NodeId) -> Self {
        Self {
            group,
            points: None,
        }
    }

    /// The group the animation rotates
    pub fn group(&self) -> NodeId {
        self.group
    }

    /// The live point node, if one has been generated
    pub fn points(&self) -> Option<NodeId> {
        self.points
    }

    /// Build a new galaxy cloud and install it, releasing the previous one
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        scene: &mut SceneGraph,
        params: &GalaxyParams,
        rng: &mut R,
    ) -> Result<NodeId> {
        let previous = self.take_previous(scene);
        let cloud = regenerate_galaxy(previous, params, rng);

        let node = SceneNode::points("galaxy", cloud, PointStyle::galaxy(params.size))
            .with_parent(self.group);
        let id = scene.add(node)?;
        self.points = Some(id);
        Ok(id)
    }

    /// Release the current cloud, leaving the slot empty
    pub fn clear(&mut self, scene: &mut SceneGraph) {
        drop(self.take_previous(scene));
    }

    fn take_previous(&mut self, scene: &mut SceneGraph) -> Option<nebula_gen::PointCloud> {
        let id = self.points.take()?;
        match scene.detach(id) {
            Ok(node) => node.into_point_cloud(),
            Err(e) => {
                log::warn!("[galaxy] previous cloud already gone: {e}");
                None
            }
        }
    }
}
