//! Assembly of the full galaxy scene

use crate::{GalaxySlot, MeshMaterial, PointStyle, ResourceTracker, SceneGraph, SceneNode};
use nebula_core::{NodeId, Result};
use nebula_gen::{decor, GalaxyParams};
use rand::Rng;

/// The nodes the animation loop writes rotations into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimatedNodes {
    pub sphere: NodeId,
    pub galaxy: NodeId,
    pub fog: NodeId,
    pub wind: NodeId,
}

/// The galaxy, sphere, fog and wind, built into one scene graph
pub struct GalaxyScene {
    pub graph: SceneGraph,
    pub galaxy: GalaxySlot,
    sphere: NodeId,
    fog_group: NodeId,
    wind_group: NodeId,
}

impl GalaxyScene {
    /// Build every node. The decor is created once here and never rebuilt.
    pub fn build<R: Rng + ?Sized>(
        params: &GalaxyParams,
        tracker: Box<dyn ResourceTracker>,
        rng: &mut R,
    ) -> Result<Self> {
        let mut graph = SceneGraph::with_tracker(tracker);

        let sphere = graph.add(SceneNode::mesh(
            "sphere",
            decor::build_sphere(rng),
            MeshMaterial::opaque(),
        ))?;

        let fog_group = graph.add(SceneNode::group("fog"))?;
        let fog = decor::build_fog_disc(params.radius, rng);
        graph.add(
            SceneNode::mesh("fog disc", fog.mesh, MeshMaterial::fog())
                .with_parent(fog_group)
                .with_transform(fog.transform),
        )?;

        let wind_group = graph.add(SceneNode::group("wind"))?;
        graph.add(
            SceneNode::points(
                "wind points",
                decor::build_wind_ring(params.radius, rng),
                PointStyle::wind(),
            )
            .with_parent(wind_group),
        )?;

        let galaxy_group = graph.add(SceneNode::group("galaxy"))?;
        let mut galaxy = GalaxySlot::new(galaxy_group);
        galaxy.regenerate(&mut graph, params, rng)?;

        log::info!("[scene] built {} nodes", graph.len());

        Ok(Self {
            graph,
            galaxy,
            sphere,
            fog_group,
            wind_group,
        })
    }

    pub fn animated(&self) -> AnimatedNodes {
        AnimatedNodes {
            sphere: self.sphere,
            galaxy: self.galaxy.group(),
            fog: self.fog_group,
            wind: self.wind_group,
        }
    }

    /// Replace the galaxy cloud; the decor is untouched
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        params: &GalaxyParams,
        rng: &mut R,
    ) -> Result<NodeId> {
        self.galaxy.regenerate(&mut self.graph, params, rng)
    }

    /// Release every node, galaxy first
    pub fn release_all(&mut self) {
        self.galaxy.clear(&mut self.graph);
        self.graph.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LogTracker, Payload};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small() -> GalaxyParams {
        GalaxyParams {
            count: 300,
            ..Default::default()
        }
    }

    #[test]
    fn build_creates_all_objects() {
        let scene = GalaxyScene::build(
            &small(),
            Box::new(LogTracker::new()),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
        let nodes = scene.animated();

        // sphere, fog group + disc, wind group + points, galaxy group + points
        assert_eq!(scene.graph.len(), 7);
        for id in [nodes.sphere, nodes.galaxy, nodes.fog, nodes.wind] {
            assert!(scene.graph.contains(id));
        }

        let galaxy_points = scene.galaxy.points().unwrap();
        let node = scene.graph.get(galaxy_points).unwrap();
        assert_eq!(node.parent, Some(nodes.galaxy));
        assert_eq!(node.point_cloud().map(|c| c.len()), Some(300));

        let wind: Vec<_> = scene.graph.children(nodes.wind).collect();
        assert_eq!(wind.len(), 1);
        match &scene.graph.get(wind[0]).unwrap().payload {
            Payload::Points { cloud, style } => {
                assert_eq!(cloud.len(), decor::WIND_POINTS);
                assert_eq!(style.blend, crate::BlendMode::Alpha);
            }
            other => panic!("expected wind points, got {}", other.kind()),
        }
    }

    #[test]
    fn only_point_clouds_skip_depth_writes() {
        let scene = GalaxyScene::build(
            &small(),
            Box::new(LogTracker::new()),
            &mut StdRng::seed_from_u64(4),
        )
        .unwrap();
        let nodes = scene.animated();

        let fog: Vec<_> = scene.graph.children(nodes.fog).collect();
        match &scene.graph.get(fog[0]).unwrap().payload {
            Payload::Mesh { material, .. } => {
                assert!(material.depth_write);
                assert!(material.double_sided);
                assert_eq!(material.blend, crate::BlendMode::Alpha);
            }
            other => panic!("expected fog mesh, got {}", other.kind()),
        }

        for group in [nodes.galaxy, nodes.wind] {
            for id in scene.graph.children(group) {
                match &scene.graph.get(id).unwrap().payload {
                    Payload::Points { style, .. } => assert!(!style.depth_write),
                    other => panic!("expected points, got {}", other.kind()),
                }
            }
        }
    }

    #[test]
    fn regenerate_leaves_decor_alone() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut scene = GalaxyScene::build(&small(), Box::new(LogTracker::new()), &mut rng).unwrap();
        let before: Vec<NodeId> = scene
            .graph
            .iter()
            .filter(|n| Some(n.id) != scene.galaxy.points())
            .map(|n| n.id)
            .collect();

        let new_points = scene
            .regenerate(&GalaxyParams { count: 50, ..small() }, &mut rng)
            .unwrap();

        assert_eq!(scene.graph.len(), 7);
        for id in before {
            assert!(scene.graph.contains(id));
        }
        assert_eq!(
            scene.graph.get(new_points).and_then(|n| n.point_cloud()).map(|c| c.len()),
            Some(50)
        );
    }

    #[test]
    fn release_all_empties_graph() {
        let mut scene = GalaxyScene::build(
            &small(),
            Box::new(LogTracker::new()),
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();
        scene.release_all();
        assert!(scene.graph.is_empty());
        assert!(scene.galaxy.points().is_none());
    }
}
