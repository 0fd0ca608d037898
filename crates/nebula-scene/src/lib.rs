//! Nebula Scene - Scene graph and galaxy lifecycle
//!
//! Provides:
//! - `SceneGraph`: owns every visual node (points, meshes, groups) and their transforms
//! - `ResourceTracker`: observer notified when node storage is attached or released
//! - `GalaxySlot`: the single galaxy point-cloud slot and its regeneration rule
//! - `GalaxyScene`: assembles the galaxy, sphere, fog and wind into one graph

mod graph;
mod layout;
mod node;
mod slot;
mod tracker;

pub use graph::SceneGraph;
pub use layout::{AnimatedNodes, GalaxyScene};
pub use node::{BlendMode, MeshMaterial, Payload, PointStyle, SceneNode};
pub use slot::GalaxySlot;
pub use tracker::{LogTracker, ResourceTracker};
