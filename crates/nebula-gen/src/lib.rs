//! Nebula Gen - Procedural point clouds and meshes
//!
//! Everything in the scene is synthesized from a handful of numbers:
//! - `GalaxyParams`: the parameter set for the spiral galaxy
//! - `generate_galaxy`: position/color synthesis for N points along spiral arms
//! - `decor`: the static sphere, fog disc and wind ring
//!
//! Generators draw from any `rand::Rng`, so callers pick between
//! thread-local entropy and a seeded `StdRng`.

mod cloud;
pub mod decor;
pub mod galaxy;
mod mesh;
mod params;

pub use cloud::PointCloud;
pub use galaxy::{generate_galaxy, regenerate_galaxy};
pub use mesh::MeshData;
pub use params::{GalaxyParams, MAX_POINT_COUNT};
