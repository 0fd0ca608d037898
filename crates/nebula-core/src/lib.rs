//! Nebula Core - Foundational types for the Nebula galaxy viewer
//!
//! This crate provides the core types that all other Nebula crates depend on:
//! - `NodeId` - Scene node identifiers
//! - `Transform`, `Vec3`, `Color` - Spatial and color types
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{NebulaError, Result};
pub use id::NodeId;
pub use types::{hex_color, mat4_mul, Color, Transform, Vec3, MAT4_IDENTITY};
