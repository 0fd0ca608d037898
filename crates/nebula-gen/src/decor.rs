//! Static decor: the central sphere, the fog disc and the wind ring
//!
//! These are built once at startup and never regenerated.

use crate::{MeshData, PointCloud};
use nebula_core::{Color, Transform, Vec3};
use rand::Rng;
use std::f32::consts::{PI, TAU};

pub const SPHERE_RADIUS: f32 = 0.9;
pub const SPHERE_SEGMENTS: u32 = 64;

pub const FOG_SEGMENTS: u32 = 64;
pub const FOG_OPACITY: f32 = 0.5;
/// Extra radius of the fog disc and wind ring beyond the galaxy radius
pub const RIM_MARGIN: f32 = 0.1;

pub const WIND_POINTS: usize = 500;
pub const WIND_COLOR_HEX: u32 = 0xC1DDE9;
pub const WIND_POINT_SIZE: f32 = 0.05;
pub const WIND_OPACITY: f32 = 0.7;

/// Sphere gradient endpoints, in linear light
pub fn sphere_gradient() -> (Color, Color) {
    (Color::from_hex(0x87CEEB).to_linear(), Color::WHITE)
}

/// UV sphere of `SPHERE_RADIUS` with a random sky-blue to white tint per vertex
pub fn build_sphere<R: Rng + ?Sized>(rng: &mut R) -> MeshData {
    let mut mesh = sphere_geometry(SPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS);
    let (from, to) = sphere_gradient();
    mesh.colors = (0..mesh.vertex_count())
        .map(|_| from.lerp(&to, rng.random::<f32>()).to_array())
        .collect();
    log::debug!(
        "[decor] sphere: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    mesh
}

/// Latitude/longitude sphere with `(width + 1) * (height + 1)` vertices.
/// Pole rows emit a single triangle per quad.
pub fn sphere_geometry(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let row = width_segments + 1;

    let mut mesh = MeshData::default();
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let x = -radius * (u * TAU).cos() * (v * PI).sin();
            let y = radius * (v * PI).cos();
            let z = radius * (u * TAU).sin() * (v * PI).sin();
            mesh.positions.push([x, y, z]);
            mesh.normals.push(Vec3::new(x, y, z).normalized().to_array());
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

/// Flat disc in the local XY plane: one center vertex plus a closed rim
pub fn disc_geometry(radius: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let mut mesh = MeshData::default();

    mesh.positions.push([0.0, 0.0, 0.0]);
    mesh.normals.push([0.0, 0.0, 1.0]);
    for s in 0..=segments {
        let angle = s as f32 / segments as f32 * TAU;
        mesh.positions.push([radius * angle.cos(), radius * angle.sin(), 0.0]);
        mesh.normals.push([0.0, 0.0, 1.0]);
    }
    for i in 1..=segments {
        mesh.indices.extend_from_slice(&[i, i + 1, 0]);
    }
    mesh
}

/// The fog layer: a white disc slightly wider than the galaxy, laid flat
pub struct FogDisc {
    pub mesh: MeshData,
    /// Local transform of the disc inside its group
    pub transform: Transform,
}

pub fn build_fog_disc<R: Rng + ?Sized>(galaxy_radius: f32, rng: &mut R) -> FogDisc {
    let mut mesh = disc_geometry(galaxy_radius + RIM_MARGIN, FOG_SEGMENTS);
    mesh.fill_color(Color::WHITE.to_array());

    let scale = 1.0 + rng.random::<f32>() * 0.1;
    let transform = Transform::IDENTITY
        .with_rotation(Vec3::new(-PI / 2.0, 0.0, 0.0))
        .with_uniform_scale(scale);

    FogDisc { mesh, transform }
}

/// Linear-light wind color
pub fn wind_color() -> Color {
    Color::from_hex(WIND_COLOR_HEX).to_linear()
}

/// `WIND_POINTS` points in the `y = 0` plane at a random angle and a random
/// distance in `[0, galaxy_radius + RIM_MARGIN]`
pub fn build_wind_ring<R: Rng + ?Sized>(galaxy_radius: f32, rng: &mut R) -> PointCloud {
    let reach = galaxy_radius + RIM_MARGIN;
    let color = wind_color().rgb();
    let mut cloud = PointCloud::with_capacity(WIND_POINTS);

    for _ in 0..WIND_POINTS {
        let angle = rng.random::<f32>() * TAU;
        let distance = rng.random::<f32>() * reach;
        cloud.push([angle.cos() * distance, 0.0, angle.sin() * distance], color);
    }
    cloud
}
