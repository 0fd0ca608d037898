//! Spiral galaxy point synthesis
//!
//! Each point is assigned to an arm by index (`i mod branches`), placed at a
//! linearly-uniform radius (so points pile up near the center), twisted by an
//! angle equal to its radius, and scattered by offsets that grow without bound
//! as the radius approaches zero.

use crate::{GalaxyParams, PointCloud};
use nebula_core::Color;
use rand::Rng;
use std::f64::consts::TAU;

/// Numerator of the inverse-square scatter term
pub const OFFSET_K: f64 = 15.0;

/// Sky blue, the single color every galaxy point receives
pub const POINT_COLOR_HEX: u32 = 0x87CEEB;

/// Base arm angle for point `i`, before twist and scatter
pub fn branch_angle(i: usize, branches: u32) -> f64 {
    let branches = branches.max(1) as usize;
    (i % branches) as f64 / branches as f64 * TAU
}

/// Scatter multiplier for a point at radial distance `r`.
///
/// Not clamped: as `r -> 0` this grows without bound, and `r == 0` returns
/// infinity. A point drawn at exactly zero radius therefore ends up with
/// non-finite X/Z.
pub fn offset_multiplier(r: f64) -> f64 {
    OFFSET_K / (r * r)
}

/// Linear-light sky blue written into every color slot
pub fn point_color() -> Color {
    Color::from_hex(POINT_COLOR_HEX).to_linear()
}

/// The uniform `[0, 1)` draws consumed by one point, in draw order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointDraws {
    pub radius: f64,
    pub offset_x: [f64; 2],
    pub offset_y: [f64; 2],
    pub offset_z: [f64; 2],
}

impl PointDraws {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            radius: rng.random(),
            offset_x: [rng.random(), rng.random()],
            offset_y: [rng.random(), rng.random()],
            offset_z: [rng.random(), rng.random()],
        }
    }
}

/// Place point `i` from its draws
pub fn place_point(i: usize, draws: &PointDraws, params: &GalaxyParams) -> [f32; 3] {
    let r = draws.radius * params.radius as f64;
    let angle = branch_angle(i, params.branches) + r;

    let randomness = params.randomness as f64;
    let power = params.randomness_power as f64;
    let scatter = |pair: [f64; 2]| pair[0].powf(power) * pair[1] * randomness;

    let multiplier = offset_multiplier(r);
    let offset_x = scatter(draws.offset_x) * multiplier;
    let offset_y = scatter(draws.offset_y) * (2.0 - r);
    let offset_z = scatter(draws.offset_z) * multiplier;

    [
        ((angle + offset_x).cos() * r) as f32,
        offset_y as f32,
        ((angle + offset_z).sin() * r) as f32,
    ]
}

/// Generate a galaxy point cloud of `params.count` points.
///
/// The shape is deterministic, per-point detail is not: two calls with the
/// same parameters and different generators give different clouds with the
/// same statistics. The inside/outside gradient is intentionally not applied.
pub fn generate_galaxy<R: Rng + ?Sized>(params: &GalaxyParams, rng: &mut R) -> PointCloud {
    let count = params.count as usize;
    let color = point_color().rgb();
    let mut cloud = PointCloud::with_capacity(count);

    for i in 0..count {
        let draws = PointDraws::sample(rng);
        cloud.push(place_point(i, &draws, params), color);
    }

    log::info!(
        "[galaxy] generated {} points across {} arms",
        cloud.len(),
        params.branches
    );
    cloud
}

/// Replace `previous` with a freshly generated cloud.
///
/// The old buffers are dropped before the new ones are allocated, so the two
/// never coexist.
pub fn regenerate_galaxy<R: Rng + ?Sized>(
    previous: Option<PointCloud>,
    params: &GalaxyParams,
    rng: &mut R,
) -> PointCloud {
    if let Some(old) = previous {
        log::debug!(
            "[galaxy] releasing {} points ({} bytes)",
            old.len(),
            old.byte_size()
        );
        drop(old);
    }
    generate_galaxy(params, rng)
}
