//! Sampling helpers for the path tracer.
//!
//! Every helper takes its generator explicitly, so a render stays a pure
//! function of the seed: the caller owns one generator per render and
//! threads it through ray generation, scattering, and scene assembly in a
//! fixed order.

use glam::Vec3A;
use rand::Rng;

/// Squared-length floor for the unit-vector rejection loop. Samples closer
/// to the origin than this would underflow the normalization divide in f32.
const MIN_UNIT_LENGTH_SQUARED: f32 = 1e-18;

/// Uniform f32 in `[0, 1)`.
pub fn random_f32(rng: &mut impl Rng) -> f32 {
    rng.random()
}

/// Uniform f32 in `[min, max)`.
pub fn random_f32_range(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    min + (max - min) * random_f32(rng)
}

/// Uniform point in the unit cube centered at the origin, components in
/// `[-0.5, 0.5)`. The camera reads the x and y components as its sub-pixel
/// jitter offset.
pub fn random_in_unit_cube(rng: &mut impl Rng) -> Vec3A {
    Vec3A::new(
        random_f32(rng) - 0.5,
        random_f32(rng) - 0.5,
        random_f32(rng) - 0.5,
    )
}

/// Uniform direction on the surface of the unit sphere.
///
/// Rejection-samples the `[-1, 1]` cube and keeps points inside the unit
/// ball, which normalize to a uniform surface distribution. The lower bound
/// discards samples landing pathologically close to the origin.
pub fn random_unit_vector(rng: &mut impl Rng) -> Vec3A {
    loop {
        let p = Vec3A::new(
            random_f32_range(rng, -1.0, 1.0),
            random_f32_range(rng, -1.0, 1.0),
            random_f32_range(rng, -1.0, 1.0),
        );
        let length_squared = p.length_squared();
        if length_squared > MIN_UNIT_LENGTH_SQUARED && length_squared <= 1.0 {
            return p / length_squared.sqrt();
        }
    }
}

/// Uniform point inside the unit disk in the z = 0 plane, used to sample
/// defocus (lens) ray origins.
pub fn random_in_unit_disk(rng: &mut impl Rng) -> Vec3A {
    loop {
        let p = Vec3A::new(
            random_f32_range(rng, -1.0, 1.0),
            random_f32_range(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Random color with channels in `[0, 1)`.
pub fn random_color(rng: &mut impl Rng) -> Vec3A {
    Vec3A::new(random_f32(rng), random_f32(rng), random_f32(rng))
}

/// Random color with channels in `[min, max)`.
pub fn random_color_range(rng: &mut impl Rng, min: f32, max: f32) -> Vec3A {
    Vec3A::new(
        random_f32_range(rng, min, max),
        random_f32_range(rng, min, max),
        random_f32_range(rng, min, max),
    )
}
