//! Rays in parametric form.

use glam::Vec3A;

/// A ray `r(t) = origin + t * direction`.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Starting point of the ray in world space.
    pub origin: Vec3A,
    /// Direction the ray travels in. Not required to be unit length; code
    /// that needs a unit direction normalizes at the point of use.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a ray from an origin and a direction.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self { origin, direction }
    }

    /// The point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }
}
