//! Sphere primitive.

use glam::Vec3A;

use crate::hittable::{HitRecord, Hittable};
use crate::interval::Interval;
use crate::material::MaterialType;
use crate::ray::Ray;

/// A sphere described by its center, radius, and surface material.
#[derive(Debug, Clone)]
pub struct Sphere {
    /// Center in world space.
    pub center: Vec3A,
    /// Radius, kept non-negative by [`Sphere::new`].
    pub radius: f32,
    /// Surface material.
    pub material: MaterialType,
}

impl Sphere {
    /// Create a sphere; a negative radius collapses to zero.
    pub fn new(center: Vec3A, radius: f32, material: MaterialType) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let oc = self.center - r.origin;

        // Quadratic |O + tD - C|^2 = r^2 in the half-b form: one fewer
        // multiply and no factor-of-two bookkeeping.
        let a = r.direction.length_squared();
        let h = r.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Prefer the near root; fall back to the far one when the near root
        // lies outside the window (behind the origin, or closer than the
        // self-intersection epsilon).
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = r.at(rec.t);
        let outward_normal = (rec.p - self.center) / self.radius;
        rec.set_face_normal(r, outward_normal);
        rec.material = self.material;

        true
    }
}
