//! Ray-object intersection protocol and scene aggregation.

use std::sync::Arc;

use glam::Vec3A;

use crate::interval::Interval;
use crate::material::MaterialType;
use crate::ray::Ray;

/// Data recorded at a ray-surface intersection.
#[derive(Debug, Clone)]
pub struct HitRecord {
    /// Intersection point in world space.
    pub p: Vec3A,
    /// Unit surface normal at `p`, always facing against the incoming ray.
    pub normal: Vec3A,
    /// Ray parameter of the intersection.
    pub t: f32,
    /// True when the ray struck the surface from outside.
    pub front_face: bool,
    /// Material of the surface at `p`.
    pub material: MaterialType,
}

impl HitRecord {
    /// Orient `outward_normal` against the incoming ray and record which
    /// side was struck. `outward_normal` must be unit length.
    pub fn set_face_normal(&mut self, r: &Ray, outward_normal: Vec3A) {
        self.front_face = r.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

impl Default for HitRecord {
    fn default() -> Self {
        // Scratch record handed to `hit`; every field is overwritten on a
        // hit.
        Self {
            p: Vec3A::ZERO,
            normal: Vec3A::ZERO,
            t: 0.0,
            front_face: false,
            material: MaterialType::Lambertian {
                albedo: Vec3A::ZERO,
            },
        }
    }
}

/// Anything a ray can intersect.
///
/// Implementations are `Sync + Send`: scenes are read-only while rendering
/// and their members are held through shared handles.
pub trait Hittable: Sync + Send {
    /// Report the nearest intersection with parameter strictly inside
    /// `ray_t`, filling `rec` and returning true; on a miss `rec` is left
    /// untouched and false comes back.
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;
}

/// A collection of hittables that is itself hittable, so scenes can nest.
pub struct HittableList {
    /// Member objects. Shared handles let one object appear in several
    /// scenes.
    pub objects: Vec<Arc<dyn Hittable>>,
}

impl HittableList {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the scene.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Remove every object from the scene.
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let mut temp_rec = HitRecord::default();
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        // Each accepted hit narrows the window, so the record left behind
        // belongs to the globally nearest intersection.
        for object in &self.objects {
            if object.hit(r, Interval::new(ray_t.min, closest_so_far), &mut temp_rec) {
                hit_anything = true;
                closest_so_far = temp_rec.t;
                *rec = temp_rec.clone();
            }
        }

        hit_anything
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::Sphere;

    fn gray_sphere(center: Vec3A, radius: f32) -> Arc<Sphere> {
        Arc::new(Sphere::new(
            center,
            radius,
            MaterialType::Lambertian {
                albedo: Vec3A::splat(0.5),
            },
        ))
    }

    #[test]
    fn test_set_face_normal_flips_against_the_ray() {
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        rec.set_face_normal(&r, Vec3A::new(0.0, 0.0, 1.0));
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3A::new(0.0, 0.0, 1.0));

        rec.set_face_normal(&r, Vec3A::new(0.0, 0.0, -1.0));
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3A::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_empty_list_misses() {
        let world = HittableList::new();
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(!world.hit(&r, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn test_closest_object_wins_regardless_of_insertion_order() {
        let near = gray_sphere(Vec3A::new(0.0, 0.0, -1.0), 0.5);
        let far = gray_sphere(Vec3A::new(0.0, 0.0, -3.0), 0.5);
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));

        let mut near_first = HittableList::new();
        near_first.add(near.clone());
        near_first.add(far.clone());

        let mut far_first = HittableList::new();
        far_first.add(far);
        far_first.add(near);

        for world in [&near_first, &far_first] {
            let mut rec = HitRecord::default();
            assert!(world.hit(&r, Interval::new(0.001, f32::INFINITY), &mut rec));
            assert_eq!(rec.t, 0.5);
            assert_eq!(rec.normal, Vec3A::new(0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn test_lists_nest() {
        let mut inner = HittableList::new();
        inner.add(gray_sphere(Vec3A::new(0.0, 0.0, -1.0), 0.5));

        let mut outer = HittableList::new();
        outer.add(gray_sphere(Vec3A::new(0.0, 0.0, -3.0), 0.5));
        outer.add(Arc::new(inner));

        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(outer.hit(&r, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert_eq!(rec.t, 0.5);
    }

    #[test]
    fn test_clear_empties_the_scene() {
        let mut world = HittableList::new();
        world.add(gray_sphere(Vec3A::new(0.0, 0.0, -1.0), 0.5));
        world.clear();
        assert!(world.objects.is_empty());

        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(!world.hit(&r, Interval::new(0.001, f32::INFINITY), &mut rec));
    }
}
