//! Camera model and render loop.
//!
//! The camera owns the user-facing render configuration, derives the
//! viewport geometry from it at the start of every render, and drives the
//! recursive Monte-Carlo color integration for each pixel sample.

use glam::Vec3A;
use image::{ImageBuffer, Rgb};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::Rng;

use crate::hittable::{HitRecord, Hittable};
use crate::interval::Interval;
use crate::material::Color;
use crate::random;
use crate::ray::Ray;

/// A positionable camera with defocus blur and the render loop that drives
/// it.
///
/// The public fields are the configuration; everything else is derived from
/// them when [`Camera::render`] starts, so fields may be edited freely
/// between renders.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Ratio of image width over height.
    pub aspect_ratio: f64,
    /// Rendered image width in pixels.
    pub image_width: u32,
    /// Random samples accumulated per pixel.
    pub samples_per_pixel: u32,
    /// Bounce budget for a single ray path.
    pub max_depth: u32,
    /// Vertical field of view in degrees.
    pub vfov: f32,
    /// Point the camera looks from.
    pub lookfrom: Vec3A,
    /// Point the camera looks at.
    pub lookat: Vec3A,
    /// Camera-relative "up" direction.
    pub vup: Vec3A,
    /// Apex angle of the cone of ray origins through a pixel, in degrees.
    /// Zero keeps the pinhole model.
    pub defocus_angle: f32,
    /// Distance from `lookfrom` to the plane of perfect focus.
    pub focus_dist: f32,

    /// Rendered image height, derived from width and aspect ratio.
    image_height: u32,
    /// Camera center in world space.
    center: Vec3A,
    /// Location of the center of pixel (0, 0).
    pixel00_loc: Vec3A,
    /// Offset from a pixel center to its right neighbor.
    pixel_delta_u: Vec3A,
    /// Offset from a pixel center to the neighbor below.
    pixel_delta_v: Vec3A,
    /// Averaging factor, `1 / samples_per_pixel`.
    pixel_samples_scale: f32,
    /// Camera frame basis vector pointing right.
    u: Vec3A,
    /// Camera frame basis vector pointing up.
    v: Vec3A,
    /// Camera frame basis vector opposing the view direction.
    w: Vec3A,
    /// Defocus disk horizontal radius vector.
    defocus_disk_u: Vec3A,
    /// Defocus disk vertical radius vector.
    defocus_disk_v: Vec3A,
}

impl Camera {
    /// Camera with the defaults of a small square pinhole render.
    pub fn new() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 50,
            max_depth: 50,
            vfov: 90.0,
            lookfrom: Vec3A::ZERO,
            lookat: Vec3A::new(0.0, 0.0, -1.0),
            vup: Vec3A::new(0.0, 1.0, 0.0),
            defocus_angle: 0.0,
            focus_dist: 10.0,
            image_height: 0,
            center: Vec3A::ZERO,
            pixel00_loc: Vec3A::ZERO,
            pixel_delta_u: Vec3A::ZERO,
            pixel_delta_v: Vec3A::ZERO,
            pixel_samples_scale: 0.0,
            u: Vec3A::ZERO,
            v: Vec3A::ZERO,
            w: Vec3A::ZERO,
            defocus_disk_u: Vec3A::ZERO,
            defocus_disk_v: Vec3A::ZERO,
        }
    }

    /// Render the scene into a linear (not yet gamma-encoded) f32 buffer.
    ///
    /// Derived camera state is recomputed first, so configuration edits
    /// between renders always take effect. The loop walks scanlines top to
    /// bottom, pixels left to right, and averages `samples_per_pixel`
    /// independently jittered rays per pixel.
    pub fn render(
        &mut self,
        world: &dyn Hittable,
        rng: &mut impl Rng,
    ) -> ImageBuffer<Rgb<f32>, Vec<f32>> {
        self.initialize();

        let mut image: ImageBuffer<Rgb<f32>, Vec<f32>> =
            ImageBuffer::new(self.image_width, self.image_height);

        info!(
            "Rendering {}x{} at {} samples per pixel, depth {}",
            self.image_width, self.image_height, self.samples_per_pixel, self.max_depth
        );
        let render_start = std::time::Instant::now();
        let progress = ProgressBar::new(self.image_height as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40} {pos}/{len} scanlines ETA: {eta}")
                .unwrap(),
        );

        for j in 0..self.image_height {
            for i in 0..self.image_width {
                let mut pixel_color = Color::ZERO;

                for _ in 0..self.samples_per_pixel {
                    let r = self.get_ray(i, j, rng);
                    pixel_color += self.ray_color(&r, world, 0, rng);
                }

                pixel_color *= self.pixel_samples_scale;
                image.put_pixel(i, j, Rgb([pixel_color.x, pixel_color.y, pixel_color.z]));
            }
            progress.inc(1);
        }

        progress.finish();
        info!("Image rendered in {:.2?}", render_start.elapsed());

        image
    }

    /// Derive the viewport grid, camera frame, and defocus disk from the
    /// current configuration.
    fn initialize(&mut self) {
        self.image_height = ((self.image_width as f64 / self.aspect_ratio) as u32).max(1);

        self.pixel_samples_scale = 1.0 / self.samples_per_pixel as f32;

        self.center = self.lookfrom;

        // Viewport dimensions on the focus plane.
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Orthonormal camera frame: w opposes the view direction, u points
        // right, v points up.
        self.w = (self.lookfrom - self.lookat).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Vectors spanning the viewport edges, left to right and top to
        // bottom.
        let viewport_u = viewport_width * self.u;
        let viewport_v = viewport_height * -self.v;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left =
            self.center - (self.focus_dist * self.w) - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc =
            viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        let defocus_radius = self.focus_dist * (self.defocus_angle.to_radians() / 2.0).tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// Build one camera ray for pixel (i, j), jittered inside the pixel
    /// footprint and, when defocus blur is on, originating on the lens disk.
    fn get_ray(&self, i: u32, j: u32, rng: &mut impl Rng) -> Ray {
        let offset = random::random_in_unit_cube(rng);
        let pixel_sample = self.pixel00_loc
            + ((i as f32 + offset.x) * self.pixel_delta_u)
            + ((j as f32 + offset.y) * self.pixel_delta_v);

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };
        let ray_direction = pixel_sample - ray_origin;

        Ray::new(ray_origin, ray_direction)
    }

    /// Random ray origin on the defocus (lens) disk.
    fn defocus_disk_sample(&self, rng: &mut impl Rng) -> Vec3A {
        let p = random::random_in_unit_disk(rng);
        self.center + (p.x * self.defocus_disk_u) + (p.y * self.defocus_disk_v)
    }

    /// Recursively integrate the color carried by `r`.
    ///
    /// `depth` counts bounces already taken; the cutoff fires once it
    /// exceeds `max_depth`, so even a budget of zero processes the first
    /// surface interaction before its recursion terminates.
    fn ray_color(
        &self,
        r: &Ray,
        world: &dyn Hittable,
        depth: u32,
        rng: &mut impl Rng,
    ) -> Color {
        // Bounce budget exhausted: no more light is gathered.
        if depth > self.max_depth {
            return Color::ZERO;
        }

        let mut rec = HitRecord::default();

        // The lower bound skips hits within epsilon of the origin, so a
        // scattered ray cannot re-strike the surface it just left.
        if world.hit(r, Interval::new(0.001, f32::INFINITY), &mut rec) {
            let mut attenuation = Color::ZERO;
            let mut scattered = Ray::new(Vec3A::ZERO, Vec3A::ZERO);

            if rec
                .material
                .scatter(r, &rec, &mut attenuation, &mut scattered, rng)
            {
                return attenuation * self.ray_color(&scattered, world, depth + 1, rng);
            }
            return Color::ZERO;
        }

        // Miss: blend the sky gradient on the ray direction's height.
        let unit_direction = r.direction.normalize();
        let a = 0.5 * (unit_direction.y + 1.0);
        (1.0 - a) * Color::new(1.0, 1.0, 1.0) + a * Color::new(0.5, 0.7, 1.0)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::HittableList;
    use crate::material::MaterialType;
    use crate::sphere::Sphere;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::sync::Arc;

    fn small_scene() -> HittableList {
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(
            Vec3A::new(0.0, -100.5, -1.0),
            100.0,
            MaterialType::Lambertian {
                albedo: Color::new(0.8, 0.8, 0.0),
            },
        )));
        world.add(Arc::new(Sphere::new(
            Vec3A::new(0.0, 0.0, -1.2),
            0.5,
            MaterialType::Dielectric {
                refraction_index: 1.5,
            },
        )));
        world.add(Arc::new(Sphere::new(
            Vec3A::new(1.0, 0.0, -1.0),
            0.5,
            MaterialType::Metal {
                albedo: Color::new(0.8, 0.6, 0.2),
                fuzz: 0.1,
            },
        )));
        world
    }

    #[test]
    fn test_miss_shades_the_sky_gradient() {
        let camera = Camera::new();
        let world = HittableList::new();
        let mut rng = ChaCha20Rng::seed_from_u64(0);

        // straight up, the gradient is pure blue regardless of length, and
        // the same at every depth within the budget
        let up = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 2.0, 0.0));
        for depth in [0, 1, camera.max_depth] {
            let c = camera.ray_color(&up, &world, depth, &mut rng);
            assert!((c - Color::new(0.5, 0.7, 1.0)).abs().max_element() < 1e-6);
        }

        // straight down it is pure white
        let down = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, -3.0, 0.0));
        let c = camera.ray_color(&down, &world, 0, &mut rng);
        assert!((c - Color::ONE).abs().max_element() < 1e-6);

        // a level ray sits exactly halfway
        let level = Ray::new(Vec3A::ZERO, Vec3A::new(1.0, 0.0, 0.0));
        let c = camera.ray_color(&level, &world, 0, &mut rng);
        assert!((c - Color::new(0.75, 0.85, 1.0)).abs().max_element() < 1e-6);
    }

    #[test]
    fn test_depth_past_budget_is_black_even_on_a_miss() {
        let camera = Camera::new();
        let world = HittableList::new();
        let mut rng = ChaCha20Rng::seed_from_u64(0);

        let up = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 1.0, 0.0));
        let c = camera.ray_color(&up, &world, camera.max_depth + 1, &mut rng);
        assert_eq!(c, Color::ZERO);
    }

    #[test]
    fn test_zero_budget_still_processes_the_first_hit() {
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(
            Vec3A::new(0.0, 0.0, -1.0),
            0.5,
            MaterialType::Lambertian {
                albedo: Color::splat(0.5),
            },
        )));

        let mut camera = Camera::new();
        camera.max_depth = 0;
        let mut rng = ChaCha20Rng::seed_from_u64(11);

        // The centered ray hits and scatters once; the recursive call at
        // depth 1 exceeds the budget of 0 and must come back black.
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));
        let c = camera.ray_color(&ray, &world, 0, &mut rng);
        assert_eq!(c, Color::ZERO);

        // With budget to spare, the same ray reaches the sky through the
        // bounce and picks up attenuated light.
        camera.max_depth = 50;
        let c = camera.ray_color(&ray, &world, 0, &mut rng);
        assert!(c.min_element() > 0.0);
    }

    #[test]
    fn test_render_derives_dimensions_from_aspect_ratio() {
        let mut camera = Camera::new();
        camera.aspect_ratio = 2.0;
        camera.image_width = 8;
        camera.samples_per_pixel = 1;
        camera.max_depth = 1;
        let world = HittableList::new();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let image = camera.render(&world, &mut rng);
        assert_eq!(image.dimensions(), (8, 4));

        // edits between renders take effect
        camera.image_width = 4;
        let image = camera.render(&world, &mut rng);
        assert_eq!(image.dimensions(), (4, 2));
    }

    #[test]
    fn test_image_height_never_collapses_below_one() {
        let mut camera = Camera::new();
        camera.aspect_ratio = 100.0;
        camera.image_width = 10;
        camera.samples_per_pixel = 1;
        camera.max_depth = 1;
        let world = HittableList::new();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let image = camera.render(&world, &mut rng);
        assert_eq!(image.dimensions(), (10, 1));
    }

    #[test]
    fn test_pinhole_rays_originate_at_the_camera_center() {
        let mut camera = Camera::new();
        camera.lookfrom = Vec3A::new(1.0, 2.0, 3.0);
        camera.lookat = Vec3A::new(0.0, 2.0, 3.0);
        camera.initialize();
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        for _ in 0..10 {
            let ray = camera.get_ray(0, 0, &mut rng);
            assert_eq!(ray.origin, Vec3A::new(1.0, 2.0, 3.0));
        }
    }

    #[test]
    fn test_defocus_rays_sample_the_lens_disk() {
        let mut camera = Camera::new();
        camera.defocus_angle = 2.0;
        camera.focus_dist = 5.0;
        camera.initialize();
        let mut rng = ChaCha20Rng::seed_from_u64(6);

        let radius = camera.focus_dist * (camera.defocus_angle.to_radians() / 2.0).tan();
        let mut saw_off_center = false;
        for _ in 0..50 {
            let ray = camera.get_ray(50, 50, &mut rng);
            let offset = ray.origin - camera.center;
            assert!(offset.length() <= radius + 1e-5);
            // lens offsets lie in the u-v plane
            assert!(offset.dot(camera.w).abs() < 1e-5);
            if offset.length() > 1e-6 {
                saw_off_center = true;
            }
        }
        assert!(saw_off_center);
    }

    #[test]
    fn test_center_pixel_ray_points_at_the_look_target() {
        let mut camera = Camera::new();
        camera.image_width = 101;
        camera.initialize();
        let mut rng = ChaCha20Rng::seed_from_u64(7);

        // jitter stays within half a pixel, so the center pixel's ray keeps
        // the view direction's sign
        let ray = camera.get_ray(50, 50, &mut rng);
        assert!(ray.direction.z < 0.0);
        assert!(ray.direction.x.abs() < 1.0);
        assert!(ray.direction.y.abs() < 1.0);
    }

    #[test]
    fn test_same_seed_renders_identical_images() {
        let world = small_scene();
        let mut camera = Camera::new();
        camera.aspect_ratio = 16.0 / 9.0;
        camera.image_width = 16;
        camera.samples_per_pixel = 4;
        camera.max_depth = 8;
        camera.focus_dist = 1.0;

        let first = camera.render(&world, &mut ChaCha20Rng::seed_from_u64(7));
        let second = camera.render(&world, &mut ChaCha20Rng::seed_from_u64(7));
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_rendered_energy_stays_below_the_sky_peak() {
        let world = small_scene();
        let mut camera = Camera::new();
        camera.aspect_ratio = 16.0 / 9.0;
        camera.image_width = 16;
        camera.samples_per_pixel = 2;
        camera.max_depth = 4;
        camera.focus_dist = 1.0;
        let mut rng = ChaCha20Rng::seed_from_u64(9);

        let image = camera.render(&world, &mut rng);
        for pixel in image.pixels() {
            for &channel in pixel.0.iter() {
                assert!(channel.is_finite());
                assert!((0.0..=1.0 + 1e-5).contains(&channel));
            }
        }
    }
}
