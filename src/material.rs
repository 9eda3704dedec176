//! Surface scattering models.
//!
//! The renderer's three material kinds live in one closed enum dispatched
//! with a single `match`: Lambertian diffuse, fuzzed metal reflection, and
//! dielectric refraction with a Schlick-approximated reflect/refract choice.

use glam::Vec3A;
use rand::Rng;

use crate::hittable::HitRecord;
use crate::random;
use crate::ray::Ray;

/// RGB color carried in a `Vec3A` for SIMD-friendly arithmetic.
pub type Color = Vec3A;

/// Componentwise threshold below which a scatter direction is considered
/// degenerate.
const NEAR_ZERO: f32 = 1e-8;

/// Surface materials, each variant carrying its own parameters.
#[derive(Debug, Clone, Copy)]
pub enum MaterialType {
    /// Matte surface with a cosine-weighted scatter lobe.
    Lambertian {
        /// Base reflectance color.
        albedo: Color,
    },
    /// Reflective surface with optional roughness.
    Metal {
        /// Base reflectance color.
        albedo: Color,
        /// Perturbation radius applied to the mirror direction; 0 is a
        /// perfect mirror. Clamped into `[0, 1]` at scatter time.
        fuzz: f32,
    },
    /// Clear refracting surface such as glass or water.
    Dielectric {
        /// Refractive index of the material over that of the surrounding
        /// medium.
        refraction_index: f32,
    },
}

impl MaterialType {
    /// Scatter an incoming ray at a hit point.
    ///
    /// Returns true when the ray scatters, filling `attenuation` with the
    /// per-channel throughput and `scattered` with the outgoing ray; returns
    /// false when the ray is absorbed.
    pub fn scatter(
        &self,
        r_in: &Ray,
        rec: &HitRecord,
        attenuation: &mut Color,
        scattered: &mut Ray,
        rng: &mut impl Rng,
    ) -> bool {
        match self {
            MaterialType::Lambertian { albedo } => {
                self.scatter_lambertian(*albedo, rec, attenuation, scattered, rng)
            }
            MaterialType::Metal { albedo, fuzz } => {
                self.scatter_metal(*albedo, *fuzz, r_in, rec, attenuation, scattered, rng)
            }
            MaterialType::Dielectric { refraction_index } => self.scatter_dielectric(
                *refraction_index,
                r_in,
                rec,
                attenuation,
                scattered,
                rng,
            ),
        }
    }

    fn scatter_lambertian(
        &self,
        albedo: Color,
        rec: &HitRecord,
        attenuation: &mut Color,
        scattered: &mut Ray,
        rng: &mut impl Rng,
    ) -> bool {
        let mut scatter_direction = rec.normal + random::random_unit_vector(rng);

        // The sampled vector can nearly cancel the normal; fall back to the
        // normal itself rather than scattering a zero ray.
        if scatter_direction.abs().max_element() < NEAR_ZERO {
            scatter_direction = rec.normal;
        }

        *scattered = Ray::new(rec.p, scatter_direction);
        *attenuation = albedo;
        true
    }

    fn scatter_metal(
        &self,
        albedo: Color,
        fuzz: f32,
        r_in: &Ray,
        rec: &HitRecord,
        attenuation: &mut Color,
        scattered: &mut Ray,
        rng: &mut impl Rng,
    ) -> bool {
        let reflected = reflect(r_in.direction.normalize(), rec.normal);
        let direction = reflected + fuzz.clamp(0.0, 1.0) * random::random_unit_vector(rng);

        *scattered = Ray::new(rec.p, direction);
        *attenuation = albedo;

        // A fuzzed direction ending up below the surface is absorbed.
        scattered.direction.dot(rec.normal) > 0.0
    }

    fn scatter_dielectric(
        &self,
        refraction_index: f32,
        r_in: &Ray,
        rec: &HitRecord,
        attenuation: &mut Color,
        scattered: &mut Ray,
        rng: &mut impl Rng,
    ) -> bool {
        // Glass absorbs nothing.
        *attenuation = Color::ONE;

        let ri = if rec.front_face {
            1.0 / refraction_index
        } else {
            refraction_index
        };

        let unit_direction = r_in.direction.normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection leaves no refracted branch; otherwise
        // pick between the branches with Fresnel probability.
        let cannot_refract = ri * sin_theta > 1.0;
        let direction = if cannot_refract || reflectance(cos_theta, ri) > random::random_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, ri)
        };

        *scattered = Ray::new(rec.p, direction);
        true
    }
}

/// Mirror reflection of `v` about the unit normal `n`.
fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}

/// Snell's-law refraction of the unit vector `uv` at the unit normal `n`.
fn refract(uv: Vec3A, n: Vec3A, etai_over_etat: f32) -> Vec3A {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    // abs() absorbs the tiny negative values rounding produces when the
    // perpendicular part sits at the edge of the feasible range.
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's polynomial approximation of the Fresnel reflectance.
fn reflectance(cosine: f32, refraction_index: f32) -> f32 {
    let r0 = (1.0 - refraction_index) / (1.0 + refraction_index);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
