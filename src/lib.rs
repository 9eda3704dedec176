//! LumenPath path tracer.
//!
//! A single-threaded Monte-Carlo path tracer for sphere scenes: jittered
//! camera rays with optional defocus blur, Lambertian / metal / dielectric
//! scattering, and a plain-text PPM image stream (PNG kept as a convenience
//! sink). A render is a pure function of the scene, the camera configuration,
//! and the random generator handed in, so a fixed seed reproduces an image
//! byte for byte.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod ray;
pub mod sphere;
pub mod hittable;
pub mod interval;
pub mod camera;
pub mod random;
pub mod material;
pub mod output;
