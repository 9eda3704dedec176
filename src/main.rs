//! LumenPath command-line renderer.

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use glam::Vec3A;
use log::{error, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;
use lumenpath::camera::Camera;
use lumenpath::hittable::HittableList;
use lumenpath::material::MaterialType;
use lumenpath::output::{save_image_as_png, save_image_as_ppm, write_ppm};
use lumenpath::random;
use lumenpath::sphere::Sphere;

/// Build the demo scene: a ground sphere, a grid of small random spheres,
/// and three large feature spheres showing off each material.
fn create_scene(rng: &mut impl Rng) -> HittableList {
    let mut world = HittableList::new();

    world.add(Arc::new(Sphere::new(
        Vec3A::new(0.0, -1000.0, 0.0),
        1000.0,
        MaterialType::Lambertian {
            albedo: Vec3A::new(0.5, 0.5, 0.5),
        },
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = random::random_f32(rng);
            let center = Vec3A::new(
                a as f32 + 0.9 * random::random_f32(rng),
                0.2,
                b as f32 + 0.9 * random::random_f32(rng),
            );

            // keep the grid clear of the large metal sphere
            if (center - Vec3A::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.8 {
                MaterialType::Lambertian {
                    albedo: random::random_color(rng) * random::random_color(rng),
                }
            } else if choose_mat < 0.95 {
                MaterialType::Metal {
                    albedo: random::random_color_range(rng, 0.5, 1.0),
                    fuzz: random::random_f32_range(rng, 0.0, 0.5),
                }
            } else {
                MaterialType::Dielectric {
                    refraction_index: 1.5,
                }
            };

            world.add(Arc::new(Sphere::new(center, 0.2, material)));
        }
    }

    world.add(Arc::new(Sphere::new(
        Vec3A::new(0.0, 1.0, 0.0),
        1.0,
        MaterialType::Dielectric {
            refraction_index: 1.5,
        },
    )));
    world.add(Arc::new(Sphere::new(
        Vec3A::new(-4.0, 1.0, 0.0),
        1.0,
        MaterialType::Lambertian {
            albedo: Vec3A::new(0.4, 0.2, 0.1),
        },
    )));
    world.add(Arc::new(Sphere::new(
        Vec3A::new(4.0, 1.0, 0.0),
        1.0,
        MaterialType::Metal {
            albedo: Vec3A::new(0.7, 0.6, 0.5),
            fuzz: 0.0,
        },
    )));

    world
}

/// Configure the camera for the demo scene's framing.
fn create_camera(args: &Args) -> Camera {
    let mut camera = Camera::new();
    camera.aspect_ratio = args.aspect_ratio;
    camera.image_width = args.width;
    camera.samples_per_pixel = args.samples_per_pixel;
    camera.max_depth = args.max_depth;
    camera.vfov = 20.0;
    camera.lookfrom = Vec3A::new(13.0, 2.0, 3.0);
    camera.lookat = Vec3A::new(0.0, 0.0, 0.0);
    camera.vup = Vec3A::new(0.0, 1.0, 0.0);
    camera.defocus_angle = 0.6;
    camera.focus_dist = 10.0;
    camera
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.into());

    info!(
        "LumenPath - Git Version {} ({})",
        env!("GIT_HASH"),
        env!("GIT_DATE")
    );

    let mut rng = match args.seed {
        Some(seed) => {
            info!("RNG seeded with {}", seed);
            ChaCha20Rng::seed_from_u64(seed)
        }
        None => ChaCha20Rng::from_rng(&mut rand::rng()),
    };

    let world = create_scene(&mut rng);
    info!("Scene holds {} objects", world.objects.len());

    let mut camera = create_camera(&args);
    let image = camera.render(&world, &mut rng);

    if args.output == "-" {
        // logs go to stderr, so the stream stays clean for redirection
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = write_ppm(&image, &mut out).and_then(|_| out.flush()) {
            error!("Failed to stream image to stdout: {}", e);
            std::process::exit(1);
        }
    } else if args.output.ends_with(".ppm") {
        save_image_as_ppm(&image, &args.output);
    } else if args.output.ends_with(".png") {
        save_image_as_png(&image, &args.output);
    } else {
        error!(
            "Unsupported file extension in '{}'. Only .ppm and .png are supported.",
            args.output
        );
        std::process::exit(1);
    }
}
