//! Image sinks.
//!
//! The canonical artifact is the plain-text PPM (P3) stream, gamma-2.0
//! encoded. PNG stays available as a convenience sink for quick viewing and
//! uses the full sRGB transfer curve instead.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use image::{ImageBuffer, Rgb};
use log::{info, warn};

use crate::interval::Interval;

/// Channel range for 8-bit quantization; the upper bound keeps `256 * x`
/// strictly below 256.
const INTENSITY: Interval = Interval {
    min: 0.0,
    max: 0.999,
};

/// Gamma-2.0 transfer from linear light to the PPM stream's encoding.
fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Serialize `image` as a plain-text PPM (P3) stream.
///
/// The layout is fixed and byte-exact for a given buffer:
///
/// 1. `P3` on its own line
/// 2. `<width> <height>` on the next
/// 3. the maximum channel value, `255`
/// 4. one `r g b` line per pixel, row-major, starting at the top-left
///
/// Channels are gamma-2.0 encoded, clamped into `[0, 0.999]`, scaled by 256,
/// and truncated, so every emitted value lands in `[0, 255]`.
///
/// # Errors
///
/// Propagates any I/O error from the underlying writer.
pub fn write_ppm<W: Write>(
    image: &ImageBuffer<Rgb<f32>, Vec<f32>>,
    out: &mut W,
) -> io::Result<()> {
    let (width, height) = image.dimensions();
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", width, height)?;
    writeln!(out, "255")?;

    for pixel in image.pixels() {
        let r = (256.0 * INTENSITY.clamp(linear_to_gamma(pixel[0]))) as u8;
        let g = (256.0 * INTENSITY.clamp(linear_to_gamma(pixel[1]))) as u8;
        let b = (256.0 * INTENSITY.clamp(linear_to_gamma(pixel[2]))) as u8;
        writeln!(out, "{} {} {}", r, g, b)?;
    }

    Ok(())
}

/// Write `image` to `output_path` as PPM, logging the outcome.
pub fn save_image_as_ppm(image: &ImageBuffer<Rgb<f32>, Vec<f32>>, output_path: &str) {
    let result = File::create(output_path).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write_ppm(image, &mut writer)?;
        writer.flush()
    });

    match result {
        Ok(()) => info!("Image saved as {}", output_path),
        Err(e) => warn!("Failed to save image: {}", e),
    }
}

/// Write `image` to `output_path` as an 8-bit sRGB PNG, logging the outcome.
pub fn save_image_as_png(image: &ImageBuffer<Rgb<f32>, Vec<f32>>, output_path: &str) {
    let (width, height) = image.dimensions();
    let u8_image: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(width, height, |x, y| {
            let pixel = image.get_pixel(x, y);

            // sRGB transfer curve, with its linear toe for dark values.
            let linear_to_srgb = |linear: f32| -> f32 {
                if linear <= 0.0 {
                    0.0
                } else if linear <= 0.0031308 {
                    12.92 * linear
                } else {
                    1.055 * linear.powf(1.0 / 2.4) - 0.055
                }
            };

            Rgb([
                (linear_to_srgb(pixel[0].clamp(0.0, 1.0)) * 255.0) as u8,
                (linear_to_srgb(pixel[1].clamp(0.0, 1.0)) * 255.0) as u8,
                (linear_to_srgb(pixel[2].clamp(0.0, 1.0)) * 255.0) as u8,
            ])
        });

    match u8_image.save(output_path) {
        Ok(()) => info!("Image saved as {}", output_path),
        Err(e) => warn!("Failed to save image: {}", e),
    }
}
