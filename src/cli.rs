//! Command-line interface definitions.

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels selectable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert the CLI log level to the filter the logger understands.
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Parse an aspect ratio given either as `W:H` or as a plain float.
fn parse_aspect_ratio(s: &str) -> Result<f64, String> {
    if let Some((w, h)) = s.split_once(':') {
        let w: f64 = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid aspect ratio '{}'", s))?;
        let h: f64 = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid aspect ratio '{}'", s))?;
        if w <= 0.0 || h <= 0.0 {
            return Err(format!("aspect ratio '{}' must be positive", s));
        }
        return Ok(w / h);
    }

    let ratio: f64 = s
        .parse()
        .map_err(|_| format!("invalid aspect ratio '{}'", s))?;
    if ratio <= 0.0 {
        return Err(format!("aspect ratio '{}' must be positive", s));
    }
    Ok(ratio)
}

/// Command line arguments.
#[derive(Parser)]
#[command(name = "lumenpath")]
#[command(about = "A CPU Monte-Carlo path tracer")]
pub struct Args {
    /// Image width in pixels
    #[arg(long, default_value = "800", help = "Image width in pixels")]
    pub width: u32,

    /// Image aspect ratio, as W:H or a plain ratio
    #[arg(
        long,
        default_value = "16:9",
        value_parser = parse_aspect_ratio,
        help = "Image aspect ratio, e.g. 16:9 or 1.78"
    )]
    pub aspect_ratio: f64,

    /// Number of samples per pixel
    #[arg(
        long,
        short = 's',
        default_value = "100",
        help = "Number of samples per pixel"
    )]
    pub samples_per_pixel: u32,

    /// Maximum number of ray bounces per sample
    #[arg(
        long,
        default_value = "50",
        help = "Maximum number of ray bounces per sample"
    )]
    pub max_depth: u32,

    /// RNG seed; the same seed reproduces an image byte for byte
    #[arg(long, help = "RNG seed; omit for a fresh image every run")]
    pub seed: Option<u64>,

    /// Output file path; "-" streams PPM to stdout
    #[arg(
        short,
        long,
        default_value = "output.ppm",
        help = "Output file path (.ppm or .png), or - to stream PPM to stdout"
    )]
    pub output: String,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,
}
