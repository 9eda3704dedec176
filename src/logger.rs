//! Logging setup.

use env_logger::Target;
use log::LevelFilter;

/// Initialize logging at `level`, honoring any `RUST_LOG` override.
///
/// Diagnostics go to stderr so they never interleave with an image stream a
/// shell redirects from stdout.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .target(Target::Stderr)
        .init();
}
