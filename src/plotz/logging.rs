//! Logging bootstrap for the binary.
//!
//! The library only talks to the `log` facade. The host picks the backend;
//! the CLI uses `env_logger` writing to stderr so stdout stays clean.
//!
//! Level resolution: `RUST_LOG` when set, otherwise the configured level,
//! raised to `debug` by `--verbose`.

use log::LevelFilter;
use std::str::FromStr;

/// Resolve the level used when `RUST_LOG` is absent.
pub fn resolve_level(configured: &str, verbose: bool) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }
    LevelFilter::from_str(configured).unwrap_or(LevelFilter::Warn)
}

/// Install the stderr logger. Safe to call more than once; later calls are ignored.
pub fn init_logging(configured: &str, verbose: bool) {
    let level = resolve_level(configured, verbose);
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    let _ = builder.try_init();
}
