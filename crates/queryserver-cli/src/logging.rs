//! Logging setup for the binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Builds the filter: `RUST_LOG` when set, otherwise `level`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Installs a stderr fmt subscriber. Call once at startup.
///
/// With `quiet` set nothing is installed and log events are dropped.
pub fn init_logging(level: &str, quiet: bool) {
    if quiet {
        return;
    }

    let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    // A subscriber may already be set (tests); keep the existing one.
    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(layer)
        .try_init();
}
