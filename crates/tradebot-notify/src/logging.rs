//! Logging setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialise the global subscriber. `RUST_LOG` overrides `level`;
/// `format` selects "json", "compact", or pretty output.
pub fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init(),
        "compact" => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init(),
    }
}
