//! Tracing subscriber setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ember_core::error::EmissionError;

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `level` when set. `format == "json"` selects
/// structured output; anything else gives human-readable text. Fails if a
/// global subscriber is already installed.
pub fn init_tracing(level: &str, format: &str) -> Result<(), EmissionError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let result = if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true))
            .try_init()
    };

    result.map_err(|e| EmissionError::Config(e.to_string()))
}
