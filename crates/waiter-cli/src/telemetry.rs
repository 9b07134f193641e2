//! Tracing subscriber setup for the demo binary.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(String),
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(String),
}

/// Install a global fmt subscriber writing to stderr.
///
/// The filter comes from `RUST_LOG` and falls back to `info`.
pub fn initialise() -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(DEFAULT_FILTER)
            .map_err(|error| TelemetryError::Filter(error.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init()
        .map_err(|error| TelemetryError::Subscriber(error.to_string()))
}
