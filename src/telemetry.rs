//! Tracing subscriber setup.

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingConfig, ValidationError};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error(transparent)]
    InvalidFilter(#[from] ValidationError),

    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` is not consulted; the filter comes from configuration so that
/// `MARCHE_DOCS__LOGGING__FILTER` is the single knob.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = config.env_filter()?;

    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };
    result.map_err(|_| TelemetryError::AlreadyInitialized)?;

    tracing::info!(filter = %config.filter, json = config.json, "tracing initialized");
    Ok(())
}
