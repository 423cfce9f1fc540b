//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MARCHE_DOCS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use marche_docs::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Files stored under {}", config.storage.base_path.display());
//! ```

mod database;
mod error;
mod logging;
mod storage;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

use crate::domain::visa::MAX_COMMENT_LENGTH;
use crate::domain::workflow::VisaPolicy;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Uploaded files
    #[serde(default)]
    pub storage: StorageConfig,

    /// Visa rules (comment length, response delay)
    #[serde(default)]
    pub workflow: VisaPolicy,

    /// Tracing output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MARCHE_DOCS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MARCHE_DOCS__DATABASE__URL=...` -> `database.url = ...`
    /// - `MARCHE_DOCS__WORKFLOW__DUE_IN_DAYS=10` -> `workflow.due_in_days = 10`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MARCHE_DOCS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        if self.workflow.min_comment_length == 0
            || self.workflow.min_comment_length > MAX_COMMENT_LENGTH
        {
            return Err(ValidationError::InvalidCommentLength {
                max: MAX_COMMENT_LENGTH,
            });
        }
        Ok(())
    }
}
