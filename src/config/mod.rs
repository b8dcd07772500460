//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `FORMFLOW` prefix and nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use formflow::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod blueprints;
mod error;
mod language;
mod server;

pub use blueprints::BlueprintsConfig;
pub use error::{ConfigError, ValidationError};
pub use language::LanguageConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Blueprint catalog configuration
    #[serde(default)]
    pub blueprints: BlueprintsConfig,

    /// Language defaults
    #[serde(default)]
    pub language: LanguageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads environment variables
    /// with the `FORMFLOW` prefix, `__` separating nested values:
    ///
    /// - `FORMFLOW__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `FORMFLOW__BLUEPRINTS__DIR=./blueprints` -> `blueprints.dir`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FORMFLOW")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.blueprints.validate()?;
        self.language.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
