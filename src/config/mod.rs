//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CHECKMATE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use checkmate::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod ai;
mod error;
mod game;
mod server;

pub use ai::{AiConfig, KeyWarning};
pub use error::{ConfigError, ValidationError};
pub use game::GameConfig;
pub use server::{CorsPolicy, Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Plain variable name honoured when `CHECKMATE__AI__API_KEY` is unset.
pub const LEGACY_API_KEY_VAR: &str = "XAI_API_KEY";

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Game pacing configuration
    #[serde(default)]
    pub game: GameConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CHECKMATE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Falls back to `XAI_API_KEY` for the credential
    ///
    /// # Environment Variable Format
    ///
    /// - `CHECKMATE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CHECKMATE__AI__API_KEY=...` -> `ai.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CHECKMATE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if !config.ai.has_api_key() {
            config.ai.api_key = std::env::var(LEGACY_API_KEY_VAR)
                .ok()
                .filter(|k| !k.is_empty());
        }

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
