//! HTTP listener, logging and CORS configuration

use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;

use super::error::ValidationError;

/// Listener and environment settings (`CHECKMATE__SERVER__*`)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host, `0.0.0.0` unless overridden
    pub host: String,

    /// Bind port
    pub port: u16,

    pub environment: Environment,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_level: String,

    /// Comma-separated browser origins; unset means any origin
    pub cors_origins: Option<String>,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        })
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event, for log shipping.
    Json,
}

/// Which browser origins may call the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    AnyOrigin,
    Origins(Vec<String>),
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| ValidationError::InvalidSocketAddr(raw))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Configuration hints are only attached to replies in development.
    pub fn exposes_debug_hints(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn log_format(&self) -> LogFormat {
        if self.is_production() {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }

    pub fn cors_policy(&self) -> CorsPolicy {
        let origins: Vec<String> = self
            .cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() {
            CorsPolicy::AnyOrigin
        } else {
            CorsPolicy::Origins(origins)
        }
    }

    /// Rejects port 0 and hosts that do not form a socket address.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr().map(|_| ())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::default(),
            log_level: "info,checkmate=debug,tower_http=info".to_string(),
            cors_origins: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_origins(origins: &str) -> ServerConfig {
        ServerConfig {
            cors_origins: Some(origins.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_bind_all_interfaces_in_development() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.environment, Environment::Development);
        assert!(config.exposes_debug_hints());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn production_logs_json_and_hides_hints() {
        let config = ServerConfig {
            environment: Environment::Production,
            ..Default::default()
        };
        assert_eq!(config.log_format(), LogFormat::Json);
        assert!(!config.exposes_debug_hints());
        assert_eq!(config.environment.to_string(), "production");
    }

    #[test]
    fn staging_logs_pretty_without_hints() {
        let config = ServerConfig {
            environment: Environment::Staging,
            ..Default::default()
        };
        assert_eq!(config.log_format(), LogFormat::Pretty);
        assert!(!config.exposes_debug_hints());
    }

    #[test]
    fn cors_origins_skip_blank_entries() {
        assert_eq!(
            with_origins("http://localhost:3000, ,http://localhost:5173").cors_policy(),
            CorsPolicy::Origins(vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string()
            ])
        );
    }

    #[test]
    fn unset_or_blank_origins_allow_any() {
        assert_eq!(ServerConfig::default().cors_policy(), CorsPolicy::AnyOrigin);
        assert_eq!(with_origins(" , ").cors_policy(), CorsPolicy::AnyOrigin);
    }

    #[test]
    fn port_zero_is_rejected() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPort));
    }

    #[test]
    fn unparseable_host_is_rejected() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidSocketAddr(_))
        ));
    }
}
