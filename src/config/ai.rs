//! AI provider configuration

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use super::error::ValidationError;

/// Values shipped in sample env files that are never real keys.
const PLACEHOLDER_KEYS: [&str; 3] = ["your-api-key-here", "dummy-key", "dummy-key-for-testing"];

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for the completion endpoint. Absence is tolerated at startup.
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default)]
    pub max_retries: u32,
}

/// Non-fatal problems spotted in the configured API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyWarning {
    /// Shorter than 20 chars or contains chars outside `[A-Za-z0-9_-]`.
    SuspiciousFormat,
    /// Quote characters were copied in from the env file.
    ContainsQuotes,
    /// Whitespace inside the key.
    ContainsSpaces,
    /// A sample value rather than a real key.
    Placeholder,
}

impl fmt::Display for KeyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::SuspiciousFormat => "API key format looks invalid",
            Self::ContainsQuotes => "API key contains quotes; remove them from the env file",
            Self::ContainsSpaces => "API key contains spaces; remove them from the env file",
            Self::Placeholder => "API key is a placeholder; replace it with a real key",
        };
        f.write_str(msg)
    }
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a non-empty API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    /// First 8 characters of the key, for log lines.
    pub fn masked_key(&self) -> Option<String> {
        self.api_key
            .as_ref()
            .filter(|k| !k.is_empty())
            .map(|k| format!("{}...", k.chars().take(8).collect::<String>()))
    }

    /// Inspect the API key for common copy/paste mistakes.
    pub fn key_warnings(&self) -> Vec<KeyWarning> {
        let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) else {
            return Vec::new();
        };

        let mut warnings = Vec::new();
        let well_formed = key.chars().count() >= 20
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !well_formed {
            warnings.push(KeyWarning::SuspiciousFormat);
        }
        if key.contains('"') || key.contains('\'') {
            warnings.push(KeyWarning::ContainsQuotes);
        }
        if key.contains(' ') {
            warnings.push(KeyWarning::ContainsSpaces);
        }
        if PLACEHOLDER_KEYS.contains(&key) {
            warnings.push(KeyWarning::Placeholder);
        }
        warnings
    }

    /// Validate AI configuration
    ///
    /// A missing key is not an error: turns short-circuit to a
    /// "trouble connecting" reply instead.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
            max_retries: 0,
        }
    }
}

fn default_base_url() -> String {
    "https://api.x.ai/v1".to_string()
}

fn default_model() -> String {
    "grok-2".to_string()
}

fn default_max_tokens() -> u32 {
    250
}

fn default_temperature() -> f32 {
    0.8
}

fn default_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key(key: &str) -> AiConfig {
        AiConfig {
            api_key: Some(key.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.base_url, "https://api.x.ai/v1");
        assert_eq!(config.model, "grok-2");
        assert_eq!(config.max_tokens, 250);
        assert_eq!(config.temperature, 0.8);
        assert_eq!(config.max_retries, 0);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 45,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(45));
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        assert!(!with_key("   ").has_api_key());
        assert!(with_key("xai-abcdefghijklmnopqrst").has_api_key());
    }

    #[test]
    fn test_masked_key_shows_prefix_only() {
        let config = with_key("xai-abcdefghijklmnopqrst");
        assert_eq!(config.masked_key().as_deref(), Some("xai-abcd..."));
        assert_eq!(AiConfig::default().masked_key(), None);
    }

    #[test]
    fn test_well_formed_key_has_no_warnings() {
        assert!(with_key("xai-abcdefghijklmnopqrst_123").key_warnings().is_empty());
    }

    #[test]
    fn test_key_warnings_detect_mistakes() {
        let quoted = with_key("\"xai-abcdefghijklmnopqrst\"").key_warnings();
        assert!(quoted.contains(&KeyWarning::ContainsQuotes));
        assert!(quoted.contains(&KeyWarning::SuspiciousFormat));

        let spaced = with_key("xai abcdefghijklmnopqrst").key_warnings();
        assert!(spaced.contains(&KeyWarning::ContainsSpaces));

        let placeholder = with_key("dummy-key").key_warnings();
        assert!(placeholder.contains(&KeyWarning::Placeholder));
        assert!(placeholder.contains(&KeyWarning::SuspiciousFormat));
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(AiConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad_url = AiConfig {
            base_url: "api.x.ai".to_string(),
            ..Default::default()
        };
        assert_eq!(bad_url.validate(), Err(ValidationError::InvalidBaseUrl));

        let bad_timeout = AiConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(bad_timeout.validate(), Err(ValidationError::InvalidTimeout));

        let bad_temp = AiConfig {
            temperature: 3.5,
            ..Default::default()
        };
        assert_eq!(bad_temp.validate(), Err(ValidationError::InvalidTemperature));

        let bad_tokens = AiConfig {
            max_tokens: 0,
            ..Default::default()
        };
        assert_eq!(bad_tokens.validate(), Err(ValidationError::InvalidMaxTokens));
    }
}
