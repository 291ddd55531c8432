//! Game pacing configuration

use serde::Deserialize;
use std::time::Duration;

/// Game behaviour knobs that are not tied to the provider
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Simulated delay before a reset is acknowledged, in milliseconds
    #[serde(default = "default_reset_delay")]
    pub reset_delay_ms: u64,

    /// Fixed seed for segmentation and fallback picks (tests, demos)
    pub rng_seed: Option<u64>,
}

impl GameConfig {
    /// Get reset delay as Duration
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            reset_delay_ms: default_reset_delay(),
            rng_seed: None,
        }
    }
}

fn default_reset_delay() -> u64 {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_config_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.reset_delay(), Duration::from_secs(2));
        assert!(config.rng_seed.is_none());
    }
}
