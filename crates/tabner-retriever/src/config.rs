//! Configuration for the retrieval backends

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration shared by the retrieval backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Maximum retrieval attempts per record before degrading to empty
    pub max_retries: u32,

    /// Maximum time for a single backend call (seconds)
    pub timeout_secs: u64,
}

impl RetrieverConfig {
    /// Get the per-call timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            timeout_secs: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RetrieverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_retries, 5);
    }

    #[test]
    fn test_zero_retries_rejected() {
        let config = RetrieverConfig {
            max_retries: 0,
            ..RetrieverConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RetrieverConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = RetrieverConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.max_retries, parsed.max_retries);
        assert_eq!(config.timeout_secs, parsed.timeout_secs);
    }
}
