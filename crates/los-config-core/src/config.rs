//! Runtime settings for the configuration core.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

use crate::error::ConfigError;

/// Environment variable overriding `log_filter`
pub const ENV_LOG_FILTER: &str = "LOS_CONFIG_LOG_FILTER";

/// Environment variable overriding `enable_json_logging`
pub const ENV_JSON_LOGS: &str = "LOS_CONFIG_JSON_LOGS";

/// Core settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Filter directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit JSON logs instead of the pretty format
    #[serde(default)]
    pub enable_json_logging: bool,
}

fn default_log_filter() -> String {
    "info,los_config_core=debug".to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            enable_json_logging: false,
        }
    }
}

impl CoreConfig {
    /// Defaults with environment overrides applied
    pub fn load() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Parse settings from a YAML document, then apply environment overrides
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: CoreConfig = serde_yaml::from_str(text)?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(filter) = env::var(ENV_LOG_FILTER) {
            self.log_filter = filter;
        }

        if let Ok(json) = env::var(ENV_JSON_LOGS) {
            match parse_flag(&json) {
                Some(flag) => self.enable_json_logging = flag,
                None => warn!("Invalid {} value: {}", ENV_JSON_LOGS, json),
            }
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.log_filter, "info,los_config_core=debug");
        assert!(!config.enable_json_logging);
    }

    #[test]
    fn test_yaml_fills_missing_fields() {
        let config: CoreConfig = serde_yaml::from_str("enable_json_logging: true").unwrap();
        assert!(config.enable_json_logging);
        assert_eq!(config.log_filter, default_log_filter());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
