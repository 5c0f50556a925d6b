//! Configuration module for Statusboard
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`STATUSBOARD_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use statusboard::config::DashboardConfig;
//!
//! let toml = r#"
//! [server]
//! port = 9000
//!
//! [[channels]]
//! name = "forecast"
//! interval_seconds = 120
//! source = { type = "http_json", url = "http://weather.local/api" }
//! "#;
//! let config: DashboardConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.server.port, 9000);
//! assert_eq!(config.channels[0].name, "forecast");
//! ```

pub mod channel;
pub mod error;
pub mod logging;
pub mod server;

pub use channel::{
    ChannelConfig, FallbackConfig, HttpJsonConfig, ServiceHealthConfig, ServiceTarget,
    SourceConfig, StaticConfig,
};
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Unified configuration for the dashboard server.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Polled channels, in declaration order
    pub channels: Vec<ChannelConfig>,
}

impl DashboardConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("STATUSBOARD_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("STATUSBOARD_HOST") {
            self.server.host = host;
        }
        if let Ok(level) = std::env::var("STATUSBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("STATUSBOARD_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate process-level settings. Failure here aborts startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }
        if self.server.session_queue_capacity == 0 {
            return Err(ConfigError::Validation {
                field: "server.session_queue_capacity".to_string(),
                message: "capacity must be non-zero".to_string(),
            });
        }

        Ok(())
    }

    /// Split configured channels into startable ones and per-channel errors.
    ///
    /// Disabled channels are dropped silently. The first channel to claim a
    /// name (primary or fallback) keeps it; later claimants are rejected.
    pub fn partition_channels(&self) -> (Vec<&ChannelConfig>, Vec<ConfigError>) {
        let mut accepted = Vec::new();
        let mut errors = Vec::new();
        let mut claimed: HashSet<&str> = HashSet::new();

        for channel in self.channels.iter().filter(|c| c.enabled) {
            if let Err(e) = validate_channel(channel) {
                errors.push(e);
                continue;
            }

            if claimed.contains(channel.name.as_str()) {
                errors.push(ConfigError::channel(
                    &channel.name,
                    "channel name already in use",
                ));
                continue;
            }

            if let Some(fallback) = &channel.fallback {
                if claimed.contains(fallback.channel.as_str()) {
                    errors.push(ConfigError::channel(
                        &channel.name,
                        format!("fallback channel '{}' already in use", fallback.channel),
                    ));
                    continue;
                }
                claimed.insert(fallback.channel.as_str());
            }

            claimed.insert(channel.name.as_str());
            accepted.push(channel);
        }

        (accepted, errors)
    }
}

fn validate_channel(channel: &ChannelConfig) -> Result<(), ConfigError> {
    if channel.name.trim().is_empty() {
        return Err(ConfigError::channel("<unnamed>", "name cannot be empty"));
    }
    if channel.interval_seconds == 0 {
        return Err(ConfigError::channel(
            &channel.name,
            "interval_seconds must be non-zero",
        ));
    }
    if let Some(fallback) = &channel.fallback {
        if fallback.channel.trim().is_empty() {
            return Err(ConfigError::channel(
                &channel.name,
                "fallback channel name cannot be empty",
            ));
        }
        if fallback.channel == channel.name {
            return Err(ConfigError::channel(
                &channel.name,
                "fallback channel must differ from the primary channel",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn static_channel(name: &str) -> ChannelConfig {
        ChannelConfig {
            name: name.to_string(),
            interval_seconds: 10,
            enabled: true,
            source: SourceConfig::Static(StaticConfig {
                value: serde_json::json!([]),
            }),
            fallback: None,
        }
    }

    #[test]
    fn test_dashboard_config_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.logging.level, "info");
        assert!(config.channels.is_empty());
    }

    #[test]
    fn test_config_parse_minimal_toml() {
        let toml = r#"
        [server]
        port = 9000
        "#;

        let config: DashboardConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_config_parse_example_file() {
        let toml = include_str!("../../statusboard.example.toml");
        let config: DashboardConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());

        let (accepted, errors) = config.partition_channels();
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        assert!(accepted.iter().any(|c| c.name == "now_playing"));
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[server]\nport = 8080").unwrap();

        let config = DashboardConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = DashboardConfig::load(Some(Path::new("/nonexistent/statusboard.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_invalid_toml_error() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[server\nport = ").unwrap();

        let result = DashboardConfig::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = DashboardConfig::load(None).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_config_env_override_port() {
        std::env::set_var("STATUSBOARD_PORT", "9999");
        let config = DashboardConfig::default().with_env_overrides();
        assert_eq!(config.server.port, 9999);

        std::env::set_var("STATUSBOARD_PORT", "not-a-number");
        let config = DashboardConfig::default().with_env_overrides();
        std::env::remove_var("STATUSBOARD_PORT");
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_config_env_override_host() {
        std::env::set_var("STATUSBOARD_HOST", "127.0.0.1");
        let config = DashboardConfig::default().with_env_overrides();
        std::env::remove_var("STATUSBOARD_HOST");

        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_config_env_override_log_format() {
        std::env::set_var("STATUSBOARD_LOG_FORMAT", "json");
        let config = DashboardConfig::default().with_env_overrides();
        std::env::remove_var("STATUSBOARD_LOG_FORMAT");

        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_config_validation_zero_port() {
        let mut config = DashboardConfig::default();
        config.server.port = 0;

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "server.port"
        ));
    }

    #[test]
    fn test_partition_skips_bad_channel_keeps_others() {
        let mut config = DashboardConfig::default();
        let mut broken = static_channel("forecast");
        broken.interval_seconds = 0;
        config.channels = vec![broken, static_channel("services")];

        let (accepted, errors) = config.partition_channels();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].name, "services");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ConfigError::Channel { channel, .. } if channel == "forecast"
        ));
    }

    #[test]
    fn test_partition_rejects_duplicate_names() {
        let mut config = DashboardConfig::default();
        config.channels = vec![static_channel("volumes"), static_channel("volumes")];

        let (accepted, errors) = config.partition_channels();
        assert_eq!(accepted.len(), 1);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_partition_rejects_fallback_collision() {
        let mut config = DashboardConfig::default();
        let mut primary = static_channel("now_playing");
        primary.fallback = Some(FallbackConfig {
            channel: "forecast".to_string(),
            source: SourceConfig::Static(StaticConfig {
                value: serde_json::json!([]),
            }),
        });
        config.channels = vec![static_channel("forecast"), primary];

        let (accepted, errors) = config.partition_channels();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].name, "forecast");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_partition_rejects_self_fallback() {
        let mut config = DashboardConfig::default();
        let mut primary = static_channel("now_playing");
        primary.fallback = Some(FallbackConfig {
            channel: "now_playing".to_string(),
            source: SourceConfig::Static(StaticConfig {
                value: serde_json::json!([]),
            }),
        });
        config.channels = vec![primary];

        let (accepted, errors) = config.partition_channels();
        assert!(accepted.is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_partition_ignores_disabled_channels() {
        let mut config = DashboardConfig::default();
        let mut disabled = static_channel("bandwidth");
        disabled.enabled = false;
        disabled.interval_seconds = 0;
        config.channels = vec![disabled];

        let (accepted, errors) = config.partition_channels();
        assert!(accepted.is_empty());
        assert!(errors.is_empty());
    }
}
