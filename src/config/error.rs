//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    /// A single channel is misconfigured; only that channel's poller is skipped.
    #[error("Channel '{channel}' disabled: {message}")]
    Channel { channel: String, message: String },
}

impl ConfigError {
    pub fn channel(channel: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Channel {
            channel: channel.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_error_display() {
        let err = ConfigError::channel("forecast", "interval_seconds must be non-zero");
        assert_eq!(
            err.to_string(),
            "Channel 'forecast' disabled: interval_seconds must be non-zero"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigError::Validation {
            field: "server.port".to_string(),
            message: "port must be non-zero".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for 'server.port': port must be non-zero"
        );
    }
}
