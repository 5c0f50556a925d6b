//! Error types for source adapters.

use thiserror::Error;

/// Errors a source adapter can report. Always non-fatal to the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Backend returned an error response (4xx, 5xx).
    #[error("Backend error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Backend response doesn't match expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Adapter parameters are unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SourceError {
    /// Classify a reqwest failure.
    pub fn from_reqwest(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            SourceError::Timeout(timeout_ms)
        } else if e.is_decode() {
            SourceError::InvalidResponse(e.to_string())
        } else {
            SourceError::Network(e.to_string())
        }
    }

    /// Stable label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            SourceError::Network(_) => "network",
            SourceError::Timeout(_) => "timeout",
            SourceError::Upstream { .. } => "upstream",
            SourceError::InvalidResponse(_) => "invalid_response",
            SourceError::Configuration(_) => "configuration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            SourceError::Timeout(5000).to_string(),
            "Request timeout after 5000ms"
        );
        assert_eq!(
            SourceError::Upstream {
                status: 503,
                message: "maintenance".to_string()
            }
            .to_string(),
            "Backend error 503: maintenance"
        );
        assert_eq!(
            SourceError::Network("refused".to_string()).to_string(),
            "Network error: refused"
        );
    }

    #[test]
    fn test_error_labels() {
        assert_eq!(SourceError::Timeout(1).label(), "timeout");
        assert_eq!(
            SourceError::InvalidResponse("x".to_string()).label(),
            "invalid_response"
        );
    }
}
