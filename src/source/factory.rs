//! Source factory for creating SourceAdapter trait objects from configuration.

use super::{
    fixed::FixedSource, http_json::HttpJsonSource, service_health::ServiceHealthSource,
    SourceAdapter, SourceError,
};
use crate::config::{ConfigError, SourceConfig};
use reqwest::Client;
use std::sync::Arc;

/// Create a source adapter for `channel` from its typed configuration.
///
/// Invalid parameters come back as [`ConfigError::Channel`] so the caller can
/// skip this channel and keep starting the others.
///
/// # Examples
///
/// ```
/// use statusboard::config::{SourceConfig, StaticConfig};
/// use statusboard::source::build_source;
/// use reqwest::Client;
/// use std::sync::Arc;
///
/// let config = SourceConfig::Static(StaticConfig { value: serde_json::json!([]) });
/// let source = build_source("announcements", &config, Arc::new(Client::new())).unwrap();
/// assert_eq!(source.kind(), "static");
/// ```
pub fn build_source(
    channel: &str,
    config: &SourceConfig,
    client: Arc<Client>,
) -> Result<Arc<dyn SourceAdapter>, ConfigError> {
    let built: Result<Arc<dyn SourceAdapter>, SourceError> = match config {
        SourceConfig::HttpJson(cfg) => {
            HttpJsonSource::new(cfg, client).map(|s| Arc::new(s) as Arc<dyn SourceAdapter>)
        }
        SourceConfig::ServiceHealth(cfg) => {
            ServiceHealthSource::new(cfg, client).map(|s| Arc::new(s) as Arc<dyn SourceAdapter>)
        }
        SourceConfig::Static(cfg) => Ok(Arc::new(FixedSource::new(cfg.value.clone()))),
    };

    built.map_err(|e| ConfigError::channel(channel, e.to_string()))
}
