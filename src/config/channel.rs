//! Channel and source configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One polled channel: a name, a schedule, and the source that feeds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub name: String,
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub source: SourceConfig,
    /// Secondary channel published when the primary turns empty
    #[serde(default)]
    pub fallback: Option<FallbackConfig>,
}

fn default_interval_seconds() -> u64 {
    60
}

fn default_enabled() -> bool {
    true
}

/// Fallback channel fed by its own source, driven by the primary's poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    pub channel: String,
    pub source: SourceConfig,
}

/// Source adapter configuration, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    HttpJson(HttpJsonConfig),
    ServiceHealth(ServiceHealthConfig),
    Static(StaticConfig),
}

impl SourceConfig {
    /// Short kind label used in logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceConfig::HttpJson(_) => "http_json",
            SourceConfig::ServiceHealth(_) => "service_health",
            SourceConfig::Static(_) => "static",
        }
    }
}

/// GET a URL and forward (a part of) its JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpJsonConfig {
    pub url: String,
    /// RFC 6901 pointer selecting the sub-document to publish
    #[serde(default)]
    pub pointer: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// String fields shortened to `max_field_chars` (e.g. long summaries)
    #[serde(default)]
    pub truncate_fields: Vec<String>,
    #[serde(default = "default_max_field_chars")]
    pub max_field_chars: usize,
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_max_field_chars() -> usize {
    800
}

/// Probe a fixed list of HTTP services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealthConfig {
    pub targets: Vec<ServiceTarget>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTarget {
    pub name: String,
    pub url: String,
}

/// Pinned JSON content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticConfig {
    pub value: serde_json::Value,
}
