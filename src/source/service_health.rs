//! Probes a list of named HTTP services.

use super::{Snapshot, SourceAdapter, SourceError};
use crate::config::{ServiceHealthConfig, ServiceTarget};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of probing one service.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ServiceStatus {
    pub name: String,
    pub url: String,
    pub up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A service being down is data for the dashboard, not a fetch failure:
/// this source only errors when the snapshot cannot be built at all.
pub struct ServiceHealthSource {
    targets: Vec<ServiceTarget>,
    timeout: Duration,
    client: Arc<Client>,
}

impl ServiceHealthSource {
    pub fn new(config: &ServiceHealthConfig, client: Arc<Client>) -> Result<Self, SourceError> {
        if config.targets.is_empty() {
            return Err(SourceError::Configuration(
                "service_health requires at least one target".to_string(),
            ));
        }
        if let Some(target) = config
            .targets
            .iter()
            .find(|t| t.name.is_empty() || t.url.is_empty())
        {
            return Err(SourceError::Configuration(format!(
                "target '{}' needs both a name and a url",
                target.name
            )));
        }

        Ok(Self {
            targets: config.targets.clone(),
            timeout: Duration::from_secs(config.timeout_seconds.max(1)),
            client,
        })
    }

    async fn probe(&self, target: &ServiceTarget) -> ServiceStatus {
        let start = Instant::now();
        let result = self
            .client
            .get(&target.url)
            .timeout(self.timeout)
            .send()
            .await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) => ServiceStatus {
                name: target.name.clone(),
                url: target.url.clone(),
                up: response.status().is_success(),
                status: Some(response.status().as_u16()),
                latency_ms,
                error: None,
            },
            Err(e) => ServiceStatus {
                name: target.name.clone(),
                url: target.url.clone(),
                up: false,
                status: None,
                latency_ms,
                error: Some(SourceError::from_reqwest(e, self.timeout.as_millis() as u64).to_string()),
            },
        }
    }
}

#[async_trait]
impl SourceAdapter for ServiceHealthSource {
    fn kind(&self) -> &'static str {
        "service_health"
    }

    async fn fetch(&self) -> Result<Snapshot, SourceError> {
        let statuses =
            futures::future::join_all(self.targets.iter().map(|target| self.probe(target))).await;

        let value = serde_json::to_value(statuses).map_err(|e| {
            SourceError::InvalidResponse(format!("Failed to serialize service statuses: {}", e))
        })?;

        Ok(Snapshot::new(value))
    }
}
