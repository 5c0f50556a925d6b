//! # Metrics Collection Module
//!
//! Prometheus export for poller and session activity at `GET /metrics`.
//!
//! **Counters:**
//! - `statusboard_polls_total{channel, outcome}` - Fetches by outcome
//!   (`success` or the error label)
//! - `statusboard_messages_dropped_total{reason}` - Per-session drops and coalesced updates
//!
//! **Histograms:**
//! - `statusboard_poll_duration_seconds{channel}` - Source fetch latency
//!
//! **Gauges:**
//! - `statusboard_sessions_connected` - Connected dashboard sessions

pub use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::api::AppContext;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Initialize the global Prometheus recorder.
///
/// Buckets cover sub-second LAN calls up to slow upstream APIs.
pub fn setup_metrics() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::Matcher;

    let duration_buckets = &[0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("statusboard_poll_duration_seconds".to_string()),
            duration_buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Install the global recorder, or build a detached handle if one is
/// already installed (tests construct many contexts in one process).
pub fn handle_or_detached() -> PrometheusHandle {
    setup_metrics().unwrap_or_else(|e| {
        tracing::debug!("Metrics already initialized, creating detached handle: {}", e);
        PrometheusBuilder::new().build_recorder().handle()
    })
}

/// Handler for GET /metrics (Prometheus text format).
pub async fn metrics_handler(State(ctx): State<Arc<AppContext>>) -> impl IntoResponse {
    metrics::gauge!("statusboard_sessions_connected").set(ctx.hub.session_count() as f64);

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        ctx.prometheus.render(),
    )
}
