//! Health check endpoint handler.

use crate::api::AppContext;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub channels: ChannelCounts,
    pub sessions: usize,
}

/// Channel counts.
#[derive(Debug, Serialize)]
pub struct ChannelCounts {
    pub total: usize,
    pub with_data: usize,
    pub failing: usize,
}

/// GET /health - Return process health.
///
/// "degraded" means at least one channel's latest fetch failed.
pub async fn handle(State(ctx): State<Arc<AppContext>>) -> Json<HealthResponse> {
    let statuses = ctx.store.statuses();
    let with_data = statuses.iter().filter(|s| s.has_data).count();
    let failing = statuses
        .iter()
        .filter(|s| s.consecutive_failures > 0)
        .count();

    let status = if failing == 0 { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: ctx.uptime_seconds(),
        channels: ChannelCounts {
            total: statuses.len(),
            with_data,
            failing,
        },
        sessions: ctx.hub.session_count(),
    })
}
