//! Read-only channel endpoints.

use crate::api::{ApiError, AppContext};
use crate::store::{ChannelStatus, StoredSnapshot};
use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

/// GET /api/channels - Status of every known channel.
pub async fn list(State(ctx): State<Arc<AppContext>>) -> Json<Vec<ChannelStatus>> {
    Json(ctx.store.statuses())
}

/// GET /api/channels/:name - Latest snapshot of one channel.
pub async fn latest(
    State(ctx): State<Arc<AppContext>>,
    Path(name): Path<String>,
) -> Result<Json<StoredSnapshot>, ApiError> {
    match ctx.store.get(&name) {
        Some(stored) => Ok(Json(stored)),
        None if ctx.store.status(&name).is_some() => Err(ApiError::no_data(&name)),
        None => Err(ApiError::channel_not_found(&name)),
    }
}
