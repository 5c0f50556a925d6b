//! # HTTP and WebSocket surface
//!
//! ## Endpoints
//!
//! - `GET /ws` - Live channel updates (late-join replay, then one frame per
//!   successful poll)
//! - `GET /api/channels` - Status of every known channel
//! - `GET /api/channels/:name` - Latest snapshot of one channel
//! - `GET /health` - Process liveness
//! - `GET /metrics` - Prometheus metrics
//!
//! ## Example
//!
//! ```no_run
//! use statusboard::api::{create_router, AppContext};
//! use statusboard::config::DashboardConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = Arc::new(AppContext::new(Arc::new(DashboardConfig::default())));
//! let app = create_router(ctx);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

mod channels;
mod health;
pub mod types;
pub mod websocket;

pub use types::*;

use crate::config::DashboardConfig;
use crate::hub::BroadcastHub;
use crate::metrics::PrometheusHandle;
use crate::store::LatestValueStore;
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

/// Shared application context handed to every handler and to startup code.
pub struct AppContext {
    pub store: Arc<LatestValueStore>,
    pub hub: Arc<BroadcastHub>,
    pub config: Arc<DashboardConfig>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    pub prometheus: PrometheusHandle,
}

impl AppContext {
    /// Create a context with an empty store and a hub sized from config.
    pub fn new(config: Arc<DashboardConfig>) -> Self {
        let store = Arc::new(LatestValueStore::new());
        let hub = Arc::new(BroadcastHub::new(
            Arc::clone(&store),
            config.server.session_queue_capacity,
        ));

        Self {
            store,
            hub,
            config,
            start_time: Instant::now(),
            prometheus: crate::metrics::handle_or_detached(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Create the router with all endpoints configured.
pub fn create_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/ws", get(websocket::websocket_handler))
        .route("/api/channels", get(channels::list))
        .route("/api/channels/:name", get(channels::latest))
        .route("/health", get(health::handle))
        .route("/metrics", get(crate::metrics::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
