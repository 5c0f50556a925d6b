//! Source adapters - the uniform pull interface in front of every backend.
//!
//! A poller only ever sees [`SourceAdapter::fetch`]: one call yields either a
//! normalized [`Snapshot`] or a [`SourceError`]. Whether the backend speaks
//! HTTP, SSH or something else is the adapter's business.

use async_trait::async_trait;

pub mod error;
pub mod factory;
pub mod fixed;
pub mod http_json;
pub mod service_health;
pub mod snapshot;

pub use error::SourceError;
pub use factory::build_source;
pub use snapshot::Snapshot;

/// Unified interface for all dashboard data sources.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn SourceAdapter>`.
///
/// # Contract
///
/// - Safe to call repeatedly, and concurrently with other adapters.
/// - "Nothing to show" (nothing playing, no alerts) is `Ok` with an empty
///   snapshot, never an error.
/// - Adapters wrapping blocking I/O must move it off the runtime
///   (`tokio::task::spawn_blocking`) so they stall only their own poller.
#[async_trait]
pub trait SourceAdapter: Send + Sync + 'static {
    /// Short label for logs and CLI output (e.g. "http_json").
    fn kind(&self) -> &'static str;

    /// Pull the current state of the backend.
    async fn fetch(&self) -> Result<Snapshot, SourceError>;
}
