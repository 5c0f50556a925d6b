//! Source that always returns the same payload.

use super::{Snapshot, SourceAdapter, SourceError};
use async_trait::async_trait;

/// Serves pinned content (announcements, demo data).
pub struct FixedSource {
    snapshot: Snapshot,
}

impl FixedSource {
    pub fn new(value: serde_json::Value) -> Self {
        Self {
            snapshot: Snapshot::new(value),
        }
    }
}

#[async_trait]
impl SourceAdapter for FixedSource {
    fn kind(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self) -> Result<Snapshot, SourceError> {
        Ok(self.snapshot.clone())
    }
}
