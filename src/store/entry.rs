//! Store entry types.

use crate::source::Snapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Mutable per-channel slot. Only the owning poller writes it.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChannelEntry {
    pub snapshot: Option<Snapshot>,
    pub version: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_error_at: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

/// A successfully fetched snapshot as handed to readers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredSnapshot {
    pub channel: String,
    #[serde(rename = "data")]
    pub snapshot: Snapshot,
    /// Per-channel sequence number, starts at 1 and grows with every put
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

/// Read-only view of a channel's health for status endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelStatus {
    pub name: String,
    pub has_data: bool,
    pub version: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_error_at: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

impl ChannelEntry {
    pub(crate) fn stored(&self, channel: &str) -> Option<StoredSnapshot> {
        match (&self.snapshot, self.last_success) {
            (Some(snapshot), Some(updated_at)) => Some(StoredSnapshot {
                channel: channel.to_string(),
                snapshot: snapshot.clone(),
                version: self.version,
                updated_at,
            }),
            _ => None,
        }
    }

    pub(crate) fn status(&self, channel: &str) -> ChannelStatus {
        ChannelStatus {
            name: channel.to_string(),
            has_data: self.snapshot.is_some(),
            version: self.version,
            last_success: self.last_success,
            last_error: self.last_error.clone(),
            last_error_at: self.last_error_at,
            consecutive_failures: self.consecutive_failures,
        }
    }
}
