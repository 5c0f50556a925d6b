//! Latest-value store.
//!
//! Holds the most recent successful snapshot per channel. It is the source of
//! truth for late-joining sessions and for the read-only HTTP endpoints.

mod entry;
#[cfg(test)]
mod tests;

pub use entry::{ChannelStatus, StoredSnapshot};

use crate::source::Snapshot;
use chrono::Utc;
use dashmap::DashMap;
use entry::ChannelEntry;

/// Thread-safe map of channel name to latest snapshot.
///
/// Each channel slot is updated under its DashMap shard lock, so a reader sees
/// either the previous or the new entry, never a mix. Unrelated channels
/// usually land in different shards and do not contend.
///
/// # Examples
///
/// ```
/// use statusboard::source::Snapshot;
/// use statusboard::store::LatestValueStore;
///
/// let store = LatestValueStore::new();
/// store.declare("forecast");
/// assert!(store.get("forecast").is_none());
///
/// store.put("forecast", Snapshot::new(serde_json::json!({"high": 24})));
/// assert_eq!(store.get("forecast").unwrap().version, 1);
/// ```
pub struct LatestValueStore {
    entries: DashMap<String, ChannelEntry>,
}

impl LatestValueStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Make a channel known without giving it data.
    ///
    /// Declared channels show up in [`statuses`](Self::statuses) but never in
    /// [`get_all`](Self::get_all) until their first successful put.
    pub fn declare(&self, channel: &str) {
        self.entries.entry(channel.to_string()).or_default();
    }

    /// Replace the channel's snapshot and stamp it.
    ///
    /// Clears the recorded error. The success timestamp never moves backwards,
    /// even if the wall clock does.
    pub fn put(&self, channel: &str, snapshot: Snapshot) -> StoredSnapshot {
        let mut entry = self.entries.entry(channel.to_string()).or_default();

        let now = Utc::now();
        let updated_at = match entry.last_success {
            Some(previous) if previous > now => previous,
            _ => now,
        };

        entry.snapshot = Some(snapshot.clone());
        entry.version += 1;
        entry.last_success = Some(updated_at);
        entry.last_error = None;
        entry.last_error_at = None;
        entry.consecutive_failures = 0;

        StoredSnapshot {
            channel: channel.to_string(),
            snapshot,
            version: entry.version,
            updated_at,
        }
    }

    /// Record a failed fetch. The stored snapshot is left untouched.
    pub fn record_failure(&self, channel: &str, error: &str, consecutive_failures: u32) {
        let mut entry = self.entries.entry(channel.to_string()).or_default();
        entry.last_error = Some(error.to_string());
        entry.last_error_at = Some(Utc::now());
        entry.consecutive_failures = consecutive_failures;
    }

    /// Latest snapshot for one channel, absent until the first success.
    pub fn get(&self, channel: &str) -> Option<StoredSnapshot> {
        self.entries
            .get(channel)
            .and_then(|entry| entry.stored(channel))
    }

    /// Every channel that has data, sorted by channel name.
    pub fn get_all(&self) -> Vec<StoredSnapshot> {
        let mut all: Vec<StoredSnapshot> = self
            .entries
            .iter()
            .filter_map(|entry| entry.value().stored(entry.key()))
            .collect();
        all.sort_by(|a, b| a.channel.cmp(&b.channel));
        all
    }

    /// Health view of one declared or written channel.
    pub fn status(&self, channel: &str) -> Option<ChannelStatus> {
        self.entries.get(channel).map(|entry| entry.status(channel))
    }

    /// Health view of every known channel, sorted by name.
    pub fn statuses(&self) -> Vec<ChannelStatus> {
        let mut all: Vec<ChannelStatus> = self
            .entries
            .iter()
            .map(|entry| entry.value().status(entry.key()))
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// Number of known channels, with or without data.
    pub fn channel_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for LatestValueStore {
    fn default() -> Self {
        Self::new()
    }
}
