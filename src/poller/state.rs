//! Per-channel poll state tracking.

use crate::source::SourceError;
use chrono::{DateTime, Utc};

/// Tracks the running state of one poller.
#[derive(Debug, Clone, Default)]
pub struct PollState {
    /// Count of consecutive failed fetches
    pub consecutive_failures: u32,
    /// When the last successful fetch was stored
    pub last_success: Option<DateTime<Utc>>,
    /// Number of completed ticks, successful or not
    pub ticks: u64,
}

/// Fires on the transition from non-empty to empty.
///
/// Starts armed, so a channel whose very first result is empty also fires
/// once. Repeated empty results stay quiet until a non-empty one re-arms it.
#[derive(Debug, Clone)]
pub struct EdgeTrigger {
    last_non_empty: bool,
}

impl Default for EdgeTrigger {
    fn default() -> Self {
        Self {
            last_non_empty: true,
        }
    }
}

impl EdgeTrigger {
    /// Record one successful result; true if the fallback should publish.
    pub fn observe(&mut self, empty: bool) -> bool {
        let fire = empty && self.last_non_empty;
        self.last_non_empty = !empty;
        fire
    }

    /// Undo a firing whose follow-up failed, so the next empty result retries.
    pub fn rearm(&mut self) {
        self.last_non_empty = true;
    }
}

/// Result of the fallback leg of a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackOutcome {
    Published { version: u64 },
    Failed { error: SourceError },
}

/// Result of one poller tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Snapshot stored and published
    Updated {
        version: u64,
        empty: bool,
        fallback: Option<FallbackOutcome>,
    },
    /// Fetch failed; stored snapshot left as it was
    Failed {
        error: SourceError,
        consecutive_failures: u32,
    },
}

impl TickOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TickOutcome::Updated { .. })
    }
}
