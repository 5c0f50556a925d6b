//! Broadcast hub: fan-out of channel updates to connected sessions.
//!
//! Every session owns a bounded queue. Publishing never awaits: when a queue
//! is full the message is parked as that channel's newest pending value for
//! the session, a closed queue removes the session, and neither outcome
//! reaches the publishing poller.

mod error;
mod session;

pub use error::DeliveryError;
pub use session::Session;

use session::Overflow;

use crate::store::{LatestValueStore, StoredSnapshot};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Outcome counts of one publish call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub lagged: usize,
    pub removed: usize,
}

/// Hub-side end of one session.
struct SessionSlot {
    sender: mpsc::Sender<StoredSnapshot>,
    overflow: Arc<Overflow>,
}

impl SessionSlot {
    fn new(sender: mpsc::Sender<StoredSnapshot>) -> Self {
        Self {
            sender,
            overflow: Arc::new(Overflow::default()),
        }
    }
}

/// Session registry plus delivery logic.
pub struct BroadcastHub {
    store: Arc<LatestValueStore>,
    sessions: DashMap<Uuid, SessionSlot>,
    queue_capacity: usize,
}

impl BroadcastHub {
    pub fn new(store: Arc<LatestValueStore>, queue_capacity: usize) -> Self {
        Self {
            store,
            sessions: DashMap::new(),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Register a new session and queue the latest value of every channel
    /// that has data.
    ///
    /// Registration happens before the store is read, so an update published
    /// in between is queued too; [`Session::recv`] discards whichever copy is
    /// older.
    pub fn connect(self: &Arc<Self>) -> Session {
        let id = Uuid::new_v4();
        // Room for a full replay even if the configured queue is shorter.
        let capacity = self.queue_capacity.max(self.store.channel_count());
        let (sender, receiver) = mpsc::channel(capacity);
        let slot = SessionSlot::new(sender);
        let overflow = Arc::clone(&slot.overflow);

        let replay_slot = SessionSlot {
            sender: slot.sender.clone(),
            overflow: Arc::clone(&slot.overflow),
        };
        self.sessions.insert(id, slot);
        metrics::gauge!("statusboard_sessions_connected").set(self.sessions.len() as f64);

        let replay = self.store.get_all();
        let replayed = replay.len();
        for message in replay {
            // A publish racing this replay can fill the queue; the value is parked then.
            if let Err(e @ DeliveryError::Closed) = deliver(&replay_slot, message) {
                tracing::warn!(session_id = %id, error = %e, "Late-join replay incomplete");
                metrics::counter!("statusboard_messages_dropped_total", "reason" => e.label())
                    .increment(1);
                break;
            }
        }

        tracing::info!(
            session_id = %id,
            channels_replayed = replayed,
            sessions = self.sessions.len(),
            "Session connected"
        );

        Session::new(id, receiver, overflow, Arc::clone(self))
    }

    /// Deregister a session. Returns false if it was not registered.
    pub fn disconnect(&self, id: Uuid) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            metrics::gauge!("statusboard_sessions_connected").set(self.sessions.len() as f64);
            tracing::info!(session_id = %id, sessions = self.sessions.len(), "Session disconnected");
        }
        removed
    }

    /// Queue `message` for every connected session.
    pub fn publish(&self, message: StoredSnapshot) -> PublishReport {
        let mut report = PublishReport::default();
        let mut closed = Vec::new();

        for entry in self.sessions.iter() {
            match deliver(entry.value(), message.clone()) {
                Ok(()) => report.delivered += 1,
                Err(DeliveryError::Lagged) => {
                    report.lagged += 1;
                    tracing::debug!(
                        session_id = %entry.key(),
                        channel = %message.channel,
                        "Session queue full, parked newest value"
                    );
                    metrics::counter!("statusboard_messages_dropped_total", "reason" => "lagged")
                        .increment(1);
                }
                Err(DeliveryError::Closed) => closed.push(*entry.key()),
            }
        }

        // Removal outside the iteration: DashMap shards are still read-locked above.
        for id in closed {
            if self.disconnect(id) {
                report.removed += 1;
            }
        }

        tracing::trace!(
            channel = %message.channel,
            version = message.version,
            delivered = report.delivered,
            lagged = report.lagged,
            removed = report.removed,
            "Published update"
        );

        report
    }

    /// Drop every session's sender; their receivers drain and then end.
    pub fn close_all(&self) {
        let count = self.sessions.len();
        self.sessions.clear();
        metrics::gauge!("statusboard_sessions_connected").set(0.0);
        tracing::info!(sessions = count, "Closed all sessions");
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn store(&self) -> &Arc<LatestValueStore> {
        &self.store
    }
}

fn deliver(slot: &SessionSlot, message: StoredSnapshot) -> Result<(), DeliveryError> {
    match slot.sender.try_send(message) {
        Ok(()) => Ok(()),
        Err(mpsc::error::TrySendError::Full(message)) => {
            slot.overflow.park(message);
            Err(DeliveryError::Lagged)
        }
        Err(mpsc::error::TrySendError::Closed(_)) => Err(DeliveryError::Closed),
    }
}
