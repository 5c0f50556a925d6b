//! Per-client session handle.

use super::BroadcastHub;
use crate::store::StoredSnapshot;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, Notify};
use uuid::Uuid;

/// Newest value per channel for messages that did not fit in the queue.
///
/// A lagging client ends up one message per channel behind instead of
/// stuck on whatever was queued when it fell behind.
#[derive(Default)]
pub(super) struct Overflow {
    pending: Mutex<HashMap<String, StoredSnapshot>>,
    notify: Notify,
}

impl Overflow {
    /// Keep `message` unless a newer version of its channel is already parked.
    pub(super) fn park(&self, message: StoredSnapshot) {
        {
            let mut pending = self
                .pending
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match pending.get(&message.channel) {
                Some(parked) if parked.version >= message.version => {}
                _ => {
                    pending.insert(message.channel.clone(), message);
                }
            }
        }
        self.notify.notify_one();
    }

    fn take(&self) -> Option<StoredSnapshot> {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let channel = pending.keys().next().cloned()?;
        pending.remove(&channel)
    }
}

/// One connected client's receiving end.
///
/// Dropping the session deregisters it from the hub, so a connection task
/// that ends for any reason (client close, write error, shutdown, abort)
/// cleans up after itself.
pub struct Session {
    id: Uuid,
    receiver: mpsc::Receiver<StoredSnapshot>,
    overflow: Arc<Overflow>,
    hub: Arc<BroadcastHub>,
    /// Highest version handed out per channel
    delivered: HashMap<String, u64>,
}

impl Session {
    pub(super) fn new(
        id: Uuid,
        receiver: mpsc::Receiver<StoredSnapshot>,
        overflow: Arc<Overflow>,
        hub: Arc<BroadcastHub>,
    ) -> Self {
        Self {
            id,
            receiver,
            overflow,
            hub,
            delivered: HashMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Next message for this client, or None once the hub has let go of it.
    ///
    /// Queued messages come first, then values parked while the queue was
    /// full. A message older than one already delivered for its channel is
    /// skipped, so the client never steps back to older data.
    pub async fn recv(&mut self) -> Option<StoredSnapshot> {
        loop {
            let message = match self.receiver.try_recv() {
                Ok(message) => message,
                Err(TryRecvError::Disconnected) => return None,
                Err(TryRecvError::Empty) => match self.overflow.take() {
                    Some(message) => message,
                    None => tokio::select! {
                        message = self.receiver.recv() => message?,
                        _ = self.overflow.notify.notified() => continue,
                    },
                },
            };
            if self.accept(&message) {
                return Some(message);
            }
        }
    }

    fn accept(&mut self, message: &StoredSnapshot) -> bool {
        match self.delivered.get_mut(&message.channel) {
            Some(last) if *last >= message.version => {
                tracing::trace!(
                    session_id = %self.id,
                    channel = %message.channel,
                    version = message.version,
                    "Skipping stale message"
                );
                false
            }
            Some(last) => {
                *last = message.version;
                true
            }
            None => {
                self.delivered
                    .insert(message.channel.clone(), message.version);
                true
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.hub.disconnect(self.id);
    }
}
