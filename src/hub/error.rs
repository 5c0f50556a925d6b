//! Delivery error types.

use thiserror::Error;

/// Why a message did not reach a session. Never propagated to publishers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The session's transport is gone; the hub drops the session.
    #[error("session closed")]
    Closed,

    /// The session's queue is full; the message is parked as its channel's
    /// pending value, replacing any older one.
    #[error("session lagging, message parked")]
    Lagged,
}

impl DeliveryError {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryError::Closed => "closed",
            DeliveryError::Lagged => "lagged",
        }
    }
}
