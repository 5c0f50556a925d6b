//! Normalized channel payload.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::sync::Arc;

/// One channel's payload at one point in time.
///
/// Immutable and cheap to clone; the poller, the store and every session
/// share the same allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Arc<Value>);

impl Snapshot {
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// The "nothing to show" payload.
    pub fn empty() -> Self {
        Self::new(Value::Array(Vec::new()))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// True for `null`, `[]` and `{}`.
    pub fn is_empty(&self) -> bool {
        match self.0.as_ref() {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            Value::Object(fields) => fields.is_empty(),
            _ => false,
        }
    }
}

impl From<Value> for Snapshot {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
