//! Payload - settlement data handed to override handlers.
//!
//! The engine treats the payload as opaque. The only thing it ever reads is
//! an optional `message`, used when a task is rejected and no handler is
//! registered for the rejected status.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(serde_json::Value);

impl Payload {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Error-shaped payload: `{ "message": ... }`.
    pub fn error(message: impl Into<String>) -> Self {
        Self(serde_json::json!({ "message": message.into() }))
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// `payload.message`, or the payload itself when it is a bare string.
    pub fn message(&self) -> Option<&str> {
        match &self.0 {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Object(map) => map.get("message").and_then(|m| m.as_str()),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Self(serde_json::Value::Null)
    }
}

impl From<String> for Payload {
    fn from(message: String) -> Self {
        Self::error(message)
    }
}

impl From<&str> for Payload {
    fn from(message: &str) -> Self {
        Self::error(message)
    }
}
