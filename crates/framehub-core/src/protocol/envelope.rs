//! Channel envelope (JSON).
//!
//! An envelope is a flat JSON object: the required `event` field selects the
//! command, the optional `txn` field correlates a request with its response,
//! and every other field is command payload. Payload fields stay flattened
//! siblings of `event` (not nested under a body key) because that is the
//! shape third-party widgets already emit.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FrameHubError, Result};

/// A single message on the cross-frame channel.
///
/// Failing to parse inbound text into an `Envelope` is a distinct condition
/// from parsing a valid envelope whose `event` nobody registered; receivers
/// treat both as no-ops but count them separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Command or response event name.
    pub event: String,
    /// Correlation id echoed between an RPC request and its response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txn: Option<String>,
    /// Command-specific payload fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Envelope {
    /// Empty envelope for the given event.
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            txn: None,
            fields: Map::new(),
        }
    }

    /// Build an envelope from an event name and a serializable payload
    /// struct. The payload must serialize to a JSON object; its fields
    /// become the envelope's flattened payload.
    pub fn command<T: Serialize>(event: impl Into<String>, payload: &T) -> Result<Self> {
        let value = serde_json::to_value(payload)
            .map_err(|e| FrameHubError::Internal(format!("payload encode failed: {e}")))?;
        let fields = match value {
            Value::Object(map) => map,
            other => {
                return Err(FrameHubError::Internal(format!(
                    "payload must be a JSON object, got {other}"
                )))
            }
        };
        Ok(Self {
            event: event.into(),
            txn: None,
            fields,
        })
    }

    /// Attach a correlation id.
    pub fn with_txn(mut self, txn: impl Into<String>) -> Self {
        self.txn = Some(txn.into());
        self
    }

    /// Set a single payload field (test and ad-hoc construction helper).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Parse inbound channel text. Anything that is not a JSON object with a
    /// string `event` is a `BadEnvelope`.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| FrameHubError::BadEnvelope(format!("invalid envelope json: {e}")))
    }

    /// Serialize for transit.
    pub fn to_text(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| FrameHubError::Internal(format!("envelope encode failed: {e}")))
    }

    /// Borrow a payload field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Decode the payload fields into a typed payload struct.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.fields.clone())).map_err(|e| {
            FrameHubError::BadRequest(format!("invalid {} payload: {e}", self.event))
        })
    }
}
