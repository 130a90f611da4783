//! Frame formats
//!
//! Outbound frames are always envelopes. Inbound frames are either envelopes or a
//! bare op marker (a JSON string, or plain text such as the server's `pong`).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::OutboundOp;

/// `{"op": ..., "d": ..., "fetchId": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub op: String,

    #[serde(default)]
    pub d: Value,

    #[serde(rename = "fetchId", default, skip_serializing_if = "Option::is_none")]
    pub fetch_id: Option<String>,
}

impl Envelope {
    /// Create an outbound envelope
    #[must_use]
    pub fn new(op: OutboundOp, d: Value) -> Self {
        Self {
            op: op.as_str().to_string(),
            d,
            fetch_id: None,
        }
    }

    /// Attach a correlation id
    #[must_use]
    pub fn with_fetch_id(mut self, fetch_id: impl Into<String>) -> Self {
        self.fetch_id = Some(fetch_id.into());
        self
    }

    /// Decode the payload into a typed struct
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.d)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.fetch_id {
            Some(id) => write!(f, "Envelope(op={}, fetch_id={id})", self.op),
            None => write!(f, "Envelope(op={})", self.op),
        }
    }
}

/// A decoded inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    Bare(String),
    Envelope(Envelope),
}

impl InboundFrame {
    /// Decode a text frame.
    ///
    /// Text that is not JSON is taken as a bare op marker. A JSON object must
    /// carry an `op` field.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::String(op)) => Ok(Self::Bare(op)),
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).map(Self::Envelope),
            Ok(_) | Err(_) => Ok(Self::Bare(text.trim().to_string())),
        }
    }

    /// Get the op tag of this frame
    #[must_use]
    pub fn op(&self) -> &str {
        match self {
            Self::Bare(op) => op,
            Self::Envelope(envelope) => &envelope.op,
        }
    }
}
