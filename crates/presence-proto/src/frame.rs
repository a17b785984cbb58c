//! JSON frame envelope.
//!
//! Every message on the wire is a single WebSocket text frame holding
//! `{"event": "<name>", "data": <json>}`. `data` is omitted for events
//! that carry no payload.

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A named event with an optional JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Event name, e.g. `client-emit-user-joined`.
    pub event: String,
    /// Event payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Frame {
    /// Create a frame carrying `data`.
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data: Some(data),
        }
    }

    /// Create a frame without payload.
    pub fn bare(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            data: None,
        }
    }

    /// Serialize a payload into a frame.
    pub fn with_payload<T: Serialize>(event: impl Into<String>, payload: &T) -> Result<Self> {
        let data = serde_json::to_value(payload).map_err(ProtocolError::Encode)?;
        Ok(Self::new(event, data))
    }

    /// Encode to the JSON text sent on the wire.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

impl FromStr for Frame {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(ProtocolError::InvalidFrame)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Some(data) => write!(f, "{} {}", self.event, data),
            None => f.write_str(&self.event),
        }
    }
}

#[cfg(feature = "tokio")]
mod ws {
    use super::Frame;
    use crate::error::{ProtocolError, Result};
    use tokio_tungstenite::tungstenite::Message;

    impl TryFrom<Message> for Frame {
        type Error = ProtocolError;

        fn try_from(msg: Message) -> Result<Self> {
            match msg {
                Message::Text(text) => text.parse(),
                _ => Err(ProtocolError::UnsupportedMessage),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_frame_omits_data() {
        let encoded = Frame::bare("server-emit-user-joined").encode().unwrap();
        assert_eq!(encoded, r#"{"event":"server-emit-user-joined"}"#);
    }

    #[test]
    fn parses_frame_without_data() {
        let frame: Frame = r#"{"event":"ping"}"#.parse().unwrap();
        assert_eq!(frame.event, "ping");
        assert!(frame.data.is_none());
    }

    #[test]
    fn rejects_non_envelope_json() {
        let err = "[1,2,3]".parse::<Frame>().unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidFrame(_)));
    }

    #[test]
    fn display_includes_payload() {
        let frame = Frame::new("e", json!([1]));
        assert_eq!(frame.to_string(), "e [1]");
    }
}
