//! Wire types for the chat channel and forum API
//!
//! Outbound frames are exactly `{"content": string}` — nothing else is ever
//! put on the wire by this client. Inbound frames are handed to message
//! handlers verbatim; [`ChatFrame`] is an opt-in parser for the broadcast
//! shape the forum server uses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ----------------------------------------------------------------------------
// Outgoing Messages
// ----------------------------------------------------------------------------

/// A chat message queued for transmission.
///
/// Serialized as exactly `{"content": ...}`. Preventing empty content is the
/// caller's responsibility; the channel contract only requires the field to
/// be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub content: String,
}

impl OutgoingMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

// ----------------------------------------------------------------------------
// Inbound Frames
// ----------------------------------------------------------------------------

/// The broadcast envelope the forum server sends: `{"type", "payload"}`.
///
/// Handlers always receive the raw frame text; this parser is a convenience
/// for frontends that want the common case without constraining the format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatFrame {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl ChatFrame {
    /// Tolerant parse; returns `None` for anything that is not the envelope.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// Content of a `"message"` frame, if that is what this is.
    pub fn message_content(&self) -> Option<&str> {
        if self.kind != "message" {
            return None;
        }
        self.payload.get("content")?.as_str()
    }
}

// ----------------------------------------------------------------------------
// History Entries
// ----------------------------------------------------------------------------

/// A stored chat message as returned by the forum HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
