//! Client-to-server message format

use serde::{Deserialize, Serialize};

/// A control message sent to the gateway
///
/// Serialized as a JSON object tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// First message after the socket opens
    Authenticate { token: String },
    /// Heartbeat; the server echoes `data` back in a `Pong`
    Ping { data: u64 },
    /// Start the typing indicator in a channel
    BeginTyping { channel: String },
    /// Stop the typing indicator in a channel
    EndTyping { channel: String },
}

impl ClientMessage {
    #[must_use]
    pub fn authenticate(token: impl Into<String>) -> Self {
        Self::Authenticate {
            token: token.into(),
        }
    }

    #[must_use]
    pub fn ping(data: u64) -> Self {
        Self::Ping { data }
    }

    #[must_use]
    pub fn begin_typing(channel: impl Into<String>) -> Self {
        Self::BeginTyping {
            channel: channel.into(),
        }
    }

    #[must_use]
    pub fn end_typing(channel: impl Into<String>) -> Self {
        Self::EndTyping {
            channel: channel.into(),
        }
    }

    /// Wire name of the message
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Authenticate { .. } => "Authenticate",
            Self::Ping { .. } => "Ping",
            Self::BeginTyping { .. } => "BeginTyping",
            Self::EndTyping { .. } => "EndTyping",
        }
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
