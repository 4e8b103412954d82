//! Request bodies for the REST surface

use revolt_core::Masquerade;
use serde::Serialize;
use validator::Validate;

// ============================================================================
// Message Requests
// ============================================================================

/// Reply reference attached to a new message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    /// ID of the message being replied to
    pub id: String,
    /// Whether the author of that message is pinged
    pub mention: bool,
}

/// Send message request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct SendMessage {
    /// Idempotency nonce; filled in on send when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub content: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[validate(length(max = 5, message = "At most 5 replies"))]
    pub replies: Vec<Reply>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub masquerade: Option<Masquerade>,
}

impl SendMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Reply to a message
    pub fn reply(mut self, message_id: impl Into<String>, mention: bool) -> Self {
        self.replies.push(Reply {
            id: message_id.into(),
            mention,
        });
        self
    }

    pub fn masquerade(mut self, masquerade: Masquerade) -> Self {
        self.masquerade = Some(masquerade);
        self
    }

    /// Use a caller-chosen nonce instead of a generated one
    pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }
}

/// Edit message request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct EditMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub content: Option<String>,
}

impl EditMessage {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }
}
