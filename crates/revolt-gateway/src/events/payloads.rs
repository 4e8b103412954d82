//! Event payload types
//!
//! Payloads for events that do not carry a whole entity or an update.
//! Identifiers are plain strings, as on the wire.

use revolt_core::{Channel, Emoji, RelationshipStatus, Server, User};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Error identifier, e.g. `InvalidSession`
    pub error: String,
}

/// Heartbeat reply echoing the counter of a `Ping`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pong {
    pub data: u64,
}

/// Embeds appended to an existing message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAppend {
    pub id: String,
    pub channel: String,
    #[serde(default)]
    pub append: AppendedContent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppendedContent {
    pub embeds: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDelete {
    pub id: String,
    pub channel: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkMessageDelete {
    pub channel: String,
    pub ids: Vec<String>,
}

/// A user reacting to, or un-reacting from, a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReaction {
    /// Message ID
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    pub emoji_id: String,
}

/// Every reaction of one emoji removed from a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRemoveReaction {
    pub id: String,
    pub channel_id: String,
    pub emoji_id: String,
}

/// Deletion of an entity addressed by a plain ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDelete {
    pub id: String,
}

/// A user joining or leaving a group channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMembership {
    /// Channel ID
    pub id: String,
    pub user: String,
}

/// Typing indicator change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTyping {
    /// Channel ID
    pub id: String,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAck {
    /// Channel ID
    pub id: String,
    pub user: String,
    pub message_id: String,
}

/// A server the current user joined or created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerCreate {
    pub id: String,
    pub server: Server,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub emojis: Vec<Emoji>,
}

/// A user joining or leaving a server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMembership {
    /// Server ID
    pub id: String,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRoleDelete {
    /// Server ID
    pub id: String,
    pub role_id: String,
}

/// New role order, highest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRoleRanks {
    /// Server ID
    pub id: String,
    pub ranks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRelationship {
    /// The current user's ID
    pub id: String,
    pub user: User,
    #[serde(default)]
    pub status: Option<RelationshipStatus>,
}

/// Synced settings changed; the payload is opaque to this client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettingsUpdate {
    pub id: String,
    #[serde(default)]
    pub update: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPlatformWipe {
    pub user_id: String,
    #[serde(default)]
    pub flags: u32,
}
