//! Gateway event kinds
//!
//! Discriminator values carried in the `type` field of inbound frames.

use std::fmt;

/// Inbound event discriminators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    // Connection events
    /// Server-side error, usually fatal for the session
    Error,
    /// Several events in one frame
    Bulk,
    /// Sent after a successful Authenticate
    Authenticated,
    /// Initial snapshot of the session
    Ready,
    /// Heartbeat reply
    Pong,

    // Message events
    /// New message
    Message,
    MessageUpdate,
    /// Embeds appended to a message
    MessageAppend,
    MessageDelete,
    /// Several messages deleted at once
    BulkMessageDelete,
    MessageReact,
    MessageUnreact,
    /// All reactions of one emoji removed
    MessageRemoveReaction,

    // Channel events
    ChannelCreate,
    ChannelUpdate,
    ChannelDelete,
    /// User added to a group
    ChannelGroupJoin,
    /// User removed from a group
    ChannelGroupLeave,
    ChannelStartTyping,
    ChannelStopTyping,
    /// Channel marked as read
    ChannelAck,

    // Server events
    ServerCreate,
    ServerUpdate,
    ServerDelete,
    ServerMemberUpdate,
    ServerMemberJoin,
    ServerMemberLeave,
    ServerRoleUpdate,
    ServerRoleDelete,
    /// Role order changed
    ServerRoleRanksUpdate,

    // User events
    UserUpdate,
    UserRelationship,
    /// Synced settings changed
    UserSettingsUpdate,
    /// User removed from the platform
    UserPlatformWipe,

    // Emoji and webhook events
    EmojiCreate,
    EmojiDelete,
    WebhookCreate,
    WebhookUpdate,
    WebhookDelete,

    /// Any discriminator not listed above
    Unknown,
}

impl EventKind {
    /// Every known kind, in protocol order
    pub const ALL: [Self; 39] = [
        Self::Error,
        Self::Bulk,
        Self::Authenticated,
        Self::Ready,
        Self::Pong,
        Self::Message,
        Self::MessageUpdate,
        Self::MessageAppend,
        Self::MessageDelete,
        Self::BulkMessageDelete,
        Self::MessageReact,
        Self::MessageUnreact,
        Self::MessageRemoveReaction,
        Self::ChannelCreate,
        Self::ChannelUpdate,
        Self::ChannelDelete,
        Self::ChannelGroupJoin,
        Self::ChannelGroupLeave,
        Self::ChannelStartTyping,
        Self::ChannelStopTyping,
        Self::ChannelAck,
        Self::ServerCreate,
        Self::ServerUpdate,
        Self::ServerDelete,
        Self::ServerMemberUpdate,
        Self::ServerMemberJoin,
        Self::ServerMemberLeave,
        Self::ServerRoleUpdate,
        Self::ServerRoleDelete,
        Self::ServerRoleRanksUpdate,
        Self::UserUpdate,
        Self::UserRelationship,
        Self::UserSettingsUpdate,
        Self::UserPlatformWipe,
        Self::EmojiCreate,
        Self::EmojiDelete,
        Self::WebhookCreate,
        Self::WebhookUpdate,
        Self::WebhookDelete,
    ];

    /// Get the wire name of the event kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Bulk => "Bulk",
            Self::Authenticated => "Authenticated",
            Self::Ready => "Ready",
            Self::Pong => "Pong",
            Self::Message => "Message",
            Self::MessageUpdate => "MessageUpdate",
            Self::MessageAppend => "MessageAppend",
            Self::MessageDelete => "MessageDelete",
            Self::BulkMessageDelete => "BulkMessageDelete",
            Self::MessageReact => "MessageReact",
            Self::MessageUnreact => "MessageUnreact",
            Self::MessageRemoveReaction => "MessageRemoveReaction",
            Self::ChannelCreate => "ChannelCreate",
            Self::ChannelUpdate => "ChannelUpdate",
            Self::ChannelDelete => "ChannelDelete",
            Self::ChannelGroupJoin => "ChannelGroupJoin",
            Self::ChannelGroupLeave => "ChannelGroupLeave",
            Self::ChannelStartTyping => "ChannelStartTyping",
            Self::ChannelStopTyping => "ChannelStopTyping",
            Self::ChannelAck => "ChannelAck",
            Self::ServerCreate => "ServerCreate",
            Self::ServerUpdate => "ServerUpdate",
            Self::ServerDelete => "ServerDelete",
            Self::ServerMemberUpdate => "ServerMemberUpdate",
            Self::ServerMemberJoin => "ServerMemberJoin",
            Self::ServerMemberLeave => "ServerMemberLeave",
            Self::ServerRoleUpdate => "ServerRoleUpdate",
            Self::ServerRoleDelete => "ServerRoleDelete",
            Self::ServerRoleRanksUpdate => "ServerRoleRanksUpdate",
            Self::UserUpdate => "UserUpdate",
            Self::UserRelationship => "UserRelationship",
            Self::UserSettingsUpdate => "UserSettingsUpdate",
            Self::UserPlatformWipe => "UserPlatformWipe",
            Self::EmojiCreate => "EmojiCreate",
            Self::EmojiDelete => "EmojiDelete",
            Self::WebhookCreate => "WebhookCreate",
            Self::WebhookUpdate => "WebhookUpdate",
            Self::WebhookDelete => "WebhookDelete",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a wire name; unlisted names yield `None`
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    /// Whether events of this kind change the local cache
    #[must_use]
    pub const fn mutates_cache(self) -> bool {
        matches!(
            self,
            Self::Ready
                | Self::ChannelCreate
                | Self::ChannelUpdate
                | Self::ChannelDelete
                | Self::ChannelGroupJoin
                | Self::ChannelGroupLeave
                | Self::ServerCreate
                | Self::ServerUpdate
                | Self::ServerDelete
                | Self::ServerMemberUpdate
                | Self::ServerMemberJoin
                | Self::ServerMemberLeave
                | Self::ServerRoleUpdate
                | Self::ServerRoleDelete
                | Self::ServerRoleRanksUpdate
                | Self::UserUpdate
                | Self::UserPlatformWipe
                | Self::EmojiCreate
                | Self::EmojiDelete
                | Self::WebhookCreate
                | Self::WebhookUpdate
                | Self::WebhookDelete
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_as_str() {
        assert_eq!(EventKind::Ready.as_str(), "Ready");
        assert_eq!(EventKind::ServerRoleRanksUpdate.as_str(), "ServerRoleRanksUpdate");
        assert_eq!(EventKind::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(EventKind::from_str("MessageReact"), Some(EventKind::MessageReact));
        assert_eq!(EventKind::from_str("WebhookDelete"), Some(EventKind::WebhookDelete));
        assert_eq!(EventKind::from_str("Unknown"), None);
        assert_eq!(EventKind::from_str("message"), None);
    }

    #[test]
    fn test_all_round_trips() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_mutates_cache() {
        assert!(EventKind::ServerUpdate.mutates_cache());
        assert!(EventKind::Ready.mutates_cache());
        assert!(!EventKind::Message.mutates_cache());
        assert!(!EventKind::ChannelStartTyping.mutates_cache());
    }
}
