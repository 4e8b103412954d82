//! Decoded inbound events

use revolt_core::{Channel, Emoji, Message, Snapshot, Webhook};
use serde_json::Value;

use super::payloads::{
    BulkMessageDelete, ChannelAck, ChannelMembership, ChannelTyping, EntityDelete, ErrorEvent,
    MessageAppend, MessageDelete, MessageReaction, MessageRemoveReaction, Pong, ServerCreate,
    ServerMembership, ServerRoleDelete, ServerRoleRanks, UserPlatformWipe, UserRelationship,
    UserSettingsUpdate,
};
use super::updates::{
    ChannelUpdate, MessageUpdate, ServerMemberUpdate, ServerRoleUpdate, ServerUpdate, UserUpdate,
    WebhookUpdate,
};
use super::EventKind;

/// One inbound gateway event
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Error(ErrorEvent),
    /// Sub-events in wire order
    Bulk(Vec<Event>),
    Authenticated,
    Ready(Snapshot),
    Pong(Pong),

    Message(Box<Message>),
    MessageUpdate(MessageUpdate),
    MessageAppend(MessageAppend),
    MessageDelete(MessageDelete),
    BulkMessageDelete(BulkMessageDelete),
    MessageReact(MessageReaction),
    MessageUnreact(MessageReaction),
    MessageRemoveReaction(MessageRemoveReaction),

    ChannelCreate(Box<Channel>),
    ChannelUpdate(ChannelUpdate),
    ChannelDelete(EntityDelete),
    ChannelGroupJoin(ChannelMembership),
    ChannelGroupLeave(ChannelMembership),
    ChannelStartTyping(ChannelTyping),
    ChannelStopTyping(ChannelTyping),
    ChannelAck(ChannelAck),

    ServerCreate(Box<ServerCreate>),
    ServerUpdate(ServerUpdate),
    ServerDelete(EntityDelete),
    ServerMemberUpdate(ServerMemberUpdate),
    ServerMemberJoin(ServerMembership),
    ServerMemberLeave(ServerMembership),
    ServerRoleUpdate(ServerRoleUpdate),
    ServerRoleDelete(ServerRoleDelete),
    ServerRoleRanksUpdate(ServerRoleRanks),

    UserUpdate(UserUpdate),
    UserRelationship(Box<UserRelationship>),
    UserSettingsUpdate(UserSettingsUpdate),
    UserPlatformWipe(UserPlatformWipe),

    EmojiCreate(Emoji),
    EmojiDelete(EntityDelete),
    WebhookCreate(Webhook),
    WebhookUpdate(WebhookUpdate),
    WebhookDelete(EntityDelete),

    /// A discriminator this client does not know, or a bulk sub-event that
    /// failed to decode
    Unknown { kind: String, raw: Value },
}

impl Event {
    /// Kind of the event, used to route observers
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Error(_) => EventKind::Error,
            Self::Bulk(_) => EventKind::Bulk,
            Self::Authenticated => EventKind::Authenticated,
            Self::Ready(_) => EventKind::Ready,
            Self::Pong(_) => EventKind::Pong,
            Self::Message(_) => EventKind::Message,
            Self::MessageUpdate(_) => EventKind::MessageUpdate,
            Self::MessageAppend(_) => EventKind::MessageAppend,
            Self::MessageDelete(_) => EventKind::MessageDelete,
            Self::BulkMessageDelete(_) => EventKind::BulkMessageDelete,
            Self::MessageReact(_) => EventKind::MessageReact,
            Self::MessageUnreact(_) => EventKind::MessageUnreact,
            Self::MessageRemoveReaction(_) => EventKind::MessageRemoveReaction,
            Self::ChannelCreate(_) => EventKind::ChannelCreate,
            Self::ChannelUpdate(_) => EventKind::ChannelUpdate,
            Self::ChannelDelete(_) => EventKind::ChannelDelete,
            Self::ChannelGroupJoin(_) => EventKind::ChannelGroupJoin,
            Self::ChannelGroupLeave(_) => EventKind::ChannelGroupLeave,
            Self::ChannelStartTyping(_) => EventKind::ChannelStartTyping,
            Self::ChannelStopTyping(_) => EventKind::ChannelStopTyping,
            Self::ChannelAck(_) => EventKind::ChannelAck,
            Self::ServerCreate(_) => EventKind::ServerCreate,
            Self::ServerUpdate(_) => EventKind::ServerUpdate,
            Self::ServerDelete(_) => EventKind::ServerDelete,
            Self::ServerMemberUpdate(_) => EventKind::ServerMemberUpdate,
            Self::ServerMemberJoin(_) => EventKind::ServerMemberJoin,
            Self::ServerMemberLeave(_) => EventKind::ServerMemberLeave,
            Self::ServerRoleUpdate(_) => EventKind::ServerRoleUpdate,
            Self::ServerRoleDelete(_) => EventKind::ServerRoleDelete,
            Self::ServerRoleRanksUpdate(_) => EventKind::ServerRoleRanksUpdate,
            Self::UserUpdate(_) => EventKind::UserUpdate,
            Self::UserRelationship(_) => EventKind::UserRelationship,
            Self::UserSettingsUpdate(_) => EventKind::UserSettingsUpdate,
            Self::UserPlatformWipe(_) => EventKind::UserPlatformWipe,
            Self::EmojiCreate(_) => EventKind::EmojiCreate,
            Self::EmojiDelete(_) => EventKind::EmojiDelete,
            Self::WebhookCreate(_) => EventKind::WebhookCreate,
            Self::WebhookUpdate(_) => EventKind::WebhookUpdate,
            Self::WebhookDelete(_) => EventKind::WebhookDelete,
            Self::Unknown { .. } => EventKind::Unknown,
        }
    }

    /// Wire discriminator; for unknown events the one that was received
    pub fn type_name(&self) -> &str {
        match self {
            Self::Unknown { kind, .. } => kind,
            other => other.kind().as_str(),
        }
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }
}
