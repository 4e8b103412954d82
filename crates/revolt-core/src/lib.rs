//! # revolt-core
//!
//! Domain layer containing the cached entities, their identifiers, and the
//! partial-update types that gateway events carry.
//! This crate has zero dependencies on infrastructure (HTTP, WebSocket, etc.).

pub mod entities;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Attachment, AttachmentMetadata, BotInformation, Category, Channel, ChannelField, ChannelType,
    ClearField, Emoji, EmojiParent, Masquerade, Message, MessageField, PartialChannel,
    PartialMessage, PartialServer, PartialServerMember, PartialServerRole, PartialUser,
    PartialWebhook, PermissionOverride, Presence, RelationshipStatus, RoleField, Server,
    ServerField, ServerMember, ServerMemberField, ServerRole, Snapshot, SystemMessages, User,
    UserField, UserProfile, UserRelation, UserStatus, Webhook, WebhookField,
};
pub use value_objects::{EntityId, MemberId, MemberIdParseError, PartialField, UpdateEnvelope};
