//! Gateway events
//!
//! Event kinds, payloads, update unification and the frame decoder.

mod decoder;
mod event;
mod event_kind;
mod payloads;
mod updates;

pub use decoder::{DecodeError, Decoder};
pub use event::Event;
pub use event_kind::EventKind;
pub use payloads::{
    AppendedContent, BulkMessageDelete, ChannelAck, ChannelMembership, ChannelTyping,
    EntityDelete, ErrorEvent, MessageAppend, MessageDelete, MessageReaction,
    MessageRemoveReaction, Pong, ServerCreate, ServerMembership, ServerRoleDelete,
    ServerRoleRanks, UserPlatformWipe, UserRelationship, UserSettingsUpdate,
};
pub use updates::{
    AbstractUpdate, ChannelUpdate, MessageUpdate, ServerMemberUpdate, ServerRoleUpdate,
    ServerUpdate, Update, UserUpdate, WebhookUpdate,
};
