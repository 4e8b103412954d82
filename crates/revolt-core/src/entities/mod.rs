//! Entities - the records held by the local cache
//!
//! Every mutable entity comes with a `Partial*` payload (all fields optional)
//! and a `*Field` enum naming the fields a gateway update may clear.

/// A field name carried in an update's clear list
pub trait ClearField: From<String> {
    /// Entity kind the field belongs to, for diagnostics
    const ENTITY: &'static str;

    /// Wire name of the field
    fn name(&self) -> &str;

    /// Whether the name was not recognised
    fn is_unknown(&self) -> bool;
}

/// Declares a clearable-field enum with an `Unknown` catch-all
///
/// Field names travel as plain strings on the wire; names this client does
/// not know map to `Unknown` instead of failing the whole update.
macro_rules! field_enum {
    ($(#[$meta:meta])* $name:ident($entity:literal) { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// A field name this client does not recognise
            Unknown(String),
        }

        impl $name {
            /// Wire name of the field
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Unknown(name) => name,
                }
            }

            #[inline]
            pub fn is_unknown(&self) -> bool {
                matches!(self, Self::Unknown(_))
            }
        }

        impl $crate::entities::ClearField for $name {
            const ENTITY: &'static str = $entity;

            fn name(&self) -> &str {
                self.as_str()
            }

            fn is_unknown(&self) -> bool {
                matches!(self, Self::Unknown(_))
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                match name.as_str() {
                    $($wire => Self::$variant,)+
                    _ => Self::Unknown(name),
                }
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self::from(name.to_string())
            }
        }

        impl From<$name> for String {
            fn from(field: $name) -> Self {
                field.as_str().to_string()
            }
        }
    };
}

mod attachment;
mod channel;
mod emoji;
mod member;
mod message;
mod role;
mod server;
mod snapshot;
mod user;
mod webhook;

pub use attachment::{Attachment, AttachmentMetadata};
pub use channel::{Channel, ChannelField, ChannelType, PartialChannel};
pub use emoji::{Emoji, EmojiParent};
pub use member::{PartialServerMember, ServerMember, ServerMemberField};
pub use message::{Masquerade, Message, MessageField, PartialMessage};
pub use role::{PartialServerRole, PermissionOverride, RoleField, ServerRole};
pub use server::{Category, PartialServer, Server, ServerField, SystemMessages};
pub use snapshot::Snapshot;
pub use user::{
    BotInformation, PartialUser, Presence, RelationshipStatus, User, UserField, UserProfile,
    UserRelation, UserStatus,
};
pub use webhook::{PartialWebhook, Webhook, WebhookField};
