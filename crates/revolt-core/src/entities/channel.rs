//! Channel entity - saved notes, DMs, groups and server channels

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Attachment, PermissionOverride};
use crate::value_objects::PartialField;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelType {
    SavedMessages,
    DirectMessage,
    Group,
    #[default]
    TextChannel,
    VoiceChannel,
    #[serde(other)]
    Unknown,
}

impl ChannelType {
    /// Check if channels of this type belong to a server
    #[inline]
    pub fn is_server_channel(self) -> bool {
        matches!(self, Self::TextChannel | Self::VoiceChannel)
    }
}

/// Channel entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    #[serde(rename = "_id")]
    pub id: String,
    pub channel_type: ChannelType,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<Attachment>,
    pub nsfw: bool,
    pub active: bool,
    /// Owning server (server channels only)
    pub server: Option<String>,
    /// Owner (groups) or user (saved messages)
    pub owner: Option<String>,
    /// Participants (DMs and groups)
    pub recipients: Vec<String>,
    /// Group permissions
    pub permissions: Option<u64>,
    pub role_permissions: HashMap<String, PermissionOverride>,
    pub default_permissions: Option<PermissionOverride>,
    pub last_message_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialChannel {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub icon: Option<Attachment>,
    pub nsfw: Option<bool>,
    pub active: Option<bool>,
    pub permissions: Option<u64>,
    pub role_permissions: Option<HashMap<String, PermissionOverride>>,
    pub default_permissions: Option<PermissionOverride>,
    pub last_message_id: Option<String>,
}

field_enum! {
    /// Channel fields that an update may clear
    ChannelField("channel") {
        Description => "Description",
        Icon => "Icon",
        DefaultPermissions => "DefaultPermissions",
    }
}

impl Channel {
    pub fn apply_update(&mut self, data: PartialChannel, clear: &[ChannelField]) {
        PartialField::from(data.name).apply_to(&mut self.name);
        PartialField::from_optional(data.owner, false).apply_to(&mut self.owner);
        PartialField::from_optional(data.description, clear.contains(&ChannelField::Description))
            .apply_to(&mut self.description);
        PartialField::from_optional(data.icon, clear.contains(&ChannelField::Icon))
            .apply_to(&mut self.icon);
        PartialField::from(data.nsfw).apply_to(&mut self.nsfw);
        PartialField::from(data.active).apply_to(&mut self.active);
        PartialField::from_optional(data.permissions, false).apply_to(&mut self.permissions);
        PartialField::from(data.role_permissions).apply_to(&mut self.role_permissions);
        PartialField::from_optional(
            data.default_permissions,
            clear.contains(&ChannelField::DefaultPermissions),
        )
        .apply_to(&mut self.default_permissions);
        PartialField::from_optional(data.last_message_id, false)
            .apply_to(&mut self.last_message_id);
    }
}
