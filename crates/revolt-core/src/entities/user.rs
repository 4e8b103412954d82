//! User entity - represents a chat user

use serde::{Deserialize, Serialize};

use super::Attachment;
use crate::value_objects::PartialField;

/// Relationship between the current user and another user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipStatus {
    User,
    Friend,
    Outgoing,
    Incoming,
    Blocked,
    BlockedOther,
    #[default]
    #[serde(other)]
    None,
}

/// Presence shown next to a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Presence {
    #[default]
    Online,
    Idle,
    Focus,
    Busy,
    #[serde(other)]
    Invisible,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStatus {
    pub text: Option<String>,
    pub presence: Option<Presence>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub content: Option<String>,
    pub background: Option<Attachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRelation {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: RelationshipStatus,
}

/// Present when the user is a bot account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotInformation {
    pub owner: String,
}

/// User entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub discriminator: String,
    pub display_name: Option<String>,
    pub avatar: Option<Attachment>,
    pub relations: Vec<UserRelation>,
    /// Badge bitfield
    pub badges: u32,
    pub status: Option<UserStatus>,
    pub profile: Option<UserProfile>,
    /// Flag bitfield
    pub flags: u32,
    pub privileged: bool,
    pub bot: Option<BotInformation>,
    pub relationship: RelationshipStatus,
    pub online: bool,
}

/// Changed fields of a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialUser {
    pub username: Option<String>,
    pub discriminator: Option<String>,
    pub display_name: Option<String>,
    pub avatar: Option<Attachment>,
    pub badges: Option<u32>,
    pub status: Option<UserStatus>,
    pub profile: Option<UserProfile>,
    pub flags: Option<u32>,
    pub online: Option<bool>,
}

field_enum! {
    /// User fields that an update may clear
    UserField("user") {
        Avatar => "Avatar",
        StatusText => "StatusText",
        StatusPresence => "StatusPresence",
        ProfileContent => "ProfileContent",
        ProfileBackground => "ProfileBackground",
        DisplayName => "DisplayName",
    }
}

impl User {
    /// Name to display: the display name when set, otherwise the username
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }

    /// Get the full tag: username#discriminator
    pub fn tag(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }

    #[inline]
    pub fn is_bot(&self) -> bool {
        self.bot.is_some()
    }

    /// Apply a partial update
    ///
    /// Status and profile are replaced wholesale when present; their clearable
    /// sub-fields are reset afterwards.
    pub fn apply_update(&mut self, data: PartialUser, clear: &[UserField]) {
        PartialField::from(data.username).apply_to(&mut self.username);
        PartialField::from(data.discriminator).apply_to(&mut self.discriminator);
        PartialField::from_optional(data.display_name, clear.contains(&UserField::DisplayName))
            .apply_to(&mut self.display_name);
        PartialField::from_optional(data.avatar, clear.contains(&UserField::Avatar))
            .apply_to(&mut self.avatar);
        PartialField::from(data.badges).apply_to(&mut self.badges);
        PartialField::from_optional(data.status, false).apply_to(&mut self.status);
        PartialField::from_optional(data.profile, false).apply_to(&mut self.profile);
        PartialField::from(data.flags).apply_to(&mut self.flags);
        PartialField::from(data.online).apply_to(&mut self.online);

        for field in clear {
            match field {
                UserField::StatusText => {
                    if let Some(status) = &mut self.status {
                        status.text = None;
                    }
                }
                UserField::StatusPresence => {
                    if let Some(status) = &mut self.status {
                        status.presence = None;
                    }
                }
                UserField::ProfileContent => {
                    if let Some(profile) = &mut self.profile {
                        profile.content = None;
                    }
                }
                UserField::ProfileBackground => {
                    if let Some(profile) = &mut self.profile {
                        profile.background = None;
                    }
                }
                UserField::Avatar | UserField::DisplayName | UserField::Unknown(_) => {}
            }
        }
    }
}
