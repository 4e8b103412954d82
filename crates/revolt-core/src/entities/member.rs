//! Server member entity - a user's membership in one server

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Attachment;
use crate::value_objects::{MemberId, PartialField};

/// Server member entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerMember {
    #[serde(rename = "_id")]
    pub id: MemberId,
    pub joined_at: Option<DateTime<Utc>>,
    pub nickname: Option<String>,
    pub avatar: Option<Attachment>,
    pub roles: Vec<String>,
    /// Member cannot interact until this instant
    pub timeout: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialServerMember {
    pub joined_at: Option<DateTime<Utc>>,
    pub nickname: Option<String>,
    pub avatar: Option<Attachment>,
    pub roles: Option<Vec<String>>,
    pub timeout: Option<DateTime<Utc>>,
}

field_enum! {
    /// Member fields that an update may clear
    ServerMemberField("member") {
        Nickname => "Nickname",
        Avatar => "Avatar",
        Roles => "Roles",
        Timeout => "Timeout",
    }
}

impl ServerMember {
    /// Create a bare member, as announced by a join
    pub fn new(id: MemberId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Check if the member is timed out at `now`
    pub fn is_timed_out(&self, now: DateTime<Utc>) -> bool {
        self.timeout.is_some_and(|until| until > now)
    }

    pub fn apply_update(&mut self, data: PartialServerMember, clear: &[ServerMemberField]) {
        PartialField::from_optional(data.joined_at, false).apply_to(&mut self.joined_at);
        PartialField::from_optional(data.nickname, clear.contains(&ServerMemberField::Nickname))
            .apply_to(&mut self.nickname);
        PartialField::from_optional(data.avatar, clear.contains(&ServerMemberField::Avatar))
            .apply_to(&mut self.avatar);
        PartialField::from_parts(data.roles, clear.contains(&ServerMemberField::Roles))
            .apply_to(&mut self.roles);
        PartialField::from_optional(data.timeout, clear.contains(&ServerMemberField::Timeout))
            .apply_to(&mut self.timeout);
    }
}
