//! Server entity - a community of channels, roles and members

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Attachment, ServerRole};
use crate::value_objects::PartialField;

/// Channel grouping shown in the sidebar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub channels: Vec<String>,
}

/// Channels that receive system messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemMessages {
    pub user_joined: Option<String>,
    pub user_left: Option<String>,
    pub user_kicked: Option<String>,
    pub user_banned: Option<String>,
}

/// Server entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    /// Channel IDs in display order
    pub channels: Vec<String>,
    pub categories: Vec<Category>,
    pub system_messages: Option<SystemMessages>,
    /// Roles by role ID
    pub roles: HashMap<String, ServerRole>,
    pub default_permissions: u64,
    pub icon: Option<Attachment>,
    pub banner: Option<Attachment>,
    pub flags: u32,
    pub nsfw: bool,
    pub analytics: bool,
    pub discoverable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialServer {
    pub owner: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub channels: Option<Vec<String>>,
    pub categories: Option<Vec<Category>>,
    pub system_messages: Option<SystemMessages>,
    pub default_permissions: Option<u64>,
    pub icon: Option<Attachment>,
    pub banner: Option<Attachment>,
    pub flags: Option<u32>,
    pub nsfw: Option<bool>,
    pub analytics: Option<bool>,
    pub discoverable: Option<bool>,
}

field_enum! {
    /// Server fields that an update may clear
    ServerField("server") {
        Description => "Description",
        Categories => "Categories",
        SystemMessages => "SystemMessages",
        Icon => "Icon",
        Banner => "Banner",
    }
}

impl Server {
    /// Get a role by ID
    pub fn role(&self, role_id: &str) -> Option<&ServerRole> {
        self.roles.get(role_id)
    }

    /// Check if the given user owns this server
    #[inline]
    pub fn is_owner(&self, user_id: &str) -> bool {
        self.owner == user_id
    }

    pub fn apply_update(&mut self, data: PartialServer, clear: &[ServerField]) {
        PartialField::from(data.owner).apply_to(&mut self.owner);
        PartialField::from(data.name).apply_to(&mut self.name);
        PartialField::from_optional(data.description, clear.contains(&ServerField::Description))
            .apply_to(&mut self.description);
        PartialField::from(data.channels).apply_to(&mut self.channels);
        PartialField::from_parts(data.categories, clear.contains(&ServerField::Categories))
            .apply_to(&mut self.categories);
        PartialField::from_optional(
            data.system_messages,
            clear.contains(&ServerField::SystemMessages),
        )
        .apply_to(&mut self.system_messages);
        PartialField::from(data.default_permissions).apply_to(&mut self.default_permissions);
        PartialField::from_optional(data.icon, clear.contains(&ServerField::Icon))
            .apply_to(&mut self.icon);
        PartialField::from_optional(data.banner, clear.contains(&ServerField::Banner))
            .apply_to(&mut self.banner);
        PartialField::from(data.flags).apply_to(&mut self.flags);
        PartialField::from(data.nsfw).apply_to(&mut self.nsfw);
        PartialField::from(data.analytics).apply_to(&mut self.analytics);
        PartialField::from(data.discoverable).apply_to(&mut self.discoverable);
    }

    /// Rewrite role ranks from their position in `ranks`
    ///
    /// Role IDs not owned by this server are skipped.
    pub fn set_role_ranks(&mut self, ranks: &[String]) {
        for (rank, role_id) in ranks.iter().enumerate() {
            if let Some(role) = self.roles.get_mut(role_id) {
                role.rank = rank as i64;
            }
        }
    }

    /// Append a channel ID unless already listed
    pub fn add_channel(&mut self, channel_id: &str) {
        if !self.channels.iter().any(|id| id == channel_id) {
            self.channels.push(channel_id.to_string());
        }
    }

    /// Remove a channel ID, returning whether it was listed
    pub fn remove_channel(&mut self, channel_id: &str) -> bool {
        let before = self.channels.len();
        self.channels.retain(|id| id != channel_id);
        self.channels.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_server() -> Server {
        serde_json::from_value(json!({
            "_id": "01SERVER",
            "owner": "01OWNER",
            "name": "Burrow",
            "description": "A place to dig",
            "channels": ["01A", "01B"],
            "roles": {
                "01ROLE1": { "name": "Admin", "rank": 0 },
                "01ROLE2": { "name": "Member", "rank": 1 }
            },
            "icon": { "_id": "icon1", "tag": "icons" }
        }))
        .unwrap()
    }

    #[test]
    fn test_server_decode() {
        let server = create_test_server();
        assert!(server.is_owner("01OWNER"));
        assert_eq!(server.role("01ROLE1").map(|r| r.name.as_str()), Some("Admin"));
        assert_eq!(server.icon.as_ref().map(Attachment::cdn_path).as_deref(), Some("/icons/icon1"));
    }

    #[test]
    fn test_server_update_with_clear() {
        let mut server = create_test_server();
        let data = PartialServer {
            name: Some("Warren".to_string()),
            ..Default::default()
        };

        server.apply_update(data, &[ServerField::Icon, ServerField::Description]);

        assert_eq!(server.name, "Warren");
        assert!(server.icon.is_none());
        assert!(server.description.is_none());
        assert_eq!(server.channels, vec!["01A", "01B"]);
    }

    #[test]
    fn test_role_ranks() {
        let mut server = create_test_server();
        server.set_role_ranks(&["01ROLE2".to_string(), "01ROLE1".to_string(), "ghost".to_string()]);

        assert_eq!(server.roles["01ROLE2"].rank, 0);
        assert_eq!(server.roles["01ROLE1"].rank, 1);
    }

    #[test]
    fn test_channel_list() {
        let mut server = create_test_server();
        server.add_channel("01C");
        server.add_channel("01C");
        assert_eq!(server.channels.len(), 3);

        assert!(server.remove_channel("01A"));
        assert!(!server.remove_channel("01A"));
        assert_eq!(server.channels, vec!["01B", "01C"]);
    }
}
