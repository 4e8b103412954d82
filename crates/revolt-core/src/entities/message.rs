//! Message entity
//!
//! Messages are not cached; they are delivered to observers as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::Attachment;
use crate::value_objects::PartialField;

/// Name, avatar and colour a message is displayed with instead of its author's
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Masquerade {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub colour: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,
    pub nonce: Option<String>,
    pub channel: String,
    pub author: String,
    pub content: Option<String>,
    pub attachments: Vec<Attachment>,
    pub edited: Option<DateTime<Utc>>,
    /// Embeds are kept raw
    pub embeds: Vec<Value>,
    pub mentions: Vec<String>,
    pub replies: Vec<String>,
    /// Emoji ID to the IDs of users who reacted
    pub reactions: HashMap<String, Vec<String>>,
    pub pinned: bool,
    pub flags: u32,
    pub masquerade: Option<Masquerade>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialMessage {
    pub content: Option<String>,
    pub edited: Option<DateTime<Utc>>,
    pub embeds: Option<Vec<Value>>,
    pub pinned: Option<bool>,
    pub reactions: Option<HashMap<String, Vec<String>>>,
}

field_enum! {
    MessageField("message") {
        Pinned => "Pinned",
    }
}

impl Message {
    pub fn apply_update(&mut self, data: PartialMessage, clear: &[MessageField]) {
        PartialField::from_optional(data.content, false).apply_to(&mut self.content);
        PartialField::from_optional(data.edited, false).apply_to(&mut self.edited);
        PartialField::from(data.embeds).apply_to(&mut self.embeds);
        PartialField::from_parts(data.pinned, clear.contains(&MessageField::Pinned))
            .apply_to(&mut self.pinned);
        PartialField::from(data.reactions).apply_to(&mut self.reactions);
    }

    /// Record a reaction; duplicate reactions are ignored
    pub fn add_reaction(&mut self, emoji_id: &str, user_id: &str) {
        let users = self.reactions.entry(emoji_id.to_string()).or_default();
        if !users.iter().any(|u| u == user_id) {
            users.push(user_id.to_string());
        }
    }

    /// Drop one user's reaction, or every reaction with `emoji_id` when `user_id` is `None`
    pub fn remove_reaction(&mut self, emoji_id: &str, user_id: Option<&str>) {
        match user_id {
            Some(user_id) => {
                if let Some(users) = self.reactions.get_mut(emoji_id) {
                    users.retain(|u| u != user_id);
                    if users.is_empty() {
                        self.reactions.remove(emoji_id);
                    }
                }
            }
            None => {
                self.reactions.remove(emoji_id);
            }
        }
    }
}
