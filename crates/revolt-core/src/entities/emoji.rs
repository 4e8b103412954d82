//! Emoji entity - a custom emoji

use serde::{Deserialize, Serialize};

/// Owner of a custom emoji
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EmojiParent {
    Server {
        id: String,
    },
    /// The owning server is gone
    #[default]
    Detached,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Emoji {
    #[serde(rename = "_id")]
    pub id: String,
    pub parent: EmojiParent,
    pub creator_id: String,
    pub name: String,
    pub animated: bool,
    pub nsfw: bool,
}

impl Emoji {
    /// ID of the owning server, if still attached
    pub fn server_id(&self) -> Option<&str> {
        match &self.parent {
            EmojiParent::Server { id } => Some(id),
            EmojiParent::Detached => None,
        }
    }
}
