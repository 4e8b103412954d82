//! Attachment entity - a file stored on the CDN

use serde::{Deserialize, Serialize};

/// An uploaded file referenced by users, servers, channels and messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    #[serde(rename = "_id")]
    pub id: String,
    /// Bucket the file was uploaded to
    pub tag: String,
    pub filename: String,
    pub metadata: Option<AttachmentMetadata>,
    pub content_type: String,
    /// Size in bytes
    pub size: u64,
    pub deleted: bool,
    pub reported: bool,
    pub message_id: Option<String>,
    pub user_id: Option<String>,
    pub server_id: Option<String>,
    pub object_id: Option<String>,
}

/// File metadata; dimensions apply to images and videos only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentMetadata {
    #[serde(rename = "type")]
    pub kind: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Attachment {
    /// Path of the file relative to the CDN base URL
    pub fn cdn_path(&self) -> String {
        format!("/{}/{}", self.tag, self.id)
    }
}
