//! Webhook entity

use serde::{Deserialize, Serialize};

use super::Attachment;
use crate::value_objects::PartialField;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Webhook {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub avatar: Option<Attachment>,
    pub creator_id: String,
    pub channel_id: String,
    pub permissions: u64,
    /// Only present for the webhook's creator
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialWebhook {
    pub name: Option<String>,
    pub avatar: Option<Attachment>,
    pub creator_id: Option<String>,
    pub channel_id: Option<String>,
    pub permissions: Option<u64>,
    pub token: Option<String>,
}

field_enum! {
    WebhookField("webhook") {
        Avatar => "Avatar",
    }
}

impl Webhook {
    pub fn apply_update(&mut self, data: PartialWebhook, clear: &[WebhookField]) {
        PartialField::from(data.name).apply_to(&mut self.name);
        PartialField::from_optional(data.avatar, clear.contains(&WebhookField::Avatar))
            .apply_to(&mut self.avatar);
        PartialField::from(data.creator_id).apply_to(&mut self.creator_id);
        PartialField::from(data.channel_id).apply_to(&mut self.channel_id);
        PartialField::from(data.permissions).apply_to(&mut self.permissions);
        PartialField::from_optional(data.token, false).apply_to(&mut self.token);
    }
}
