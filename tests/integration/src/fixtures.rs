//! Test fixtures
//!
//! Wire frames and REST bodies shared by the integration tests.

use serde_json::{json, Value};

pub const TOKEN: &str = "integration-token";
pub const SELF_ID: &str = "01SELF";
pub const SERVER_ID: &str = "01SERVER";
pub const CHANNEL_ID: &str = "01CHANNEL";

pub fn user_json(id: &str, username: &str) -> Value {
    json!({
        "_id": id,
        "username": username,
        "discriminator": "0001",
        "online": true
    })
}

/// `Ready` frame with one server, one channel and the current user last
pub fn ready_frame() -> Value {
    json!({
        "type": "Ready",
        "users": [user_json("01OTHER", "other"), user_json(SELF_ID, "me")],
        "servers": [{
            "_id": SERVER_ID,
            "owner": SELF_ID,
            "name": "Test Server",
            "channels": [CHANNEL_ID],
            "roles": {"01ROLE": {"name": "Member", "rank": 1}}
        }],
        "channels": [{
            "_id": CHANNEL_ID,
            "channel_type": "TextChannel",
            "server": SERVER_ID,
            "name": "general"
        }],
        "members": [{"_id": {"server": SERVER_ID, "user": SELF_ID}}],
        "emojis": []
    })
}

pub fn server_update_frame(name: &str) -> Value {
    json!({
        "type": "ServerUpdate",
        "id": SERVER_ID,
        "data": {"name": name},
        "clear": []
    })
}

pub fn message_json(id: &str, content: &str) -> Value {
    json!({
        "_id": id,
        "channel": CHANNEL_ID,
        "author": SELF_ID,
        "content": content
    })
}
