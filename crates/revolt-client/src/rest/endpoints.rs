//! REST paths, relative to the API base

pub const SELF: &str = "users/@me";

pub fn user(user_id: &str) -> String {
    format!("users/{user_id}")
}

pub fn server(server_id: &str) -> String {
    format!("servers/{server_id}")
}

pub fn server_member(server_id: &str, user_id: &str) -> String {
    format!("servers/{server_id}/members/{user_id}")
}

pub fn channel(channel_id: &str) -> String {
    format!("channels/{channel_id}")
}

pub fn channel_messages(channel_id: &str) -> String {
    format!("channels/{channel_id}/messages")
}

pub fn channel_message(channel_id: &str, message_id: &str) -> String {
    format!("channels/{channel_id}/messages/{message_id}")
}
