//! Snapshot - the full state delivered once per session

use serde::{Deserialize, Serialize};

use super::{Channel, Emoji, Server, ServerMember, User};

/// Initial state sent after authentication
///
/// The last user in `users` is the current user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub servers: Vec<Server>,
    pub channels: Vec<Channel>,
    pub members: Vec<ServerMember>,
    pub emojis: Vec<Emoji>,
}

impl Snapshot {
    /// The current user
    pub fn current_user(&self) -> Option<&User> {
        self.users.last()
    }
}
