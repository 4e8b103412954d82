//! Cache state with its reader and writer handles

mod reader;
mod writer;

use parking_lot::RwLock;
use revolt_common::CacheConfig;
use revolt_core::{Channel, Emoji, MemberId, Server, ServerMember, User, Webhook};
use std::collections::HashMap;

pub use reader::{Cache, CacheStats};
pub use writer::{CacheWriter, UpdateOutcome};

/// Entity maps guarded by one lock
#[derive(Debug, Default)]
struct State {
    /// The current user; kept even when users are untracked
    current_user: Option<User>,
    users: HashMap<String, User>,
    servers: HashMap<String, Server>,
    channels: HashMap<String, Channel>,
    members: HashMap<MemberId, ServerMember>,
    emojis: HashMap<String, Emoji>,
    webhooks: HashMap<String, Webhook>,
}

#[derive(Debug)]
struct Shared {
    config: CacheConfig,
    state: RwLock<State>,
}
