//! Read-only cache handle

use revolt_common::CacheConfig;
use revolt_core::{Channel, Emoji, MemberId, Server, ServerMember, ServerRole, User, Webhook};
use std::sync::Arc;

use super::{CacheWriter, Shared, State};

/// Read handle to the local cache
///
/// Clones share the same state. Accessors return owned copies so no lock
/// is held once they return.
#[derive(Debug, Clone)]
pub struct Cache {
    inner: Arc<Shared>,
}

/// Number of cached entities per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub users: usize,
    pub servers: usize,
    pub channels: usize,
    pub members: usize,
    pub emojis: usize,
    pub webhooks: usize,
}

impl Cache {
    /// Create an empty cache, returning the reader and its only writer
    pub fn new(config: CacheConfig) -> (Self, CacheWriter) {
        let inner = Arc::new(Shared {
            config,
            state: parking_lot::RwLock::new(State::default()),
        });
        let writer = CacheWriter::new(Arc::clone(&inner));
        (Self { inner }, writer)
    }

    pub(super) fn from_shared(inner: Arc<Shared>) -> Self {
        Self { inner }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.inner.state.read().users.get(id).cloned()
    }

    pub fn server(&self, id: &str) -> Option<Server> {
        self.inner.state.read().servers.get(id).cloned()
    }

    pub fn channel(&self, id: &str) -> Option<Channel> {
        self.inner.state.read().channels.get(id).cloned()
    }

    /// Get a member by server and user ID
    pub fn member(&self, server_id: &str, user_id: &str) -> Option<ServerMember> {
        let id = MemberId::new(server_id, user_id);
        self.inner.state.read().members.get(&id).cloned()
    }

    /// All cached members of a server
    pub fn members(&self, server_id: &str) -> Vec<ServerMember> {
        self.inner
            .state
            .read()
            .members
            .values()
            .filter(|member| member.id.server == server_id)
            .cloned()
            .collect()
    }

    pub fn role(&self, server_id: &str, role_id: &str) -> Option<ServerRole> {
        let state = self.inner.state.read();
        state.servers.get(server_id)?.roles.get(role_id).cloned()
    }

    pub fn emoji(&self, id: &str) -> Option<Emoji> {
        self.inner.state.read().emojis.get(id).cloned()
    }

    pub fn webhook(&self, id: &str) -> Option<Webhook> {
        self.inner.state.read().webhooks.get(id).cloned()
    }

    /// The user this client is logged in as, once the snapshot arrived
    pub fn current_user(&self) -> Option<User> {
        self.inner.state.read().current_user.clone()
    }

    /// Channels of a server in display order, skipping uncached ones
    pub fn server_channels(&self, server_id: &str) -> Vec<Channel> {
        let state = self.inner.state.read();
        let Some(server) = state.servers.get(server_id) else {
            return Vec::new();
        };
        server
            .channels
            .iter()
            .filter_map(|id| state.channels.get(id).cloned())
            .collect()
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.inner.state.read();
        CacheStats {
            users: state.users.len(),
            servers: state.servers.len(),
            channels: state.channels.len(),
            members: state.members.len(),
            emojis: state.emojis.len(),
            webhooks: state.webhooks.len(),
        }
    }
}
