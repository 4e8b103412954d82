//! The single mutation path into the cache
//!
//! Only the gateway dispatch loop owns a `CacheWriter`, so writes are
//! serialised by ownership as well as by the lock.

use revolt_core::{
    Channel, ChannelField, Emoji, MemberId, PartialChannel, PartialServer, PartialServerMember,
    PartialServerRole, PartialUser, PartialWebhook, RoleField, Server, ServerField, ServerMember,
    ServerMemberField, Snapshot, UserField, Webhook, WebhookField,
};
use std::sync::Arc;

use super::{Cache, Shared, State};

/// Result of a cache mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The cache changed
    Applied,
    /// The target is not cached; nothing changed
    UnknownTarget,
    /// The entity kind is not tracked; nothing changed
    Untracked,
}

impl UpdateOutcome {
    #[inline]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }

    fn found(found: bool) -> Self {
        if found {
            Self::Applied
        } else {
            Self::UnknownTarget
        }
    }
}

/// Write handle to the local cache
#[derive(Debug)]
pub struct CacheWriter {
    inner: Arc<Shared>,
}

impl CacheWriter {
    pub(super) fn new(inner: Arc<Shared>) -> Self {
        Self { inner }
    }

    /// A reader over the same state
    pub fn reader(&self) -> Cache {
        Cache::from_shared(Arc::clone(&self.inner))
    }

    /// Replace the cache contents with a session snapshot
    ///
    /// Every tracked kind is overwritten; webhooks are not part of the
    /// snapshot and are left alone.
    pub fn populate(&mut self, snapshot: Snapshot) {
        let config = self.inner.config;
        let mut state = self.inner.state.write();

        state.current_user = snapshot.current_user().cloned();

        if config.track_users {
            state.users = snapshot.users.into_iter().map(|u| (u.id.clone(), u)).collect();
        }
        if config.track_servers {
            state.servers = snapshot.servers.into_iter().map(|s| (s.id.clone(), s)).collect();
        }
        if config.track_channels {
            state.channels = snapshot.channels.into_iter().map(|c| (c.id.clone(), c)).collect();
        }
        if config.track_members {
            state.members = snapshot.members.into_iter().map(|m| (m.id.clone(), m)).collect();
        }
        if config.track_emojis {
            state.emojis = snapshot.emojis.into_iter().map(|e| (e.id.clone(), e)).collect();
        }

        tracing::debug!(
            users = state.users.len(),
            servers = state.servers.len(),
            channels = state.channels.len(),
            members = state.members.len(),
            emojis = state.emojis.len(),
            "Cache populated from snapshot"
        );
    }

    // =========================================================================
    // Partial updates
    // =========================================================================

    pub fn update_user(&mut self, id: &str, data: PartialUser, clear: &[UserField]) -> UpdateOutcome {
        let mut guard = self.inner.state.write();
        let state = &mut *guard;

        let mut is_self = false;
        if let Some(current) = state.current_user.as_mut().filter(|u| u.id == id) {
            current.apply_update(data.clone(), clear);
            is_self = true;
        }

        if !self.inner.config.track_users {
            return if is_self {
                UpdateOutcome::Applied
            } else {
                UpdateOutcome::Untracked
            };
        }

        match state.users.get_mut(id) {
            Some(user) => {
                user.apply_update(data, clear);
                UpdateOutcome::Applied
            }
            None => UpdateOutcome::found(is_self),
        }
    }

    pub fn update_server(
        &mut self,
        id: &str,
        data: PartialServer,
        clear: &[ServerField],
    ) -> UpdateOutcome {
        if !self.inner.config.track_servers {
            return UpdateOutcome::Untracked;
        }
        let mut state = self.inner.state.write();
        state.servers.get_mut(id).map_or(UpdateOutcome::UnknownTarget, |server| {
            server.apply_update(data, clear);
            UpdateOutcome::Applied
        })
    }

    pub fn update_role(
        &mut self,
        server_id: &str,
        role_id: &str,
        data: PartialServerRole,
        clear: &[RoleField],
    ) -> UpdateOutcome {
        if !self.inner.config.track_servers {
            return UpdateOutcome::Untracked;
        }
        let mut state = self.inner.state.write();
        let role = state
            .servers
            .get_mut(server_id)
            .and_then(|server| server.roles.get_mut(role_id));

        role.map_or(UpdateOutcome::UnknownTarget, |role| {
            role.apply_update(data, clear);
            UpdateOutcome::Applied
        })
    }

    /// Rewrite the rank of each role from its position in `ranks`
    pub fn set_role_ranks(&mut self, server_id: &str, ranks: &[String]) -> UpdateOutcome {
        if !self.inner.config.track_servers {
            return UpdateOutcome::Untracked;
        }
        let mut state = self.inner.state.write();
        state.servers.get_mut(server_id).map_or(UpdateOutcome::UnknownTarget, |server| {
            server.set_role_ranks(ranks);
            UpdateOutcome::Applied
        })
    }

    pub fn update_channel(
        &mut self,
        id: &str,
        data: PartialChannel,
        clear: &[ChannelField],
    ) -> UpdateOutcome {
        if !self.inner.config.track_channels {
            return UpdateOutcome::Untracked;
        }
        let mut state = self.inner.state.write();
        state.channels.get_mut(id).map_or(UpdateOutcome::UnknownTarget, |channel| {
            channel.apply_update(data, clear);
            UpdateOutcome::Applied
        })
    }

    pub fn update_member(
        &mut self,
        id: &MemberId,
        data: PartialServerMember,
        clear: &[ServerMemberField],
    ) -> UpdateOutcome {
        if !self.inner.config.track_members {
            return UpdateOutcome::Untracked;
        }
        let mut state = self.inner.state.write();
        state.members.get_mut(id).map_or(UpdateOutcome::UnknownTarget, |member| {
            member.apply_update(data, clear);
            UpdateOutcome::Applied
        })
    }

    pub fn update_webhook(
        &mut self,
        id: &str,
        data: PartialWebhook,
        clear: &[WebhookField],
    ) -> UpdateOutcome {
        if !self.inner.config.track_webhooks {
            return UpdateOutcome::Untracked;
        }
        let mut state = self.inner.state.write();
        state.webhooks.get_mut(id).map_or(UpdateOutcome::UnknownTarget, |webhook| {
            webhook.apply_update(data, clear);
            UpdateOutcome::Applied
        })
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Insert a new server together with the channels and emojis it came with
    pub fn insert_server(
        &mut self,
        server: Server,
        channels: Vec<Channel>,
        emojis: Vec<Emoji>,
    ) -> UpdateOutcome {
        let config = self.inner.config;
        if !config.track_servers {
            return UpdateOutcome::Untracked;
        }
        let mut state = self.inner.state.write();

        if config.track_channels {
            state.channels.extend(channels.into_iter().map(|c| (c.id.clone(), c)));
        }
        if config.track_emojis {
            state.emojis.extend(emojis.into_iter().map(|e| (e.id.clone(), e)));
        }
        state.servers.insert(server.id.clone(), server);
        UpdateOutcome::Applied
    }

    /// Insert a new channel, appending it to its server's channel list
    pub fn insert_channel(&mut self, channel: Channel) -> UpdateOutcome {
        if !self.inner.config.track_channels {
            return UpdateOutcome::Untracked;
        }
        let mut guard = self.inner.state.write();
        let state = &mut *guard;

        if let Some(server_id) = channel.server.as_deref() {
            match state.servers.get_mut(server_id) {
                Some(server) => server.add_channel(&channel.id),
                None => tracing::debug!(
                    channel_id = %channel.id,
                    server_id = %server_id,
                    "Channel created in uncached server"
                ),
            }
        }
        state.channels.insert(channel.id.clone(), channel);
        UpdateOutcome::Applied
    }

    /// Insert a bare member for a join; an existing entry is kept
    pub fn insert_member(&mut self, id: MemberId) -> UpdateOutcome {
        if !self.inner.config.track_members {
            return UpdateOutcome::Untracked;
        }
        let mut state = self.inner.state.write();
        state
            .members
            .entry(id.clone())
            .or_insert_with(|| ServerMember::new(id));
        UpdateOutcome::Applied
    }

    pub fn insert_emoji(&mut self, emoji: Emoji) -> UpdateOutcome {
        if !self.inner.config.track_emojis {
            return UpdateOutcome::Untracked;
        }
        self.inner.state.write().emojis.insert(emoji.id.clone(), emoji);
        UpdateOutcome::Applied
    }

    pub fn insert_webhook(&mut self, webhook: Webhook) -> UpdateOutcome {
        if !self.inner.config.track_webhooks {
            return UpdateOutcome::Untracked;
        }
        self.inner.state.write().webhooks.insert(webhook.id.clone(), webhook);
        UpdateOutcome::Applied
    }

    /// Add a user to a group's recipients
    pub fn add_recipient(&mut self, channel_id: &str, user_id: &str) -> UpdateOutcome {
        if !self.inner.config.track_channels {
            return UpdateOutcome::Untracked;
        }
        let mut state = self.inner.state.write();
        state.channels.get_mut(channel_id).map_or(UpdateOutcome::UnknownTarget, |channel| {
            if !channel.recipients.iter().any(|id| id == user_id) {
                channel.recipients.push(user_id.to_string());
            }
            UpdateOutcome::Applied
        })
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Remove a server along with its cached channels and members
    pub fn remove_server(&mut self, id: &str) -> UpdateOutcome {
        if !self.inner.config.track_servers {
            return UpdateOutcome::Untracked;
        }
        let mut state = self.inner.state.write();
        UpdateOutcome::found(remove_server_locked(&mut state, id))
    }

    /// Remove a channel and drop it from its server's channel list
    pub fn remove_channel(&mut self, id: &str) -> UpdateOutcome {
        if !self.inner.config.track_channels {
            return UpdateOutcome::Untracked;
        }
        let mut guard = self.inner.state.write();
        let state = &mut *guard;

        let removed = state.channels.remove(id);
        match removed.as_ref().and_then(|c| c.server.as_deref()) {
            Some(server_id) => {
                if let Some(server) = state.servers.get_mut(server_id) {
                    server.remove_channel(id);
                }
            }
            // Channel was not cached; its server may still list it
            None => {
                for server in state.servers.values_mut() {
                    if server.remove_channel(id) {
                        break;
                    }
                }
            }
        }
        UpdateOutcome::found(removed.is_some())
    }

    /// Remove a member; when the current user leaves, the server goes too
    pub fn remove_member(&mut self, id: &MemberId) -> UpdateOutcome {
        let mut guard = self.inner.state.write();
        let state = &mut *guard;

        let left_self = state.current_user.as_ref().is_some_and(|u| u.id == id.user);
        if left_self {
            tracing::debug!(server_id = %id.server, "Current user left server");
            remove_server_locked(state, &id.server);
        }

        if !self.inner.config.track_members {
            return if left_self {
                UpdateOutcome::Applied
            } else {
                UpdateOutcome::Untracked
            };
        }
        UpdateOutcome::found(state.members.remove(id).is_some() || left_self)
    }

    /// Remove a user from a group's recipients; the group goes when the current user leaves
    pub fn remove_recipient(&mut self, channel_id: &str, user_id: &str) -> UpdateOutcome {
        if !self.inner.config.track_channels {
            return UpdateOutcome::Untracked;
        }
        let mut guard = self.inner.state.write();
        let state = &mut *guard;

        if state.current_user.as_ref().is_some_and(|u| u.id == user_id) {
            return UpdateOutcome::found(state.channels.remove(channel_id).is_some());
        }
        state.channels.get_mut(channel_id).map_or(UpdateOutcome::UnknownTarget, |channel| {
            channel.recipients.retain(|id| id != user_id);
            UpdateOutcome::Applied
        })
    }

    pub fn remove_role(&mut self, server_id: &str, role_id: &str) -> UpdateOutcome {
        if !self.inner.config.track_servers {
            return UpdateOutcome::Untracked;
        }
        let mut state = self.inner.state.write();
        let removed = state
            .servers
            .get_mut(server_id)
            .and_then(|server| server.roles.remove(role_id));
        UpdateOutcome::found(removed.is_some())
    }

    pub fn remove_emoji(&mut self, id: &str) -> UpdateOutcome {
        if !self.inner.config.track_emojis {
            return UpdateOutcome::Untracked;
        }
        UpdateOutcome::found(self.inner.state.write().emojis.remove(id).is_some())
    }

    pub fn remove_webhook(&mut self, id: &str) -> UpdateOutcome {
        if !self.inner.config.track_webhooks {
            return UpdateOutcome::Untracked;
        }
        UpdateOutcome::found(self.inner.state.write().webhooks.remove(id).is_some())
    }

    /// Remove a wiped user
    pub fn remove_user(&mut self, id: &str) -> UpdateOutcome {
        if !self.inner.config.track_users {
            return UpdateOutcome::Untracked;
        }
        UpdateOutcome::found(self.inner.state.write().users.remove(id).is_some())
    }
}

fn remove_server_locked(state: &mut State, id: &str) -> bool {
    let Some(server) = state.servers.remove(id) else {
        return false;
    };
    for channel_id in &server.channels {
        state.channels.remove(channel_id);
    }
    state.members.retain(|member_id, _| member_id.server != id);
    true
}
