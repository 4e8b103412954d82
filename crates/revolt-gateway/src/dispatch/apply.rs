//! Cache mutation per event

use revolt_cache::{CacheWriter, UpdateOutcome};
use revolt_common::{Diagnostic, DiagnosticSink};
use revolt_core::MemberId;
use std::fmt::Display;

use crate::events::Event;

fn check(
    sink: &dyn DiagnosticSink,
    entity: &'static str,
    id: &dyn Display,
    outcome: UpdateOutcome,
) -> UpdateOutcome {
    if outcome == UpdateOutcome::UnknownTarget {
        sink.report(Diagnostic::UnknownTarget {
            entity,
            id: id.to_string(),
        });
    }
    outcome
}

/// Apply the cache side of an event
///
/// Returns `None` for events that do not touch the cache. Updates and
/// removals aimed at uncached entities are reported and otherwise ignored.
pub(crate) fn apply_event(
    writer: &mut CacheWriter,
    sink: &dyn DiagnosticSink,
    event: &Event,
) -> Option<UpdateOutcome> {
    let outcome = match event {
        Event::Ready(snapshot) => {
            writer.populate(snapshot.clone());
            UpdateOutcome::Applied
        }

        // Channels
        Event::ChannelCreate(channel) => writer.insert_channel((**channel).clone()),
        Event::ChannelUpdate(update) => check(
            sink,
            "channel",
            &update.id,
            writer.update_channel(&update.id, update.data.clone(), &update.clear),
        ),
        Event::ChannelDelete(delete) => {
            check(sink, "channel", &delete.id, writer.remove_channel(&delete.id))
        }
        Event::ChannelGroupJoin(join) => check(
            sink,
            "channel",
            &join.id,
            writer.add_recipient(&join.id, &join.user),
        ),
        Event::ChannelGroupLeave(leave) => check(
            sink,
            "channel",
            &leave.id,
            writer.remove_recipient(&leave.id, &leave.user),
        ),

        // Servers
        Event::ServerCreate(create) => writer.insert_server(
            create.server.clone(),
            create.channels.clone(),
            create.emojis.clone(),
        ),
        Event::ServerUpdate(update) => check(
            sink,
            "server",
            &update.id,
            writer.update_server(&update.id, update.data.clone(), &update.clear),
        ),
        Event::ServerDelete(delete) => {
            check(sink, "server", &delete.id, writer.remove_server(&delete.id))
        }
        Event::ServerMemberUpdate(update) => check(
            sink,
            "member",
            &update.id,
            writer.update_member(&update.id, update.data.clone(), &update.clear),
        ),
        Event::ServerMemberJoin(join) => writer.insert_member(MemberId::new(&join.id, &join.user)),
        Event::ServerMemberLeave(leave) => {
            let id = MemberId::new(&leave.id, &leave.user);
            check(sink, "member", &id, writer.remove_member(&id))
        }
        Event::ServerRoleUpdate(update) => check(
            sink,
            "role",
            &update.role_id,
            writer.update_role(
                &update.server_id,
                &update.role_id,
                update.data.clone(),
                &update.clear,
            ),
        ),
        Event::ServerRoleDelete(delete) => check(
            sink,
            "role",
            &delete.role_id,
            writer.remove_role(&delete.id, &delete.role_id),
        ),
        Event::ServerRoleRanksUpdate(ranks) => check(
            sink,
            "server",
            &ranks.id,
            writer.set_role_ranks(&ranks.id, &ranks.ranks),
        ),

        // Users
        Event::UserUpdate(update) => check(
            sink,
            "user",
            &update.id,
            writer.update_user(&update.id, update.data.clone(), &update.clear),
        ),
        Event::UserPlatformWipe(wipe) => {
            check(sink, "user", &wipe.user_id, writer.remove_user(&wipe.user_id))
        }

        // Emojis and webhooks
        Event::EmojiCreate(emoji) => writer.insert_emoji(emoji.clone()),
        Event::EmojiDelete(delete) => {
            check(sink, "emoji", &delete.id, writer.remove_emoji(&delete.id))
        }
        Event::WebhookCreate(webhook) => writer.insert_webhook(webhook.clone()),
        Event::WebhookUpdate(update) => check(
            sink,
            "webhook",
            &update.id,
            writer.update_webhook(&update.id, update.data.clone(), &update.clear),
        ),
        Event::WebhookDelete(delete) => {
            check(sink, "webhook", &delete.id, writer.remove_webhook(&delete.id))
        }

        Event::Error(_)
        | Event::Bulk(_)
        | Event::Authenticated
        | Event::Pong(_)
        | Event::Message(_)
        | Event::MessageUpdate(_)
        | Event::MessageAppend(_)
        | Event::MessageDelete(_)
        | Event::BulkMessageDelete(_)
        | Event::MessageReact(_)
        | Event::MessageUnreact(_)
        | Event::MessageRemoveReaction(_)
        | Event::ChannelStartTyping(_)
        | Event::ChannelStopTyping(_)
        | Event::ChannelAck(_)
        | Event::UserRelationship(_)
        | Event::UserSettingsUpdate(_)
        | Event::Unknown { .. } => return None,
    };

    if !outcome.is_applied() {
        tracing::trace!(kind = %event.kind(), outcome = ?outcome, "Event left cache unchanged");
    }
    Some(outcome)
}
