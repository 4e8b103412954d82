//! Partial-update events
//!
//! Every `*Update` event shares one wire shape, [`AbstractUpdate`]. It is
//! normalised once (the legacy `remove` list folded into `clear`) and then
//! projected onto the typed payload of the entity named by the discriminator.

use revolt_common::{Diagnostic, DiagnosticSink};
use revolt_core::{
    ChannelField, ClearField, EntityId, MemberId, MessageField, PartialChannel, PartialMessage,
    PartialServer, PartialServerMember, PartialServerRole, PartialUser, PartialWebhook, RoleField,
    ServerField, ServerMemberField, UpdateEnvelope, UserField, WebhookField,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DecodeError, EventKind};

/// Raw shape shared by every update event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractUpdate {
    pub id: EntityId,
    /// Only on `ServerRoleUpdate`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    /// Only on `MessageUpdate`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub clear: Vec<String>,
    /// Older servers send the clear list under this name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<String>,
}

impl AbstractUpdate {
    /// Fold the legacy `remove` list into `clear`
    ///
    /// When both lists are populated the update is ambiguous: the conflict is
    /// reported and `clear` wins.
    pub fn normalize(&mut self, kind: EventKind, sink: &dyn DiagnosticSink) {
        if self.remove.is_empty() {
            return;
        }
        if self.clear.is_empty() {
            self.clear = std::mem::take(&mut self.remove);
        } else {
            sink.report(Diagnostic::ConflictingClearAndRemove {
                event: kind.to_string(),
                id: self.id.to_string(),
            });
            self.remove.clear();
        }
    }

    /// Split into the generic envelope plus the optional side identifiers
    fn into_parts(self) -> (UpdateEnvelope, Option<String>, Option<String>) {
        let envelope = UpdateEnvelope::new(self.id, self.data, self.clear);
        (envelope, self.role_id, self.channel)
    }
}

/// Typed partial update of one entity
#[derive(Debug, Clone, PartialEq)]
pub struct Update<I, P, F> {
    pub id: I,
    pub data: P,
    pub clear: Vec<F>,
}

pub type ServerUpdate = Update<String, PartialServer, ServerField>;
pub type ChannelUpdate = Update<String, PartialChannel, ChannelField>;
pub type UserUpdate = Update<String, PartialUser, UserField>;
pub type WebhookUpdate = Update<String, PartialWebhook, WebhookField>;
pub type ServerMemberUpdate = Update<MemberId, PartialServerMember, ServerMemberField>;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerRoleUpdate {
    pub server_id: String,
    pub role_id: String,
    pub data: PartialServerRole,
    pub clear: Vec<RoleField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageUpdate {
    pub id: String,
    pub channel: String,
    pub data: PartialMessage,
    pub clear: Vec<MessageField>,
}

/// Typed payload and clear list of an envelope
///
/// Unrecognised clear fields are reported and dropped.
fn project<P, F>(
    envelope: &UpdateEnvelope,
    kind: EventKind,
    sink: &dyn DiagnosticSink,
) -> Result<(P, Vec<F>), DecodeError>
where
    P: DeserializeOwned,
    F: ClearField,
{
    let data = envelope
        .decode_data::<P>()
        .map_err(|source| DecodeError::Payload { kind, source })?;

    let mut clear: Vec<F> = envelope.clear_fields();
    clear.retain(|field| {
        if field.is_unknown() {
            sink.report(Diagnostic::UnknownClearField {
                entity: F::ENTITY,
                field: field.name().to_string(),
            });
        }
        !field.is_unknown()
    });

    Ok((data, clear))
}

fn plain_id(id: EntityId, kind: EventKind) -> Result<String, DecodeError> {
    match id {
        EntityId::Plain(id) => Ok(id),
        EntityId::Member(id) => Err(DecodeError::InvalidId {
            kind,
            id: id.to_string(),
        }),
    }
}

/// Project an update addressed by a plain ID
pub(crate) fn plain_update<P, F>(
    raw: AbstractUpdate,
    kind: EventKind,
    sink: &dyn DiagnosticSink,
) -> Result<Update<String, P, F>, DecodeError>
where
    P: DeserializeOwned,
    F: ClearField,
{
    let (envelope, _, _) = raw.into_parts();
    let (data, clear) = project(&envelope, kind, sink)?;
    Ok(Update {
        id: plain_id(envelope.id, kind)?,
        data,
        clear,
    })
}

pub(crate) fn member_update(
    raw: AbstractUpdate,
    kind: EventKind,
    sink: &dyn DiagnosticSink,
) -> Result<ServerMemberUpdate, DecodeError> {
    let (envelope, _, _) = raw.into_parts();
    let (data, clear) = project(&envelope, kind, sink)?;
    let id = match envelope.id {
        EntityId::Member(id) => id,
        EntityId::Plain(id) => return Err(DecodeError::InvalidId { kind, id }),
    };
    Ok(Update { id, data, clear })
}

pub(crate) fn role_update(
    raw: AbstractUpdate,
    kind: EventKind,
    sink: &dyn DiagnosticSink,
) -> Result<ServerRoleUpdate, DecodeError> {
    let (envelope, role_id, _) = raw.into_parts();
    let role_id = role_id.ok_or(DecodeError::MissingField {
        kind,
        field: "role_id",
    })?;
    let (data, clear) = project(&envelope, kind, sink)?;
    Ok(ServerRoleUpdate {
        server_id: plain_id(envelope.id, kind)?,
        role_id,
        data,
        clear,
    })
}

pub(crate) fn message_update(
    raw: AbstractUpdate,
    kind: EventKind,
    sink: &dyn DiagnosticSink,
) -> Result<MessageUpdate, DecodeError> {
    let (envelope, _, channel) = raw.into_parts();
    let channel = channel.ok_or(DecodeError::MissingField {
        kind,
        field: "channel",
    })?;
    let (data, clear) = project(&envelope, kind, sink)?;
    Ok(MessageUpdate {
        id: plain_id(envelope.id, kind)?,
        channel,
        data,
        clear,
    })
}
