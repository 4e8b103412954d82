//! Event decoder
//!
//! Frames are classified by their `type` field through a fixed table from
//! discriminator to constructor. Anything not in the table becomes
//! [`Event::Unknown`].

use revolt_common::{Diagnostic, DiagnosticSink, SharedSink};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

use super::updates::{self, AbstractUpdate};
use super::{Event, EventKind};

/// Failure to decode one frame
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Frame is not JSON
    #[error("frame is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// Frame has no string `type` field
    #[error("frame has no `type` discriminator")]
    MissingType,

    /// Payload does not match the shape of its event kind
    #[error("failed to decode {kind} payload: {source}")]
    Payload {
        kind: EventKind,
        #[source]
        source: serde_json::Error,
    },

    /// Update addressed with the wrong kind of identifier
    #[error("{kind} event has an invalid id {id}")]
    InvalidId { kind: EventKind, id: String },

    #[error("{kind} event is missing `{field}`")]
    MissingField {
        kind: EventKind,
        field: &'static str,
    },
}

impl DecodeError {
    /// Kind of the event that failed, when the discriminator was readable
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            Self::Json(_) | Self::MissingType => None,
            Self::Payload { kind, .. }
            | Self::InvalidId { kind, .. }
            | Self::MissingField { kind, .. } => Some(*kind),
        }
    }

    fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::DecodeFailure {
            kind: self
                .kind()
                .map_or_else(|| "frame".to_string(), |kind| kind.to_string()),
            error: self.to_string(),
        }
    }
}

type DecodeFn = fn(&Decoder, &Value) -> Result<Event, DecodeError>;

static DECODERS: LazyLock<HashMap<&'static str, DecodeFn>> = LazyLock::new(build_table);

fn payload<T: DeserializeOwned>(kind: EventKind, value: &Value) -> Result<T, DecodeError> {
    T::deserialize(value).map_err(|source| DecodeError::Payload { kind, source })
}

/// Turns raw frames into typed events
#[derive(Clone)]
pub struct Decoder {
    sink: SharedSink,
}

impl Decoder {
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }

    fn sink(&self) -> &dyn DiagnosticSink {
        self.sink.as_ref()
    }

    /// Classify one frame (text or binary, both JSON)
    pub fn classify(&self, raw: &[u8]) -> Result<Event, DecodeError> {
        let value: Value = serde_json::from_slice(raw).map_err(DecodeError::Json)?;
        self.classify_value(&value)
    }

    /// Classify an already-parsed frame
    pub fn classify_value(&self, value: &Value) -> Result<Event, DecodeError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(DecodeError::MissingType)?;

        match DECODERS.get(kind) {
            Some(decode) => decode(self, value),
            None => {
                self.sink.report(Diagnostic::UnknownEvent {
                    kind: kind.to_string(),
                });
                Ok(Event::Unknown {
                    kind: kind.to_string(),
                    raw: value.clone(),
                })
            }
        }
    }

    /// Classify a frame, reporting and dropping it on failure
    pub fn decode(&self, raw: &[u8]) -> Option<Event> {
        match self.classify(raw) {
            Ok(event) => Some(event),
            Err(error) => {
                self.sink.report(error.to_diagnostic());
                None
            }
        }
    }

    fn update(&self, kind: EventKind, value: &Value) -> Result<AbstractUpdate, DecodeError> {
        let mut raw: AbstractUpdate = payload(kind, value)?;
        raw.normalize(kind, self.sink());
        Ok(raw)
    }

    /// Each sub-event is classified on its own; one that fails is kept as
    /// `Unknown` so the rest of the batch survives.
    fn bulk(&self, value: &Value) -> Result<Event, DecodeError> {
        let items = value
            .get("v")
            .and_then(Value::as_array)
            .ok_or(DecodeError::MissingField {
                kind: EventKind::Bulk,
                field: "v",
            })?;

        let events = items
            .iter()
            .map(|item| {
                self.classify_value(item).unwrap_or_else(|error| {
                    self.sink.report(error.to_diagnostic());
                    Event::Unknown {
                        kind: item
                            .get("type")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        raw: item.clone(),
                    }
                })
            })
            .collect();

        Ok(Event::Bulk(events))
    }
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("kinds", &DECODERS.len())
            .finish()
    }
}

fn register(table: &mut HashMap<&'static str, DecodeFn>, kind: EventKind, decode: DecodeFn) {
    table.insert(kind.as_str(), decode);
}

fn build_table() -> HashMap<&'static str, DecodeFn> {
    use EventKind as K;

    let mut table: HashMap<&'static str, DecodeFn> = HashMap::with_capacity(K::ALL.len());
    let t = &mut table;

    // Connection
    register(t, K::Error, |_, v| payload(K::Error, v).map(Event::Error));
    register(t, K::Bulk, |d, v| d.bulk(v));
    register(t, K::Authenticated, |_, _| Ok(Event::Authenticated));
    register(t, K::Ready, |_, v| payload(K::Ready, v).map(Event::Ready));
    register(t, K::Pong, |_, v| payload(K::Pong, v).map(Event::Pong));

    // Messages
    register(t, K::Message, |_, v| {
        payload(K::Message, v).map(|message| Event::Message(Box::new(message)))
    });
    register(t, K::MessageUpdate, |d, v| {
        let raw = d.update(K::MessageUpdate, v)?;
        updates::message_update(raw, K::MessageUpdate, d.sink()).map(Event::MessageUpdate)
    });
    register(t, K::MessageAppend, |_, v| {
        payload(K::MessageAppend, v).map(Event::MessageAppend)
    });
    register(t, K::MessageDelete, |_, v| {
        payload(K::MessageDelete, v).map(Event::MessageDelete)
    });
    register(t, K::BulkMessageDelete, |_, v| {
        payload(K::BulkMessageDelete, v).map(Event::BulkMessageDelete)
    });
    register(t, K::MessageReact, |_, v| {
        payload(K::MessageReact, v).map(Event::MessageReact)
    });
    register(t, K::MessageUnreact, |_, v| {
        payload(K::MessageUnreact, v).map(Event::MessageUnreact)
    });
    register(t, K::MessageRemoveReaction, |_, v| {
        payload(K::MessageRemoveReaction, v).map(Event::MessageRemoveReaction)
    });

    // Channels
    register(t, K::ChannelCreate, |_, v| {
        payload(K::ChannelCreate, v).map(|channel| Event::ChannelCreate(Box::new(channel)))
    });
    register(t, K::ChannelUpdate, |d, v| {
        let raw = d.update(K::ChannelUpdate, v)?;
        updates::plain_update(raw, K::ChannelUpdate, d.sink()).map(Event::ChannelUpdate)
    });
    register(t, K::ChannelDelete, |_, v| {
        payload(K::ChannelDelete, v).map(Event::ChannelDelete)
    });
    register(t, K::ChannelGroupJoin, |_, v| {
        payload(K::ChannelGroupJoin, v).map(Event::ChannelGroupJoin)
    });
    register(t, K::ChannelGroupLeave, |_, v| {
        payload(K::ChannelGroupLeave, v).map(Event::ChannelGroupLeave)
    });
    register(t, K::ChannelStartTyping, |_, v| {
        payload(K::ChannelStartTyping, v).map(Event::ChannelStartTyping)
    });
    register(t, K::ChannelStopTyping, |_, v| {
        payload(K::ChannelStopTyping, v).map(Event::ChannelStopTyping)
    });
    register(t, K::ChannelAck, |_, v| payload(K::ChannelAck, v).map(Event::ChannelAck));

    // Servers
    register(t, K::ServerCreate, |_, v| {
        payload(K::ServerCreate, v).map(|create| Event::ServerCreate(Box::new(create)))
    });
    register(t, K::ServerUpdate, |d, v| {
        let raw = d.update(K::ServerUpdate, v)?;
        updates::plain_update(raw, K::ServerUpdate, d.sink()).map(Event::ServerUpdate)
    });
    register(t, K::ServerDelete, |_, v| {
        payload(K::ServerDelete, v).map(Event::ServerDelete)
    });
    register(t, K::ServerMemberUpdate, |d, v| {
        let raw = d.update(K::ServerMemberUpdate, v)?;
        updates::member_update(raw, K::ServerMemberUpdate, d.sink()).map(Event::ServerMemberUpdate)
    });
    register(t, K::ServerMemberJoin, |_, v| {
        payload(K::ServerMemberJoin, v).map(Event::ServerMemberJoin)
    });
    register(t, K::ServerMemberLeave, |_, v| {
        payload(K::ServerMemberLeave, v).map(Event::ServerMemberLeave)
    });
    register(t, K::ServerRoleUpdate, |d, v| {
        let raw = d.update(K::ServerRoleUpdate, v)?;
        updates::role_update(raw, K::ServerRoleUpdate, d.sink()).map(Event::ServerRoleUpdate)
    });
    register(t, K::ServerRoleDelete, |_, v| {
        payload(K::ServerRoleDelete, v).map(Event::ServerRoleDelete)
    });
    register(t, K::ServerRoleRanksUpdate, |_, v| {
        payload(K::ServerRoleRanksUpdate, v).map(Event::ServerRoleRanksUpdate)
    });

    // Users
    register(t, K::UserUpdate, |d, v| {
        let raw = d.update(K::UserUpdate, v)?;
        updates::plain_update(raw, K::UserUpdate, d.sink()).map(Event::UserUpdate)
    });
    register(t, K::UserRelationship, |_, v| {
        payload(K::UserRelationship, v).map(|rel| Event::UserRelationship(Box::new(rel)))
    });
    register(t, K::UserSettingsUpdate, |_, v| {
        payload(K::UserSettingsUpdate, v).map(Event::UserSettingsUpdate)
    });
    register(t, K::UserPlatformWipe, |_, v| {
        payload(K::UserPlatformWipe, v).map(Event::UserPlatformWipe)
    });

    // Emojis and webhooks
    register(t, K::EmojiCreate, |_, v| payload(K::EmojiCreate, v).map(Event::EmojiCreate));
    register(t, K::EmojiDelete, |_, v| payload(K::EmojiDelete, v).map(Event::EmojiDelete));
    register(t, K::WebhookCreate, |_, v| {
        payload(K::WebhookCreate, v).map(Event::WebhookCreate)
    });
    register(t, K::WebhookUpdate, |d, v| {
        let raw = d.update(K::WebhookUpdate, v)?;
        updates::plain_update(raw, K::WebhookUpdate, d.sink()).map(Event::WebhookUpdate)
    });
    register(t, K::WebhookDelete, |_, v| {
        payload(K::WebhookDelete, v).map(Event::WebhookDelete)
    });

    table
}
