//! Generic partial-update envelope
//!
//! Several gateway events share one wire shape: an identifier, a raw
//! replacement payload and a list of field names to clear. The envelope keeps
//! the payload raw until the target entity kind is known.

use super::MemberId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier carried by an update: a plain ID or a composite member ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Plain(String),
    Member(MemberId),
}

impl EntityId {
    /// Get the plain ID, if this is not a member ID
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            Self::Plain(id) => Some(id),
            Self::Member(_) => None,
        }
    }

    /// Get the member ID, if this is one
    pub fn as_member(&self) -> Option<&MemberId> {
        match self {
            Self::Plain(_) => None,
            Self::Member(id) => Some(id),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(id) => f.write_str(id),
            Self::Member(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::Plain(id.to_string())
    }
}

impl From<MemberId> for EntityId {
    fn from(id: MemberId) -> Self {
        Self::Member(id)
    }
}

/// A partial update to one entity, before it has been typed
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEnvelope {
    /// Target entity
    pub id: EntityId,
    /// Raw replacement payload (a JSON object of the fields that changed)
    pub data: Value,
    /// Field names to reset to their zero value
    pub clear: Vec<String>,
}

impl UpdateEnvelope {
    /// Create an envelope
    pub fn new(id: impl Into<EntityId>, data: Value, clear: Vec<String>) -> Self {
        Self {
            id: id.into(),
            data,
            clear,
        }
    }

    /// Decode the payload into a typed partial
    ///
    /// A missing (`null`) payload decodes as an empty object.
    pub fn decode_data<P: DeserializeOwned>(&self) -> Result<P, serde_json::Error> {
        if self.data.is_null() {
            serde_json::from_value(Value::Object(serde_json::Map::new()))
        } else {
            P::deserialize(&self.data)
        }
    }

    /// Map the clear list onto a typed field enum
    pub fn clear_fields<F: From<String>>(&self) -> Vec<F> {
        self.clear.iter().cloned().map(F::from).collect()
    }
}
