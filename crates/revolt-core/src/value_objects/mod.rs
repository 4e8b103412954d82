//! Value objects - identifiers and update primitives shared by all entities

mod envelope;
mod member_id;
mod partial_field;

pub use envelope::{EntityId, UpdateEnvelope};
pub use member_id::{MemberId, MemberIdParseError};
pub use partial_field::PartialField;
