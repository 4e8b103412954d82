//! Gateway protocol definitions
//!
//! Outbound control messages sent by the client.

mod messages;

pub use messages::ClientMessage;
