//! # revolt-gateway
//!
//! WebSocket gateway client: decodes server events, keeps the cache in
//! step with them and notifies observers.

pub mod connection;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod protocol;

pub use connection::{ConnectionState, Gateway, GatewaySender};
pub use dispatch::{Context, Dispatcher, Observer, Observers};
pub use error::{GatewayError, GatewayResult};
pub use events::{DecodeError, Decoder, Event, EventKind};
pub use protocol::ClientMessage;
