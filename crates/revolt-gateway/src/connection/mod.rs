//! Connection lifecycle
//!
//! - `ConnectionState`: the public state machine
//! - `Heartbeat`: ping counter and ack tracking
//! - `GatewaySender`: outbound queue of the current session
//! - `Gateway`: connect, authenticate, reconnect

mod heartbeat;
mod manager;
mod sender;
mod state;

pub use heartbeat::{Heartbeat, PongOutcome};
pub use manager::Gateway;
pub use sender::GatewaySender;
pub use state::ConnectionState;
