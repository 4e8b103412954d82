//! Gateway error types

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Gateway error type
#[derive(Debug, Error)]
pub enum GatewayError {
    /// `open()` was called on a gateway that is already running
    #[error("Gateway is already open")]
    AlreadyOpen,

    /// The gateway was closed and cannot be reopened
    #[error("Gateway is closed")]
    Closed,

    /// `open()` was called outside a Tokio runtime
    #[error("Gateway requires a Tokio runtime")]
    NoRuntime,

    /// No session is currently established
    #[error("Gateway is not connected")]
    NotConnected,

    /// The outbound queue is full
    #[error("Gateway outbound queue is full")]
    Backpressure,

    /// Socket-level failure
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),

    /// Outbound message could not be serialized
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<tungstenite::Error> for GatewayError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
