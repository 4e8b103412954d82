//! Client error types

use revolt_common::ConfigError;
use revolt_gateway::GatewayError;
use revolt_http::RequestError;
use thiserror::Error;

/// Top-level error returned by [`crate::Client`]
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl ClientError {
    /// HTTP status of a failed REST call
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(err) => err.status(),
            _ => None,
        }
    }

    /// Check if a REST call answered 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
