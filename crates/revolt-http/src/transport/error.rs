//! Request errors

use std::time::Duration;

/// Errors from the REST transport
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Request destination is empty")]
    EmptyDestination,

    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Refusing external URL host {0:?}")]
    ExternalUrl(String),

    #[error("Timeout {0:?} outside the allowed range of 1s to 300s")]
    InvalidTimeout(Duration),

    #[error("Header {0:?} already exists")]
    HeaderExists(String),

    #[error("Invalid header {0:?}")]
    InvalidHeader(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RequestError {
    /// HTTP status of a non-success response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the server answered 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type alias for REST requests
pub type RequestResult<T> = Result<T, RequestError>;
