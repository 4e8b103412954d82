//! Authenticated REST transport

mod client;
mod credentials;
mod error;

pub use client::{HttpClient, MAX_ERROR_BODY};
pub use credentials::Credentials;
pub use error::{RequestError, RequestResult};
