//! # revolt-http
//!
//! Rate-limit-aware REST transport.
//!
//! ## Features
//!
//! - **Rate limiter**: per-endpoint buckets fed by the server's quota headers
//! - **Transport**: authenticated JSON requests that wait on their bucket first
//! - **URL guard**: absolute URLs are only followed to the API and CDN hosts

pub mod ratelimit;
pub mod transport;

// Re-export commonly used types at crate root
pub use ratelimit::{
    bucket_key, RateLimitError, RateLimiter, HEADER_REMAINING, HEADER_RESET_AFTER,
};
pub use transport::{Credentials, HttpClient, RequestError, RequestResult, MAX_ERROR_BODY};

pub use reqwest::{header::HeaderMap, Method, StatusCode, Url};
