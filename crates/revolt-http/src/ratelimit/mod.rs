//! Per-endpoint rate limiting

mod bucket;
mod limiter;

pub use bucket::{HEADER_REMAINING, HEADER_RESET_AFTER};
pub use limiter::{bucket_key, RateLimitError, RateLimiter};
