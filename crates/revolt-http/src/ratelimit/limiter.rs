//! Rate limiter over all endpoint buckets
//!
//! The bucket map sits behind a read-write lock: buckets are created once per
//! endpoint and read on every request. Each bucket has its own mutex because
//! it is written on every response.

use parking_lot::{Mutex, RwLock};
use reqwest::header::HeaderMap;
use reqwest::Method;
use revolt_common::Diagnostic;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::bucket::{Bucket, HEADER_REMAINING, HEADER_RESET_AFTER};

/// Errors from interpreting quota headers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    #[error("bucket {key}: X-RateLimit-Remaining present but X-RateLimit-Reset-After missing")]
    MissingResetAfter { key: String },

    #[error("bucket {key}: invalid {header} header {value:?}")]
    InvalidHeader {
        key: String,
        header: &'static str,
        value: String,
    },
}

impl RateLimitError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::MissingResetAfter { key } => Diagnostic::MissingResetAfter { key: key.clone() },
            Self::InvalidHeader { key, header, value } => Diagnostic::InvalidRateLimitHeader {
                key: key.clone(),
                header: *header,
                value: value.clone(),
            },
        }
    }
}

/// Bucket key for a request: `METHOD:path` with any query string removed
pub fn bucket_key(method: &Method, path: &str) -> String {
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    format!("{method}:{path}")
}

/// Per-endpoint rate limiter
#[derive(Debug, Default)]
pub struct RateLimiter {
    buckets: RwLock<HashMap<String, Mutex<Bucket>>>,
    shutdown: CancellationToken,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// How long a request to `path` must wait before it may be sent
    pub fn acquire(&self, method: &Method, path: &str) -> Duration {
        self.acquire_at(&bucket_key(method, path), Instant::now())
    }

    /// Feed the quota headers of a response into its bucket
    ///
    /// Responses without `X-RateLimit-Remaining` leave the bucket alone.
    pub fn observe(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<(), RateLimitError> {
        let key = bucket_key(method, path);
        let Some((remaining, reset_after)) = parse_headers(&key, headers)? else {
            return Ok(());
        };
        self.update_at(&key, remaining, reset_after, Instant::now());
        Ok(())
    }

    /// Evict expired buckets now, returning how many were removed
    pub fn sweep_now(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn len(&self) -> usize {
        self.buckets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.read().is_empty()
    }

    /// Start the periodic sweep
    ///
    /// The task holds only a weak reference and stops when the limiter is
    /// dropped or [`RateLimiter::shutdown`] is called.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let limiter = Arc::downgrade(self);
        let shutdown = self.shutdown.clone();
        tokio::spawn(sweep_loop(limiter, interval, shutdown))
    }

    /// Stop the background sweep
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    fn acquire_at(&self, key: &str, now: Instant) -> Duration {
        self.with_bucket(key, |bucket| bucket.delay(now))
    }

    fn update_at(&self, key: &str, remaining: i64, reset_after: Duration, now: Instant) {
        self.with_bucket(key, |bucket| bucket.update(remaining, reset_after, now));
    }

    /// Run `f` on the bucket for `key`, creating it on first use
    ///
    /// `f` runs while the map lock is held (shared or exclusive), so a
    /// concurrent sweep can never evict the bucket underneath it.
    fn with_bucket<R>(&self, key: &str, f: impl FnOnce(&mut Bucket) -> R) -> R {
        {
            let buckets = self.buckets.read();
            if let Some(bucket) = buckets.get(key) {
                return f(&mut *bucket.lock());
            }
        }

        // Double-checked: another caller may have created it meanwhile
        let mut buckets = self.buckets.write();
        let bucket = buckets.entry(key.to_string()).or_default();
        f(bucket.get_mut())
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let mut buckets = self.buckets.write();
        let before = buckets.len();
        buckets.retain(|_, bucket| !bucket.get_mut().is_expired(now));
        before - buckets.len()
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn sweep_loop(limiter: Weak<RateLimiter>, interval: Duration, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                let Some(limiter) = limiter.upgrade() else {
                    break;
                };
                let evicted = limiter.sweep_now();
                if evicted > 0 {
                    tracing::debug!(evicted, remaining = limiter.len(), "Swept rate-limit buckets");
                }
            }
        }
    }

    tracing::debug!("Rate-limit sweeper stopped");
}

fn parse_headers(
    key: &str,
    headers: &HeaderMap,
) -> Result<Option<(i64, Duration)>, RateLimitError> {
    let Some(remaining) = headers.get(HEADER_REMAINING) else {
        return Ok(None);
    };
    let Some(reset_after) = headers.get(HEADER_RESET_AFTER) else {
        return Err(RateLimitError::MissingResetAfter {
            key: key.to_string(),
        });
    };

    let invalid = |header: &'static str, value: &reqwest::header::HeaderValue| {
        RateLimitError::InvalidHeader {
            key: key.to_string(),
            header,
            value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        }
    };

    let remaining_value: i64 = remaining
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| invalid(HEADER_REMAINING, remaining))?;
    let reset_after_ms: u64 = reset_after
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| invalid(HEADER_RESET_AFTER, reset_after))?;

    Ok(Some((remaining_value, Duration::from_millis(reset_after_ms))))
}
