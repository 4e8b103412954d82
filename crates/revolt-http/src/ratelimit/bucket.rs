//! Rate-limit bucket for one endpoint

use std::time::{Duration, Instant};

/// Requests left in the current window
pub const HEADER_REMAINING: &str = "X-RateLimit-Remaining";
/// Milliseconds until the window resets
pub const HEADER_RESET_AFTER: &str = "X-RateLimit-Reset-After";

/// Quota state of one (method, path) pair
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct Bucket {
    pub remaining: i64,
    /// `None` until a response carried quota headers
    pub reset_at: Option<Instant>,
}

impl Bucket {
    /// Time to wait before the next request may go out
    pub fn delay(&self, now: Instant) -> Duration {
        if self.remaining > 0 {
            return Duration::ZERO;
        }
        self.reset_at
            .map_or(Duration::ZERO, |reset_at| reset_at.saturating_duration_since(now))
    }

    pub fn update(&mut self, remaining: i64, reset_after: Duration, now: Instant) {
        self.remaining = remaining;
        self.reset_at = Some(now + reset_after);
    }

    /// A bucket is stale once its window reset, or if it never had one
    pub fn is_expired(&self, now: Instant) -> bool {
        self.reset_at.is_none_or(|reset_at| now >= reset_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_bucket_never_waits() {
        let bucket = Bucket::default();
        assert_eq!(bucket.delay(Instant::now()), Duration::ZERO);
        assert!(bucket.is_expired(Instant::now()));
    }

    #[test]
    fn test_exhausted_bucket_waits_until_reset() {
        let now = Instant::now();
        let mut bucket = Bucket::default();
        bucket.update(0, Duration::from_millis(1500), now);

        assert_eq!(bucket.delay(now), Duration::from_millis(1500));
        assert_eq!(bucket.delay(now + Duration::from_millis(500)), Duration::from_millis(1000));
        assert_eq!(bucket.delay(now + Duration::from_secs(2)), Duration::ZERO);
        assert!(!bucket.is_expired(now));
        assert!(bucket.is_expired(now + Duration::from_secs(2)));
    }

    #[test]
    fn test_remaining_quota_means_no_wait() {
        let now = Instant::now();
        let mut bucket = Bucket::default();
        bucket.update(3, Duration::from_secs(10), now);
        assert_eq!(bucket.delay(now), Duration::ZERO);
    }

    #[test]
    fn test_negative_remaining_counts_as_exhausted() {
        let now = Instant::now();
        let mut bucket = Bucket::default();
        bucket.update(-1, Duration::from_secs(1), now);
        assert_eq!(bucket.delay(now), Duration::from_secs(1));
    }
}
