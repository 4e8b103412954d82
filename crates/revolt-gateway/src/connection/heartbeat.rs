//! Heartbeat bookkeeping
//!
//! The client pings with the number of pongs received so far; the server
//! echoes it back. A pong only counts when it echoes the current counter.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Result of matching a pong against the outstanding ping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PongOutcome {
    /// Counter matched; the ping is acknowledged
    Acked { latency: Duration },
    /// Counter did not match; nothing changed
    Mismatch { expected: u64, received: u64 },
}

#[derive(Debug, Default)]
struct HeartbeatState {
    /// Acknowledged heartbeats this session
    count: u64,
    last_sent: Option<Instant>,
    last_ack: Option<Instant>,
    /// Send time of the oldest unacknowledged ping
    pending_since: Option<Instant>,
    latency: Option<Duration>,
}

/// Heartbeat counters of the current session
#[derive(Debug)]
pub struct Heartbeat {
    interval: Duration,
    timeout: Duration,
    state: Mutex<HeartbeatState>,
}

impl Heartbeat {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval,
            timeout,
            state: Mutex::new(HeartbeatState::default()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Forget everything; called when a new session starts
    pub fn reset(&self) {
        *self.state.lock() = HeartbeatState::default();
    }

    /// Record a ping being sent and return the counter it should carry
    pub fn next_ping(&self, now: Instant) -> u64 {
        let mut state = self.state.lock();
        state.last_sent = Some(now);
        state.pending_since.get_or_insert(now);
        state.count
    }

    /// Match a pong against the counter
    pub fn on_pong(&self, received: u64, now: Instant) -> PongOutcome {
        let mut state = self.state.lock();
        if received != state.count {
            return PongOutcome::Mismatch {
                expected: state.count,
                received,
            };
        }

        let latency = state
            .last_sent
            .map_or(Duration::ZERO, |sent| now.saturating_duration_since(sent));
        state.count += 1;
        state.last_ack = Some(now);
        state.pending_since = None;
        state.latency = Some(latency);

        PongOutcome::Acked { latency }
    }

    /// Whether a ping has gone unacknowledged for longer than the timeout
    pub fn is_overdue(&self, now: Instant) -> bool {
        self.state
            .lock()
            .pending_since
            .is_some_and(|since| now.saturating_duration_since(since) >= self.timeout)
    }

    /// Round trip of the last acknowledged ping
    pub fn latency(&self) -> Option<Duration> {
        self.state.lock().latency
    }

    /// Acknowledged heartbeats this session
    pub fn count(&self) -> u64 {
        self.state.lock().count
    }

    pub fn last_ack(&self) -> Option<Instant> {
        self.state.lock().last_ack
    }

    /// Approximate session uptime, derived from the acknowledged count
    pub fn uptime(&self, now: Instant) -> Duration {
        let state = self.state.lock();
        if state.count == 0 {
            return Duration::ZERO;
        }
        let beats = u32::try_from(state.count).unwrap_or(u32::MAX);
        let since_sent = state
            .last_sent
            .map_or(Duration::ZERO, |sent| now.saturating_duration_since(sent));
        self.interval.saturating_mul(beats) + since_sent
    }
}
