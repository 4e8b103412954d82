//! Diagnostic records and sinks

use parking_lot::Mutex;
use std::sync::Arc;

/// A recoverable anomaly observed by the client
///
/// None of these stop the client; they are reported and processing continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error("{event} for {id} carried both `clear` and `remove`; `remove` was dropped")]
    ConflictingClearAndRemove { event: String, id: String },

    #[error("rate-limit bucket {key}: remaining header present but reset-after missing")]
    MissingResetAfter { key: String },

    #[error("rate-limit bucket {key}: invalid {header} header value {value:?}")]
    InvalidRateLimitHeader {
        key: String,
        header: &'static str,
        value: String,
    },

    #[error("heartbeat mismatch: expected {expected}, received {received}")]
    HeartbeatMismatch { expected: u64, received: u64 },

    #[error("failed to decode {kind} event: {error}")]
    DecodeFailure { kind: String, error: String },

    #[error("unknown event type {kind}")]
    UnknownEvent { kind: String },

    #[error("unknown {entity} field {field} in clear list")]
    UnknownClearField { entity: &'static str, field: String },

    #[error("update for unknown {entity} {id}")]
    UnknownTarget { entity: &'static str, id: String },

    #[error("observer panicked while handling {event}: {message}")]
    ObserverPanicked { event: String, message: String },
}

impl Diagnostic {
    /// Anomalies point at a protocol or server problem; the rest is routine
    pub fn is_anomaly(&self) -> bool {
        !matches!(self, Self::UnknownEvent { .. } | Self::UnknownTarget { .. })
    }
}

/// Receives diagnostics from every layer of the client
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Shared handle to a sink
pub type SharedSink = Arc<dyn DiagnosticSink>;

/// Default sink: anomalies at `warn`, routine records at `debug`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        if diagnostic.is_anomaly() {
            tracing::warn!(diagnostic = %diagnostic, "Client diagnostic");
        } else {
            tracing::debug!(diagnostic = %diagnostic, "Client diagnostic");
        }
    }
}

/// Sink that records everything it receives
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every diagnostic received so far
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.lock().clone()
    }

    /// Drain the recorded diagnostics
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.records.lock())
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, diagnostic: Diagnostic) {
        self.records.lock().push(diagnostic);
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Arc<T> {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}
