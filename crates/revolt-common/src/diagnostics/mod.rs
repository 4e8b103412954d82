//! Diagnostic reporting
//!
//! Protocol anomalies and recoverable failures are reported to an injected
//! sink rather than logged from deep inside the pipeline.

mod sink;

pub use sink::{Diagnostic, DiagnosticSink, MemorySink, SharedSink, TracingSink};
