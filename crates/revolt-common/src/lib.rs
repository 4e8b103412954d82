//! # revolt-common
//!
//! Shared utilities including configuration, diagnostics, and telemetry.

pub mod config;
pub mod diagnostics;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{CacheConfig, ClientConfig, ConfigError, GatewayConfig, HttpConfig};
pub use diagnostics::{Diagnostic, DiagnosticSink, MemorySink, SharedSink, TracingSink};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
