//! # revolt-client
//!
//! Entry point for applications: one [`Client`] per account, wiring the
//! cache, the rate-limited REST transport and the gateway together.
//!
//! ```no_run
//! use revolt_client::{Client, EventKind, SendMessage};
//!
//! # async fn run() -> revolt_client::ClientResult<()> {
//! let client = Client::from_env()?;
//! client.on(EventKind::Ready, |ctx, _| {
//!     if let Some(me) = ctx.cache().current_user() {
//!         tracing::info!(user = %me.username, "Ready");
//!     }
//! });
//! client.open()?;
//! client.send_message("01H...", SendMessage::new("hello")).await?;
//! client.close().await;
//! # Ok(())
//! # }
//! ```

mod client;
pub mod error;
pub mod rest;

pub use client::Client;
pub use error::{ClientError, ClientResult};
pub use rest::{EditMessage, Reply, SendMessage};

pub use revolt_cache::Cache;
pub use revolt_common::{ClientConfig, Diagnostic, DiagnosticSink, MemorySink, SharedSink};
pub use revolt_gateway::{ConnectionState, Context, Event, EventKind};
