//! # revolt-cache
//!
//! In-memory state for one client, seeded by the session snapshot and kept
//! current by gateway events.
//!
//! ## Features
//!
//! - **Reader**: cheap-to-clone [`Cache`] handle; every accessor returns a clone
//! - **Writer**: a single [`CacheWriter`], owned by the event dispatch loop
//! - **Tracking**: per-kind switches from [`revolt_common::CacheConfig`]
//!
//! ## Example
//!
//! ```ignore
//! use revolt_cache::Cache;
//! use revolt_common::CacheConfig;
//!
//! let (cache, mut writer) = Cache::new(CacheConfig::default());
//! writer.populate(snapshot);
//!
//! if let Some(user) = cache.current_user() {
//!     println!("logged in as {}", user.tag());
//! }
//! ```

pub mod state;

pub use state::{Cache, CacheStats, CacheWriter, UpdateOutcome};
