//! Typed REST surface

pub mod endpoints;
mod requests;

pub use requests::{EditMessage, Reply, SendMessage};
