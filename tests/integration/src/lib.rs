//! Integration test utilities
//!
//! In-process mock REST and gateway servers plus the frames they serve.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
