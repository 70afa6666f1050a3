//! Integration test utilities for the activity reporting API
//!
//! Spawns the real router on a local port against a real database and
//! drives it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
