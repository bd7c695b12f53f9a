//! Integration test utilities for the roster dashboard
//!
//! Runs the real router on a loopback port over an in-memory database and
//! a recording platform, and drives it with `reqwest`.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
