//! Scenewatch Common Utilities
//!
//! Shared infrastructure for all scenewatch crates:
//! - Error types and result aliases
//! - Tracing/logging initialization

pub mod error;
pub mod logging;

pub use error::*;
