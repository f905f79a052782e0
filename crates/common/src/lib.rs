//! MedFocus Common Utilities
//!
//! Shared infrastructure for all MedFocus crates:
//! - Error types and result aliases
//! - Session clock and frame gating
//! - Tracing/logging initialization
//! - Configuration loading, including the focus scoring settings

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
