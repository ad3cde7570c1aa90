//! Library configuration and constants.
//!
//! This module provides:
//! - Protocol constants (record names, versions, limits)
//! - The `Config` struct consumed by the transports and `DomainResolver`

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
