//! MTA-STS policy documents.
//!
//! This module provides:
//! - `Policy` / `PolicyMode`: the validated form of a policy document
//! - `parse_policy_document`: strict parsing of a fetched body
//! - `MxPattern` / `matches`: MX hostname matching with single-label wildcards

mod matching;
mod parse;
mod types;

// Re-export public API
pub use matching::{matches, MxPattern};
pub use parse::parse_policy_document;
pub use types::{Policy, PolicyMode};
