//! Policy types.

use std::time::Duration;

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::matching::{matches, MxPattern};

/// Policy mode as published in the `mode` field.
///
/// Parsing is case-sensitive: only `enforce`, `testing` and `none` are
/// accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Deliver only to authorized MX hosts over validated TLS.
    Enforce,
    /// Deliver regardless, but report failures.
    Testing,
    /// The domain has withdrawn its policy.
    None,
}

/// A fully validated MTA-STS policy.
///
/// Only `Policy::parse` and `parse_policy_document` create one, so holding a
/// `Policy` means the document passed every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Policy {
    pub(super) mode: PolicyMode,
    pub(super) mx: Vec<MxPattern>,
    pub(super) max_age: u64,
}

impl Policy {
    /// Policy mode.
    pub fn mode(&self) -> PolicyMode {
        self.mode
    }

    /// MX patterns in document order, duplicates kept.
    pub fn mx_patterns(&self) -> &[MxPattern] {
        &self.mx
    }

    /// `max_age` in seconds.
    pub fn max_age(&self) -> u64 {
        self.max_age
    }

    /// `max_age` as a `Duration`.
    pub fn max_age_duration(&self) -> Duration {
        Duration::from_secs(self.max_age)
    }

    /// Returns `true` if `host` is authorized by one of the policy's MX
    /// patterns.
    ///
    /// This is pure matching; what to do in `testing` or `none` mode is up to
    /// the caller.
    pub fn matches_mx(&self, host: &str) -> bool {
        matches(host, &self.mx)
    }
}
