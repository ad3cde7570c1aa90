//! MX host matching.
//!
//! An `mx` pattern is either an exact hostname or `*.suffix`. The wildcard
//! stands for exactly one leftmost label: `*.example.com` matches
//! `mx1.example.com` but neither `example.com` nor `a.b.example.com`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error_handling::PolicyError;

const MAX_HOSTNAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A normalized `mx` pattern from a policy document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MxPattern {
    pattern: String,
}

impl MxPattern {
    /// Parses and normalizes a pattern (lowercase, one trailing dot removed).
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::InvalidMx` if the value is not a hostname or a
    /// single leading `*.` wildcard over a hostname.
    pub fn parse(raw: &str) -> Result<Self, PolicyError> {
        let pattern = normalize_host(raw);
        let host_part = pattern.strip_prefix("*.").unwrap_or(&pattern);
        if !is_valid_hostname(host_part) {
            return Err(PolicyError::InvalidMx(raw.to_string()));
        }
        Ok(Self { pattern })
    }

    /// The normalized pattern text.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` for `*.suffix` patterns.
    pub fn is_wildcard(&self) -> bool {
        self.pattern.starts_with("*.")
    }

    /// Returns `true` if `host` is covered by this pattern.
    ///
    /// `host` is normalized the same way as the pattern before comparing and
    /// must itself be a hostname, so `*` is never accepted as a label.
    pub fn matches(&self, host: &str) -> bool {
        self.matches_normalized(&normalize_host(host))
    }

    fn matches_normalized(&self, host: &str) -> bool {
        if !is_valid_hostname(host) {
            return false;
        }
        match self.pattern.strip_prefix("*.") {
            Some(suffix) => match host.split_once('.') {
                Some((label, rest)) => !label.is_empty() && rest == suffix,
                None => false,
            },
            None => host == self.pattern,
        }
    }
}

impl FromStr for MxPattern {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MxPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Returns `true` if `host` matches any of `patterns`.
///
/// # Arguments
///
/// * `host` - Candidate MX hostname, any case, optional trailing dot
/// * `patterns` - Patterns from a validated policy
pub fn matches(host: &str, patterns: &[MxPattern]) -> bool {
    let host = normalize_host(host);
    patterns.iter().any(|pattern| pattern.matches_normalized(&host))
}

fn normalize_host(host: &str) -> String {
    let host = host.strip_suffix('.').unwrap_or(host);
    host.to_ascii_lowercase()
}

fn is_valid_hostname(host: &str) -> bool {
    !host.is_empty()
        && host.len() <= MAX_HOSTNAME_LEN
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= MAX_LABEL_LEN
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}
