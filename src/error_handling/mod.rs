//! Error types and categorization.
//!
//! This module provides:
//! - Error type definitions for every stage (DNS, fetch, policy parsing)
//! - Mapping of `reqwest` and `hickory-resolver` errors onto those types
//!
//! Errors are split by what the caller must do with them:
//! - **DnsError**: the discovery query could not be answered
//! - **FetchError**: a policy is announced but could not be retrieved
//! - **PolicyError**: a policy was retrieved but is invalid
//!
//! "Nothing published" is not an error anywhere in this crate.

mod categorization;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, categorize_resolve_error, is_no_data};
pub use types::{
    ConfigValidationError, DnsError, FetchError, InitializationError, InvalidDomain, PolicyError,
    ResolveError, TransportError,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_from_transport() {
        let err: FetchError = TransportError::Timeout.into();
        assert_eq!(err, FetchError::Transport(TransportError::Timeout));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_resolve_error_is_transparent() {
        let err: ResolveError = PolicyError::MissingField("mode").into();
        assert_eq!(err.to_string(), "policy is missing the 'mode' field");

        let err: ResolveError = DnsError::ServFail("_mta-sts.example.com".into()).into();
        assert!(err.to_string().contains("SERVFAIL"));
    }

    #[test]
    fn test_redirect_error_message() {
        let err = FetchError::Redirect {
            status: 302,
            location: Some("https://elsewhere.example/".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("302"));
        assert!(msg.contains("elsewhere.example"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = ConfigValidationError::new("timeout_seconds", "must be greater than 0");
        assert_eq!(err.to_string(), "timeout_seconds: must be greater than 0");
    }
}
