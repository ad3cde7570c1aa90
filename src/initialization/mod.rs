//! Transport and logger initialization.
//!
//! This module provides functions to initialize the shared resources:
//! - HTTP client for policy fetches (no redirects, https-only)
//! - DNS resolver for discovery lookups
//! - Logger
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;
mod resolver;

use std::sync::Arc;

use log::debug;

use crate::config::Config;
use crate::domain::Transports;
use crate::error_handling::InitializationError;
use crate::fetch::ReqwestPolicyFetcher;

// Re-export public API
pub use client::init_client;
pub use logger::{init_logger, init_logger_with};
pub use resolver::{init_resolver, init_resolver_with};

/// Builds the DNS and HTTPS collaborators from a configuration.
///
/// The returned `Transports` is cheap to clone and can back any number of
/// `DomainResolver`s.
///
/// # Errors
///
/// Returns `InitializationError::ConfigError` if `config` does not validate,
/// or the error of the failing client/resolver initialization.
pub fn init_transports(config: &Config) -> Result<Transports, InitializationError> {
    config.validate()?;

    let client = init_client(config)?;
    let resolver = init_resolver(config)?;
    debug!(
        "Initialized transports (timeout {}s, max policy size {:?}, dnssec requested {})",
        config.timeout_seconds, config.max_policy_size, config.request_dnssec
    );

    Ok(Transports {
        dns: Arc::new(resolver),
        https: Arc::new(ReqwestPolicyFetcher::new(client)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_transports_rejects_invalid_config() {
        let config = Config {
            timeout_seconds: 0,
            ..Default::default()
        };
        match init_transports(&config) {
            Err(InitializationError::ConfigError(e)) => assert_eq!(e.field, "timeout_seconds"),
            Err(other) => panic!("expected config error, got {other}"),
            Ok(_) => panic!("expected config error"),
        }
    }
}
