//! DNS resolver initialization.
//!
//! This module provides functions to initialize the blocking TXT resolver with
//! the configured timeouts, attempts and DNSSEC request bits.

use std::time::Duration;

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::{NameServerPool, TokioConnectionProvider};
use tokio::runtime;

use crate::config::Config;
use crate::dns::HickoryTxtResolver;
use crate::error_handling::InitializationError;

/// Initializes the DNS resolver for discovery lookups.
///
/// Uses the default upstream configuration (Google DNS) with the timeouts
/// from `config`. Use `init_resolver_with` to point at other nameservers.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if the resolver runtime
/// cannot be created.
pub fn init_resolver(config: &Config) -> Result<HickoryTxtResolver, InitializationError> {
    init_resolver_with(ResolverConfig::default(), config)
}

/// Initializes the DNS resolver against the given upstream configuration.
///
/// Only the nameservers of `resolver_config` are used; discovery names are
/// always fully qualified, so search domains do not apply.
///
/// # Errors
///
/// Same as `init_resolver`.
pub fn init_resolver_with(
    resolver_config: ResolverConfig,
    config: &Config,
) -> Result<HickoryTxtResolver, InitializationError> {
    // Same runtime flavour hickory's own blocking Resolver uses
    let runtime = runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| InitializationError::DnsResolverError(e.to_string()))?;

    let nameservers = NameServerConfigGroup::from(resolver_config.name_servers().to_vec());
    if nameservers.is_empty() {
        return Err(InitializationError::DnsResolverError(
            "no nameservers configured".to_string(),
        ));
    }

    let pool = NameServerPool::from_config(
        nameservers,
        resolver_opts(config),
        TokioConnectionProvider::default(),
    );
    Ok(HickoryTxtResolver::new(
        pool,
        config.dns_attempts,
        runtime,
        config.request_dnssec,
    ))
}

fn resolver_opts(config: &Config) -> ResolverOpts {
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(config.dns_timeout_seconds);
    opts.attempts = config.dns_attempts;
    // Query names are always fully qualified, never search-list expanded
    opts.ndots = 0;
    opts.edns0 = true;
    // Validation is left to the upstream resolver; only its AD bit is read
    opts.validate = false;
    opts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_opts_follow_config() {
        let config = Config {
            dns_timeout_seconds: 7,
            dns_attempts: 3,
            ..Default::default()
        };
        let opts = resolver_opts(&config);
        assert_eq!(opts.timeout, Duration::from_secs(7));
        assert_eq!(opts.attempts, 3);
        assert_eq!(opts.ndots, 0);
        assert!(opts.edns0);
        assert!(!opts.validate);
    }

    #[test]
    fn test_init_resolver_needs_nameservers() {
        let empty = ResolverConfig::from_parts(None, vec![], NameServerConfigGroup::new());
        match init_resolver_with(empty, &Config::default()) {
            Err(InitializationError::DnsResolverError(msg)) => {
                assert!(msg.contains("no nameservers"))
            }
            Err(other) => panic!("expected resolver error, got {other}"),
            Ok(_) => panic!("expected resolver error"),
        }
    }
}
