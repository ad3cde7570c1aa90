//! Per-domain MTA-STS resolution.
//!
//! `DomainResolver` ties discovery, fetching and parsing together for one
//! policy domain:
//! - `sts_discovery()` queries `_mta-sts.<domain>`
//! - `tlsrpt_discovery()` queries `_smtp._tls.<domain>`
//! - `policy()` fetches `https://mta-sts.<domain>/.well-known/mta-sts.txt`,
//!   but only once discovery found exactly one valid STS record
//!
//! Each result, success or failure, is computed at most once per resolver and
//! then served from the resolver's own cache slots. There is no shared state
//! between resolvers, so resolving many domains concurrently only needs one
//! resolver per domain.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;
use url::Host;

use crate::config::{Config, STS_TXT_PREFIX, TLSRPT_TXT_PREFIX};
use crate::dns::{
    parse_discovery, Discovery, DiscoveryOutcome, DiscoveryRecord, StsDiscoveryRecord,
    TlsRptDiscoveryRecord, TxtResolver,
};
use crate::error_handling::{DnsError, FetchError, InvalidDomain, ResolveError};
use crate::fetch::{classify_response, policy_url, transport_failure, PolicyFetcher};
use crate::policy::{parse_policy_document, Policy};

/// The DNS and HTTPS collaborators a `DomainResolver` talks through.
///
/// Build one with `initialization::init_transports`, or fill the fields with
/// custom implementations (another resolver, a test double).
#[derive(Clone)]
pub struct Transports {
    /// TXT query capability
    pub dns: Arc<dyn TxtResolver>,
    /// HTTPS GET capability (no redirects)
    pub https: Arc<dyn PolicyFetcher>,
}

/// Why no policy is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoPolicyReason {
    /// No STS record is published.
    Absent,
    /// Competing or self-contradicting STS records are published.
    Ambiguous,
}

/// Successful result of `DomainResolver::policy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PolicyOutcome {
    /// The domain does not (effectively) publish MTA-STS; deliver as usual.
    NoPolicy {
        /// What discovery found
        reason: NoPolicyReason,
    },
    /// A valid policy is in effect.
    Policy {
        /// `id` of the STS record that announced the policy
        id: String,
        /// The validated policy
        policy: Policy,
    },
}

impl PolicyOutcome {
    /// Returns the policy, if one is in effect.
    pub fn policy(&self) -> Option<&Policy> {
        match self {
            PolicyOutcome::Policy { policy, .. } => Some(policy),
            PolicyOutcome::NoPolicy { .. } => None,
        }
    }
}

/// A lazily filled, never invalidated cache slot.
#[derive(Debug, Clone)]
enum Slot<T, E> {
    Unresolved,
    Resolved(T),
    Failed(E),
}

impl<T: Clone, E: Clone> Slot<T, E> {
    fn cached(&self) -> Option<Result<T, E>> {
        match self {
            Slot::Unresolved => None,
            Slot::Resolved(value) => Some(Ok(value.clone())),
            Slot::Failed(error) => Some(Err(error.clone())),
        }
    }

    fn fill(&mut self, result: Result<T, E>) -> Result<T, E> {
        *self = match &result {
            Ok(value) => Slot::Resolved(value.clone()),
            Err(error) => Slot::Failed(error.clone()),
        };
        result
    }
}

/// Resolves MTA-STS and TLSRPT for a single policy domain.
///
/// # Example
///
/// ```no_run
/// use mta_sts::initialization::init_transports;
/// use mta_sts::{Config, DomainResolver, PolicyOutcome};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let transports = init_transports(&config)?;
/// let mut resolver = DomainResolver::new("example.com", &transports, &config)?;
///
/// match resolver.policy() {
///     Ok(PolicyOutcome::Policy { policy, .. }) => {
///         println!("mx.example.com allowed: {}", policy.matches_mx("mx.example.com"));
///     }
///     Ok(PolicyOutcome::NoPolicy { .. }) => println!("no MTA-STS policy"),
///     Err(e) => println!("policy published but unusable: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
pub struct DomainResolver {
    domain: String,
    dns: Arc<dyn TxtResolver>,
    https: Arc<dyn PolicyFetcher>,
    max_policy_size: Option<usize>,
    sts: Slot<Discovery<StsDiscoveryRecord>, DnsError>,
    tlsrpt: Slot<Discovery<TlsRptDiscoveryRecord>, DnsError>,
    policy: Slot<PolicyOutcome, ResolveError>,
}

impl DomainResolver {
    /// Creates a resolver for `domain`. No network activity happens here.
    ///
    /// # Arguments
    ///
    /// * `domain` - Policy domain; normalized to lowercase without trailing dot
    /// * `transports` - DNS and HTTPS collaborators
    /// * `config` - Supplies the policy size cap (timeouts live in the transports)
    ///
    /// # Errors
    ///
    /// Returns `InvalidDomain` for empty names, IP literals and names that
    /// are not valid hosts.
    pub fn new(
        domain: &str,
        transports: &Transports,
        config: &Config,
    ) -> Result<Self, InvalidDomain> {
        Ok(Self {
            domain: normalize_domain(domain)?,
            dns: Arc::clone(&transports.dns),
            https: Arc::clone(&transports.https),
            max_policy_size: config.max_policy_size,
            sts: Slot::Unresolved,
            tlsrpt: Slot::Unresolved,
            policy: Slot::Unresolved,
        })
    }

    /// The normalized policy domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Discovers the `_mta-sts` record.
    ///
    /// # Errors
    ///
    /// Returns `DnsError` if the query could not be answered (NXDOMAIN
    /// included). The error is cached like a success.
    pub fn sts_discovery(&mut self) -> Result<Discovery<StsDiscoveryRecord>, DnsError> {
        if let Some(cached) = self.sts.cached() {
            return cached;
        }
        let result = self.discover(STS_TXT_PREFIX);
        self.sts.fill(result)
    }

    /// Discovers the `_smtp._tls` record. Independent of the STS lookups.
    ///
    /// # Errors
    ///
    /// Same as `sts_discovery`.
    pub fn tlsrpt_discovery(&mut self) -> Result<Discovery<TlsRptDiscoveryRecord>, DnsError> {
        if let Some(cached) = self.tlsrpt.cached() {
            return cached;
        }
        let result = self.discover(TLSRPT_TXT_PREFIX);
        self.tlsrpt.fill(result)
    }

    /// Resolves the domain's policy.
    ///
    /// Runs STS discovery first; if no single valid record is in effect the
    /// result is `PolicyOutcome::NoPolicy` and no HTTPS request is made.
    /// Otherwise exactly one GET is issued for the policy document.
    ///
    /// # Errors
    ///
    /// - `ResolveError::Dns` if STS discovery failed
    /// - `ResolveError::Fetch` for transport failures, redirects, non-2xx
    ///   statuses and oversized bodies
    /// - `ResolveError::Invalid` if the document does not validate
    pub fn policy(&mut self) -> Result<PolicyOutcome, ResolveError> {
        if let Some(cached) = self.policy.cached() {
            return cached;
        }
        let result = self.resolve_policy();
        self.policy.fill(result)
    }

    fn discover<R: DiscoveryRecord>(&self, prefix: &str) -> Result<Discovery<R>, DnsError> {
        let name = format!("{prefix}.{}", self.domain);
        let answer = self.dns.query_txt(&name)?;
        let outcome = parse_discovery::<R>(&answer.records);
        debug!(
            "Discovery for {name}: {} TXT record(s), record in effect: {}, authenticated: {}",
            answer.records.len(),
            outcome.is_record(),
            answer.authenticated
        );
        Ok(Discovery {
            outcome,
            authenticated: answer.authenticated,
        })
    }

    fn resolve_policy(&mut self) -> Result<PolicyOutcome, ResolveError> {
        let record = match self.sts_discovery()?.outcome {
            DiscoveryOutcome::Record(record) => record,
            DiscoveryOutcome::Absent => {
                debug!("No MTA-STS record for {}, skipping policy fetch", self.domain);
                return Ok(PolicyOutcome::NoPolicy {
                    reason: NoPolicyReason::Absent,
                });
            }
            DiscoveryOutcome::Ambiguous => {
                debug!(
                    "Ambiguous MTA-STS records for {}, skipping policy fetch",
                    self.domain
                );
                return Ok(PolicyOutcome::NoPolicy {
                    reason: NoPolicyReason::Ambiguous,
                });
            }
        };

        let url = policy_url(&self.domain)?;
        let response = self
            .https
            .get(&url, self.max_policy_size)
            .map_err(transport_failure)
            .and_then(|response| {
                classify_response(&response, self.max_policy_size)?;
                Ok(response)
            })
            .inspect_err(|e: &FetchError| {
                warn!("Failed to fetch MTA-STS policy from {url}: {e}")
            })?;

        let policy = parse_policy_document(&response.body, response.content_type.as_deref())
            .inspect_err(|e| warn!("Invalid MTA-STS policy at {url}: {e}"))?;

        info!(
            "MTA-STS policy for {} (id {}): mode {}, {} mx pattern(s), max_age {}",
            self.domain,
            record.id(),
            policy.mode(),
            policy.mx_patterns().len(),
            policy.max_age()
        );
        Ok(PolicyOutcome::Policy {
            id: record.id().to_string(),
            policy,
        })
    }
}

/// Lowercases, strips one trailing dot and checks that `domain` is a DNS name.
fn normalize_domain(domain: &str) -> Result<String, InvalidDomain> {
    let invalid = |reason| InvalidDomain {
        domain: domain.to_string(),
        reason,
    };
    let name = domain.strip_suffix('.').unwrap_or(domain);
    if name.is_empty() {
        return Err(invalid("empty name"));
    }
    if name.split('.').any(str::is_empty) {
        return Err(invalid("empty label"));
    }
    match Host::parse(name) {
        Ok(Host::Domain(normalized)) => Ok(normalized),
        Ok(Host::Ipv4(_)) | Ok(Host::Ipv6(_)) => Err(invalid("IP address literal")),
        Err(_) => Err(invalid("not a valid host name")),
    }
}
