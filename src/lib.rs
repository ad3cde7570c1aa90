//! mta_sts library: MTA-STS policy resolution and TLSRPT discovery
//!
//! This library resolves the SMTP MTA Strict Transport Security policy
//! (RFC 8461) of a mail domain and discovers its TLS reporting record
//! (RFC 8460). It covers:
//! - `_mta-sts` and `_smtp._tls` TXT record discovery
//! - The constrained HTTPS fetch of `/.well-known/mta-sts.txt`
//! - Strict parsing of the policy document and MX pattern matching
//!
//! Persistent policy caching, SMTP delivery and report submission are left to
//! the caller.
//!
//! # Example
//!
//! ```no_run
//! use mta_sts::initialization::init_transports;
//! use mta_sts::{Config, DomainResolver, PolicyMode, PolicyOutcome};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     timeout_seconds: 30,
//!     ..Default::default()
//! };
//! let transports = init_transports(&config)?;
//!
//! let mut resolver = DomainResolver::new("example.com", &transports, &config)?;
//! if let PolicyOutcome::Policy { id, policy } = resolver.policy()? {
//!     println!("policy {id}: mode {}", policy.mode());
//!     if policy.mode() == PolicyMode::Enforce && !policy.matches_mx("mx1.example.com") {
//!         println!("mx1.example.com is not an allowed MX");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Blocking
//!
//! All network operations block the calling thread. `DomainResolver` holds no
//! shared mutable state, so one resolver per domain can run on its own thread.

#![warn(missing_docs)]

pub mod config;
mod dns;
mod domain;
mod error_handling;
mod fetch;
pub mod initialization;
mod policy;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use dns::{
    parse_discovery, parse_sts_record, parse_tlsrpt_record, Discovery, DiscoveryOutcome,
    DiscoveryRecord, HickoryTxtResolver, ReportUri, StsDiscoveryRecord, TlsRptDiscoveryRecord,
    TxtAnswer, TxtResolver,
};
pub use domain::{DomainResolver, NoPolicyReason, PolicyOutcome, Transports};
pub use error_handling::{
    ConfigValidationError, DnsError, FetchError, InitializationError, InvalidDomain, PolicyError,
    ResolveError, TransportError,
};
pub use fetch::{policy_url, HttpResponse, PolicyFetcher, ReqwestPolicyFetcher};
pub use policy::{matches, parse_policy_document, MxPattern, Policy, PolicyMode};
