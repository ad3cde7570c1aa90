//! Configuration constants.
//!
//! This module defines the protocol constants from RFC8461 (MTA-STS) and
//! RFC8460 (TLSRPT), together with the defaults used for timeouts and size
//! limits.

// Record and host naming
/// Label prepended to the policy domain to find the STS discovery record.
pub const STS_TXT_PREFIX: &str = "_mta-sts";
/// Labels prepended to the policy domain to find the TLSRPT discovery record.
pub const TLSRPT_TXT_PREFIX: &str = "_smtp._tls";
/// Host label under which the policy document is served.
pub const POLICY_HOST_PREFIX: &str = "mta-sts";
/// Well-known path of the policy document.
pub const POLICY_WELL_KNOWN_PATH: &str = "/.well-known/mta-sts.txt";

// Versions
/// Version tag of both the STS TXT record and the policy document.
pub const STS_VERSION: &str = "STSv1";
/// Version tag of the TLSRPT TXT record.
pub const TLSRPT_VERSION: &str = "TLSRPTv1";

// Limits
/// Upper bound of `max_age` in a policy document (about one year).
pub const MAX_POLICY_AGE_SECS: u64 = 31_557_600;
/// Maximum number of digits RFC8461 allows for `max_age`.
pub const MAX_POLICY_AGE_DIGITS: usize = 10;
/// Maximum length of the `id` field of an STS record.
pub const MAX_STS_ID_LEN: usize = 32;
/// Maximum length of a policy field name.
pub const MAX_POLICY_FIELD_NAME_LEN: usize = 32;

// Defaults
/// Default HTTPS agent timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Default cap on the policy body, in bytes
pub const DEFAULT_MAX_POLICY_SIZE: usize = 64 * 1024;
/// DNS query timeout in seconds
pub const DNS_TIMEOUT_SECS: u64 = 5;
/// DNS attempts per query before giving up
pub const DNS_ATTEMPTS: usize = 2;
/// Advertised EDNS(0) UDP payload size
pub const DNS_EDNS_PAYLOAD: u16 = 1232;

/// Default User-Agent string for policy fetches.
pub const DEFAULT_USER_AGENT: &str = concat!("mta-sts/", env!("CARGO_PKG_VERSION"));

// HTTP
/// Media type a policy document must be served with.
pub const POLICY_MEDIA_TYPE: &str = "text/plain";
