//! Error type definitions.
//!
//! This module defines the error taxonomy of the library. Discovery absence
//! and ambiguity are deliberately not errors; they live in
//! `DiscoveryOutcome`.
//!
//! Every error that can end up in a `DomainResolver` cache slot is `Clone`,
//! so a cached failure can be handed out again without touching the network.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error reading the configured trust anchors.
    #[error("CA certificate error for {path}: {message}")]
    CertificateError {
        /// File or directory that failed to load
        path: String,
        /// What went wrong
        message: String,
    },

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),

    /// The configuration did not pass validation.
    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] ConfigValidationError),
}

/// A configuration field that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ConfigValidationError {
    /// Name of the offending `Config` field
    pub field: &'static str,
    /// Why the value was rejected
    pub message: String,
}

impl ConfigValidationError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Failure to get an answer for a DNS query.
///
/// This is "could not ask", as opposed to a discovery outcome of `Absent`
/// ("asked, nothing is published").
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    /// The queried name does not exist.
    #[error("NXDOMAIN: {0} does not exist")]
    NxDomain(String),

    /// The server failed to answer.
    #[error("SERVFAIL while resolving {0}")]
    ServFail(String),

    /// The server refused to answer.
    #[error("query for {0} was refused")]
    Refused(String),

    /// No answer within the resolver timeout.
    #[error("DNS query timed out")]
    Timeout,

    /// Any other resolver failure.
    #[error("DNS error: {0}")]
    Other(String),
}

/// Failure at the HTTPS transport layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete within the agent timeout.
    #[error("request timed out")]
    Timeout,

    /// The TCP connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The TLS handshake or certificate verification failed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The body grew past the configured cap and reading was aborted.
    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge {
        /// Configured cap in bytes
        limit: usize,
    },

    /// Reading the body failed.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The request could not be built or sent.
    #[error("request error: {0}")]
    Request(String),

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// Failure to retrieve the policy document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The HTTPS transport failed.
    #[error("policy fetch failed: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a redirect, which is never followed.
    #[error("policy host answered with redirect {status} (location: {location:?})")]
    Redirect {
        /// HTTP status code (3xx)
        status: u16,
        /// `Location` header, if any
        location: Option<String>,
    },

    /// The server answered with a non-2xx, non-redirect status.
    #[error("policy host answered with HTTP status {0}")]
    Status(u16),

    /// The body is larger than the configured cap.
    #[error("policy body exceeds {limit} bytes")]
    BodyTooLarge {
        /// Configured cap in bytes
        limit: usize,
    },

    /// The policy URL does not use the https scheme.
    #[error("refusing to fetch policy over non-https scheme '{0}'")]
    InsecureScheme(String),
}

/// Reason a policy document was rejected.
///
/// A rejected document never yields a partial policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The body is not valid UTF-8.
    #[error("policy body is not valid UTF-8")]
    NotUtf8,

    /// The response was not served as `text/plain`.
    #[error("policy served with media type '{0}', expected text/plain")]
    ContentType(String),

    /// A non-blank line is not a `key: value` pair.
    #[error("malformed policy line {line}: {content:?}")]
    MalformedLine {
        /// 1-based line number
        line: usize,
        /// The offending line
        content: String,
    },

    /// A required field is missing.
    #[error("policy is missing the '{0}' field")]
    MissingField(&'static str),

    /// A single-valued field appears more than once.
    #[error("policy field '{0}' appears more than once")]
    DuplicateField(&'static str),

    /// `version` is not `STSv1`.
    #[error("unsupported policy version '{0}'")]
    InvalidVersion(String),

    /// `mode` is not one of `enforce`, `testing`, `none`.
    #[error("invalid policy mode '{0}'")]
    InvalidMode(String),

    /// `max_age` is not a plain non-negative integer.
    #[error("invalid max_age '{0}'")]
    InvalidMaxAge(String),

    /// `max_age` is outside `[0, 31557600]`.
    #[error("max_age {0} is out of range")]
    MaxAgeOutOfRange(u64),

    /// An `mx` value is not a hostname or single-level wildcard.
    #[error("invalid mx pattern '{0}'")]
    InvalidMx(String),

    /// Mode is `enforce` or `testing` but no `mx` line was given.
    #[error("no 'mx' entries found in a policy with mode '{0}'")]
    MissingMx(String),
}

/// Failure of `DomainResolver::policy`.
///
/// Every variant means a policy is published but cannot be used, which
/// mail-transport callers usually treat as fail-closed. "No policy published"
/// is not an error; it is `PolicyOutcome::NoPolicy`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The STS discovery query failed.
    #[error(transparent)]
    Dns(#[from] DnsError),

    /// The policy document could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The policy document was fetched but is invalid.
    #[error(transparent)]
    Invalid(#[from] PolicyError),
}

/// A domain name that cannot be used as a policy domain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid policy domain '{domain}': {reason}")]
pub struct InvalidDomain {
    /// The name as given
    pub domain: String,
    /// Why it was rejected
    pub reason: &'static str,
}
