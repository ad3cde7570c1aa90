//! Configuration types.
//!
//! This module defines the enums and the `Config` struct used to set up the
//! DNS and HTTPS transports and the logger.

use std::path::PathBuf;

use crate::config::constants::{
    DEFAULT_MAX_POLICY_SIZE, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, DNS_ATTEMPTS,
    DNS_TIMEOUT_SECS,
};
use crate::error_handling::ConfigValidationError;

/// Logging level for the library logger.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration.
///
/// Holds everything the transports need: the HTTPS agent timeout, the policy
/// size cap, extra trust anchors, proxy passthrough and DNS resolver options.
/// TLS hostname verification is always on and has no switch here.
///
/// # Examples
///
/// ```
/// use mta_sts::Config;
///
/// let config = Config {
///     timeout_seconds: 10,
///     max_policy_size: Some(16 * 1024),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTPS agent timeout in seconds (connect + transfer)
    pub timeout_seconds: u64,

    /// Maximum policy body size in bytes; `None` disables the cap
    pub max_policy_size: Option<usize>,

    /// PEM bundle of additional trust anchors
    pub ca_file: Option<PathBuf>,

    /// Directory of PEM files with additional trust anchors
    pub ca_path: Option<PathBuf>,

    /// Proxy URL used for policy fetches (e.g. `http://proxy:3128`)
    pub proxy: Option<String>,

    /// DNS query timeout in seconds
    pub dns_timeout_seconds: u64,

    /// DNS attempts per query
    pub dns_attempts: usize,

    /// Set the DO and AD bits on discovery queries so the upstream resolver
    /// reports whether it validated the answer. Never makes DNSSEC mandatory.
    pub request_dnssec: bool,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_policy_size: Some(DEFAULT_MAX_POLICY_SIZE),
            ca_file: None,
            ca_path: None,
            proxy: None,
            dns_timeout_seconds: DNS_TIMEOUT_SECS,
            dns_attempts: DNS_ATTEMPTS,
            request_dnssec: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Checks the configuration for values the transports cannot work with.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigValidationError` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigValidationError::new(
                "timeout_seconds",
                "must be greater than 0",
            ));
        }
        if self.max_policy_size == Some(0) {
            return Err(ConfigValidationError::new(
                "max_policy_size",
                "must be greater than 0 (use None to disable the cap)",
            ));
        }
        if self.dns_timeout_seconds == 0 {
            return Err(ConfigValidationError::new(
                "dns_timeout_seconds",
                "must be greater than 0",
            ));
        }
        if self.dns_attempts == 0 {
            return Err(ConfigValidationError::new(
                "dns_attempts",
                "must be greater than 0",
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigValidationError::new(
                "user_agent",
                "must not be empty",
            ));
        }
        if let Some(ref file) = self.ca_file {
            if !file.is_file() {
                return Err(ConfigValidationError::new(
                    "ca_file",
                    format!("{} is not a readable file", file.display()),
                ));
            }
        }
        if let Some(ref dir) = self.ca_path {
            if !dir.is_dir() {
                return Err(ConfigValidationError::new(
                    "ca_path",
                    format!("{} is not a directory", dir.display()),
                ));
            }
        }
        if let Some(ref proxy) = self.proxy {
            if url::Url::parse(proxy).is_err() {
                return Err(ConfigValidationError::new(
                    "proxy",
                    format!("{proxy} is not a valid URL"),
                ));
            }
        }
        Ok(())
    }
}
