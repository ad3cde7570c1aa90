//! Discovery record types.

use serde::Serialize;
use url::Url;

use crate::config::{STS_VERSION, TLSRPT_VERSION};

/// Result of interpreting a domain's TXT answer set for one record kind.
///
/// `Absent` and `Ambiguous` both mean "no record in effect"; they are kept
/// apart for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "record", rename_all = "snake_case")]
pub enum DiscoveryOutcome<T> {
    /// No usable record is published.
    Absent,
    /// Several competing records (or a record with repeated fields) are
    /// published, so none is in effect.
    Ambiguous,
    /// Exactly one well-formed record is published.
    Record(T),
}

impl<T> DiscoveryOutcome<T> {
    /// Returns the record, if one is in effect.
    pub fn record(&self) -> Option<&T> {
        match self {
            DiscoveryOutcome::Record(record) => Some(record),
            DiscoveryOutcome::Absent | DiscoveryOutcome::Ambiguous => None,
        }
    }

    /// Returns `true` if a record is in effect.
    pub fn is_record(&self) -> bool {
        matches!(self, DiscoveryOutcome::Record(_))
    }
}

/// A discovery outcome together with the DNSSEC signal of the answer.
///
/// `authenticated` is informational: nothing in this crate refuses an
/// unauthenticated answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discovery<T> {
    /// What the TXT answer set means
    pub outcome: DiscoveryOutcome<T>,
    /// Whether the resolver reported the answer as DNSSEC-authenticated
    pub authenticated: bool,
}

/// The `_mta-sts` TXT record (`v=STSv1; id=...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StsDiscoveryRecord {
    version: String,
    id: String,
}

impl StsDiscoveryRecord {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            version: STS_VERSION.to_string(),
            id: id.to_string(),
        }
    }

    /// Record version, always `STSv1`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Opaque policy identifier; changes whenever the policy changes.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A TLSRPT aggregate report destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scheme", content = "target", rename_all = "lowercase")]
pub enum ReportUri {
    /// `mailto:` destination; holds the address part.
    Mailto(String),
    /// `https:` destination.
    Https(Url),
}

/// The `_smtp._tls` TXT record (`v=TLSRPTv1; rua=...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TlsRptDiscoveryRecord {
    version: String,
    report_uris: Vec<ReportUri>,
}

impl TlsRptDiscoveryRecord {
    pub(crate) fn new(report_uris: Vec<ReportUri>) -> Self {
        Self {
            version: TLSRPT_VERSION.to_string(),
            report_uris,
        }
    }

    /// Record version, always `TLSRPTv1`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Report destinations, in the order published.
    pub fn report_uris(&self) -> &[ReportUri] {
        &self.report_uris
    }
}
