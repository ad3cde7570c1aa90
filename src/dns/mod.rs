//! DNS discovery of MTA-STS and TLSRPT records.
//!
//! This module provides:
//! - The `TxtResolver` seam and its `hickory-resolver` implementation
//! - Parsing of `_mta-sts` and `_smtp._tls` TXT answer sets into
//!   `DiscoveryOutcome`s
//!
//! Parsing is pure and does no I/O; `DomainResolver` glues the two together.

mod extract;
mod records;
mod types;

// Re-export public API
pub use extract::{parse_discovery, parse_sts_record, parse_tlsrpt_record, DiscoveryRecord};
pub use records::{HickoryTxtResolver, TxtAnswer, TxtResolver};
pub use types::{
    Discovery, DiscoveryOutcome, ReportUri, StsDiscoveryRecord, TlsRptDiscoveryRecord,
};
