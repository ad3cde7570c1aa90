//! Discovery record extraction from TXT answer sets.
//!
//! This module turns the TXT strings published at `_mta-sts.<domain>` and
//! `_smtp._tls.<domain>` into discovery outcomes. It never touches the
//! network; the resolver hands it the raw strings.
//!
//! Parsing is fail-closed: a malformed record is `Absent`, a record with a
//! repeated field or more than one candidate record is `Ambiguous`. A partial
//! record is never produced.

use std::collections::HashSet;

use log::debug;
use url::Url;

use super::types::{DiscoveryOutcome, ReportUri, StsDiscoveryRecord, TlsRptDiscoveryRecord};
use crate::config::{MAX_STS_ID_LEN, STS_VERSION, TLSRPT_VERSION};

/// A record kind that can be discovered through a versioned TXT record.
pub trait DiscoveryRecord: Sized {
    /// Version tag that follows `v=` (e.g. `STSv1`)
    const VERSION: &'static str;

    /// Builds the record from its tokenized fields, `v` included.
    ///
    /// Returns `None` if a required field is missing or malformed.
    fn from_fields(fields: &[(&str, &str)]) -> Option<Self>;
}

impl DiscoveryRecord for StsDiscoveryRecord {
    const VERSION: &'static str = STS_VERSION;

    fn from_fields(fields: &[(&str, &str)]) -> Option<Self> {
        let id = field(fields, "id")?;
        if id.is_empty()
            || id.len() > MAX_STS_ID_LEN
            || !id.chars().all(|c| c.is_ascii_alphanumeric())
        {
            debug!("Rejecting STS record with malformed id {id:?}");
            return None;
        }
        Some(StsDiscoveryRecord::new(id))
    }
}

impl DiscoveryRecord for TlsRptDiscoveryRecord {
    const VERSION: &'static str = TLSRPT_VERSION;

    fn from_fields(fields: &[(&str, &str)]) -> Option<Self> {
        let rua = field(fields, "rua")?;
        let mut uris = Vec::new();
        for raw in rua.split(',') {
            let raw = raw.trim_matches(is_wsp);
            if raw.is_empty() {
                debug!("Rejecting TLSRPT record with empty rua entry in {rua:?}");
                return None;
            }
            uris.push(parse_report_uri(raw)?);
        }
        Some(TlsRptDiscoveryRecord::new(uris))
    }
}

/// Interprets an `_mta-sts` TXT answer set.
pub fn parse_sts_record(records: &[String]) -> DiscoveryOutcome<StsDiscoveryRecord> {
    parse_discovery(records)
}

/// Interprets an `_smtp._tls` TXT answer set.
pub fn parse_tlsrpt_record(records: &[String]) -> DiscoveryOutcome<TlsRptDiscoveryRecord> {
    parse_discovery(records)
}

/// Interprets a TXT answer set for the record kind `R`.
///
/// # Arguments
///
/// * `records` - TXT strings returned for the query name (multi-string
///   records already concatenated)
///
/// # Returns
///
/// - `Absent` if no string carries the version tag, or the single candidate
///   is malformed or lacks a required field
/// - `Ambiguous` if more than one string carries the version tag, or the
///   candidate repeats a field
/// - `Record` otherwise
pub fn parse_discovery<R: DiscoveryRecord>(records: &[String]) -> DiscoveryOutcome<R> {
    let candidates: Vec<&String> = records
        .iter()
        .filter(|txt| has_version_tag(txt, R::VERSION))
        .collect();

    let txt = match candidates.as_slice() {
        [] => return DiscoveryOutcome::Absent,
        [single] => single.as_str(),
        _ => {
            debug!(
                "Found {} competing v={} records, discovery is ambiguous",
                candidates.len(),
                R::VERSION
            );
            return DiscoveryOutcome::Ambiguous;
        }
    };

    let fields = match tokenize(txt) {
        Ok(fields) => fields,
        Err(TagListError::Duplicate(key)) => {
            debug!("Field '{key}' repeated in v={} record {txt:?}", R::VERSION);
            return DiscoveryOutcome::Ambiguous;
        }
        Err(TagListError::Malformed(segment)) => {
            debug!(
                "Malformed segment {segment:?} in v={} record {txt:?}",
                R::VERSION
            );
            return DiscoveryOutcome::Absent;
        }
    };

    if field(&fields, "v") != Some(R::VERSION) {
        return DiscoveryOutcome::Absent;
    }

    match R::from_fields(&fields) {
        Some(record) => DiscoveryOutcome::Record(record),
        None => DiscoveryOutcome::Absent,
    }
}

/// Returns `true` if `txt` starts with `v=<version>` followed by a field
/// separator or the end of the string.
fn has_version_tag(txt: &str, version: &str) -> bool {
    let Some(rest) = txt.strip_prefix("v=").and_then(|r| r.strip_prefix(version)) else {
        return false;
    };
    let rest = rest.trim_start_matches(is_wsp);
    rest.is_empty() || rest.starts_with(';')
}

#[derive(Debug, PartialEq, Eq)]
enum TagListError<'a> {
    Malformed(&'a str),
    Duplicate(&'a str),
}

/// Splits `k1=v1; k2=v2[;]` into trimmed pairs.
fn tokenize(txt: &str) -> Result<Vec<(&str, &str)>, TagListError<'_>> {
    let mut segments: Vec<&str> = txt.split(';').collect();
    // a single trailing separator is allowed
    if segments.len() > 1 && segments.last().is_some_and(|s| s.trim_matches(is_wsp).is_empty()) {
        segments.pop();
    }

    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(segments.len());
    for segment in segments {
        let (key, value) = segment
            .split_once('=')
            .ok_or(TagListError::Malformed(segment))?;
        let key = key.trim_matches(is_wsp);
        let value = value.trim_matches(is_wsp);
        if key.is_empty() || value.is_empty() || !key.chars().all(is_field_name_char) {
            return Err(TagListError::Malformed(segment));
        }
        if !seen.insert(key) {
            return Err(TagListError::Duplicate(key));
        }
        fields.push((key, value));
    }
    Ok(fields)
}

fn field<'a>(fields: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    fields.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn parse_report_uri(raw: &str) -> Option<ReportUri> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            debug!("Rejecting TLSRPT rua {raw:?}: {e}");
            return None;
        }
    };
    match url.scheme() {
        "mailto" if !url.path().is_empty() => Some(ReportUri::Mailto(url.path().to_string())),
        "https" if url.host_str().is_some() => Some(ReportUri::Https(url)),
        scheme => {
            debug!("Rejecting TLSRPT rua {raw:?} with unsupported scheme '{scheme}'");
            None
        }
    }
}

fn is_wsp(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_field_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_version_tag() {
        assert!(has_version_tag("v=STSv1; id=1", "STSv1"));
        assert!(has_version_tag("v=STSv1;id=1", "STSv1"));
        assert!(has_version_tag("v=STSv1 ; id=1", "STSv1"));
        assert!(has_version_tag("v=STSv1", "STSv1"));
        assert!(!has_version_tag("v=STSv10; id=1", "STSv1"));
        assert!(!has_version_tag("v=stsv1; id=1", "STSv1"));
        assert!(!has_version_tag(" v=STSv1; id=1", "STSv1"));
        assert!(!has_version_tag("v=spf1 -all", "STSv1"));
    }

    #[test]
    fn test_tokenize_trims_and_allows_trailing_separator() {
        let fields = tokenize("v=STSv1 ;  id = abc ;").unwrap();
        assert_eq!(fields, vec![("v", "STSv1"), ("id", "abc")]);
    }

    #[test]
    fn test_tokenize_rejects_empty_segment() {
        assert_eq!(
            tokenize("v=STSv1;; id=abc"),
            Err(TagListError::Malformed(""))
        );
        assert!(matches!(
            tokenize("v=STSv1; id"),
            Err(TagListError::Malformed(_))
        ));
        assert!(matches!(
            tokenize("v=STSv1; id="),
            Err(TagListError::Malformed(_))
        ));
    }

    #[test]
    fn test_tokenize_detects_duplicates() {
        assert_eq!(
            tokenize("v=STSv1; id=a; id=b"),
            Err(TagListError::Duplicate("id"))
        );
    }

    #[test]
    fn test_parse_report_uri() {
        assert_eq!(
            parse_report_uri("mailto:tlsrpt@example.com"),
            Some(ReportUri::Mailto("tlsrpt@example.com".to_string()))
        );
        assert!(matches!(
            parse_report_uri("https://reporting.example.com/v1/tlsrpt"),
            Some(ReportUri::Https(_))
        ));
        assert_eq!(parse_report_uri("http://reporting.example.com/"), None);
        assert_eq!(parse_report_uri("ftp://example.com/"), None);
        assert_eq!(parse_report_uri("not a uri"), None);
    }
}
