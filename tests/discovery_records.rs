//! Discovery record parsing through the public API.
//!
//! These cover answer sets as real zones publish them: records of other kinds
//! mixed in, multi-string TXT data already joined, odd whitespace.

use mta_sts::{parse_sts_record, parse_tlsrpt_record, DiscoveryOutcome, ReportUri};

fn txt(records: &[&str]) -> Vec<String> {
    records.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_sts_record_among_unrelated_records() {
    let outcome = parse_sts_record(&txt(&[
        "v=spf1 include:_spf.example.com -all",
        "google-site-verification=abcdef",
        "v=STSv1; id=20160831085700Z;",
    ]));
    let record = outcome.record().expect("record in effect");
    assert_eq!(record.id(), "20160831085700Z");
    assert_eq!(record.version(), "STSv1");
}

#[test]
fn test_sts_record_whitespace_variants() {
    for raw in [
        "v=STSv1;id=abc123",
        "v=STSv1 ; id=abc123",
        "v=STSv1;\tid=abc123 ;",
        "v=STSv1; id=abc123; ext=value",
    ] {
        assert!(
            parse_sts_record(&txt(&[raw])).is_record(),
            "{raw:?} should parse"
        );
    }
}

#[test]
fn test_sts_record_rejections() {
    // wrong version, missing id, bad id, leading whitespace
    for raw in [
        "v=STSv2; id=abc",
        "v=STSv1",
        "v=STSv1; id=",
        "v=STSv1; id=abc-def",
        "v=STSv1; id=012345678901234567890123456789012",
        " v=STSv1; id=abc",
        "v=STSv1x; id=abc",
    ] {
        assert_eq!(
            parse_sts_record(&txt(&[raw])),
            DiscoveryOutcome::Absent,
            "{raw:?} should be absent"
        );
    }
}

#[test]
fn test_sts_ambiguity() {
    assert_eq!(
        parse_sts_record(&txt(&["v=STSv1; id=a", "v=STSv1; id=a"])),
        DiscoveryOutcome::Ambiguous
    );
    assert_eq!(
        parse_sts_record(&txt(&["v=STSv1; id=a; id=b"])),
        DiscoveryOutcome::Ambiguous
    );
}

#[test]
fn test_empty_answer_is_absent() {
    assert_eq!(parse_sts_record(&[]), DiscoveryOutcome::Absent);
    assert_eq!(parse_tlsrpt_record(&[]), DiscoveryOutcome::Absent);
}

#[test]
fn test_tlsrpt_record() {
    let outcome = parse_tlsrpt_record(&txt(&[
        "v=TLSRPTv1; rua=mailto:reports@example.com, https://reporting.example.com/v1/tlsrpt",
    ]));
    let record = outcome.record().expect("record in effect");
    assert_eq!(record.version(), "TLSRPTv1");
    match record.report_uris() {
        [ReportUri::Mailto(address), ReportUri::Https(url)] => {
            assert_eq!(address, "reports@example.com");
            assert_eq!(url.host_str(), Some("reporting.example.com"));
        }
        other => panic!("unexpected report uris {other:?}"),
    }
}

#[test]
fn test_tlsrpt_rejections() {
    for raw in [
        "v=TLSRPTv1",
        "v=TLSRPTv1; rua=",
        "v=TLSRPTv1; rua=http://insecure.example.com/",
        "v=TLSRPTv1; rua=mailto:a@example.com,,mailto:b@example.com",
    ] {
        assert_eq!(
            parse_tlsrpt_record(&txt(&[raw])),
            DiscoveryOutcome::Absent,
            "{raw:?} should be absent"
        );
    }
}
