//! Policy document parsing and MX matching through the public API.

use mta_sts::{matches, parse_policy_document, MxPattern, Policy, PolicyError, PolicyMode};

#[test]
fn test_document_with_extension_fields() {
    let body = b"version: STSv1\r\nmode: testing\r\nmx: mail.example.com\r\nmax_age: 0\r\nx-extension: yes\r\n";
    let policy = parse_policy_document(body, Some("text/plain; charset=utf-8")).expect("valid");
    assert_eq!(policy.mode(), PolicyMode::Testing);
    assert_eq!(policy.max_age(), 0);
}

#[test]
fn test_mode_none_needs_no_mx() {
    let policy = Policy::parse("version: STSv1\nmode: none\nmax_age: 86400\n").expect("valid");
    assert_eq!(policy.mode(), PolicyMode::None);
    assert!(policy.mx_patterns().is_empty());
    assert!(!policy.matches_mx("mail.example.com"));
}

#[test]
fn test_rejected_documents() {
    let cases: &[(&str, fn(&PolicyError) -> bool)] = &[
        ("mode: enforce\nmx: a.example\nmax_age: 1\n", |e| {
            *e == PolicyError::MissingField("version")
        }),
        ("version: STSv1\nmode: enforce\nmode: testing\nmx: a.example\nmax_age: 1\n", |e| {
            *e == PolicyError::DuplicateField("mode")
        }),
        ("version: STSv1\nmode: strict\nmx: a.example\nmax_age: 1\n", |e| {
            matches!(e, PolicyError::InvalidMode(_))
        }),
        ("version: STSv1\nmode: enforce\nmx: a.example\nmax_age: 31557601\n", |e| {
            *e == PolicyError::MaxAgeOutOfRange(31557601)
        }),
        ("version: STSv1\nmode: enforce\nmx: a.example\nmax_age: -1\n", |e| {
            matches!(e, PolicyError::InvalidMaxAge(_))
        }),
        ("version: STSv1\nmode: enforce\nmx: *.*.example\nmax_age: 1\n", |e| {
            matches!(e, PolicyError::InvalidMx(_))
        }),
        ("version: STSv1\nmode enforce\nmx: a.example\nmax_age: 1\n", |e| {
            matches!(e, PolicyError::MalformedLine { line: 2, .. })
        }),
    ];

    for (text, check) in cases {
        let err = Policy::parse(text).expect_err("document should be rejected");
        assert!(check(&err), "unexpected error {err:?} for {text:?}");
    }
}

#[test]
fn test_document_transport_checks() {
    let body = b"version: STSv1\nmode: none\nmax_age: 1\n";
    assert!(matches!(
        parse_policy_document(body, None),
        Err(PolicyError::ContentType(_))
    ));
    assert!(parse_policy_document(body, Some("TEXT/PLAIN")).is_ok());
    assert_eq!(
        parse_policy_document(b"version: STSv1\nmode: \xff\n", Some("text/plain")),
        Err(PolicyError::NotUtf8)
    );
}

#[test]
fn test_matching_is_case_insensitive_and_ignores_trailing_dot() {
    let patterns: Vec<MxPattern> = ["Mail.Example.com", "*.Example.net"]
        .iter()
        .map(|p| p.parse().expect("valid pattern"))
        .collect();

    assert!(matches("MAIL.example.COM.", &patterns));
    assert!(matches("mx1.example.net", &patterns));
    assert!(!matches("example.net", &patterns));
    assert!(!matches("a.b.example.net", &patterns));
    assert!(!matches("", &patterns));
    assert!(!matches("mail.example.com", &[]));
}
