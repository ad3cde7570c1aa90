//! Error categorization.
//!
//! This module maps the errors of the underlying DNS and HTTP libraries onto
//! the library's own `DnsError` and `TransportError` variants.

use std::error::Error as StdError;

use hickory_resolver::error::{ResolveError as HickoryError, ResolveErrorKind};
use hickory_resolver::proto::error::ProtoErrorKind;
use hickory_resolver::proto::op::ResponseCode;

use super::types::{DnsError, TransportError};

/// Categorizes a `reqwest::Error` into a `TransportError`.
///
/// Status and redirect handling happen on the response, not here: the policy
/// client never follows redirects and never turns statuses into errors.
///
/// # Arguments
///
/// * `error` - The `reqwest::Error` to categorize
pub fn categorize_reqwest_error(error: &reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        if is_tls_failure(error) {
            TransportError::Tls(error_chain(error))
        } else {
            TransportError::Connect(error_chain(error))
        }
    } else if error.is_body() || error.is_decode() {
        TransportError::Body(error_chain(error))
    } else if error.is_builder() || error.is_request() {
        TransportError::Request(error_chain(error))
    } else {
        TransportError::Other(error_chain(error))
    }
}

/// Categorizes a hickory `ResolveError` into a `DnsError`.
///
/// NODATA answers (`NoRecordsFound` with `NOERROR`) are not failures and are
/// filtered out before this is called; if one gets here it is reported as
/// `Other`.
///
/// # Arguments
///
/// * `name` - The queried name, kept in the error for diagnostics
/// * `error` - The resolver error
pub fn categorize_resolve_error(name: &str, error: &HickoryError) -> DnsError {
    match error.kind() {
        ResolveErrorKind::Timeout => DnsError::Timeout,
        ResolveErrorKind::Proto(e) if matches!(e.kind(), ProtoErrorKind::Timeout) => {
            DnsError::Timeout
        }
        ResolveErrorKind::NoRecordsFound { response_code, .. } => match *response_code {
            ResponseCode::NXDomain => DnsError::NxDomain(name.to_string()),
            ResponseCode::ServFail => DnsError::ServFail(name.to_string()),
            ResponseCode::Refused => DnsError::Refused(name.to_string()),
            _ => DnsError::Other(error.to_string()),
        },
        _ => {
            let error_msg = error.to_string();
            let lowered = error_msg.to_lowercase();
            if lowered.contains("timed out") || lowered.contains("timeout") {
                DnsError::Timeout
            } else {
                DnsError::Other(error_msg)
            }
        }
    }
}

/// Returns `true` if a NoRecordsFound error carries a NOERROR response code,
/// i.e. the name exists but has no records of the requested type.
pub fn is_no_data(error: &HickoryError) -> bool {
    matches!(
        error.kind(),
        ResolveErrorKind::NoRecordsFound {
            response_code: ResponseCode::NoError,
            ..
        }
    )
}

fn is_tls_failure(error: &reqwest::Error) -> bool {
    let chain = error_chain(error).to_lowercase();
    chain.contains("certificate") || chain.contains("tls") || chain.contains("handshake")
}

// reqwest hides the interesting part (rustls, io) in the source chain
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
