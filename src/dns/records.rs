//! TXT record queries.
//!
//! This module defines the `TxtResolver` seam used by `DomainResolver` and its
//! `hickory-resolver` implementation.
//!
//! The hickory implementation sends its own query messages instead of going
//! through `Resolver::txt_lookup`, so it can set the DNSSEC request bits (DO
//! in EDNS, AD in the header) and read the AD bit of the response. A missing
//! AD bit never turns an answer into an error.

use hickory_resolver::name_server::{NameServerPool, TokioConnectionProvider};
use hickory_resolver::proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_resolver::proto::rr::{Name, RData, RecordType};
use hickory_resolver::proto::xfer::{
    DnsHandle, DnsRequest, DnsRequestOptions, FirstAnswer, RetryDnsHandle,
};
use log::{debug, warn};
use tokio::runtime::Runtime;

use crate::config::DNS_EDNS_PAYLOAD;
use crate::error_handling::{categorize_resolve_error, is_no_data, DnsError};

/// Raw answer to a TXT query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxtAnswer {
    /// One string per TXT record; multi-string records are concatenated
    pub records: Vec<String>,
    /// Whether the answer was DNSSEC-authenticated
    pub authenticated: bool,
}

impl TxtAnswer {
    /// Builds an unauthenticated answer from the given strings.
    pub fn new<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            records: records.into_iter().map(Into::into).collect(),
            authenticated: false,
        }
    }
}

/// Something that can answer TXT queries.
///
/// Implementations must report "name exists but has no TXT records" as an
/// empty answer, and every failure to obtain an answer (NXDOMAIN, SERVFAIL,
/// timeout) as a `DnsError`. Implementations must not retry beyond their own
/// configured attempts.
pub trait TxtResolver: Send + Sync {
    /// Queries the TXT records of `name`.
    fn query_txt(&self, name: &str) -> Result<TxtAnswer, DnsError>;
}

/// `TxtResolver` backed by a hickory nameserver pool driven on a private
/// single-threaded runtime.
///
/// Build one with `initialization::init_resolver` or
/// `initialization::init_resolver_with`.
pub struct HickoryTxtResolver {
    handle: RetryDnsHandle<NameServerPool<TokioConnectionProvider>>,
    runtime: Runtime,
    request_dnssec: bool,
}

impl HickoryTxtResolver {
    pub(crate) fn new(
        pool: NameServerPool<TokioConnectionProvider>,
        attempts: usize,
        runtime: Runtime,
        request_dnssec: bool,
    ) -> Self {
        Self {
            handle: RetryDnsHandle::new(pool, attempts),
            runtime,
            request_dnssec,
        }
    }
}

impl TxtResolver for HickoryTxtResolver {
    fn query_txt(&self, name: &str) -> Result<TxtAnswer, DnsError> {
        let mut query_name = Name::from_ascii(name)
            .map_err(|e| DnsError::Other(format!("invalid query name {name}: {e}")))?;
        query_name.set_fqdn(true);

        let request = txt_request(query_name, self.request_dnssec);
        let result = self
            .runtime
            .block_on(self.handle.send(request).first_answer());

        match result {
            Ok(response) => {
                let answer = txt_answer(&response, self.request_dnssec);
                debug!(
                    "TXT {name}: {} record(s), AD {}",
                    answer.records.len(),
                    answer.authenticated
                );
                Ok(answer)
            }
            // The AD bit of a NODATA response is not carried by the error
            Err(e) if is_no_data(&e) => Ok(TxtAnswer::default()),
            Err(e) => {
                let error = categorize_resolve_error(name, &e);
                if matches!(error, DnsError::Timeout) {
                    warn!("TXT record lookup timed out for {name}: {e}");
                } else {
                    warn!("Failed to lookup TXT records for {name}: {e}");
                }
                Err(error)
            }
        }
    }
}

/// Builds a recursive TXT query, with EDNS(0) always on and the DNSSEC
/// request bits set when `request_dnssec` is.
fn txt_request(name: Name, request_dnssec: bool) -> DnsRequest {
    let mut message = Message::new();
    message
        .add_query(Query::query(name, RecordType::TXT))
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .set_authentic_data(request_dnssec);
    message
        .extensions_mut()
        .get_or_insert_with(Edns::new)
        .set_max_payload(DNS_EDNS_PAYLOAD)
        .set_version(0)
        .set_dnssec_ok(request_dnssec);

    let mut options = DnsRequestOptions::default();
    options.use_edns = true;
    options.recursion_desired = true;
    DnsRequest::new(message, options)
}

/// Extracts the TXT answers of a response. Records of other types (CNAMEs
/// on the way to the TXT set) are skipped.
fn txt_answer(response: &Message, request_dnssec: bool) -> TxtAnswer {
    let records = response
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            // TXT records can contain multiple strings - join them
            Some(RData::TXT(txt)) => Some(
                txt.iter()
                    .map(|bytes| String::from_utf8_lossy(bytes))
                    .collect::<String>(),
            ),
            _ => None,
        })
        .collect();
    TxtAnswer {
        records,
        authenticated: request_dnssec && response.authentic_data(),
    }
}
