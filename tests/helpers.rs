// Shared test doubles for the DNS and HTTPS seams.
//
// Each double counts its calls so tests can assert how often the network
// would have been touched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mta_sts::{
    Config, DnsError, DomainResolver, HttpResponse, PolicyFetcher, TransportError, Transports,
    TxtAnswer, TxtResolver,
};
use url::Url;

/// A policy document that validates.
#[allow(dead_code)] // Used by other test files
pub const ENFORCE_POLICY: &str =
    "version: STSv1\nmode: enforce\nmx: mx1.example.com\nmx: *.backup.example.com\nmax_age: 604800\n";

/// TXT answers keyed by query name; unknown names answer NODATA.
#[derive(Default)]
pub struct CountingDns {
    answers: HashMap<String, Result<TxtAnswer, DnsError>>,
    queries: Mutex<Vec<String>>,
}

#[allow(dead_code)] // Used by other test files
impl CountingDns {
    pub fn answer(mut self, name: &str, records: &[&str]) -> Self {
        self.answers
            .insert(name.to_string(), Ok(TxtAnswer::new(records.iter().copied())));
        self
    }

    pub fn fail(mut self, name: &str, error: DnsError) -> Self {
        self.answers.insert(name.to_string(), Err(error));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("queries lock").clone()
    }
}

impl TxtResolver for CountingDns {
    fn query_txt(&self, name: &str) -> Result<TxtAnswer, DnsError> {
        self.queries.lock().expect("queries lock").push(name.to_string());
        self.answers
            .get(name)
            .cloned()
            .unwrap_or_else(|| Ok(TxtAnswer::default()))
    }
}

/// Returns the same response to every GET.
pub struct CountingFetcher {
    response: Result<HttpResponse, TransportError>,
    calls: AtomicUsize,
    urls: Mutex<Vec<Url>>,
}

#[allow(dead_code)] // Used by other test files
impl CountingFetcher {
    pub fn new(response: Result<HttpResponse, TransportError>) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn serving(body: &str) -> Self {
        Self::new(Ok(HttpResponse::ok_text(body)))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls
            .lock()
            .expect("urls lock")
            .iter()
            .map(Url::to_string)
            .collect()
    }
}

impl PolicyFetcher for CountingFetcher {
    fn get(&self, url: &Url, max_body: Option<usize>) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().expect("urls lock").push(url.clone());
        let response = self.response.clone()?;
        // Behave like a transport that enforces the cap while reading
        if let Some(limit) = max_body {
            if response.body.len() > limit {
                return Err(TransportError::BodyTooLarge { limit });
            }
        }
        Ok(response)
    }
}

/// Builds a resolver for `domain` over the given doubles.
#[allow(dead_code)] // Used by other test files
pub fn resolver(
    domain: &str,
    dns: &Arc<CountingDns>,
    https: &Arc<CountingFetcher>,
    config: &Config,
) -> DomainResolver {
    let transports = Transports {
        dns: dns.clone(),
        https: https.clone(),
    };
    DomainResolver::new(domain, &transports, config).expect("Failed to create resolver")
}
