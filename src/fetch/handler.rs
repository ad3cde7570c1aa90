//! Policy fetching over HTTPS with `reqwest`.

use std::sync::Arc;

use log::{debug, warn};
use reqwest::header::{HeaderName, CONTENT_TYPE, LOCATION};
use url::Url;

use super::response::{read_capped, HttpResponse};
use super::PolicyFetcher;
use crate::error_handling::{categorize_reqwest_error, TransportError};

/// `PolicyFetcher` backed by a blocking `reqwest` client.
///
/// The client must be built with redirects disabled and https-only, which is
/// what `initialization::init_client` does.
pub struct ReqwestPolicyFetcher {
    client: Arc<reqwest::blocking::Client>,
}

impl ReqwestPolicyFetcher {
    /// Wraps a configured client.
    pub fn new(client: Arc<reqwest::blocking::Client>) -> Self {
        Self { client }
    }
}

impl PolicyFetcher for ReqwestPolicyFetcher {
    fn get(&self, url: &Url, max_body: Option<usize>) -> Result<HttpResponse, TransportError> {
        if url.scheme() != "https" {
            return Err(TransportError::Request(format!(
                "refusing non-https URL {url}"
            )));
        }
        self.fetch(url, max_body)
    }
}

impl ReqwestPolicyFetcher {
    /// Issues the GET without the scheme check.
    fn fetch(&self, url: &Url, max_body: Option<usize>) -> Result<HttpResponse, TransportError> {
        let response = self.client.get(url.clone()).send().map_err(|e| {
            let error = categorize_reqwest_error(&e);
            warn!("Policy fetch from {url} failed: {error}");
            error
        })?;

        let status = response.status().as_u16();
        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let location = header(LOCATION);
        let content_type = header(CONTENT_TYPE);

        if !response.status().is_success() {
            debug!("Policy host {url} answered {status}, not reading body");
            return Ok(HttpResponse {
                status,
                location,
                content_type,
                body: Vec::new(),
            });
        }

        if let (Some(limit), Some(length)) = (max_body, response.content_length()) {
            if length > limit as u64 {
                warn!("Policy at {url} announces {length} bytes, over the {limit} byte cap");
                return Err(TransportError::BodyTooLarge { limit });
            }
        }

        let body = read_capped(response, max_body)?;
        Ok(HttpResponse {
            status,
            location,
            content_type,
            body,
        })
    }
}
