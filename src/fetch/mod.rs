//! Constrained HTTPS retrieval of policy documents.
//!
//! This module provides:
//! - The `PolicyFetcher` seam used by `DomainResolver`
//! - `ReqwestPolicyFetcher`, its blocking `reqwest` implementation
//! - Policy URL construction and response classification
//!
//! The fetch is https-only, never follows redirects, and caps the body size.

mod handler;
mod request;
mod response;

use url::Url;

use crate::error_handling::TransportError;

// Re-export public API
pub use handler::ReqwestPolicyFetcher;
pub use request::{ensure_https, policy_url};
pub use response::{classify_response, read_capped, transport_failure, HttpResponse};

/// Something that can GET a URL over HTTPS.
///
/// Implementations must not follow redirects (a 3xx is returned as-is), must
/// verify the server certificate against the URL host, and must stop reading
/// the body once it exceeds `max_body` bytes, returning
/// `TransportError::BodyTooLarge`. No retries.
pub trait PolicyFetcher: Send + Sync {
    /// Issues one GET request.
    fn get(&self, url: &Url, max_body: Option<usize>) -> Result<HttpResponse, TransportError>;
}
