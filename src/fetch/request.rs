//! Policy URL construction.

use url::Url;

use crate::config::{POLICY_HOST_PREFIX, POLICY_WELL_KNOWN_PATH};
use crate::error_handling::{FetchError, TransportError};

/// Builds `https://mta-sts.<domain>/.well-known/mta-sts.txt`.
///
/// # Arguments
///
/// * `domain` - Normalized policy domain (lowercase, no trailing dot)
///
/// # Errors
///
/// Returns `FetchError::Transport` if the domain does not form a valid URL
/// host, and `FetchError::InsecureScheme` if the result is not https.
pub fn policy_url(domain: &str) -> Result<Url, FetchError> {
    let raw = format!("https://{POLICY_HOST_PREFIX}.{domain}{POLICY_WELL_KNOWN_PATH}");
    let url = Url::parse(&raw).map_err(|e| {
        FetchError::Transport(TransportError::Request(format!(
            "invalid policy URL {raw}: {e}"
        )))
    })?;
    ensure_https(&url)?;
    Ok(url)
}

/// Refuses any URL whose scheme is not `https`.
pub fn ensure_https(url: &Url) -> Result<(), FetchError> {
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(FetchError::InsecureScheme(url.scheme().to_string()))
    }
}
