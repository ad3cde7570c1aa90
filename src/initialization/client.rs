//! HTTP client initialization.
//!
//! This module builds the blocking `reqwest` client used to fetch policy
//! documents, with the transport constraints MTA-STS requires.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::Certificate;

use crate::config::Config;
use crate::error_handling::InitializationError;

/// Initializes the HTTP client for policy fetches.
///
/// Creates a `reqwest::blocking::Client` configured with:
/// - Redirect following disabled (a 3xx is handed back to the caller)
/// - https-only requests
/// - Overall timeout from `timeout_seconds`
/// - User-Agent header from the configuration
/// - Built-in web PKI roots plus any trust anchors from `ca_file` / `ca_path`
/// - Proxy passthrough, if configured
///
/// Certificate and hostname verification are always enabled.
///
/// # Errors
///
/// Returns `InitializationError::CertificateError` if a configured trust
/// anchor cannot be read, and `InitializationError::HttpClientError` if the
/// proxy URL is invalid or the client cannot be built.
pub fn init_client(config: &Config) -> Result<Arc<Client>, InitializationError> {
    let mut builder = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .https_only(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone());

    for certificate in load_trust_anchors(config)? {
        builder = builder.add_root_certificate(certificate);
    }

    if let Some(ref proxy) = config.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
    }

    Ok(Arc::new(builder.build()?))
}

/// Loads the extra trust anchors named by `ca_file` and `ca_path`.
fn load_trust_anchors(config: &Config) -> Result<Vec<Certificate>, InitializationError> {
    let mut certificates = Vec::new();

    if let Some(ref file) = config.ca_file {
        let loaded = load_pem_file(file)?;
        if loaded.is_empty() {
            return Err(certificate_error(file, "no certificates found"));
        }
        debug!("Loaded {} CA certificate(s) from {}", loaded.len(), file.display());
        certificates.extend(loaded);
    }

    if let Some(ref dir) = config.ca_path {
        let mut paths: Vec<_> = fs::read_dir(dir)
            .map_err(|e| certificate_error(dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let before = certificates.len();
        for path in paths {
            // CA directories often hold hash links and non-PEM files
            match load_pem_file(&path) {
                Ok(loaded) => certificates.extend(loaded),
                Err(e) => debug!("Skipping {}: {e}", path.display()),
            }
        }
        if certificates.len() == before {
            return Err(certificate_error(dir, "no certificates found"));
        }
        debug!(
            "Loaded {} CA certificate(s) from {}",
            certificates.len() - before,
            dir.display()
        );
    }

    Ok(certificates)
}

fn load_pem_file(path: &Path) -> Result<Vec<Certificate>, InitializationError> {
    let pem = fs::read(path).map_err(|e| certificate_error(path, e))?;
    Certificate::from_pem_bundle(&pem).map_err(|e| certificate_error(path, e))
}

fn certificate_error(path: &Path, message: impl ToString) -> InitializationError {
    InitializationError::CertificateError {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_init_client_default_config() {
        let result = init_client(&Config::default());
        assert!(result.is_ok(), "default client should build");
    }

    #[test]
    fn test_init_client_with_proxy() {
        let config = Config {
            proxy: Some("http://127.0.0.1:3128".to_string()),
            ..Default::default()
        };
        assert!(init_client(&config).is_ok());
    }

    #[test]
    fn test_missing_ca_file_is_an_error() {
        let config = Config {
            ca_file: Some("/definitely/not/here.pem".into()),
            ..Default::default()
        };
        assert!(matches!(
            init_client(&config),
            Err(InitializationError::CertificateError { .. })
        ));
    }

    #[test]
    fn test_ca_file_without_certificates_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "this is not a certificate").expect("Failed to write temp file");
        let config = Config {
            ca_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert!(matches!(
            init_client(&config),
            Err(InitializationError::CertificateError { .. })
        ));
    }

    #[test]
    fn test_empty_ca_path_is_an_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = Config {
            ca_path: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        match init_client(&config) {
            Err(InitializationError::CertificateError { message, .. }) => {
                assert!(message.contains("no certificates"));
            }
            other => panic!("expected certificate error, got {other:?}"),
        }
    }
}
