//! Policy response classification.
//!
//! Turns a raw HTTPS response into either a body ready for parsing or a
//! `FetchError`. Redirects are failures, never followed.

use std::io::Read;

use crate::error_handling::{FetchError, TransportError};

/// A raw HTTPS response as returned by a `PolicyFetcher`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// `Location` header, if present
    pub location: Option<String>,
    /// `Content-Type` header, if present
    pub content_type: Option<String>,
    /// Response body (empty for non-2xx responses)
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// A `200 OK` `text/plain` response with the given body.
    pub fn ok_text(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            location: None,
            content_type: Some("text/plain".to_string()),
            body: body.into(),
        }
    }
}

/// Checks status and size of a policy response.
///
/// # Arguments
///
/// * `response` - The response to check
/// * `max_size` - Body cap in bytes; `None` disables the check
///
/// # Errors
///
/// - `FetchError::Redirect` for any 3xx status
/// - `FetchError::Status` for any other non-2xx status
/// - `FetchError::BodyTooLarge` if the body exceeds `max_size`
pub fn classify_response(response: &HttpResponse, max_size: Option<usize>) -> Result<(), FetchError> {
    match response.status {
        200..=299 => {}
        status @ 300..=399 => {
            return Err(FetchError::Redirect {
                status,
                location: response.location.clone(),
            })
        }
        status => return Err(FetchError::Status(status)),
    }
    if let Some(limit) = max_size {
        if response.body.len() > limit {
            return Err(FetchError::BodyTooLarge { limit });
        }
    }
    Ok(())
}

/// Maps a transport failure onto a `FetchError`, surfacing an oversized body
/// as `FetchError::BodyTooLarge`.
pub fn transport_failure(error: TransportError) -> FetchError {
    match error {
        TransportError::BodyTooLarge { limit } => FetchError::BodyTooLarge { limit },
        other => FetchError::Transport(other),
    }
}

/// Reads at most `limit + 1` bytes so an oversized body is detected without
/// buffering all of it.
///
/// # Errors
///
/// Returns `TransportError::BodyTooLarge` if more than `limit` bytes are
/// available, `TransportError::Timeout` or `TransportError::Body` if reading
/// fails.
pub fn read_capped<R: Read>(reader: R, limit: Option<usize>) -> Result<Vec<u8>, TransportError> {
    let mut body = Vec::new();
    let read_result = match limit {
        Some(limit) => reader
            .take((limit as u64).saturating_add(1))
            .read_to_end(&mut body),
        None => {
            let mut reader = reader;
            reader.read_to_end(&mut body)
        }
    };
    if let Err(e) = read_result {
        return Err(if e.kind() == std::io::ErrorKind::TimedOut {
            TransportError::Timeout
        } else {
            TransportError::Body(e.to_string())
        });
    }
    if let Some(limit) = limit {
        if body.len() > limit {
            return Err(TransportError::BodyTooLarge { limit });
        }
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn response(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            ..HttpResponse::ok_text("version: STSv1\n")
        }
    }

    #[test]
    fn test_classify_success() {
        assert!(classify_response(&response(200), Some(1024)).is_ok());
        assert!(classify_response(&response(204), None).is_ok());
    }

    #[test]
    fn test_classify_redirects_are_failures() {
        for status in [301, 302, 303, 307, 308] {
            let mut resp = response(status);
            resp.location = Some("https://attacker.example/".to_string());
            assert_eq!(
                classify_response(&resp, None),
                Err(FetchError::Redirect {
                    status,
                    location: Some("https://attacker.example/".to_string())
                })
            );
        }
    }

    #[test]
    fn test_classify_error_statuses() {
        assert_eq!(
            classify_response(&response(404), None),
            Err(FetchError::Status(404))
        );
        assert_eq!(
            classify_response(&response(503), None),
            Err(FetchError::Status(503))
        );
        assert_eq!(
            classify_response(&response(101), None),
            Err(FetchError::Status(101))
        );
    }

    #[test]
    fn test_classify_body_size() {
        let resp = HttpResponse::ok_text(vec![b'a'; 11]);
        assert_eq!(
            classify_response(&resp, Some(10)),
            Err(FetchError::BodyTooLarge { limit: 10 })
        );
        assert!(classify_response(&resp, Some(11)).is_ok());
        assert!(classify_response(&resp, None).is_ok());
    }

    #[test]
    fn test_read_capped() {
        let data = vec![b'x'; 100];
        assert_eq!(read_capped(Cursor::new(&data), Some(100)).unwrap().len(), 100);
        assert_eq!(
            read_capped(Cursor::new(&data), Some(99)),
            Err(TransportError::BodyTooLarge { limit: 99 })
        );
        assert_eq!(read_capped(Cursor::new(&data), None).unwrap().len(), 100);
    }

    #[test]
    fn test_read_capped_with_largest_limit() {
        let body = read_capped(Cursor::new(b"version: STSv1\n"), Some(usize::MAX))
            .expect("body under the cap");
        assert_eq!(body, b"version: STSv1\n");
    }

    #[test]
    fn test_transport_failure_mapping() {
        assert_eq!(
            transport_failure(TransportError::BodyTooLarge { limit: 5 }),
            FetchError::BodyTooLarge { limit: 5 }
        );
        assert_eq!(
            transport_failure(TransportError::Timeout),
            FetchError::Transport(TransportError::Timeout)
        );
    }
}
