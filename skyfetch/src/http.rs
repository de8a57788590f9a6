//! Blocking HTTP access for the pipelines.
//!
//! Both pipelines talk to the network through [`HttpGet`], so tests can drive
//! them with canned responses. [`HttpClient`] is the real implementation on top
//! of `reqwest::blocking`.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use crate::error::{FetchError, FetchResult};

/// Default total timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A source of HTTP GET responses.
pub trait HttpGet {
    /// Issue a GET to `url` with the given query parameters and return the body.
    ///
    /// Implementations must return [`FetchError::Request`] when the transport
    /// fails and [`FetchError::Status`] for 4xx/5xx responses.
    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> FetchResult<String>;
}

/// Blocking HTTP client with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Build a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("skyfetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        debug!("HTTP client ready, request timeout {}s", timeout.as_secs());
        Ok(Self { client })
    }
}

impl HttpGet for HttpClient {
    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> FetchResult<String> {
        debug!("GET {url} with {} query parameters", query.len());

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status {
                url: response.url().to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_with_default_timeout() {
        assert!(HttpClient::new(DEFAULT_TIMEOUT).is_ok());
    }

    #[test]
    fn test_unreachable_host_is_request_error() {
        // Port 9 on localhost is the discard service and is closed on test hosts.
        let client = HttpClient::new(Duration::from_secs(2)).unwrap();
        let err = client
            .get_text("http://127.0.0.1:9/api", &[("format", "json")])
            .unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
        assert!(err.is_transport());
    }
}
