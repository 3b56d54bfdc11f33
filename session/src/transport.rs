//! HTTP transport seam.
//!
//! The API client builds plain [`HttpRequest`] values and hands them to an
//! [`HttpTransport`]: `gloo-net` in the browser, `reqwest` in the CLI, a
//! scripted fake in tests. Transports only move bytes; status interpretation
//! and session policy live in [`crate::api`] and [`crate::manager`].

use std::time::Duration;

/// Request methods used by the auth endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL (base origin + endpoint path).
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body, if any.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to obtain any HTTP response at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// DNS, connection, CORS or other fetch-level failure.
    #[error("network request failed: {0}")]
    Network(String),

    /// No response arrived within the configured timeout; the request was aborted.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The transport cannot run in this environment (e.g. during SSR).
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Sends one request and returns the raw response.
///
/// Implementations must honor `timeout` by aborting the in-flight request and
/// returning [`TransportError::Timeout`].
#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest, timeout: Duration) -> Result<HttpResponse, TransportError>;
}
