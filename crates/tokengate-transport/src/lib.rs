//! Transport abstraction layer for Tokengate.
//!
//! Provides the [`Transport`] trait: one async method that takes a
//! [`Request`] and returns the [`RawResponse`] the remote service sent
//! back. Everything above this crate (protocol, session guard, console)
//! talks to the network only through this trait, which is what lets the
//! tests swap the real HTTP client for a scripted mock.
//!
//! # Feature Flags
//!
//! - `http` (default): HTTP transport via `reqwest`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "http")]
mod http;

pub use error::TransportError;
#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpTransport};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counter for generating unique request IDs.
static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for one request, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Allocates the next process-wide request ID.
    pub fn next() -> Self {
        Self(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// The HTTP method of a request. The session service only uses two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// A request to send to the remote service.
///
/// The path is relative to the transport's base address. Query pairs are
/// kept unencoded here; the transport is responsible for encoding them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl Request {
    /// Creates a `GET` request for the given path.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Creates a `POST` request for the given path, initially without a body.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Appends a query parameter.
    pub fn with_query(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attaches an already-encoded JSON body.
    pub fn with_json_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Looks up the first query parameter with the given key.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

// ---------------------------------------------------------------------------
// RawResponse
// ---------------------------------------------------------------------------

/// A completed exchange: whatever status the service answered with,
/// the undecoded body, and how long the round trip took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub elapsed: Duration,
}

impl RawResponse {
    /// Creates a response with zero elapsed time. Handy for mocks.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            elapsed: Duration::ZERO,
        }
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Sends requests to the remote session service.
///
/// The returned future must be `Send` so that callers can drive it from
/// any Tokio worker thread (the session guard is shared behind an `Arc`).
/// Implementations may still write a plain `async fn` in their `impl`
/// block as long as the body is `Send`.
pub trait Transport: Send + Sync + 'static {
    /// Sends one request and waits for the full response.
    ///
    /// # Errors
    /// Returns a [`TransportError`] only when the exchange did not
    /// complete. Non-2xx statuses are returned as `Ok`.
    fn send(
        &self,
        request: Request,
    ) -> impl std::future::Future<Output = Result<RawResponse, TransportError>>
           + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_display() {
        assert_eq!(RequestId(7).to_string(), "req-7");
    }

    #[test]
    fn test_request_id_next_is_monotonic() {
        let a = RequestId::next();
        let b = RequestId::next();
        assert!(b.0 > a.0);
    }

    #[test]
    fn test_request_get_has_no_body() {
        let req = Request::get("/servicio").with_query("token", "1_2");
        assert_eq!(req.method(), Method::Get);
        assert_eq!(req.path(), "/servicio");
        assert_eq!(req.query_param("token"), Some("1_2"));
        assert!(req.body().is_none());
    }

    #[test]
    fn test_request_query_param_missing_returns_none() {
        let req = Request::get("/servicio");
        assert_eq!(req.query_param("token"), None);
    }

    #[test]
    fn test_request_post_with_body() {
        let req = Request::post("/logout").with_json_body(b"{}".to_vec());
        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.body(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(199, "").is_success());
        assert!(!RawResponse::new(401, "").is_success());
        assert!(!RawResponse::new(500, "").is_success());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
    }
}
