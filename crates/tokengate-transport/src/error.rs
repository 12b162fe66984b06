/// Errors that can occur in the transport layer.
///
/// Every variant means the exchange itself did not complete. A response
/// with a 4xx/5xx status is NOT a transport error; it arrives as a
/// normal [`RawResponse`](crate::RawResponse) and the layers above decide
/// what it means.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The transport could not be constructed (bad base URL, TLS setup).
    #[error("transport setup failed: {0}")]
    Setup(String),

    /// The request never got a response: connection refused, DNS
    /// failure, reset mid-flight.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The status line arrived but the body could not be read.
    #[error("failed to read response body: {0}")]
    ReadBody(String),
}
