//! Error types for the protocol layer.
//!
//! Each crate in Tokengate defines its own error enum. A `ProtocolError`
//! means the bytes were there but could not be turned into (or from) the
//! shape the session API expects, not that the network failed.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization of a request body failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The response body was not valid JSON.
    ///
    /// The service always answers with JSON, so this usually means a
    /// proxy or a crashed backend answered instead (an HTML error page,
    /// a truncated body).
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
