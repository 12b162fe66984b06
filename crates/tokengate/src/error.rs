//! Unified error type for Tokengate.

use tokengate_protocol::ProtocolError;
use tokengate_session::SessionError;
use tokengate_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `tokengate` facade you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant generates the `From` impl, so `?` converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum TokengateError {
    /// A transport-level error (setup, connect, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (missing input, unreachable service).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The log subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// A view name that doesn't exist.
    #[error("unknown view: {0}")]
    UnknownView(String),
}
