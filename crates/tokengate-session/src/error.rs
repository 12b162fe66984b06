//! Error types for the session layer.

use tokengate_protocol::ProtocolError;
use tokengate_transport::TransportError;

/// Errors that can occur while reconciling the session.
///
/// A service *rejection* is not an error: it comes back as
/// [`Outcome::Rejected`](crate::Outcome::Rejected) or a denied
/// [`GateDecision`](crate::GateDecision). What is left here falls in two
/// groups that callers must render differently:
///
/// - **local validation** ([`NoActiveSession`](Self::NoActiveSession),
///   [`MissingField`](Self::MissingField)): caught before any request
///   was sent;
/// - **transport-class** ([`Transport`](Self::Transport),
///   [`Protocol`](Self::Protocol)): the exchange did not produce a
///   usable answer. These never clear the cached session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Gated access was requested but there is no token to check.
    #[error("no active session, log in first")]
    NoActiveSession,

    /// A required form field was empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The request did not complete (connection refused, timeout, ...).
    #[error("could not reach the session service: {0}")]
    Transport(#[from] TransportError),

    /// The service answered with something that is not the API's JSON.
    #[error("unreadable answer from the session service: {0}")]
    Protocol(#[from] ProtocolError),
}

impl SessionError {
    /// `true` if no request was sent because input was missing.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::NoActiveSession | Self::MissingField(_))
    }

    /// `true` if a request was sent but produced no usable answer.
    pub fn is_transport_class(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Protocol(_))
    }
}
