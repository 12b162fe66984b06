//! Session types: what the client believes about its own session.
//!
//! - [`SessionState`]: the cached token and email (mirrored in the store)
//! - [`TokenPhase`]: how much the cached token is currently trusted
//! - [`ValidationResult`], [`GateDecision`], [`Outcome`]: the transient
//!   results handed back to the caller after each remote call

use tokengate_protocol::ApiResponse;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The locally cached session.
///
/// Token and email travel together: login sets both, logout and clear
/// drop both. The one exception is gated access, which may refresh the
/// token on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub email: Option<String>,
}

impl SessionState {
    pub fn new(token: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            email: Some(email.into()),
        }
    }

    /// `true` if neither slot holds a value.
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.email.is_none()
    }
}

// ---------------------------------------------------------------------------
// TokenPhase
// ---------------------------------------------------------------------------

/// The trust state of the cached token.
///
/// ```text
///                  ┌──────(rejected)──────────┐
///                  ▼                          │
///   Absent ──→ Pending(candidate) ──(ok)──→ Trusted
///     ▲            │
///     │            └──(transport failure)──→ previous phase
///   Cached ── token loaded from the store, not yet confirmed
/// ```
///
/// `Pending` only exists while a validation, login or logout call is
/// outstanding. Concurrent checks are not coalesced, so the last call to
/// resolve decides the final phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPhase {
    /// No token is held.
    Absent,

    /// A token was restored from the store (or survived an inconclusive
    /// check) but the service has not confirmed it in this process.
    Cached,

    /// A call is in flight. `candidate` is the token under test, if the
    /// call has one (login does not).
    Pending { candidate: Option<String> },

    /// The service confirmed the token (validation or fresh login).
    Trusted,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// The verdict of one validation call. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub trusted: bool,
    /// Why the service refused, when it did.
    pub reason: Option<String>,
}

impl ValidationResult {
    pub fn trusted() -> Self {
        Self {
            trusted: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            trusted: false,
            reason: Some(reason.into()),
        }
    }

    pub(crate) fn from_response(response: &ApiResponse) -> Self {
        if response.grants_access() {
            Self::trusted()
        } else {
            Self::rejected(response.rejection_reason())
        }
    }
}

/// The answer to "may the restricted view be entered?".
#[derive(Debug, Clone, PartialEq)]
pub struct GateDecision {
    pub granted: bool,
    pub validation: ValidationResult,
    /// The validation response as received, for display.
    pub response: ApiResponse,
}

/// How a login/logout/clear call ended when it was not a transport failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The service accepted the request; local state was updated.
    Accepted(ApiResponse),
    /// The service answered but refused; local state is untouched.
    Rejected(ApiResponse),
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    /// The service's response, unless the action was cancelled.
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Outcome::Accepted(r) | Outcome::Rejected(r) => Some(r),
            Outcome::Cancelled => None,
        }
    }
}

/// Shortens a token for log lines. Tokens are credentials; only a
/// prefix is ever logged.
pub(crate) fn token_hint(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    if prefix.len() < token.len() {
        format!("{prefix}…")
    } else {
        prefix
    }
}

/// Masks an email address for log lines: first character of the local
/// part plus the domain.
pub(crate) fn email_hint(correo: &str) -> String {
    match correo.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}
