//! The session guard: the single owner of the cached session.
//!
//! Everything that reads or changes the cached token goes through
//! [`SessionGuard`]. It decides, at a few fixed checkpoints, whether the
//! token is still good:
//!
//! - on start-up ([`validate_on_startup`](SessionGuard::validate_on_startup))
//! - before entering the restricted view
//!   ([`request_gated_access`](SessionGuard::request_gated_access))
//! - after login, logout and admin clear
//!
//! # The three ways a call can end
//!
//! | result                   | example                    | cached session   |
//! |--------------------------|----------------------------|------------------|
//! | local validation failure | empty token field          | untouched        |
//! | service rejection        | 401, or 200 without marker | cleared (checks) |
//! | transport failure        | connection refused         | untouched        |
//!
//! A transport failure is *inconclusive*: the service may well still
//! accept the token, so it is never treated as proof of invalidity.
//!
//! # Concurrency
//!
//! The state lives behind a `tokio::sync::Mutex` that is only taken
//! after a network call has resolved, never across an `.await` on the
//! network. Two gated checks can therefore be in flight at once; they
//! are not deduplicated and whichever resolves last decides the final
//! state.

use tokio::sync::Mutex;
use tokengate_protocol::{Api, ApiResponse, Credentials, JsonCodec};
use tokengate_transport::Transport;

use crate::state::{email_hint, token_hint};
use crate::{
    ConfirmPrompt, Confirmer, EMAIL_KEY, GateDecision, Outcome, SessionError,
    SessionState, SessionStore, TOKEN_KEY, TokenPhase, ValidationResult,
};

/// Mutable part of the guard. Kept in one struct so the session and its
/// phase are always updated under the same lock.
#[derive(Debug)]
struct Inner {
    session: SessionState,
    phase: TokenPhase,
}

/// Owns the cached session and reconciles it with the remote service.
///
/// Generic over:
/// - `T`: how requests reach the service ([`Transport`])
/// - `S`: where the token and email are persisted ([`SessionStore`])
/// - `F`: how destructive actions are confirmed ([`Confirmer`])
///
/// Share one guard per process behind an `Arc`.
pub struct SessionGuard<T: Transport, S: SessionStore, F: Confirmer> {
    transport: T,
    store: S,
    confirmer: F,
    api: Api<JsonCodec>,
    inner: Mutex<Inner>,
}

impl<T, S, F> SessionGuard<T, S, F>
where
    T: Transport,
    S: SessionStore,
    F: Confirmer,
{
    /// Creates a guard and loads whatever session the store holds.
    ///
    /// No network call is made here; call
    /// [`validate_on_startup`](Self::validate_on_startup) for that.
    pub fn new(transport: T, store: S, confirmer: F) -> Self {
        let session = read_persisted(&store);
        let phase = initial_phase(&session);
        Self {
            transport,
            store,
            confirmer,
            api: Api::new(JsonCodec),
            inner: Mutex::new(Inner { session, phase }),
        }
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    /// A copy of the cached session.
    pub async fn snapshot(&self) -> SessionState {
        self.inner.lock().await.session.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.lock().await.session.token.clone()
    }

    pub async fn email(&self) -> Option<String> {
        self.inner.lock().await.session.email.clone()
    }

    pub async fn phase(&self) -> TokenPhase {
        self.inner.lock().await.phase.clone()
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // =====================================================================
    // Checkpoints
    // =====================================================================

    /// Re-reads the token and email from the store, replacing the
    /// in-memory copy. Never fails; empty slots give an empty session.
    pub async fn load_persisted_session(&self) -> SessionState {
        let session = read_persisted(&self.store);
        let mut inner = self.inner.lock().await;
        inner.phase = initial_phase(&session);
        inner.session = session.clone();
        session
    }

    /// Checks the cached token with the service, if there is one.
    ///
    /// Returns `Ok(None)` when there is no token (nothing is sent).
    /// A rejection clears the cached session and returns an untrusted
    /// [`ValidationResult`].
    ///
    /// # Errors
    /// A transport-class [`SessionError`] means the check was
    /// inconclusive; the cached session is left exactly as it was.
    pub async fn validate_on_startup(
        &self,
    ) -> Result<Option<ValidationResult>, SessionError> {
        let Some(token) = self.token().await else {
            return Ok(None);
        };

        let previous = self.enter_pending(Some(token.clone())).await;
        let response = match self.check(&token).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    token = %token_hint(&token),
                    error = %e,
                    "start-up validation inconclusive, keeping cached session"
                );
                self.restore_phase(previous).await;
                return Err(e);
            }
        };

        let result = ValidationResult::from_response(&response);
        if result.trusted {
            self.inner.lock().await.phase = TokenPhase::Trusted;
            tracing::info!(token = %token_hint(&token), "cached session still valid");
        } else {
            tracing::info!(
                token = %token_hint(&token),
                status = response.status,
                "cached session expired, clearing"
            );
            self.clear_local().await;
        }
        Ok(Some(result))
    }

    /// Decides whether the restricted view may be entered with
    /// `candidate`.
    ///
    /// - granted: the candidate becomes the cached token (the store is
    ///   rewritten only if it changed)
    /// - denied: the cached session is cleared; the caller should send
    ///   the user back to the login view
    ///
    /// # Errors
    /// - [`SessionError::NoActiveSession`] if `candidate` is absent or
    ///   empty; nothing is sent.
    /// - a transport-class error if the check could not be made; access
    ///   is denied but the cached session is untouched.
    pub async fn request_gated_access(
        &self,
        candidate: Option<&str>,
    ) -> Result<GateDecision, SessionError> {
        let candidate = match candidate {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => return Err(SessionError::NoActiveSession),
        };

        let previous = self.enter_pending(Some(candidate.clone())).await;
        let response = match self.check(&candidate).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    token = %token_hint(&candidate),
                    error = %e,
                    "gated access check failed to reach the service"
                );
                self.restore_phase(previous).await;
                return Err(e);
            }
        };

        let validation = ValidationResult::from_response(&response);
        if validation.trusted {
            self.trust(&candidate).await;
            tracing::info!(token = %token_hint(&candidate), "gated access granted");
        } else {
            tracing::info!(
                token = %token_hint(&candidate),
                status = response.status,
                reason = validation.reason.as_deref().unwrap_or_default(),
                "gated access denied, clearing session"
            );
            self.clear_local().await;
        }

        Ok(GateDecision {
            granted: validation.trusted,
            validation,
            response,
        })
    }

    /// Like [`request_gated_access`](Self::request_gated_access), using
    /// the cached token (or, failing that, whatever the store holds).
    pub async fn request_gated_access_current(
        &self,
    ) -> Result<GateDecision, SessionError> {
        let candidate = match self.token().await {
            Some(token) => Some(token),
            None => self.store.get(TOKEN_KEY),
        };
        self.request_gated_access(candidate.as_deref()).await
    }

    /// Asks the service about `token` without touching the cached
    /// session. Backs the "validate session" form.
    ///
    /// # Errors
    /// [`SessionError::MissingField`] for an empty token, or a
    /// transport-class error.
    pub async fn validate(&self, token: &str) -> Result<ApiResponse, SessionError> {
        if token.is_empty() {
            return Err(SessionError::MissingField("token"));
        }
        let response = self.check(token).await?;
        if response.status == 401 {
            tracing::info!(token = %token_hint(token), "service reports no active session");
        }
        Ok(response)
    }

    // =====================================================================
    // Actions
    // =====================================================================

    /// Logs in. If the service answers 2xx with a token, the cached
    /// session is replaced by `(token, correo)` and persisted.
    ///
    /// # Errors
    /// [`SessionError::MissingField`] for an empty email or password, or
    /// a transport-class error. In both cases the cached session is
    /// untouched.
    pub async fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<Outcome, SessionError> {
        if credentials.correo.is_empty() {
            return Err(SessionError::MissingField("correo"));
        }
        if credentials.password.is_empty() {
            return Err(SessionError::MissingField("password"));
        }

        let request = self.api.login(credentials)?;
        let previous = self.enter_pending(None).await;
        let response = match self.exchange(request).await {
            Ok(response) => response,
            Err(e) => {
                self.restore_phase(previous).await;
                return Err(e);
            }
        };

        let token = response
            .token()
            .filter(|_| response.is_success())
            .map(str::to_string);
        match token {
            Some(token) => {
                let session = SessionState::new(token, credentials.correo.clone());
                self.replace(session).await;
                tracing::info!(correo = %email_hint(&credentials.correo), "logged in");
                Ok(Outcome::Accepted(response))
            }
            None => {
                self.restore_phase(previous).await;
                tracing::info!(
                    correo = %email_hint(&credentials.correo),
                    status = response.status,
                    "login refused"
                );
                Ok(Outcome::Rejected(response))
            }
        }
    }

    /// Logs `token` out after the user confirms.
    ///
    /// A declined confirmation returns [`Outcome::Cancelled`] and sends
    /// nothing. A 2xx answer clears the cached session whatever the
    /// body says.
    ///
    /// # Errors
    /// [`SessionError::MissingField`] for an empty token, or a
    /// transport-class error (cached session untouched).
    pub async fn logout(&self, token: &str) -> Result<Outcome, SessionError> {
        if token.is_empty() {
            return Err(SessionError::MissingField("token"));
        }
        if !self.confirmer.confirm(&ConfirmPrompt::logout()).await {
            tracing::debug!("logout cancelled by user");
            return Ok(Outcome::Cancelled);
        }

        let request = self.api.logout(token)?;
        self.destructive(request, Some(token.to_string()), "logout").await
    }

    /// Invalidates every session on the server after a strongly worded
    /// confirmation. Irreversible.
    ///
    /// # Errors
    /// A transport-class error (cached session untouched).
    pub async fn clear_all_sessions(&self) -> Result<Outcome, SessionError> {
        if !self.confirmer.confirm(&ConfirmPrompt::clear_all()).await {
            tracing::debug!("admin clear cancelled by user");
            return Ok(Outcome::Cancelled);
        }

        let request = self.api.admin_clear();
        self.destructive(request, None, "admin clear").await
    }

    // =====================================================================
    // Internals
    // =====================================================================

    /// Shared tail of logout and admin clear: send, and on 2xx drop the
    /// cached session.
    async fn destructive(
        &self,
        request: tokengate_transport::Request,
        candidate: Option<String>,
        action: &'static str,
    ) -> Result<Outcome, SessionError> {
        let previous = self.enter_pending(candidate).await;
        let response = match self.exchange(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(action, error = %e, "request failed, keeping session");
                self.restore_phase(previous).await;
                return Err(e);
            }
        };

        if response.is_success() {
            self.clear_local().await;
            tracing::info!(action, "session cleared");
            Ok(Outcome::Accepted(response))
        } else {
            self.restore_phase(previous).await;
            tracing::info!(action, status = response.status, "request refused");
            Ok(Outcome::Rejected(response))
        }
    }

    async fn check(&self, token: &str) -> Result<ApiResponse, SessionError> {
        self.exchange(self.api.validate(token)).await
    }

    async fn exchange(
        &self,
        request: tokengate_transport::Request,
    ) -> Result<ApiResponse, SessionError> {
        let raw = self.transport.send(request).await?;
        Ok(self.api.decode(raw)?)
    }

    /// Marks a call as outstanding and returns the phase to go back to
    /// if it proves inconclusive.
    async fn enter_pending(&self, candidate: Option<String>) -> TokenPhase {
        let mut inner = self.inner.lock().await;
        let previous = match &inner.phase {
            // A concurrent call is already pending; fall back to what the
            // cached session alone implies.
            TokenPhase::Pending { .. } => initial_phase(&inner.session),
            other => other.clone(),
        };
        inner.phase = TokenPhase::Pending { candidate };
        previous
    }

    async fn restore_phase(&self, previous: TokenPhase) {
        let mut inner = self.inner.lock().await;
        inner.phase = match (&inner.phase, inner.session.token.is_some()) {
            (_, false) => TokenPhase::Absent,
            // Nothing resolved meanwhile.
            (TokenPhase::Pending { .. }, true) => match previous {
                TokenPhase::Absent => TokenPhase::Cached,
                other => other,
            },
            // A call that resolved meanwhile already set the phase.
            (current, true) => current.clone(),
        };
    }

    /// Makes `token` the trusted cached token; email is left alone.
    async fn trust(&self, token: &str) {
        {
            let mut inner = self.inner.lock().await;
            inner.session.token = Some(token.to_string());
            inner.phase = TokenPhase::Trusted;
        }
        if self.store.get(TOKEN_KEY).as_deref() != Some(token) {
            self.persist(TOKEN_KEY, Some(token));
        }
    }

    /// Replaces the whole session (login).
    async fn replace(&self, session: SessionState) {
        self.persist(TOKEN_KEY, session.token.as_deref());
        self.persist(EMAIL_KEY, session.email.as_deref());
        let mut inner = self.inner.lock().await;
        inner.session = session;
        inner.phase = TokenPhase::Trusted;
    }

    /// Drops the cached session from memory and from the store.
    async fn clear_local(&self) {
        {
            let mut inner = self.inner.lock().await;
            inner.session = SessionState::default();
            inner.phase = TokenPhase::Absent;
        }
        self.persist(TOKEN_KEY, None);
        self.persist(EMAIL_KEY, None);
    }

    /// Writes (or removes) one slot. A failed write is logged: the
    /// in-memory session is already correct and stays authoritative for
    /// this process.
    fn persist(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.store.set(key, value),
            None => self.store.remove(key),
        };
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "failed to persist session slot");
        }
    }
}

fn read_persisted<S: SessionStore>(store: &S) -> SessionState {
    SessionState {
        token: store.get(TOKEN_KEY).filter(|t| !t.is_empty()),
        email: store.get(EMAIL_KEY).filter(|e| !e.is_empty()),
    }
}

fn initial_phase(session: &SessionState) -> TokenPhase {
    if session.token.is_some() {
        TokenPhase::Cached
    } else {
        TokenPhase::Absent
    }
}
