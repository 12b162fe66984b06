//! `TokengateBuilder`: wires transport, guard and console together.

use std::sync::Arc;

use tokengate_session::{Confirmer, SessionGuard, SessionStore};
use tokengate_transport::{HttpTransport, Transport};

use crate::{ClientConfig, Console, TokengateError};

/// Builder for a [`Console`] talking to a session service.
///
/// # Example
///
/// ```rust,no_run
/// use tokengate::prelude::*;
///
/// # async fn run() -> Result<(), TokengateError> {
/// let console = TokengateBuilder::new()
///     .base_url("http://localhost:8080")
///     .timeout_secs(10)
///     .build_http(MemoryStore::new(), AutoConfirm(true))?;
/// console.start().await.ok();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokengateBuilder {
    config: ClientConfig,
}

impl TokengateBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the base address of the session service.
    pub fn base_url(mut self, url: &str) -> Self {
        self.config.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, agent: &str) -> Self {
        self.config.user_agent = agent.to_string();
        self
    }

    /// Sets how long a denied admin check stays on screen.
    pub fn redirect_delay_ms(mut self, ms: u64) -> Self {
        self.config.redirect_delay_ms = ms;
        self
    }

    pub fn client_config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds a console over HTTP.
    ///
    /// No request is sent; call [`Console::start`] to check the cached
    /// session.
    ///
    /// # Errors
    /// [`TokengateError::Transport`] if the base address is not an
    /// `http(s)://` URL or the HTTP client cannot be created.
    pub fn build_http<S, F>(
        self,
        store: S,
        confirmer: F,
    ) -> Result<Console<HttpTransport, S, F>, TokengateError>
    where
        S: SessionStore,
        F: Confirmer,
    {
        let transport = HttpTransport::new(self.config.http())?;
        Ok(self.build_with_transport(transport, store, confirmer))
    }

    /// Builds a console over any transport. Used by tests and embedders
    /// that bring their own.
    pub fn build_with_transport<T, S, F>(
        self,
        transport: T,
        store: S,
        confirmer: F,
    ) -> Console<T, S, F>
    where
        T: Transport,
        S: SessionStore,
        F: Confirmer,
    {
        let guard = Arc::new(SessionGuard::new(transport, store, confirmer));
        Console::new(guard, self.config.redirect_delay())
    }
}
