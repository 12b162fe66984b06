//! The console: four forms, a view switcher, and a panel per view.
//!
//! This is the layer a front end drives. It never talks to the network
//! itself (every request goes through the shared [`SessionGuard`]), but
//! it decides what the user sees:
//!
//! - which view is active, and whether the admin view may be entered
//! - what each view's panel shows while a request is in flight and
//!   after it finishes
//! - which alerts to pop up
//! - what the token fields of the validate/logout forms are pre-filled
//!   with
//!
//! Every submitted action ends in exactly one [`Panel::Done`] for its
//! view, whether it succeeded, was refused, failed locally or never
//! reached the service. The only exception is a declined confirmation,
//! which puts the panel back the way it was.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokengate_present::{DisplayRecord, RenderedValue, ValueKind, present};
use tokengate_protocol::{ApiResponse, Credentials};
use tokengate_session::{
    Confirmer, Outcome, SessionError, SessionGuard, SessionState, SessionStore,
    ValidationResult,
};
use tokengate_transport::Transport;
use tokio::sync::Mutex;

use crate::view::{Alert, Panel, Render, Severity, View};

const SENDING: &str = "Enviando petición...";
const NO_SESSION: &str = "❌ No hay sesión activa. Por favor, inicia sesión primero.";
const GO_LOGIN: &str = "Por favor, ve a la pestaña de Login e inicia sesión primero.";
const REDIRECTING: &str = "Serás redirigido a la pestaña de Login.";

/// Contents of the token fields that mirror the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forms {
    /// Token field of the "validate session" form.
    pub validate_token: String,
    /// Token field of the logout form.
    pub logout_token: String,
}

impl Forms {
    fn fill(&mut self, token: &str) {
        self.validate_token = token.to_string();
        self.logout_token = token.to_string();
    }
}

#[derive(Debug)]
struct UiState {
    active: View,
    panels: HashMap<View, Panel>,
    alerts: Vec<Alert>,
    forms: Forms,
}

/// Drives the session guard on behalf of a front end.
///
/// Cheap to share: wrap it in an `Arc` if several tasks submit actions.
/// The UI state lock is never held across a network call.
pub struct Console<T: Transport, S: SessionStore, F: Confirmer> {
    guard: Arc<SessionGuard<T, S, F>>,
    redirect_delay: Duration,
    ui: Mutex<UiState>,
}

impl<T, S, F> Console<T, S, F>
where
    T: Transport,
    S: SessionStore,
    F: Confirmer,
{
    /// Creates a console on the login view. Call [`start`](Self::start)
    /// before anything else.
    pub fn new(guard: Arc<SessionGuard<T, S, F>>, redirect_delay: Duration) -> Self {
        Self {
            guard,
            redirect_delay,
            ui: Mutex::new(UiState {
                active: View::Login,
                panels: HashMap::new(),
                alerts: Vec::new(),
                forms: Forms::default(),
            }),
        }
    }

    pub fn guard(&self) -> &Arc<SessionGuard<T, S, F>> {
        &self.guard
    }

    // =====================================================================
    // Start-up
    // =====================================================================

    /// Pre-fills the forms from the cached token, then checks it with the
    /// service. An expired token is dropped and the forms emptied; an
    /// unreachable service leaves everything as it was.
    pub async fn start(&self) -> Result<Option<ValidationResult>, SessionError> {
        let before = self.guard.snapshot().await;
        if let Some(token) = &before.token {
            self.ui.lock().await.forms.fill(token);
        }

        let result = self.guard.validate_on_startup().await;
        self.sync_forms(&before).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "could not validate cached session at start-up");
        }
        result
    }

    // =====================================================================
    // Reading UI state
    // =====================================================================

    pub async fn active_view(&self) -> View {
        self.ui.lock().await.active
    }

    pub async fn panel(&self, view: View) -> Panel {
        self.ui
            .lock()
            .await
            .panels
            .get(&view)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn forms(&self) -> Forms {
        self.ui.lock().await.forms.clone()
    }

    pub async fn set_validate_token(&self, token: impl Into<String>) {
        self.ui.lock().await.forms.validate_token = token.into();
    }

    pub async fn set_logout_token(&self, token: impl Into<String>) {
        self.ui.lock().await.forms.logout_token = token.into();
    }

    /// Returns and forgets the alerts raised so far.
    pub async fn take_alerts(&self) -> Vec<Alert> {
        std::mem::take(&mut self.ui.lock().await.alerts)
    }

    // =====================================================================
    // Navigation
    // =====================================================================

    /// Switches to `view`. Returns whether `view` is now active.
    ///
    /// Ungated views switch immediately. The admin view is entered first
    /// (showing a "verifying" card), then checked; if the check fails the
    /// console waits `redirect_delay` so the reason can be read and moves
    /// to the login view.
    pub async fn switch_view(&self, view: View) -> bool {
        if !view.is_gated() {
            self.activate(view).await;
            return true;
        }

        let candidate = match self.guard.token().await {
            Some(token) => Some(token),
            None => self.guard.store().get(tokengate_session::TOKEN_KEY),
        };
        if candidate.is_none() {
            self.alert(Alert::error(NO_SESSION)).await;
            tracing::debug!("admin view refused locally: no session");
            return false;
        }

        self.set_panel(
            view,
            Panel::verifying("Verificando token activo con el servidor..."),
        )
        .await;
        self.activate(view).await;

        let before = self.guard.snapshot().await;
        let decision = self.guard.request_gated_access(candidate.as_deref()).await;
        self.sync_forms(&before).await;

        let message = match decision {
            Ok(decision) if decision.granted => {
                let render = status_render(
                    Severity::Success,
                    "✅",
                    "Estado",
                    "Token válido. Puedes usar las funciones de administración.",
                    Some(&decision.response),
                );
                self.set_panel(view, Panel::Done(render)).await;
                return true;
            }
            Ok(decision) => format!(
                "Token no válido o expirado: {}",
                decision
                    .validation
                    .reason
                    .as_deref()
                    .unwrap_or(tokengate_protocol::DEFAULT_REJECTION)
            ),
            Err(SessionError::NoActiveSession) => NO_SESSION.to_string(),
            Err(e) => format!("❌ Error al verificar token con el servidor: {e}"),
        };

        self.deny_admin(&message).await;
        false
    }

    async fn deny_admin(&self, message: &str) {
        let render = status_render(
            Severity::Error,
            "❌",
            "Error",
            &format!("{message}\n\n{GO_LOGIN}"),
            None,
        );
        self.set_panel(View::Admin, Panel::Done(render)).await;
        self.alert(Alert::error(format!("{message}\n\n{REDIRECTING}")))
            .await;

        tokio::time::sleep(self.redirect_delay).await;
        self.activate(View::Login).await;
        tracing::info!("admin view denied, redirected to login");
    }

    // =====================================================================
    // Forms
    // =====================================================================

    /// Submits the login form.
    pub async fn submit_login(&self, credentials: &Credentials) -> Render {
        let view = View::Login;
        self.set_panel(view, Panel::sending(SENDING)).await;

        let before = self.guard.snapshot().await;
        let render = match self.guard.login(credentials).await {
            Ok(Outcome::Accepted(resp)) => response_render(&resp, Severity::Success),
            Ok(Outcome::Rejected(resp)) => response_render(&resp, Severity::Error),
            // Login never asks for confirmation.
            Ok(Outcome::Cancelled) => error_render("login cancelado"),
            Err(e) => self.failure_render(&e),
        };
        self.sync_forms(&before).await;
        self.finish(view, render).await
    }

    /// Submits the "validate session" form with `token`. The session
    /// itself is not changed, whatever the answer.
    pub async fn submit_validate(&self, token: &str) -> Render {
        let view = View::Validate;
        self.set_panel(view, Panel::sending(SENDING)).await;

        let render = match self.guard.validate(token).await {
            Ok(resp) => {
                if resp.status == 401 {
                    self.alert(Alert::error(NO_SESSION)).await;
                }
                let severity = if resp.is_success() {
                    Severity::Success
                } else {
                    Severity::Error
                };
                response_render(&resp, severity)
            }
            Err(e) => self.failure_render(&e),
        };
        self.finish(view, render).await
    }

    /// Submits the logout form. Returns `None` if the user declined the
    /// confirmation; the panel is then left as it was.
    pub async fn submit_logout(&self, token: &str) -> Option<Render> {
        let view = View::Logout;
        let previous = self.panel(view).await;
        self.set_panel(view, Panel::sending(SENDING)).await;

        let before = self.guard.snapshot().await;
        let result = self.guard.logout(token).await;
        self.sync_forms(&before).await;
        self.conclude(view, previous, result).await
    }

    /// Submits the admin "clear all sessions" form. Returns `None` if the
    /// user declined the confirmation.
    pub async fn submit_admin_clear(&self) -> Option<Render> {
        let view = View::Admin;
        let previous = self.panel(view).await;
        self.set_panel(view, Panel::sending(SENDING)).await;

        let before = self.guard.snapshot().await;
        let result = self.guard.clear_all_sessions().await;
        self.sync_forms(&before).await;
        self.conclude(view, previous, result).await
    }

    // =====================================================================
    // Internals
    // =====================================================================

    async fn conclude(
        &self,
        view: View,
        previous: Panel,
        result: Result<Outcome, SessionError>,
    ) -> Option<Render> {
        let render = match result {
            Ok(Outcome::Accepted(resp)) => response_render(&resp, Severity::Success),
            Ok(Outcome::Rejected(resp)) => response_render(&resp, Severity::Error),
            Ok(Outcome::Cancelled) => {
                self.set_panel(view, previous).await;
                return None;
            }
            Err(e) => self.failure_render(&e),
        };
        Some(self.finish(view, render).await)
    }

    fn failure_render(&self, err: &SessionError) -> Render {
        match err {
            SessionError::MissingField(field) => {
                error_render(&format!("❌ Por favor, ingresa {}", field_name(field)))
            }
            e if e.is_transport_class() => {
                tracing::warn!(error = %e, "request did not complete");
                error_render(&e.to_string())
            }
            e => error_render(&e.to_string()),
        }
    }

    async fn activate(&self, view: View) {
        let mut ui = self.ui.lock().await;
        if ui.active != view {
            tracing::debug!(from = %ui.active, to = %view, "switching view");
            ui.active = view;
        }
    }

    async fn set_panel(&self, view: View, panel: Panel) {
        self.ui.lock().await.panels.insert(view, panel);
    }

    async fn finish(&self, view: View, render: Render) -> Render {
        self.set_panel(view, Panel::Done(render.clone())).await;
        render
    }

    async fn alert(&self, alert: Alert) {
        self.ui.lock().await.alerts.push(alert);
    }

    /// Keeps the token fields in step with the session: filled when a
    /// new token arrives, emptied when the session is dropped.
    async fn sync_forms(&self, before: &SessionState) {
        let after = self.guard.snapshot().await;
        if after.token == before.token {
            return;
        }
        let mut ui = self.ui.lock().await;
        match &after.token {
            Some(token) => ui.forms.fill(token),
            None => ui.forms = Forms::default(),
        }
    }
}

fn field_name(field: &str) -> &str {
    match field {
        "token" => "un token",
        "correo" => "un correo",
        "password" => "una contraseña",
        other => other,
    }
}

fn response_render(resp: &ApiResponse, severity: Severity) -> Render {
    Render {
        severity,
        status: resp.status,
        elapsed: resp.elapsed,
        records: present(Some(&resp.body)),
    }
}

/// A render for an action that produced no response: status 0 and the
/// message as an `error` field.
fn error_render(message: &str) -> Render {
    Render {
        severity: Severity::Error,
        status: 0,
        elapsed: Duration::ZERO,
        records: present(Some(&json!({ "error": message }))),
    }
}

/// A single status card, optionally carrying the status of the response
/// it summarizes.
fn status_render(
    severity: Severity,
    icon: &'static str,
    label: &str,
    message: &str,
    response: Option<&ApiResponse>,
) -> Render {
    Render {
        severity,
        status: response.map_or(0, |r| r.status),
        elapsed: response.map_or(Duration::ZERO, |r| r.elapsed),
        records: vec![DisplayRecord {
            key: String::new(),
            label: label.to_string(),
            icon,
            value: RenderedValue {
                kind: ValueKind::String,
                text: message.to_string(),
                detail: None,
            },
        }],
    }
}
