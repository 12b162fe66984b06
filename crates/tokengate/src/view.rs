//! Views, panels and alerts: what the console shows.
//!
//! The console has four views, one per form. Each view owns a
//! [`Panel`] where the result of its last action is shown. Alerts are
//! one-off notices the front end should pop up (and then drain).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tokengate_present::{DisplayRecord, render_cards, render_text, simple_card};

use crate::TokengateError;

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// One of the console's tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    /// "Validar sesión": check any token without touching the session.
    Validate,
    Logout,
    /// Restricted: entering it requires a successful validation.
    Admin,
}

impl View {
    pub const ALL: [View; 4] = [View::Login, View::Validate, View::Logout, View::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            View::Login => "login",
            View::Validate => "servicio",
            View::Logout => "logout",
            View::Admin => "admin",
        }
    }

    /// Whether entering this view goes through the session guard.
    pub fn is_gated(self) -> bool {
        matches!(self, View::Admin)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = TokengateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .or_else(|| s.eq_ignore_ascii_case("validate").then_some(View::Validate))
            .ok_or_else(|| TokengateError::UnknownView(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// How a result or alert should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Short badge for a response panel.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "ℹ️ Info",
            Severity::Success => "✅ Éxito",
            Severity::Warning => "⚠️ Advertencia",
            Severity::Error => "❌ Error",
        }
    }

    /// Title of an alert dialog.
    pub fn title(self) -> &'static str {
        match self {
            Severity::Info => "ℹ️ Información",
            Severity::Success => "✅ Éxito",
            Severity::Warning => "⚠️ Advertencia",
            Severity::Error => "❌ Error",
        }
    }
}

// ---------------------------------------------------------------------------
// Render / Panel
// ---------------------------------------------------------------------------

/// The terminal result of one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Render {
    pub severity: Severity,
    /// HTTP status, or 0 when no response was received.
    pub status: u16,
    pub elapsed: Duration,
    pub records: Vec<DisplayRecord>,
}

impl Render {
    pub fn html(&self) -> String {
        render_cards(&self.records)
    }

    pub fn text(&self) -> String {
        let mut out = self.severity.label().to_string();
        if self.status != 0 {
            out.push_str(&format!(
                " · HTTP {} · {} ms",
                self.status,
                self.elapsed.as_millis()
            ));
        }
        out.push('\n');
        out.push_str(&render_text(&self.records));
        out
    }
}

/// What a view's response area currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Panel {
    /// Nothing has happened in this view yet.
    #[default]
    Idle,
    /// A request is in flight. `label` names what is happening
    /// ("Enviando", "Verificando").
    Pending { label: &'static str, message: String },
    /// The last action finished.
    Done(Render),
}

impl Panel {
    /// A request was sent.
    pub fn sending(message: impl Into<String>) -> Self {
        Panel::Pending {
            label: "Enviando",
            message: message.into(),
        }
    }

    /// A token is being checked with the service.
    pub fn verifying(message: impl Into<String>) -> Self {
        Panel::Pending {
            label: "Verificando",
            message: message.into(),
        }
    }

    pub fn html(&self) -> String {
        match self {
            Panel::Idle => String::new(),
            Panel::Pending { label, message } => simple_card("⏳", label, message),
            Panel::Done(render) => render.html(),
        }
    }

    pub fn text(&self) -> String {
        match self {
            Panel::Idle => String::new(),
            Panel::Pending { label, message } => format!("⏳ {label}: {message}\n"),
            Panel::Done(render) => render.text(),
        }
    }

    pub fn render(&self) -> Option<&Render> {
        match self {
            Panel::Done(render) => Some(render),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Alert
// ---------------------------------------------------------------------------

/// A notice the front end should surface immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
}

impl Alert {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn title(&self) -> &'static str {
        self.severity.title()
    }
}
