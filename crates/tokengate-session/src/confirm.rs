//! Confirmation hook for destructive actions.
//!
//! Logging out and clearing every session both ask the user first. The
//! session guard doesn't know HOW the question is asked (terminal
//! prompt, modal dialog, test double); it only awaits a `bool` from
//! a [`Confirmer`].

/// How alarming the confirmation should look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Reversible or self-affecting (logging yourself out).
    Warning,
    /// Irreversible and affects other users (clearing every session).
    Danger,
}

/// The question put to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    /// Label of the "yes" button.
    pub confirm_label: String,
    pub tone: Tone,
}

impl ConfirmPrompt {
    /// Prompt shown before `POST /logout`.
    pub fn logout() -> Self {
        Self {
            title: "🚪 Cerrar Sesión".to_string(),
            message: "¿Está seguro de que desea cerrar la sesión?".to_string(),
            confirm_label: "Cerrar Sesión".to_string(),
            tone: Tone::Warning,
        }
    }

    /// Prompt shown before `POST /admin/clear`. States that the action
    /// cannot be undone.
    pub fn clear_all() -> Self {
        Self {
            title: "⚠️ Eliminar Todas las Sesiones".to_string(),
            message: "¿Está seguro de que desea eliminar TODAS las sesiones?\n\n\
                      Esta acción no se puede deshacer y eliminará todas las \
                      sesiones activas del servidor."
                .to_string(),
            confirm_label: "Eliminar Todo".to_string(),
            tone: Tone::Danger,
        }
    }
}

/// Asks the user to confirm an action.
///
/// Resolves to `true` only on an explicit "yes". Dismissing the prompt
/// in any other way (cancel button, Escape, closed input) is `false`.
pub trait Confirmer: Send + Sync + 'static {
    fn confirm(
        &self,
        prompt: &ConfirmPrompt,
    ) -> impl std::future::Future<Output = bool> + Send;
}

/// A [`Confirmer`] that answers every prompt the same way.
///
/// `AutoConfirm(true)` backs the CLI's `--yes` flag.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirmer for AutoConfirm {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        tracing::debug!(title = %prompt.title, answer = self.0, "auto-confirm");
        self.0
    }
}
