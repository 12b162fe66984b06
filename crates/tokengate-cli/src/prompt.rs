//! Terminal prompts: confirmations and the hidden password read.
//!
//! `dialoguer` blocks on the terminal, so every prompt runs on the
//! blocking pool.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Password};
use tokengate::prelude::{AutoConfirm, ConfirmPrompt, Confirmer, Tone};

/// Asks on the terminal, defaulting to "no".
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirmer for TerminalConfirm {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        let question = question(prompt);
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(question)
                .default(false)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(yes)) => yes,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "confirmation prompt failed, treating as no");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "confirmation prompt task failed, treating as no");
                false
            }
        }
    }
}

/// Either `--yes` or an interactive prompt.
#[derive(Debug, Clone, Copy)]
pub enum CliConfirm {
    Auto(AutoConfirm),
    Prompt(TerminalConfirm),
}

impl CliConfirm {
    pub fn new(assume_yes: bool) -> Self {
        if assume_yes {
            Self::Auto(AutoConfirm(true))
        } else {
            Self::Prompt(TerminalConfirm)
        }
    }
}

impl Confirmer for CliConfirm {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        match self {
            Self::Auto(auto) => auto.confirm(prompt).await,
            Self::Prompt(terminal) => terminal.confirm(prompt).await,
        }
    }
}

/// Reads a password without echoing it.
pub async fn password(label: &'static str) -> Result<String, String> {
    tokio::task::spawn_blocking(move || {
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .interact()
    })
    .await
    .map_err(|e| e.to_string())?
    .map_err(|e| e.to_string())
}

fn question(prompt: &ConfirmPrompt) -> String {
    let banner = match prompt.tone {
        Tone::Warning => "",
        Tone::Danger => "!!! ",
    };
    format!(
        "{banner}{}\n{}\n{}",
        prompt.title, prompt.message, prompt.confirm_label
    )
}
