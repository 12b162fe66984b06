//! # Tokengate
//!
//! Client for a token-based session service.
//!
//! Tokengate keeps one cached session (a token and the email it was issued
//! for), persists it between runs, and reconciles it with the service at
//! fixed checkpoints: at start-up, on entering the restricted admin view,
//! and after every login, logout and "clear all sessions". Answers are
//! turned into display records ready for a terminal or an HTML page.
//!
//! The layers, bottom-up:
//!
//! - [`tokengate_transport`]: sends a request, returns status and body
//! - [`tokengate_protocol`]: endpoints, credentials, response decoding
//! - [`tokengate_session`]: the session guard, the store and confirmations
//! - [`tokengate_present`]: display records and their rendering
//! - this crate: configuration, the [`Console`] a front end drives, and
//!   logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tokengate::prelude::*;
//!
//! # async fn run() -> Result<(), TokengateError> {
//! let console = TokengateBuilder::new()
//!     .base_url("http://localhost:8080")
//!     .build_http(MemoryStore::new(), AutoConfirm(true))?;
//!
//! let render = console
//!     .submit_login(&Credentials::new("ana@example.com", "secreto"))
//!     .await;
//! print!("{}", render.text());
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod console;
mod error;
mod logging;
mod view;

pub use builder::TokengateBuilder;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use console::{Console, Forms};
pub use error::TokengateError;
pub use logging::{LogFormat, LoggingConfig, init_logging};
pub use view::{Alert, Panel, Render, Severity, View};

pub use tokengate_present;
pub use tokengate_protocol;
pub use tokengate_session;
pub use tokengate_transport;

/// Everything a front end usually needs, in one import.
pub mod prelude {
    pub use crate::{
        Alert, ClientConfig, Console, Forms, Panel, Render, Severity, TokengateBuilder,
        TokengateError, View,
    };
    pub use tokengate_present::{DisplayRecord, present, render_cards, render_text};
    pub use tokengate_protocol::{ApiResponse, Credentials};
    pub use tokengate_session::{
        AutoConfirm, ConfirmPrompt, Confirmer, FileStore, MemoryStore, Outcome, SessionGuard,
        SessionState, SessionStore, Tone, ValidationResult,
    };
    pub use tokengate_transport::{HttpTransport, Transport};
}
