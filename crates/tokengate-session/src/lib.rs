//! Session reconciliation for Tokengate.
//!
//! This crate owns the answer to "is there a session token we trust right
//! now?":
//!
//! 1. **Persistence**: the token and email live in a [`SessionStore`]
//!    ([`MemoryStore`], [`FileStore`])
//! 2. **Reconciliation**: the [`SessionGuard`] re-checks the token with
//!    the service at fixed checkpoints and clears it when refused
//! 3. **Confirmation**: destructive actions await a [`Confirmer`]
//!
//! # How it fits in the stack
//!
//! ```text
//! Console (above)  ← switches views, renders responses
//!     ↕
//! Session Layer (this crate)  ← owns the cached token
//!     ↕
//! Protocol Layer (below)  ← builds requests, decodes ApiResponse
//! ```

#![allow(async_fn_in_trait)]

mod confirm;
mod error;
mod guard;
mod state;
mod store;

pub use confirm::{AutoConfirm, ConfirmPrompt, Confirmer, Tone};
pub use error::SessionError;
pub use guard::SessionGuard;
pub use state::{GateDecision, Outcome, SessionState, TokenPhase, ValidationResult};
pub use store::{EMAIL_KEY, FileStore, MemoryStore, SessionStore, StoreError, TOKEN_KEY};
