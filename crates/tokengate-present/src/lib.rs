//! Response presentation for Tokengate.
//!
//! Turns whatever JSON the session service returned into a list of
//! [`DisplayRecord`]s (label, icon, formatted value), then into HTML
//! cards or terminal text.
//!
//! ```rust
//! use serde_json::json;
//! use tokengate_present::{present, render_text};
//!
//! let records = present(Some(&json!({ "mensaje": "Acceso permitido" })));
//! assert_eq!(records.len(), 1);
//! assert_eq!(render_text(&records), "💬 Mensaje: Acceso permitido\n");
//! ```
//!
//! Presentation never fails: every JSON value has a display form. HTML
//! comes from askama templates, so every interpolated string is escaped.

mod escape;
mod labels;
mod record;
mod render;
mod templates;

pub use escape::escape_html;
pub use labels::{FALLBACK_ICON, icon_for, label_for};
pub use record::{
    BARE_VALUE_KEY, DisplayRecord, NO_DATA, RenderedValue, TOKEN_PREVIEW_LEN,
    ValueKind, format_value, present,
};
pub use render::{render_cards, render_text, simple_card};
