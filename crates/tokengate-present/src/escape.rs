//! HTML escaping.
//!
//! Markup is produced by the askama templates, which escape every
//! interpolated string. [`escape_html`] exposes the same escaper for
//! callers that build their own markup around records.

use crate::templates::{TextTemplate, render};

/// Escapes `text` with askama's HTML escaper: `&`, `<`, `>`, `"` and `'`
/// become entities, so the result is safe both as element text and
/// inside a quoted attribute.
pub fn escape_html(text: &str) -> String {
    render(&TextTemplate { text })
}
