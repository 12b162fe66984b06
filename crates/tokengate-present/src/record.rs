//! Display records: one per field of a response payload.
//!
//! [`present`] walks a JSON object in the order the service wrote it and
//! produces one [`DisplayRecord`] per key. Nothing is dropped, and an
//! empty payload still produces something to show (the "no data"
//! sentinel) so callers never render a blank area.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::labels::{icon_for, label_for};
use crate::templates::{ValueTemplate, render};

/// How many characters of a token-shaped string are shown.
pub const TOKEN_PREVIEW_LEN: usize = 20;

/// Text of the sentinel record.
pub const NO_DATA: &str = "No hay datos en la respuesta";

/// Key used when the payload is a bare value instead of an object.
pub const BARE_VALUE_KEY: &str = "respuesta";

/// Shape of the service's session tokens: digits, underscore, digits.
/// Treated as opaque; only used to decide how to display the value.
static TOKEN_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+_[0-9]+$").expect("static regex"));

/// What kind of value a record holds. Drives the CSS class and the
/// terminal styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    /// A long token-shaped string shown truncated.
    Token,
    String,
    /// An array or object, shown as pretty-printed JSON.
    Structured,
    /// The "no data" sentinel.
    Empty,
}

impl ValueKind {
    /// CSS class used in card markup.
    pub fn css_class(self) -> &'static str {
        match self {
            ValueKind::Null => "null-value",
            ValueKind::Boolean => "boolean-value",
            ValueKind::Number => "number-value",
            ValueKind::Token => "token-value",
            ValueKind::String => "string-value",
            ValueKind::Structured => "object-value",
            ValueKind::Empty => "placeholder",
        }
    }
}

/// A formatted value.
///
/// `text` and `detail` are stored unescaped; [`to_html`](Self::to_html)
/// renders them through a template that escapes both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedValue {
    pub kind: ValueKind,
    /// What is displayed.
    pub text: String,
    /// Extra information shown on hover: the full token when `text`
    /// is truncated.
    pub detail: Option<String>,
}

impl RenderedValue {
    fn plain(kind: ValueKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            detail: None,
        }
    }

    /// The value as an escaped `<span>`.
    pub fn to_html(&self) -> String {
        render(&ValueTemplate {
            class: self.kind.css_class(),
            text: &self.text,
            detail: self.detail.as_deref(),
        })
    }
}

/// One rendered field of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    /// The raw key as sent by the service. Empty for the sentinel.
    pub key: String,
    pub label: String,
    pub icon: &'static str,
    pub value: RenderedValue,
}

impl DisplayRecord {
    fn for_field(key: &str, value: &Value) -> Self {
        Self {
            key: key.to_string(),
            label: label_for(key),
            icon: icon_for(key),
            value: format_value(value),
        }
    }

    /// The "no data" sentinel.
    pub fn no_data() -> Self {
        Self {
            key: String::new(),
            label: String::new(),
            icon: "📭",
            value: RenderedValue::plain(ValueKind::Empty, NO_DATA),
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.value.kind == ValueKind::Empty
    }

    /// The value's final, escaped markup.
    pub fn rendered_value(&self) -> String {
        self.value.to_html()
    }
}

/// Formats any JSON value for display. Total: every value maps to
/// something.
///
/// Priority: null, boolean, number, token-shaped string, other string,
/// array/object.
pub fn format_value(value: &Value) -> RenderedValue {
    match value {
        Value::Null => RenderedValue::plain(ValueKind::Null, "null"),
        Value::Bool(b) => RenderedValue::plain(
            ValueKind::Boolean,
            if *b { "✓ Verdadero" } else { "✗ Falso" },
        ),
        Value::Number(n) => RenderedValue::plain(ValueKind::Number, n.to_string()),
        Value::String(s) if is_long_token(s) => RenderedValue {
            kind: ValueKind::Token,
            text: format!(
                "{}...",
                s.chars().take(TOKEN_PREVIEW_LEN).collect::<String>()
            ),
            detail: Some(s.clone()),
        },
        Value::String(s) => RenderedValue::plain(ValueKind::String, s.as_str()),
        Value::Array(_) | Value::Object(_) => RenderedValue::plain(
            ValueKind::Structured,
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
        ),
    }
}

/// `true` for digit-underscore-digit strings too long to show in full.
fn is_long_token(s: &str) -> bool {
    s.chars().count() > TOKEN_PREVIEW_LEN && TOKEN_SHAPE.is_match(s)
}

/// Turns a response payload into display records.
///
/// - object with N ≥ 1 keys → N records, in the object's order
/// - empty object, `null`, or no payload → one [`DisplayRecord::no_data`]
/// - any other bare value → one record under [`BARE_VALUE_KEY`]
pub fn present(data: Option<&Value>) -> Vec<DisplayRecord> {
    match data {
        None | Some(Value::Null) => vec![DisplayRecord::no_data()],
        Some(Value::Object(map)) if map.is_empty() => vec![DisplayRecord::no_data()],
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| DisplayRecord::for_field(key, value))
            .collect(),
        Some(other) => vec![DisplayRecord::for_field(BARE_VALUE_KEY, other)],
    }
}
