//! Icon and label per response key.
//!
//! The table covers the keys the session service is known to send.
//! Lookups are case-insensitive; anything else gets [`FALLBACK_ICON`]
//! and the raw key with its first letter capitalized.

/// Icon for keys the table doesn't know.
pub const FALLBACK_ICON: &str = "📋";

/// `(key, icon, label)`. A `None` label means "use the capitalized key".
const KEYS: &[(&str, &str, Option<&str>)] = &[
    ("token", "🔑", Some("Token de Sesión")),
    ("mensaje", "💬", Some("Mensaje")),
    ("correo", "📧", Some("Correo Electrónico")),
    ("error", "❌", Some("Error")),
    ("detalle", "📝", Some("Detalle")),
    ("password", "🔒", Some("Contraseña")),
    ("email", "📧", None),
];

fn lookup(key: &str) -> Option<&'static (&'static str, &'static str, Option<&'static str>)> {
    KEYS.iter().find(|(k, _, _)| k.eq_ignore_ascii_case(key))
}

/// The icon shown next to `key`.
pub fn icon_for(key: &str) -> &'static str {
    lookup(key).map_or(FALLBACK_ICON, |&(_, icon, _)| icon)
}

/// The human label for `key` (unescaped).
pub fn label_for(key: &str) -> String {
    match lookup(key).and_then(|(_, _, label)| *label) {
        Some(label) => label.to_string(),
        None => capitalize(key),
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
