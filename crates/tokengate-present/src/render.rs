//! Turning records into something to show: HTML cards or plain text.

use crate::escape::escape_html;
use crate::record::{DisplayRecord, NO_DATA};
use crate::templates::{CardTemplate, PlaceholderTemplate, render};

/// Renders records as HTML cards.
///
/// The "no data" sentinel becomes a placeholder paragraph instead of an
/// empty card.
pub fn render_cards(records: &[DisplayRecord]) -> String {
    if records.is_empty() || records.iter().all(DisplayRecord::is_no_data) {
        return render(&PlaceholderTemplate { text: NO_DATA });
    }
    records
        .iter()
        .filter(|r| !r.is_no_data())
        .map(|r| {
            render(&CardTemplate {
                icon: r.icon,
                label: &r.label,
                value_html: &r.rendered_value(),
            })
        })
        .collect()
}

/// A one-off status card ("⏳ Verificando", "❌ Error", ...).
pub fn simple_card(icon: &str, label: &str, message: &str) -> String {
    render(&CardTemplate {
        icon,
        label,
        value_html: &escape_html(message),
    })
}

/// Renders records for a terminal: `icon label: value`, one per line.
/// Multi-line values (pretty JSON) are indented under their label, and a
/// truncated token shows its full value on the next line.
pub fn render_text(records: &[DisplayRecord]) -> String {
    let mut out = String::new();
    for record in records {
        if record.is_no_data() {
            out.push_str(&format!("{} {}\n", record.icon, record.value.text));
            continue;
        }
        let mut lines = record.value.text.lines();
        let first = lines.next().unwrap_or_default();
        out.push_str(&format!("{} {}: {}\n", record.icon, record.label, first));
        for line in lines {
            out.push_str(&format!("    {line}\n"));
        }
        if let Some(detail) = &record.value.detail {
            out.push_str(&format!("    ({detail})\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present;
    use serde_json::json;

    #[test]
    fn test_render_cards_sentinel_is_placeholder() {
        let html = render_cards(&present(None));
        assert_eq!(
            html,
            r#"<p class="placeholder">No hay datos en la respuesta</p>"#
        );
        assert_eq!(render_cards(&[]), html);
    }

    #[test]
    fn test_render_cards_one_card_per_record() {
        let records = present(Some(&json!({ "mensaje": "ok", "error": "no" })));
        let html = render_cards(&records);
        assert_eq!(html.matches(r#"class="response-card-simple""#).count(), 2);
        assert!(html.contains(r#"<div class="card-label-simple">Mensaje</div>"#));
    }

    #[test]
    fn test_render_cards_escapes_hostile_key_as_label() {
        let records = present(Some(&json!({ "<script>": "x" })));
        let html = render_cards(&records);
        assert!(!html.contains("<script>"));
        let label = html
            .split(r#"<div class="card-label-simple">"#)
            .nth(1)
            .and_then(|rest| rest.split("</div>").next())
            .unwrap();
        assert!(crate::escape::tests::is_inert(label), "{label}");
        assert!(label.contains("script"));
    }

    #[test]
    fn test_simple_card_escapes_message() {
        let html = simple_card("❌", "Error", "token <inválido>");
        assert!(!html.contains("<inválido>"));
        assert!(html.contains(&format!(
            r#"<div class="card-value-simple">{}</div>"#,
            escape_html("token <inválido>")
        )));
        assert!(html.contains(r#"<div class="card-icon-simple">❌</div>"#));
    }

    #[test]
    fn test_render_text_lines() {
        let records = present(Some(&json!({
            "mensaje": "Acceso permitido",
            "token": "12345678901234567890_98765",
            "extra": { "a": 1 }
        })));
        let text = render_text(&records);
        assert_eq!(
            text,
            "💬 Mensaje: Acceso permitido\n\
             🔑 Token de Sesión: 12345678901234567890...\n    (12345678901234567890_98765)\n\
             📋 Extra: {\n      \"a\": 1\n    }\n"
        );
    }

    #[test]
    fn test_render_text_sentinel() {
        assert_eq!(
            render_text(&present(Some(&json!({})))),
            "📭 No hay datos en la respuesta\n"
        );
    }
}
