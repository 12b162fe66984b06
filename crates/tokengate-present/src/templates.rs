//! Askama templates for the HTML side of the presenter.
//!
//! Every `{{ ... }}` in these templates is HTML-escaped by askama. The
//! only unescaped slot is the card's `value_html`, which always holds the
//! output of another template here.

use askama::Template;

/// One response card.
#[derive(Template)]
#[template(path = "card.html")]
pub(crate) struct CardTemplate<'a> {
    pub icon: &'a str,
    pub label: &'a str,
    /// Already-rendered value markup.
    pub value_html: &'a str,
}

/// A formatted value as a `<span>`, with the full token as its `title`
/// when the text is truncated.
#[derive(Template)]
#[template(path = "value.html")]
pub(crate) struct ValueTemplate<'a> {
    pub class: &'a str,
    pub text: &'a str,
    pub detail: Option<&'a str>,
}

/// Shown instead of cards when a response carried no data.
#[derive(Template)]
#[template(path = "placeholder.html")]
pub(crate) struct PlaceholderTemplate<'a> {
    pub text: &'a str,
}

/// Plain escaped text.
#[derive(Template)]
#[template(source = "{{ text }}", ext = "html")]
pub(crate) struct TextTemplate<'a> {
    pub text: &'a str,
}

/// Renders `template`. Our templates only interpolate strings, so a
/// failure means a broken template; it is logged and yields nothing.
pub(crate) fn render<T: Template>(template: &T) -> String {
    template.render().unwrap_or_else(|e| {
        tracing::error!(error = %e, "template rendering failed");
        String::new()
    })
}
