//! SVG sanitization
//!
//! Both renderer output and passthrough SVG from the backend are treated as
//! semi-trusted. Before display, active content is stripped: script and
//! embedding elements, inline event handlers and `javascript:` URLs.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static ACTIVE_ELEMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|iframe|object|embed)\b[^>]*>.*?</(script|iframe|object|embed)\s*>")
        .expect("valid active element pattern")
});

static SELF_CLOSING_ACTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|iframe|object|embed)\b[^>]*/?>").expect("valid self-closing pattern")
});

static EVENT_HANDLERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#)
        .expect("valid event handler pattern")
});

// Browsers accept `/` as an attribute separator, e.g. `<svg/onload=...>`
static SLASH_EVENT_HANDLERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(<[a-z][\w:.-]*|["'])/+on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#)
        .expect("valid slash event handler pattern")
});

static SCRIPT_URLS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)((?:xlink:)?href)\s*=\s*("\s*javascript:[^"]*"|'\s*javascript:[^']*'|javascript:[^\s>]*)"#,
    )
    .expect("valid script url pattern")
});

/// Remove handlers until none remain; each pass shortens the markup
fn strip_event_handlers(markup: &str) -> String {
    let mut current = markup.to_string();
    loop {
        let next = EVENT_HANDLERS.replace_all(&current, "");
        let next = SLASH_EVENT_HANDLERS.replace_all(&next, "${1}").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Strip active content from SVG markup
///
/// Idempotent: sanitizing already-sanitized markup returns it unchanged.
pub fn sanitize_svg(markup: &str) -> String {
    let stripped = ACTIVE_ELEMENTS.replace_all(markup, "");
    let stripped = SELF_CLOSING_ACTIVE.replace_all(&stripped, "");
    let stripped = strip_event_handlers(&stripped);
    let stripped = SCRIPT_URLS.replace_all(&stripped, "${1}=\"#\"");

    if stripped.len() != markup.len() {
        debug!(
            before = markup.len(),
            after = stripped.len(),
            "Removed active content from SVG"
        );
    }
    stripped.into_owned()
}
