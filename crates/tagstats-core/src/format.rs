//! Display formatting applied when an event is recorded.
//!
//! URL-like string data is rewritten into an HTML link so drill-down views can
//! render it directly. The transform is lossy: only the display form is stored.

use serde_json::Value;

use crate::data::Datum;

/// Rewrite a datum into the form kept in the ring buffer.
///
/// Strings starting with `http` become `<a href='URL'>URL</a>`; everything
/// else, including `null`, passes through untouched.
pub fn display_form(datum: Datum) -> Datum {
    match datum {
        Value::String(s) if s.starts_with("http") => Value::String(link(&s)),
        other => other,
    }
}

fn link(url: &str) -> String {
    format!("<a href='{url}'>{url}</a>")
}
