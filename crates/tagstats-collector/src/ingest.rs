//! Line-oriented event input: `tag<TAB>datum`.

use tagstats_core::Datum;

/// Parse one input line into an event.
///
/// The datum is taken as JSON when it parses, otherwise as a plain string.
/// A line without a tab records a null datum. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<(String, Datum)> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    let Some((tag, raw)) = line.split_once('\t') else {
        return Some((line.to_string(), Datum::Null));
    };

    let datum = serde_json::from_str::<Datum>(raw).unwrap_or_else(|_| Datum::String(raw.to_string()));
    Some((tag.to_string(), datum))
}
