//! Charset resolution from Content-Type values.

use encoding_rs::Encoding;

/// Parse the charset parameter out of a Content-Type value and resolve it to
/// a text encoding.
///
/// Only the second `;`-separated segment is inspected, matching shapes like
/// `application/json; charset=utf-8`. Returns `None` when no charset
/// parameter is present there or the label is unknown; charset parsing
/// failure is a normal outcome, never an error. Callers substitute UTF-8.
pub fn resolve_encoding(content_type: &str) -> Option<&'static Encoding> {
    let mut segments = content_type.split(';');
    segments.next()?; // media type itself
    let parameter = segments.next()?;

    let mut parts = parameter.split('=');
    if !parts.next()?.trim().eq_ignore_ascii_case("charset") {
        return None;
    }
    let label = parts.next()?.trim();

    Encoding::for_label(label.as_bytes())
}
