//! # Payload Fence Unwrapping
//!
//! Providers often wrap their structured reply in Markdown code fences.
//! The rules here are exact: the first fenced block wins, a json-tagged
//! fence is preferred over a bare one, and with no fences the whole
//! trimmed text is the payload.

/// Extract the structured payload from raw reply text.
///
/// A json-tagged fenced block wins over a bare fenced block; the first
/// match of the winning kind is the payload. Without any complete
/// fenced block the whole text, trimmed, is the payload.
pub fn unwrap_fences(text: &str) -> &str {
    if let Some(inner) = fenced_block(text, "```json") {
        return inner;
    }
    if let Some(inner) = fenced_block(text, "```") {
        return inner;
    }
    text.trim()
}

/// Contents of the first block opened by `tag` and closed by ```
fn fenced_block<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let start = text.find(tag)? + tag.len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}
