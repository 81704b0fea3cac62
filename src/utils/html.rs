//! HTML utility functions.
//!
//! - `escape_attr()` - attribute value escaping
//! - `inject_before_body_end()` - splice markup before `</body>`

use std::borrow::Cow;

/// Characters that require escaping inside a double-quoted attribute.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape an attribute value.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape_attr("icon-home"), "icon-home"); // No allocation
/// assert_eq!(escape_attr("a\"b"), "a&quot;b");
/// ```
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Insert `snippet` right before the last `</body>` tag.
///
/// The tag is matched ASCII case-insensitively. The last occurrence is the
/// document's own: an earlier `</body>` can only sit inside a script or
/// comment. Returns `None` when the document has no closing body tag.
pub fn inject_before_body_end(html: &str, snippet: &str) -> Option<String> {
    const PATTERN: &[u8] = b"</body>";

    let pos = html
        .as_bytes()
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))?;

    let mut result = String::with_capacity(html.len() + snippet.len());
    result.push_str(&html[..pos]);
    result.push_str(snippet);
    result.push_str(&html[pos..]);
    Some(result)
}
