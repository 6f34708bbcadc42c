//! HTML escaping for generated tags.

use std::borrow::Cow;

/// Characters that cannot appear raw inside a quoted attribute value.
const ATTR_SPECIAL: [char; 5] = ['<', '>', '&', '"', '\''];

#[inline]
fn entity(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape a value for use inside a double-quoted attribute.
///
/// Borrows when nothing needs escaping, which is the common case for
/// hashed bundle file names.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(ATTR_SPECIAL) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match entity(c) {
            Some(e) => out.push_str(e),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}
