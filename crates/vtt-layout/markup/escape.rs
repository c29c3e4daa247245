//! Character reference decoding for cue text runs
//!
//! Only the six references cue text may contain are recognised. Decoding is a
//! single left-to-right scan: the replacement for one reference is never
//! rescanned, so `&amp;lt;` decodes to the literal `&lt;`. Unknown or
//! unterminated references stay as written.

use std::borrow::Cow;

/// Recognised references and their replacements
const ENTITIES: &[(&str, char)] = &[
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&lrm;", '\u{200E}'),
    ("&rlm;", '\u{200F}'),
    ("&nbsp;", '\u{00A0}'),
];

/// Decode character references in a text run
///
/// Borrows the input when it contains no `&`.
///
/// # Example
///
/// ```rust
/// use vtt_layout::markup::decode_entities;
///
/// assert_eq!(decode_entities("a &lt;b&gt; c"), "a <b> c");
/// assert_eq!(decode_entities("&amp;lt;"), "&lt;");
/// assert_eq!(decode_entities("fish &chips"), "fish &chips");
/// ```
#[must_use]
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        if let Some((entity, replacement)) = ENTITIES
            .iter()
            .find(|(entity, _)| tail.starts_with(entity))
        {
            out.push(*replacement);
            rest = &tail[entity.len()..];
        } else {
            out.push('&');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
