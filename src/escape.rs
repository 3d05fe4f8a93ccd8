//! Reserved markers and string escaping.
//!
//! A decoder tells literal strings apart from tagged and cached forms by
//! looking at their first one or two characters, so any user string that
//! starts with a marker gets one extra [`ESC`] in front of it.

use std::borrow::Cow;

/// Escape marker. Starts every tagged scalar string (`~i123`, `~bAQID`).
pub const ESC: &str = "~";
/// Sub-type marker. Starts every cache code (`^0`).
pub const SUB: &str = "^";
/// Reserved marker.
pub const RES: &str = "`";
/// Prefix of a tag used as the key of a single-entry tagged map.
pub const TAG: &str = "~#";
/// Tag of a quoted scalar.
pub const QUOTE: &str = "'";

/// Escapes a raw string for the wire.
///
/// A string beginning with [`RES`] followed by [`ESC`] has already been
/// escaped and only loses its reserved marker. A string beginning with any
/// other marker gets an [`ESC`] prepended. Everything else passes through.
///
/// # Examples
///
/// ```rust
/// use serde_transit::escape::escape;
///
/// assert_eq!(escape("plain"), "plain");
/// assert_eq!(escape("~tilde"), "~~tilde");
/// assert_eq!(escape("^caret"), "~^caret");
/// assert_eq!(escape("`~kept"), "~kept");
/// ```
#[must_use]
pub fn escape(s: &str) -> Cow<'_, str> {
    if s.starts_with(RES) && s[RES.len()..].starts_with(ESC) {
        Cow::Borrowed(&s[RES.len()..])
    } else if s.starts_with(ESC) || s.starts_with(SUB) || s.starts_with(RES) {
        let mut escaped = String::with_capacity(s.len() + ESC.len());
        escaped.push_str(ESC);
        escaped.push_str(s);
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(s)
    }
}
