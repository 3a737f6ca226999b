//! Display width of stored codepoints.

use unicode_width::UnicodeWidthChar;

/// Terminal cells occupied by `c`: 0, 1 or 2.
///
/// Tab counts as one cell (the renderer draws it as a space); other
/// control characters are not drawn and take no cells.
#[inline]
#[must_use]
pub fn char_width(c: char) -> usize {
    // Fast path: printable ASCII
    if c.is_ascii() && (' '..='~').contains(&c) {
        return 1;
    }
    if c == '\t' {
        return 1;
    }
    if c.is_control() {
        return 0;
    }
    UnicodeWidthChar::width(c).unwrap_or(0).min(2)
}

/// Sum of [`char_width`] over `chars`.
pub fn chars_width(chars: impl IntoIterator<Item = char>) -> usize {
    chars.into_iter().map(char_width).sum()
}
