//! Char-indexed text utilities for field handling.
//!
//! Field positions (caret, selection bounds) count Unicode scalar values, not
//! bytes. Locale digits such as `U+0660` are multi-byte in UTF-8 but occupy a
//! single caret slot, so every slice or lookup goes through these helpers.

/// Number of caret slots in `s`.
///
/// # Examples
///
/// ```
/// use input_core::char_len;
///
/// assert_eq!(char_len("R$ 1.00"), 7);
/// assert_eq!(char_len("\u{0661}\u{0662}"), 2);
/// ```
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the caret slot `index`.
///
/// Indices past the end are clamped to `s.len()`.
///
/// # Examples
///
/// ```
/// use input_core::byte_offset;
///
/// let s = "a\u{0661}b"; // U+0661 is 2 bytes
/// assert_eq!(byte_offset(s, 0), 0);
/// assert_eq!(byte_offset(s, 1), 1);
/// assert_eq!(byte_offset(s, 2), 3);
/// assert_eq!(byte_offset(s, 3), 4);
/// assert_eq!(byte_offset(s, 100), 4);
/// ```
pub fn byte_offset(s: &str, index: usize) -> usize {
    s.char_indices()
        .nth(index)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

/// Substring between two caret slots.
///
/// Both bounds are clamped to the text and swapped when reversed, so any
/// pair of positions yields a valid slice.
///
/// # Examples
///
/// ```
/// use input_core::slice_chars;
///
/// assert_eq!(slice_chars("1,234.50", 2, 5), "234");
/// assert_eq!(slice_chars("1,234.50", 5, 2), "234");
/// assert_eq!(slice_chars("1,234.50", 6, 99), "50");
/// ```
pub fn slice_chars(s: &str, start: usize, end: usize) -> &str {
    let (start, end) = (start.min(end), start.max(end));
    let from = byte_offset(s, start);
    let to = byte_offset(s, end);
    &s[from..to]
}

/// The character occupying caret slot `index`, if any.
#[inline]
pub fn char_at(s: &str, index: usize) -> Option<char> {
    s.chars().nth(index)
}

/// Caret slot of the first occurrence of `needle`.
pub fn find_char(s: &str, needle: char) -> Option<usize> {
    s.chars().position(|ch| ch == needle)
}

/// Clamp a possibly negative position computed with signed caret
/// arithmetic into `0..=len`.
#[inline]
pub fn clamp_position(position: isize, len: usize) -> usize {
    if position <= 0 {
        0
    } else {
        (position as usize).min(len)
    }
}
