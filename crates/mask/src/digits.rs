//! Locale digit classes.
//!
//! Besides ASCII the mask accepts the Arabic-Indic (`U+0660..=U+0669`) and
//! Extended Arabic-Indic (`U+06F0..=U+06F9`) digit sets. Typed glyphs are kept
//! as-is in the displayed text; they are only translated to ASCII when a value
//! is read back or a magnitude is computed for clamping.

use std::borrow::Cow;

const ARABIC_INDIC_ZERO: char = '\u{0660}';
const EXTENDED_ARABIC_INDIC_ZERO: char = '\u{06F0}';

/// Glyph-to-ASCII table for the non-ASCII digit sets.
pub static LOCALE_DIGITS: [(char, char); 20] = [
    ('\u{06F0}', '0'),
    ('\u{06F1}', '1'),
    ('\u{06F2}', '2'),
    ('\u{06F3}', '3'),
    ('\u{06F4}', '4'),
    ('\u{06F5}', '5'),
    ('\u{06F6}', '6'),
    ('\u{06F7}', '7'),
    ('\u{06F8}', '8'),
    ('\u{06F9}', '9'),
    ('\u{0660}', '0'),
    ('\u{0661}', '1'),
    ('\u{0662}', '2'),
    ('\u{0663}', '3'),
    ('\u{0664}', '4'),
    ('\u{0665}', '5'),
    ('\u{0666}', '6'),
    ('\u{0667}', '7'),
    ('\u{0668}', '8'),
    ('\u{0669}', '9'),
];

/// Returns `true` for an ASCII or locale digit.
#[inline]
pub fn is_mask_digit(ch: char) -> bool {
    ch.is_ascii_digit()
        || ('\u{0660}'..='\u{0669}').contains(&ch)
        || ('\u{06F0}'..='\u{06F9}').contains(&ch)
}

/// Returns `true` for the zero glyph of any accepted digit set.
#[inline]
pub fn is_zero_glyph(ch: char) -> bool {
    matches!(ch, '0' | ARABIC_INDIC_ZERO | EXTENDED_ARABIC_INDIC_ZERO)
}

/// Numeric value of a digit glyph from any accepted set.
pub fn digit_value(ch: char) -> Option<u32> {
    if ch.is_ascii_digit() {
        return ch.to_digit(10);
    }
    ascii_for(ch).and_then(|ascii| ascii.to_digit(10))
}

/// ASCII digit for a locale glyph.
fn ascii_for(ch: char) -> Option<char> {
    LOCALE_DIGITS
        .iter()
        .find(|(glyph, _)| *glyph == ch)
        .map(|(_, ascii)| *ascii)
}

/// Replace every locale digit glyph with its ASCII digit.
///
/// Returns `Cow::Borrowed` when the text is already ASCII-only digits-wise.
pub fn to_ascii_digits(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|ch| ascii_for(ch).is_some()) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().map(|ch| ascii_for(ch).unwrap_or(ch)).collect())
}

/// Keep only digit glyphs.
pub fn only_digits(s: &str) -> String {
    s.chars().filter(|ch| is_mask_digit(*ch)).collect()
}
