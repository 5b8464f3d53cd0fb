//! Value ⇄ text conversion.
//!
//! [`apply_mask`] turns either a number or arbitrary (possibly half-edited)
//! text into the canonical masked form `sign? prefix integer (decimal digits)? suffix`.
//! [`clear_mask`] reads a masked text back into a number.

use crate::config::MaskConfig;
use crate::digits::{digit_value, is_zero_glyph, only_digits, to_ascii_digits};
use core_types::{InputMode, NumericValue};
use std::borrow::Cow;

/// Input to [`apply_mask`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaskSource<'a> {
    /// A model value; it is rounded to the configured precision first.
    Number(f64),
    /// Displayed or edited text; only its digits and `-` are significant.
    Text(&'a str),
}

/// Format a model value for display. `None` formats to the empty string.
pub fn format_value(config: &MaskConfig, value: NumericValue) -> String {
    match value {
        Some(value) => apply_mask(config, MaskSource::Number(value), false),
        None => String::new(),
    }
}

/// Re-mask edited text. With `disable_pad_and_trim`, Natural mode keeps the
/// decimal digits exactly as they sit in `text`.
pub fn mask_text(config: &MaskConfig, text: &str, disable_pad_and_trim: bool) -> String {
    apply_mask(config, MaskSource::Text(text), disable_pad_and_trim)
}

/// Build the masked text for `source`.
///
/// Digits are split so the last `precision` of them form the decimal part.
/// Text sources in Natural mode are first passed through
/// [`pad_or_trim_precision`] unless `disable_pad_and_trim` is set, so digits
/// after the decimal separator stay where they were typed. Values outside
/// `min..=max` are replaced by the violated bound.
///
/// Returns the empty string when the source has no digits (a lone decimal
/// separator still formats as zero).
pub fn apply_mask(
    config: &MaskConfig,
    source: MaskSource<'_>,
    disable_pad_and_trim: bool,
) -> String {
    mask_inner(config, source, disable_pad_and_trim, true)
}

fn mask_inner(
    config: &MaskConfig,
    source: MaskSource<'_>,
    disable_pad_and_trim: bool,
    clamp: bool,
) -> String {
    let precision = config.precision as usize;
    let (is_number, mut raw) = match source {
        MaskSource::Number(value) => {
            if !value.is_finite() {
                return String::new();
            }
            (true, Cow::Owned(to_fixed(value, precision)))
        }
        MaskSource::Text(text) => (false, Cow::Borrowed(text)),
    };

    let mut digits = only_digits(&raw);
    if digits.is_empty() && !is_lone_char(&raw, config.decimal) {
        return String::new();
    }

    if config.input_mode == InputMode::Natural && !is_number && !disable_pad_and_trim {
        raw = Cow::Owned(pad_or_trim_precision(config, &raw));
        digits = only_digits(&raw);
    }

    let digits: Vec<char> = digits.chars().collect();
    let split = digits.len().saturating_sub(precision);
    let (int_digits, dec_digits) = digits.split_at(split);
    let leading_zeros = int_digits.iter().take_while(|ch| is_zero_glyph(**ch)).count();
    let int_digits = &int_digits[leading_zeros..];

    let is_negative = raw.contains('-');
    let mut value = magnitude(int_digits) + magnitude(dec_digits) / 10f64.powi(precision as i32);
    if is_negative {
        value = -value;
    }

    if clamp {
        if let Some(max) = config.effective_max() {
            if value > max {
                log::debug!(target: "mask.format", "{value} above max, clamping to {max}");
                return mask_inner(config, MaskSource::Number(max), false, false);
            }
        }
        if let Some(min) = config.min {
            if value < min {
                log::debug!(target: "mask.format", "{value} below min, clamping to {min}");
                return mask_inner(config, MaskSource::Number(min), false, false);
            }
        }
    }

    let mut out = String::with_capacity(
        raw.len() + config.prefix.len() + config.suffix.len() + precision + 4,
    );
    if is_negative && config.allow_negative {
        out.push('-');
    }
    out.push_str(&config.prefix);
    if int_digits.is_empty() {
        out.push('0');
    } else {
        push_grouped(&mut out, int_digits, config.thousands);
    }
    if precision > 0 {
        out.push(config.decimal);
        for _ in dec_digits.len()..precision {
            out.push('0');
        }
        out.extend(dec_digits);
    }
    out.push_str(&config.suffix);
    out
}

/// Normalize the digits after the last decimal separator to exactly
/// `precision` of them, appending a separator if there is none.
///
/// Non-digits after the separator (a suffix, stray grouping) are dropped.
///
/// ```
/// use mask::{MaskConfig, pad_or_trim_precision};
///
/// let config = MaskConfig::plain();
/// assert_eq!(pad_or_trim_precision(&config, "12"), "12.00");
/// assert_eq!(pad_or_trim_precision(&config, "12.3"), "12.30");
/// assert_eq!(pad_or_trim_precision(&config, "12.345"), "12.34");
/// ```
pub fn pad_or_trim_precision(config: &MaskConfig, raw: &str) -> String {
    let precision = config.precision as usize;
    let (head, tail) = match raw.rfind(config.decimal) {
        Some(idx) => (&raw[..idx], &raw[idx + config.decimal.len_utf8()..]),
        None => (raw, ""),
    };
    let mut out = String::with_capacity(raw.len() + precision + 1);
    out.push_str(head);
    out.push(config.decimal);
    let mut kept = 0;
    for ch in only_digits(tail).chars().take(precision) {
        out.push(ch);
        kept += 1;
    }
    for _ in kept..precision {
        out.push('0');
    }
    out
}

/// Read a masked text back into a number.
///
/// Strips the first prefix and suffix occurrence, every thousands separator,
/// maps the decimal separator to `.` and locale digits to ASCII, then parses
/// the longest leading float. Empty text reads as `None` when the config is
/// nullable and as `0` otherwise. Text with no leading number reads as NaN.
pub fn clear_mask(config: &MaskConfig, raw: &str) -> NumericValue {
    if raw.is_empty() && config.nullable {
        return None;
    }
    let raw = if raw.is_empty() { "0" } else { raw };

    let mut value = raw.to_string();
    if !config.prefix.is_empty() {
        value = value.replacen(config.prefix.as_str(), "", 1);
    }
    if !config.suffix.is_empty() {
        value = value.replacen(config.suffix.as_str(), "", 1);
    }
    if let Some(thousands) = config.thousands {
        value = value.replace(thousands, "");
    }
    if config.decimal != '.' {
        value = value.replacen(config.decimal, ".", 1);
    }
    Some(parse_float_prefix(&to_ascii_digits(&value)))
}

/// `value` with exactly `precision` fractional digits. Negative zero prints
/// unsigned.
fn to_fixed(value: f64, precision: usize) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.precision$}")
}

fn is_lone_char(s: &str, ch: char) -> bool {
    let mut chars = s.chars();
    chars.next() == Some(ch) && chars.next().is_none()
}

fn magnitude(digits: &[char]) -> f64 {
    let ascii: String = digits
        .iter()
        .filter_map(|ch| digit_value(*ch))
        .filter_map(|d| char::from_digit(d, 10))
        .collect();
    ascii.parse::<f64>().unwrap_or(0.0)
}

fn push_grouped(out: &mut String, digits: &[char], thousands: Option<char>) {
    let len = digits.len();
    for (idx, ch) in digits.iter().enumerate() {
        if let Some(sep) = thousands {
            if idx > 0 && (len - idx) % 3 == 0 {
                out.push(sep);
            }
        }
        out.push(*ch);
    }
}

/// Longest leading float literal of `s` (after leading whitespace), NaN if
/// there is none.
fn parse_float_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return f64::NAN;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}
