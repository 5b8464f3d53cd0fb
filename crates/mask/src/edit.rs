//! Edit transforms.
//!
//! Every operation takes the field's current [`EditState`] and returns the
//! [`Edit`] to commit, or `None` when the keystroke changes nothing. The
//! intermediate text (the raw text with the key spliced in or the digit cut
//! out) is never shown; it is re-masked and the caret is re-derived from the
//! length change, so carets stay anchored relative to the end of the number.

use crate::config::MaskConfig;
use crate::digits::{is_mask_digit, only_digits};
use crate::format::{clear_mask, mask_text};
use core_types::InputMode;
use input_core::{SelectionRange, char_at, char_len, clamp_position, find_char, slice_chars};

/// The text and selection an edit starts from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditState {
    pub text: String,
    pub selection: SelectionRange,
}

impl EditState {
    pub fn new(text: impl Into<String>, selection: SelectionRange) -> Self {
        Self {
            text: text.into(),
            selection,
        }
    }

    /// State with a collapsed caret at `position`.
    pub fn caret(text: impl Into<String>, position: usize) -> Self {
        Self::new(text, SelectionRange::caret(position))
    }
}

/// Text to commit, plus the caret to place afterwards. `caret: None` leaves
/// the caret wherever assigning the text puts it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub caret: Option<usize>,
}

/// Which side of the caret a deletion key removes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeleteKey {
    /// Backspace.
    Backward,
    /// Delete.
    Forward,
}

/// Re-mask `text` and derive the caret.
///
/// `selection_start` is a caret slot in `text` (defaulting to its end). It is
/// held inside the editable span, then moved left by however many slots the
/// masking removed, so its distance from the end of the number is preserved.
pub fn update_field_value(
    config: &MaskConfig,
    text: &str,
    selection_start: Option<usize>,
    disable_pad_and_trim: bool,
) -> Edit {
    let selection_start = selection_start.map(|pos| pos.min(isize::MAX as usize) as isize);
    remask(config, text, selection_start, disable_pad_and_trim)
}

fn remask(
    config: &MaskConfig,
    text: &str,
    selection_start: Option<isize>,
    disable_pad_and_trim: bool,
) -> Edit {
    let masked = mask_text(config, text, disable_pad_and_trim);
    let old_len = char_len(text) as isize;
    let prefix_len = config.prefix_len() as isize;
    let suffix_len = config.suffix_len() as isize;

    let start = selection_start.unwrap_or(old_len);
    let start = prefix_len.max(start.min(old_len - suffix_len));
    let new_len = char_len(&masked);
    let caret = clamp_position(start - (old_len - new_len as isize), new_len);

    log::trace!(
        target: "mask.edit",
        "remask {text:?} -> {masked:?}, caret {caret}"
    );
    Edit {
        text: masked,
        caret: Some(caret),
    }
}

/// Insert `key` at the selection.
///
/// Digits are spliced in and the result re-masked. A decimal or thousands
/// separator typed right before the same separator steps the caret over it;
/// any other non-digit is rejected. In Natural mode a caret in the decimal
/// part overwrites the digit to its right instead of shifting digits.
pub fn add_number(config: &MaskConfig, state: &EditState, key: char) -> Option<Edit> {
    let is_decimal = key == config.decimal;

    if state.text.is_empty() {
        let masked = mask_text(config, &key.to_string(), false);
        if masked.is_empty() {
            log::trace!(target: "mask.edit", "rejecting {key:?} on empty field");
            return None;
        }
        let caret = if config.input_mode == InputMode::Natural && config.precision > 0 {
            let pos = find_char(&masked, config.decimal).map_or(-1, |idx| idx as isize);
            Some(if is_decimal { pos + 1 } else { pos })
        } else {
            None
        };
        return Some(remask(config, &masked, caret, false));
    }

    let text = state.text.as_str();
    let len = char_len(text);
    let selection = state.selection.clamp_to(len);
    let before = slice_chars(text, 0, selection.start);
    let mut after = slice_chars(text, selection.end, len);

    let in_decimals = find_char(before, config.decimal).is_some();
    if config.input_mode == InputMode::Natural && in_decimals && selection.is_empty() {
        after = slice_chars(after, 1, char_len(after));
    }

    let mut next = selection.start as isize + 1;
    let is_separator = is_decimal || Some(key) == config.thousands;
    if is_separator && after.chars().next() == Some(key) {
        next += 1;
    } else if !is_mask_digit(key) {
        log::trace!(target: "mask.edit", "rejecting {key:?}");
        return None;
    }

    let mut spliced = String::with_capacity(text.len() + key.len_utf8());
    spliced.push_str(before);
    spliced.push(key);
    spliced.push_str(after);
    Some(remask(config, &spliced, Some(next), false))
}

/// Apply Backspace or Delete.
///
/// A collapsed caret removes one digit on the relevant side, skipping over a
/// separator it sits next to. A selection is removed as a whole, clipped to
/// the editable span. Nullable fields holding zero are cleared instead.
///
/// Natural mode keeps the decimal part at full width: removed decimals are
/// replaced with zeros and a backspace there moves the caret left.
pub fn remove_number(config: &MaskConfig, state: &EditState, key: DeleteKey) -> Option<Edit> {
    let text = state.text.as_str();
    if config.nullable && clear_mask(config, text) == Some(0.0) {
        log::trace!(target: "mask.edit", "clearing nullable zero");
        return Some(Edit {
            text: String::new(),
            caret: None,
        });
    }

    let len = char_len(text) as isize;
    let prefix_len = config.prefix_len() as isize;
    let suffix_start = len - config.suffix_len() as isize;
    let original = state.selection;
    let mut sel_end = suffix_start.min((original.end as isize).max(prefix_len));
    let mut sel_start = suffix_start.min((original.start as isize).max(prefix_len));

    if sel_start == sel_end && !original.is_empty() {
        // Selection lay entirely inside the prefix or suffix.
        return Some(remask(config, text, Some(sel_start), false));
    }

    let decimal_index = find_char(text, config.decimal).map_or(len, |idx| idx as isize);
    let natural = config.input_mode == InputMode::Natural;
    let in_decimals = decimal_index < sel_end;
    let after_decimal_point = decimal_index + 1 == sel_end;
    let mut shift = 0isize;
    let mut insert = String::new();

    if sel_start == sel_end {
        match key {
            DeleteKey::Backward => {
                if sel_start <= prefix_len {
                    return None;
                }
                sel_start -= 1;
                if !is_digit_at(text, sel_start) {
                    sel_start -= 1;
                }
                if natural && in_decimals {
                    shift = -1;
                    let value = clear_mask(config, text).unwrap_or(0.0);
                    if after_decimal_point && value < 10.0 && value > -10.0 {
                        insert.push('0');
                    }
                }
            }
            DeleteKey::Forward => {
                if sel_start == suffix_start {
                    return None;
                }
                sel_end += 1;
                if !is_digit_at(text, sel_start) {
                    sel_start += 1;
                    sel_end += 1;
                }
            }
        }
    }

    if natural && sel_start > decimal_index {
        for _ in 0..(sel_end - sel_start).max(0) {
            insert.push('0');
        }
    }

    let mut from_end = len - sel_end;
    let mut raw = String::with_capacity(text.len() + insert.len());
    raw.push_str(slice_chars(text, 0, to_slot(sel_start)));
    raw.push_str(&insert);
    raw.push_str(slice_chars(text, to_slot(sel_end), len as usize));

    let prefix_slot = prefix_len as usize;
    if config.thousands.is_some() && char_at(&raw, prefix_slot) == config.thousands {
        let trimmed_len = char_len(&raw) - 1;
        raw = format!(
            "{}{}",
            slice_chars(&raw, 0, prefix_slot),
            slice_chars(&raw, prefix_slot + 1, trimmed_len + 1)
        );
        from_end = from_end.min(trimmed_len as isize - prefix_len);
    }

    let target = char_len(&raw) as isize - from_end + shift;
    Some(remask(config, &raw, Some(target), true))
}

/// Show the value as negative. No-op when negatives are disallowed or the
/// text already starts with `-`.
pub fn change_to_negative(config: &MaskConfig, state: &EditState) -> Option<Edit> {
    if !config.allow_negative || state.text.starts_with('-') {
        return None;
    }
    if state.text.is_empty() {
        let text = mask_text(config, "-0", false);
        let caret = char_len(&text).saturating_sub(config.suffix_len());
        return Some(Edit {
            text,
            caret: Some(caret),
        });
    }
    let signed = format!("-{}", state.text);
    let caret = state.selection.start as isize + 1;
    Some(remask(config, &signed, Some(caret), false))
}

/// Drop the first `-` and re-mask. The caret keeps its place in the number.
pub fn change_to_positive(config: &MaskConfig, state: &EditState) -> Option<Edit> {
    let caret = state.selection.start;
    let caret = match find_char(&state.text, '-') {
        Some(idx) if idx < caret => caret - 1,
        _ => caret,
    };
    let unsigned = state.text.replacen('-', "", 1);
    Some(remask(config, &unsigned, Some(caret as isize), false))
}

/// Whether typing another digit can have an effect.
///
/// True while the digit count is below `max_length`, when the selection
/// covers a non-digit, or when the text starts with `0` (a leading zero is
/// shifted out rather than adding a digit).
pub fn can_input_more_numbers(
    text: &str,
    selection: SelectionRange,
    max_length: Option<usize>,
) -> bool {
    let below_max = max_length.is_none_or(|max| only_digits(text).chars().count() < max);
    let selection = selection.clamp_to(char_len(text));
    let covers_non_digit =
        !selection.is_empty() && selection.slice(text).chars().any(|ch| !is_mask_digit(ch));
    below_max || covers_non_digit || text.starts_with('0')
}

fn is_digit_at(text: &str, pos: isize) -> bool {
    pos >= 0 && char_at(text, pos as usize).is_some_and(is_mask_digit)
}

fn to_slot(pos: isize) -> usize {
    pos.max(0) as usize
}
