//! # mask
//!
//! Numeric input masking engine.
//!
//! - [`MaskConfig`]: separators, precision, affixes, bounds and input mode
//! - [`format_value`] / [`mask_text`] / [`clear_mask`]: value ⇄ masked text
//! - [`add_number`], [`remove_number`], [`change_to_negative`],
//!   [`change_to_positive`]: pure keystroke transforms over an [`EditState`]
//!
//! The engine never touches a widget. Callers feed it the current text and
//! selection and commit the returned [`Edit`]; `input_core` provides the
//! field side of that contract.
//!
//! ```
//! use mask::{EditState, MaskConfig, add_number, clear_mask};
//!
//! let config = MaskConfig::default();
//! let edit = add_number(&config, &EditState::caret("R$ 1.00", 7), '5').unwrap();
//! assert_eq!(edit.text, "R$ 10.05");
//! assert_eq!(clear_mask(&config, &edit.text), Some(10.05));
//! ```

mod config;
mod digits;
mod edit;
mod format;

pub use config::{AffixKind, ConfigError, MAX_PRECISION, MaskConfig, SeparatorKind};
pub use digits::{LOCALE_DIGITS, digit_value, is_mask_digit, only_digits, to_ascii_digits};
pub use edit::{
    DeleteKey, Edit, EditState, add_number, can_input_more_numbers, change_to_negative,
    change_to_positive, remove_number, update_field_value,
};
pub use format::{
    MaskSource, apply_mask, clear_mask, format_value, mask_text, pad_or_trim_precision,
};

pub use core_types::{InputMode, NumericValue};
