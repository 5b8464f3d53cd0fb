//! Field adapter: the single authority over a widget's masked text.
//!
//! The adapter reads the live text and selection from a [`Field`] and writes
//! every committed raw text back to it. It also keeps the last committed text
//! (the *stored raw value*) so platforms that mutate the widget before any
//! handler runs can be diffed against what was there before.

use crate::selection::SelectionRange;
use crate::text::char_len;
use crate::traits::Field;

/// Owns a [`Field`] plus the snapshot of its last committed raw text.
#[derive(Clone, Debug, Default)]
pub struct FieldAdapter<F> {
    field: F,
    stored_raw_value: String,
}

impl<F: Field> FieldAdapter<F> {
    /// Wrap a field. Its current text becomes the stored raw value.
    pub fn new(field: F) -> Self {
        let stored_raw_value = field.text().to_string();
        Self {
            field,
            stored_raw_value,
        }
    }

    /// The wrapped field.
    pub fn field(&self) -> &F {
        &self.field
    }

    /// Mutable access to the wrapped field, for native platform mutations.
    ///
    /// Writes through this handle bypass the stored raw value on purpose:
    /// they model the platform editing the widget behind the adapter's back.
    pub fn field_mut(&mut self) -> &mut F {
        &mut self.field
    }

    /// The text currently displayed by the field.
    pub fn raw_value(&self) -> &str {
        self.field.text()
    }

    /// Write `value` to the field and remember it as the stored raw value.
    pub fn set_raw_value(&mut self, value: &str) {
        log::trace!(target: "input.field", "set raw value {value:?}");
        self.stored_raw_value.clear();
        self.stored_raw_value.push_str(value);
        self.field.set_text(value);
    }

    /// Text captured by the most recent [`set_raw_value`](Self::set_raw_value).
    pub fn stored_raw_value(&self) -> &str {
        &self.stored_raw_value
    }

    /// The field's selection, clamped to its text.
    pub fn selection(&self) -> SelectionRange {
        self.field.selection().clamp_to(char_len(self.field.text()))
    }

    /// Focus the field and collapse the selection at `position`.
    pub fn set_cursor_at(&mut self, position: usize) {
        self.field.focus();
        self.field.set_selection(position, position);
    }

    /// Commit a new raw text and, when given, a caret position.
    ///
    /// Without a caret the field keeps whatever placement its own value
    /// assignment produced (the end of the text).
    pub fn commit(&mut self, text: &str, caret: Option<usize>) {
        self.set_raw_value(text);
        if let Some(caret) = caret {
            log::trace!(target: "input.field", "caret -> {caret}");
            self.set_cursor_at(caret);
        }
    }

    /// Pull the selection into `start..=end` without focusing the field.
    pub fn hold_selection_within(&mut self, start: usize, end: usize) {
        let current = self.selection();
        let held = SelectionRange::new(
            current.start.clamp(start, end),
            current.end.clamp(start, end),
        );
        if held != current {
            log::trace!(target: "input.field", "selection held to {}..{}", held.start, held.end);
            self.field.set_selection(held.start, held.end);
        }
    }

    /// Maximum length of the field, if limited.
    pub fn max_length(&self) -> Option<usize> {
        self.field.max_length()
    }
}
