//! In-memory text field.
//!
//! [`MemoryField`] is a self-contained widget model: text, caret, selection
//! anchor and focus. Besides the [`Field`](crate::Field) capability it exposes
//! the *native* mutations a real platform applies on its own (typing through
//! an IME, paste, cut, backspace) so hosts and tests can reproduce the
//! platform side of an edit before the masking layer reacts to it.

use crate::selection::SelectionRange;
use crate::text::{byte_offset, char_len};

/// Text widget held entirely in memory.
///
/// # Example
///
/// ```
/// use input_core::MemoryField;
///
/// let mut field = MemoryField::new();
/// field.set_text("12");
/// field.insert_text("3");
///
/// assert_eq!(field.text(), "123");
/// assert_eq!(field.caret(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryField {
    /// The current text value.
    value: String,

    /// Caret position in caret slots.
    caret: usize,

    /// Selection anchor in caret slots.
    ///
    /// When `Some(anchor)`, the selection range is `min(anchor, caret)..max(anchor, caret)`.
    selection_anchor: Option<usize>,

    focused: bool,

    max_length: Option<usize>,
}

impl MemoryField {
    /// Create a new, empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a field limited to `max_length` characters.
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..Self::default()
        }
    }

    /// The current text.
    pub fn text(&self) -> &str {
        &self.value
    }

    /// Set/overwrite the text.
    ///
    /// This resets the caret to the end and clears any selection.
    pub fn set_text(&mut self, value: &str) {
        self.value.clear();
        self.value.push_str(value);
        self.caret = char_len(&self.value);
        self.selection_anchor = None;
    }

    /// Current caret slot.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Current selection, collapsed onto the caret when nothing is selected.
    pub fn selection(&self) -> SelectionRange {
        let caret = self.caret;
        SelectionRange::new(self.selection_anchor.unwrap_or(caret), caret)
    }

    /// Select `start..end`, clamped to the text.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = char_len(&self.value);
        let start = start.min(len);
        let end = end.min(len);
        self.selection_anchor = Some(start);
        self.caret = end;
        normalize_selection_anchor(self);
    }

    /// Collapse the selection onto `caret`.
    pub fn set_caret(&mut self, caret: usize) {
        self.set_selection(caret, caret);
    }

    /// Select all text.
    pub fn select_all(&mut self) {
        let len = char_len(&self.value);
        self.set_selection(0, len);
    }

    /// Called when the field gains focus.
    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Called when the field loses focus. Clears the selection.
    pub fn blur(&mut self) {
        self.focused = false;
        self.selection_anchor = None;
    }

    /// Returns `true` while the field has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Maximum accepted length, if limited.
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    // =========================================================================
    // Native platform mutations
    // =========================================================================

    /// Insert text at the caret as the platform would for typing or paste.
    ///
    /// If there is a selection, it is replaced.
    pub fn insert_text(&mut self, s: &str) {
        delete_selection_if_any(self);
        if s.is_empty() {
            return;
        }
        let at = byte_offset(&self.value, self.caret);
        self.value.insert_str(at, s);
        self.caret += char_len(s);
    }

    /// Native backspace: delete the selection, or the character before the caret.
    pub fn backspace(&mut self) {
        if delete_selection_if_any(self) || self.caret == 0 {
            return;
        }
        let from = byte_offset(&self.value, self.caret - 1);
        let to = byte_offset(&self.value, self.caret);
        self.value.drain(from..to);
        self.caret -= 1;
    }

    /// Native delete: delete the selection, or the character after the caret.
    pub fn delete(&mut self) {
        if delete_selection_if_any(self) || self.caret >= char_len(&self.value) {
            return;
        }
        let from = byte_offset(&self.value, self.caret);
        let to = byte_offset(&self.value, self.caret + 1);
        self.value.drain(from..to);
    }

    /// Native cut: remove the selection and return it.
    pub fn cut(&mut self) -> String {
        let sel = self.selection();
        let removed = sel.slice(&self.value).to_string();
        delete_selection_if_any(self);
        removed
    }
}

// --- Internal helper functions ---

fn normalize_selection_anchor(st: &mut MemoryField) {
    // If selection collapsed, clear anchor to avoid "sticky" selection.
    if st.selection_anchor == Some(st.caret) {
        st.selection_anchor = None;
    }
}

fn delete_selection_if_any(st: &mut MemoryField) -> bool {
    let sel = st.selection();
    st.selection_anchor = None;
    if sel.is_empty() {
        return false;
    }

    let from = byte_offset(&st.value, sel.start);
    let to = byte_offset(&st.value, sel.end);
    st.value.drain(from..to);
    st.caret = sel.start;
    true
}
