//! Text selection representation.

use crate::text::slice_chars;

/// A selection over a field's text, in caret slots (Unicode scalar values).
///
/// The range is always normalized such that `start <= end`. A collapsed
/// range (`start == end`) is a plain caret.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SelectionRange {
    /// First selected slot (inclusive).
    pub start: usize,
    /// End of the selection (exclusive).
    pub end: usize,
}

impl SelectionRange {
    /// Create a new selection range.
    ///
    /// The range is automatically normalized so `start <= end`.
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A collapsed selection at `position`.
    #[inline]
    pub fn caret(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Returns `true` if the selection is empty (zero-width).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the number of selected slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Clamp both bounds to a text of `len` slots.
    #[inline]
    pub fn clamp_to(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }

    /// Returns the selected substring from the given value.
    ///
    /// Out-of-range bounds are clamped rather than panicking.
    #[inline]
    pub fn slice<'a>(&self, value: &'a str) -> &'a str {
        slice_chars(value, self.start, self.end)
    }
}
