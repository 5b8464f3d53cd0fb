//! Field trait defining the capability a host text widget provides.
//!
//! This trait is the only seam between the masking layers and a concrete
//! widget (a DOM input, a TUI text box, an in-memory test double). Everything
//! above it works in caret slots over plain strings.
//!
//! # Design Principles
//!
//! - Positions are caret slots (Unicode scalar values), never byte offsets
//! - Implementations clamp out-of-range selections instead of panicking
//! - Assigning text behaves like a widget value assignment: the caret jumps
//!   to the end and any selection is dropped

use crate::selection::SelectionRange;

/// Trait defining the text widget interface.
///
/// # Integration Pattern
///
/// Wrap the host widget and forward to its native accessors:
///
/// ```ignore
/// struct DomField(web_sys::HtmlInputElement);
///
/// impl Field for DomField {
///     fn text(&self) -> &str { /* cached value */ }
///     fn set_text(&mut self, text: &str) { self.0.set_value(text) }
///     // ...
/// }
/// ```
pub trait Field {
    /// The text currently displayed.
    fn text(&self) -> &str;

    /// Replace the displayed text.
    ///
    /// Implementations move the caret to the end and clear any selection.
    fn set_text(&mut self, text: &str);

    /// The current selection (collapsed when it is a plain caret).
    fn selection(&self) -> SelectionRange;

    /// Select `start..end`. Bounds past the end of the text are clamped.
    fn set_selection(&mut self, start: usize, end: usize);

    /// Give the widget keyboard focus.
    fn focus(&mut self);

    /// Maximum number of characters the widget accepts, if limited.
    fn max_length(&self) -> Option<usize> {
        None
    }
}

// =============================================================================
// Implementation for MemoryField
// =============================================================================

impl Field for crate::store::MemoryField {
    #[inline]
    fn text(&self) -> &str {
        crate::store::MemoryField::text(self)
    }

    #[inline]
    fn set_text(&mut self, text: &str) {
        crate::store::MemoryField::set_text(self, text)
    }

    #[inline]
    fn selection(&self) -> SelectionRange {
        crate::store::MemoryField::selection(self)
    }

    #[inline]
    fn set_selection(&mut self, start: usize, end: usize) {
        crate::store::MemoryField::set_selection(self, start, end)
    }

    #[inline]
    fn focus(&mut self) {
        crate::store::MemoryField::focus(self)
    }

    #[inline]
    fn max_length(&self) -> Option<usize> {
        crate::store::MemoryField::max_length(self)
    }
}

impl<F: Field + ?Sized> Field for &mut F {
    #[inline]
    fn text(&self) -> &str {
        (**self).text()
    }

    #[inline]
    fn set_text(&mut self, text: &str) {
        (**self).set_text(text)
    }

    #[inline]
    fn selection(&self) -> SelectionRange {
        (**self).selection()
    }

    #[inline]
    fn set_selection(&mut self, start: usize, end: usize) {
        (**self).set_selection(start, end)
    }

    #[inline]
    fn focus(&mut self) {
        (**self).focus()
    }

    #[inline]
    fn max_length(&self) -> Option<usize> {
        (**self).max_length()
    }
}
