//! # input_core
//!
//! UI-agnostic field layer for masked text inputs.
//!
//! This crate provides the fundamental building blocks for driving a text
//! widget from a masking engine:
//! - [`Field`]: the capability a host widget implements (text, selection, focus)
//! - [`FieldAdapter`]: sole writer of a field's raw text; remembers the last
//!   committed text for edit-delta detection
//! - [`SelectionRange`]: a normalized selection in caret slots
//! - [`MemoryField`]: an in-memory widget, including native platform mutations
//!
//! ## Design Principles
//!
//! This crate is intentionally UI-agnostic and does not depend on:
//! - Any widget toolkit or browser binding
//! - Number formatting or masking rules
//! - Event routing
//!
//! Positions are counted in Unicode scalar values throughout; use [`slice_chars`],
//! [`char_at`] and friends for slicing by caret slot.

mod adapter;
mod selection;
mod store;
mod text;
mod traits;

pub use adapter::FieldAdapter;
pub use selection::SelectionRange;
pub use store::MemoryField;
pub use traits::Field;

// Re-export text utilities for layers that do caret arithmetic on raw text.
pub use text::{byte_offset, char_at, char_len, clamp_position, find_char, slice_chars};
