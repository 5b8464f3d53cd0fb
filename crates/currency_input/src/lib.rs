//! # currency_input
//!
//! Edit-event controller for masked numeric fields.
//!
//! [`InputHandler`] sits between a host widget (any [`input_core::Field`])
//! and the [`mask`] engine:
//! - keydown/keypress events carrying discrete key codes
//! - the platform "input" event, for keyboards that only report text changes
//! - cut and paste, finished on a later [`Scheduler`] tick
//! - programmatic value writes and configuration swaps
//!
//! ```
//! use currency_input::{InputHandler, KeyInput};
//! use input_core::MemoryField;
//! use mask::MaskConfig;
//!
//! let mut handler = InputHandler::new(MemoryField::new(), MaskConfig::default());
//! for ch in "1999".chars() {
//!     handler.handle_keypress(KeyInput::from_char(ch));
//! }
//! assert_eq!(handler.field().text(), "R$ 19.99");
//! assert_eq!(handler.read_value(), Some(19.99));
//! ```

mod event;
mod handler;
#[cfg(feature = "replay")]
pub mod replay;
mod scheduler;

pub use event::{
    EditEvent, EditIntent, EventRouting, KEY_BACKSPACE, KEY_DELETE, KEY_ENTER, KEY_LOWER_A,
    KEY_MAC_FORWARD_DELETE, KEY_MINUS, KEY_PLUS, KEY_TAB, KeyInput, parse_key,
};
pub use handler::InputHandler;
pub use scheduler::{DeferredTask, Scheduler, TickScheduler};
