//! Abstract input events and the edit intents derived from them.
//!
//! Hosts translate native events into [`EditEvent`]s. Key codes are resolved
//! once into an [`EditIntent`], so the controller never branches on raw
//! numeric codes.

use core_types::KeyCode;
use mask::DeleteKey;

pub const KEY_BACKSPACE: KeyCode = 8;
pub const KEY_TAB: KeyCode = 9;
pub const KEY_ENTER: KeyCode = 13;
pub const KEY_PLUS: KeyCode = 43;
pub const KEY_MINUS: KeyCode = 45;
pub const KEY_DELETE: KeyCode = 46;
pub const KEY_LOWER_A: KeyCode = 97;
/// Forward delete as reported by older macOS browsers.
pub const KEY_MAC_FORWARD_DELETE: KeyCode = 63272;

/// A key event as the host reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub code: KeyCode,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(code: KeyCode) -> Self {
        Self { code, ctrl: false }
    }

    pub fn with_ctrl(code: KeyCode) -> Self {
        Self { code, ctrl: true }
    }

    /// Key event for a typed character.
    pub fn from_char(ch: char) -> Self {
        Self::new(ch as KeyCode)
    }

    /// Intent of this key on the keydown path. Only deletion keys act there.
    pub fn keydown_intent(self) -> EditIntent {
        match self.code {
            KEY_BACKSPACE => EditIntent::Delete(DeleteKey::Backward),
            KEY_DELETE | KEY_MAC_FORWARD_DELETE => EditIntent::Delete(DeleteKey::Forward),
            _ => EditIntent::Ignore,
        }
    }

    /// Intent of this key on the keypress path.
    ///
    /// Ctrl+A is left to the platform (select all).
    pub fn keypress_intent(self) -> EditIntent {
        if self.ctrl && self.code == KEY_LOWER_A {
            return EditIntent::Ignore;
        }
        EditIntent::from_code(self.code)
    }
}

/// What a keystroke asks the controller to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditIntent {
    /// Nothing; no model notification either.
    Ignore,
    /// Type a character (digit or separator; anything else is rejected by
    /// the engine).
    Insert(char),
    Negative,
    Positive,
    Delete(DeleteKey),
}

impl EditIntent {
    /// Classify a character code on the insertion path.
    pub fn from_code(code: KeyCode) -> Self {
        match code {
            KEY_TAB | KEY_ENTER => EditIntent::Ignore,
            KEY_PLUS => EditIntent::Positive,
            KEY_MINUS => EditIntent::Negative,
            _ => char::from_u32(code).map_or(EditIntent::Ignore, EditIntent::Insert),
        }
    }

    pub fn from_char(ch: char) -> Self {
        Self::from_code(ch as KeyCode)
    }
}

/// An abstract event delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditEvent {
    Keydown(KeyInput),
    Keypress(KeyInput),
    /// The platform already changed the text (IME, mobile keyboards).
    Input,
    Cut,
    Paste,
    Drop,
    Blur,
}

/// Which event family drives edits on the current platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "replay", derive(serde::Deserialize))]
#[cfg_attr(feature = "replay", serde(rename_all = "snake_case"))]
pub enum EventRouting {
    /// Keydown/keypress/cut/paste carry discrete key codes; the text-changed
    /// event is ignored.
    #[default]
    DiscreteKeys,
    /// Only the text-changed event is reliable; edits are recovered by
    /// diffing against the last committed text.
    InputEvents,
}

/// Resolve a key name (`"backspace"`, `"delete"`, `"tab"`, `"enter"`,
/// `"mac_delete"`) or a single character to its key code.
///
/// ```
/// use currency_input::{KEY_BACKSPACE, parse_key};
///
/// assert_eq!(parse_key("backspace"), Some(KEY_BACKSPACE));
/// assert_eq!(parse_key("5"), Some(53));
/// assert_eq!(parse_key("nope"), None);
/// ```
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Some(ch as KeyCode);
    }
    match name.to_ascii_lowercase().as_str() {
        "backspace" => Some(KEY_BACKSPACE),
        "tab" => Some(KEY_TAB),
        "enter" => Some(KEY_ENTER),
        "delete" => Some(KEY_DELETE),
        "mac_delete" => Some(KEY_MAC_FORWARD_DELETE),
        _ => None,
    }
}
