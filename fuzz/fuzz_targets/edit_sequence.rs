#![no_main]

use currency_input::{
    EditEvent, EventRouting, InputHandler, KEY_BACKSPACE, KEY_DELETE, KEY_MINUS, KEY_PLUS,
    KeyInput,
};
use input_core::{MemoryField, char_len};
use libfuzzer_sys::fuzz_target;
use mask::{InputMode, MaskConfig, mask_text};

const KEYS: [char; 8] = ['0', '5', '9', '.', ',', '\u{0663}', 'x', '\u{06F7}'];

fuzz_target!(|data: &[u8]| {
    // First byte picks the config, the rest is a sequence of two-byte ops.
    let Some((&head, ops)) = data.split_first() else {
        return;
    };
    let config = config_for(head);
    let routing = if head & 0x80 != 0 {
        EventRouting::InputEvents
    } else {
        EventRouting::DiscreteKeys
    };
    let mut handler = InputHandler::new(MemoryField::new(), config.clone()).with_routing(routing);

    for op in ops.chunks(2) {
        let arg = op.get(1).copied().unwrap_or(0);
        apply_op(&mut handler, op[0], arg);
        handler.run_until_idle();

        // Every committed state is canonical and has a caret inside the text.
        let text = handler.field().text();
        if !text.is_empty() {
            assert_eq!(mask_text(&config, text, false), text, "not canonical");
            let value = handler.read_value().expect("non-empty text reads a value");
            assert!(!value.is_nan(), "{text:?} reads as NaN");
        }
        let selection = handler.field().selection();
        assert!(selection.end <= char_len(text), "selection past end");
    }
});

fn config_for(byte: u8) -> MaskConfig {
    let mode = if byte & 1 == 0 {
        InputMode::Financial
    } else {
        InputMode::Natural
    };
    let mut config = MaskConfig::default()
        .with_input_mode(mode)
        .with_precision(u32::from((byte >> 1) % 4))
        .with_allow_negative(byte & 0x08 == 0)
        .with_nullable(byte & 0x10 != 0);
    if byte & 0x20 != 0 {
        config = config.with_prefix("").with_suffix(" EUR");
    }
    if byte & 0x40 != 0 {
        config = config.with_min(Some(-50.0)).with_max(Some(5_000.0));
    }
    config
}

fn apply_op(handler: &mut InputHandler<MemoryField>, op: u8, arg: u8) {
    let len = char_len(handler.field().text());
    let pos = usize::from(arg) % (len + 1);
    match op % 10 {
        0 => {
            let key = KEYS[usize::from(arg) % KEYS.len()];
            handler.dispatch(EditEvent::Keypress(KeyInput::from_char(key)));
        }
        1 => {
            let code = if arg & 1 == 0 { KEY_BACKSPACE } else { KEY_DELETE };
            handler.dispatch(EditEvent::Keydown(KeyInput::new(code)));
        }
        2 => {
            let code = if arg & 1 == 0 { KEY_MINUS } else { KEY_PLUS };
            handler.dispatch(EditEvent::Keypress(KeyInput::new(code)));
        }
        3 => handler.field_mut().set_caret(pos),
        4 => {
            let other = usize::from(arg.rotate_left(4)) % (len + 1);
            handler.field_mut().set_selection(pos, other);
        }
        5 => handler.set_value(Some(f64::from(arg) * 12.5 - 400.0)),
        6 => {
            let key = KEYS[usize::from(arg) % KEYS.len()];
            handler.field_mut().insert_text(&key.to_string());
            handler.handle_input();
        }
        7 => {
            handler.field_mut().backspace();
            handler.handle_input();
        }
        8 => {
            handler.field_mut().cut();
            handler.handle_cut();
        }
        _ => {
            handler.field_mut().insert_text(&format!("{arg}{arg}"));
            handler.handle_paste();
        }
    }
}
