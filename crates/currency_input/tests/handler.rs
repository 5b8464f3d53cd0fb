//! Controller behavior through the public surface, with host-supplied field
//! and scheduler implementations.

use currency_input::{
    DeferredTask, EditEvent, EventRouting, InputHandler, KEY_BACKSPACE, KeyInput, Scheduler,
};
use input_core::{Field, MemoryField, SelectionRange};
use mask::{InputMode, MaskConfig};
use std::cell::RefCell;
use std::rc::Rc;

/// Field double counting focus requests, with a fixed max length.
#[derive(Debug, Default)]
struct CountingField {
    inner: MemoryField,
    focus_calls: usize,
}

impl Field for CountingField {
    fn text(&self) -> &str {
        self.inner.text()
    }

    fn set_text(&mut self, text: &str) {
        self.inner.set_text(text);
    }

    fn selection(&self) -> SelectionRange {
        self.inner.selection()
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        self.inner.set_selection(start, end);
    }

    fn focus(&mut self) {
        self.focus_calls += 1;
        self.inner.focus();
    }

    fn max_length(&self) -> Option<usize> {
        Some(6)
    }
}

/// Runs everything on the next advance regardless of delay.
#[derive(Debug, Default)]
struct FifoScheduler {
    queue: Vec<DeferredTask>,
    delays: Vec<u32>,
}

impl Scheduler for FifoScheduler {
    fn defer(&mut self, task: DeferredTask, delay_ticks: u32) {
        self.queue.push(task);
        self.delays.push(delay_ticks);
    }

    fn advance(&mut self) -> Vec<DeferredTask> {
        std::mem::take(&mut self.queue)
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

fn keypress(ch: char) -> EditEvent {
    EditEvent::Keypress(KeyInput::from_char(ch))
}

#[test]
fn custom_field_receives_focus_on_caret_commits() {
    let mut handler = InputHandler::new(CountingField::default(), MaskConfig::plain());
    for ch in "42".chars() {
        handler.dispatch(keypress(ch));
    }
    assert_eq!(handler.field().text(), "0.42");
    assert_eq!(handler.field().focus_calls, 2);

    handler.dispatch(EditEvent::Keypress(KeyInput::new(currency_input::KEY_MINUS)));
    assert_eq!(handler.field().text(), "-0.42");
    assert_eq!(handler.field().focus_calls, 3);

    // Programmatic writes move the caret without stealing focus.
    handler.set_value(Some(1.5));
    assert_eq!(handler.field().text(), "1.50");
    assert_eq!(handler.field().focus_calls, 3);
}

#[test]
fn field_max_length_limits_digits() {
    let mut handler = InputHandler::new(CountingField::default(), MaskConfig::plain());
    for ch in "1234567".chars() {
        handler.dispatch(keypress(ch));
    }
    assert_eq!(handler.field().text(), "1,234.56");
}

#[test]
fn borrowed_field_keeps_edits() {
    let mut field = MemoryField::new();
    {
        let mut handler = InputHandler::new(&mut field, MaskConfig::default());
        handler.dispatch(keypress('7'));
    }
    assert_eq!(field.text(), "R$ 0.07");
}

#[test]
fn host_scheduler_receives_requested_delays() {
    let mut handler = InputHandler::with_scheduler(
        MemoryField::new(),
        MaskConfig::plain(),
        FifoScheduler::default(),
    );
    handler.dispatch(EditEvent::Cut);
    handler.dispatch(EditEvent::Paste);
    assert_eq!(handler.scheduler().delays, vec![0, 1]);

    handler.field_mut().insert_text("5");
    assert_eq!(handler.tick(), 2);
    assert_eq!(handler.field().text(), "0.05");
    assert_eq!(handler.scheduler().pending(), 0);
}

#[test]
fn input_path_matches_keypress_path_for_every_digit() {
    // Carets stay inside the editable span; a caret inside the prefix is
    // moved by the input path before the key is replayed.
    let configs = [
        MaskConfig::plain().with_suffix(" EUR"),
        MaskConfig::plain().with_input_mode(InputMode::Natural),
        MaskConfig::plain().with_precision(0),
    ];
    for config in configs {
        for initial in [0.0, 7.5, 1234.0] {
            for caret in 0..=4 {
                for ch in ['0', '5', '9'] {
                    let mut keyed = InputHandler::new(MemoryField::new(), config.clone());
                    keyed.set_value(Some(initial));
                    keyed.field_mut().set_caret(caret);
                    keyed.dispatch(keypress(ch));

                    let mut mobile = InputHandler::new(MemoryField::new(), config.clone())
                        .with_routing(EventRouting::InputEvents);
                    mobile.set_value(Some(initial));
                    mobile.field_mut().set_caret(caret);
                    mobile.field_mut().insert_text(&ch.to_string());
                    mobile.dispatch(EditEvent::Input);

                    let context = format!("{config:?} initial={initial} caret={caret} key={ch}");
                    assert_eq!(mobile.field().text(), keyed.field().text(), "{context}");
                    assert_eq!(
                        mobile.field().selection(),
                        keyed.field().selection(),
                        "{context}"
                    );
                }
            }
        }
    }
}

#[test]
fn deferred_backspace_reads_latest_text() {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    let mut handler = InputHandler::new(MemoryField::new(), MaskConfig::plain())
        .with_routing(EventRouting::InputEvents);
    handler.set_on_model_change(move |value| sink.borrow_mut().push(value));
    handler.set_value(Some(12.34));

    handler.field_mut().backspace();
    handler.dispatch(EditEvent::Input);
    // A programmatic write lands before the deferred task runs.
    handler.set_value(Some(99.99));
    handler.run_until_idle();

    assert_eq!(handler.field().text(), "9.99");
    assert_eq!(*changes.borrow(), vec![Some(9.99)]);
}

#[test]
fn keydown_backspace_inside_prefix_moves_caret_only() {
    let mut handler = InputHandler::new(MemoryField::new(), MaskConfig::default());
    handler.set_value(Some(1.0));
    handler.field_mut().set_selection(0, 2);

    assert!(handler.dispatch(EditEvent::Keydown(KeyInput::new(KEY_BACKSPACE))));
    assert_eq!(handler.field().text(), "R$ 1.00");
    assert_eq!(handler.field().selection(), SelectionRange::caret(3));
}
