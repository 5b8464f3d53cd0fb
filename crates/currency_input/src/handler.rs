//! The edit-event controller.
//!
//! [`InputHandler`] receives abstract events, asks the mask engine for the
//! resulting text and caret, commits them through its [`FieldAdapter`] and
//! reports the parsed value to the host. Every handler reads the live field
//! when it runs, deferred ones included.

use crate::event::{EditEvent, EditIntent, EventRouting, KeyInput};
use crate::scheduler::{DeferredTask, Scheduler, TickScheduler};
use core_types::NumericValue;
use input_core::{Field, FieldAdapter, char_at, char_len};
use mask::{
    DeleteKey, Edit, EditState, MaskConfig, add_number, can_input_more_numbers, change_to_negative,
    change_to_positive, clear_mask, format_value, remove_number, update_field_value,
};
use std::fmt;

/// Ticks a paste resync waits beyond a cut resync, so it runs after the
/// platform's paste lands.
const PASTE_DELAY_TICKS: u32 = 1;
const CUT_DELAY_TICKS: u32 = 0;
const BACKSPACE_DELAY_TICKS: u32 = 0;

type ChangeCallback = Box<dyn FnMut(NumericValue)>;
type TouchedCallback = Box<dyn FnMut()>;

pub struct InputHandler<F: Field, S: Scheduler = TickScheduler> {
    adapter: FieldAdapter<F>,
    config: MaskConfig,
    scheduler: S,
    routing: EventRouting,
    on_model_change: Option<ChangeCallback>,
    on_model_touched: Option<TouchedCallback>,
}

impl<F: Field> InputHandler<F, TickScheduler> {
    pub fn new(field: F, config: MaskConfig) -> Self {
        Self::with_scheduler(field, config, TickScheduler::new())
    }
}

impl<F: Field, S: Scheduler> InputHandler<F, S> {
    pub fn with_scheduler(field: F, config: MaskConfig, scheduler: S) -> Self {
        Self {
            adapter: FieldAdapter::new(field),
            config,
            scheduler,
            routing: EventRouting::default(),
            on_model_change: None,
            on_model_touched: None,
        }
    }

    pub fn with_routing(mut self, routing: EventRouting) -> Self {
        self.routing = routing;
        self
    }

    pub fn set_routing(&mut self, routing: EventRouting) {
        self.routing = routing;
    }

    pub fn routing(&self) -> EventRouting {
        self.routing
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    pub fn adapter(&self) -> &FieldAdapter<F> {
        &self.adapter
    }

    pub fn field(&self) -> &F {
        self.adapter.field()
    }

    /// The field, for applying native platform mutations before the matching
    /// event is dispatched.
    pub fn field_mut(&mut self) -> &mut F {
        self.adapter.field_mut()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn set_on_model_change(&mut self, callback: impl FnMut(NumericValue) + 'static) {
        self.on_model_change = Some(Box::new(callback));
    }

    pub fn set_on_model_touched(&mut self, callback: impl FnMut() + 'static) {
        self.on_model_touched = Some(Box::new(callback));
    }

    /// Parse the displayed text.
    pub fn read_value(&self) -> NumericValue {
        clear_mask(&self.config, self.adapter.raw_value())
    }

    /// Display `value`. Never notifies the host.
    pub fn set_value(&mut self, value: NumericValue) {
        let text = format_value(&self.config, value);
        self.adapter.set_raw_value(&text);
        let (start, end) = self.editable_span();
        self.adapter.hold_selection_within(start, end);
    }

    /// Swap the configuration, keeping the current value.
    pub fn update_options(&mut self, config: MaskConfig) {
        let value = self.read_value();
        self.config = config;
        self.set_value(value);
    }

    /// Reset to `None` (nullable) or `0` and notify.
    pub fn clear_value(&mut self) {
        let value = if self.config.nullable { None } else { Some(0.0) };
        self.set_value(value);
        self.notify_change();
    }

    /// Route `event` according to the current [`EventRouting`].
    ///
    /// Returns `true` when the host should suppress the event's native
    /// default action.
    pub fn dispatch(&mut self, event: EditEvent) -> bool {
        log::trace!(target: "input.handler", "dispatch {event:?} ({:?})", self.routing);
        match (self.routing, event) {
            (_, EditEvent::Blur) => {
                self.handle_blur();
                false
            }
            (EventRouting::InputEvents, EditEvent::Input) => {
                self.handle_input();
                false
            }
            (EventRouting::InputEvents, _) | (EventRouting::DiscreteKeys, EditEvent::Input) => {
                false
            }
            (EventRouting::DiscreteKeys, EditEvent::Keydown(key)) => self.handle_keydown(key),
            (EventRouting::DiscreteKeys, EditEvent::Keypress(key)) => self.handle_keypress(key),
            (EventRouting::DiscreteKeys, EditEvent::Cut) => {
                self.handle_cut();
                false
            }
            (EventRouting::DiscreteKeys, EditEvent::Paste) => {
                self.handle_paste();
                false
            }
            (EventRouting::DiscreteKeys, EditEvent::Drop) => self.handle_drop(),
        }
    }

    /// Backspace and Delete. Returns `true` when the key was handled (its
    /// native action must be suppressed).
    pub fn handle_keydown(&mut self, key: KeyInput) -> bool {
        let intent = key.keydown_intent();
        if !matches!(intent, EditIntent::Delete(_)) {
            return false;
        }
        let selection = self.adapter.selection();
        let (start, end) = self.editable_span();
        if selection.start <= start && selection.end >= end {
            log::debug!(target: "input.handler", "destructive key over whole value, clearing");
            self.clear_value();
        } else {
            self.apply_intent(intent);
        }
        true
    }

    /// Character keys. The native action is always suppressed.
    pub fn handle_keypress(&mut self, key: KeyInput) -> bool {
        self.apply_intent(key.keypress_intent());
        true
    }

    /// The platform changed the text on its own; recover the edit from the
    /// length difference against the last committed text.
    pub fn handle_input(&mut self) {
        let raw = self.adapter.raw_value().to_string();
        let selection_start = self.adapter.selection().start;
        let typed = selection_start
            .checked_sub(1)
            .and_then(|pos| char_at(&raw, pos));
        let len = char_len(&raw) as isize;
        let stored = self.adapter.stored_raw_value().to_string();
        let stored_len = char_len(&stored) as isize;

        if (len - stored_len).abs() != 1 {
            log::debug!(
                target: "input.handler",
                "bulk input mutation ({stored_len} -> {len}), reformatting in place"
            );
            let edit = update_field_value(&self.config, &raw, Some(selection_start), false);
            self.apply(Some(edit));
            self.notify_change();
            return;
        }

        self.adapter.set_raw_value(&stored);
        if len < stored_len {
            self.defer(
                DeferredTask::DeferredBackspace {
                    caret: selection_start,
                },
                BACKSPACE_DELAY_TICKS,
            );
        } else {
            let edit = update_field_value(
                &self.config,
                &stored,
                Some(selection_start.saturating_sub(1)),
                false,
            );
            self.apply(Some(edit));
            self.apply_intent(typed.map_or(EditIntent::Ignore, EditIntent::from_char));
        }
    }

    pub fn handle_cut(&mut self) {
        self.defer(DeferredTask::ResyncAfterCut, CUT_DELAY_TICKS);
    }

    pub fn handle_paste(&mut self) {
        self.defer(DeferredTask::ResyncAfterPaste, PASTE_DELAY_TICKS);
    }

    pub fn handle_blur(&mut self) {
        if let Some(callback) = self.on_model_touched.as_mut() {
            callback();
        }
    }

    /// Whether the host should block a native drop.
    pub fn handle_drop(&mut self) -> bool {
        self.routing == EventRouting::DiscreteKeys
    }

    /// Advance the scheduler one tick and run what became due. Returns the
    /// number of tasks run.
    pub fn tick(&mut self) -> usize {
        let due = self.scheduler.advance();
        let ran = due.len();
        for task in due {
            self.run_task(task);
        }
        ran
    }

    /// Tick until no deferred work is left.
    pub fn run_until_idle(&mut self) -> usize {
        let mut ran = 0;
        while self.scheduler.pending() > 0 {
            ran += self.tick();
        }
        ran
    }

    fn defer(&mut self, task: DeferredTask, delay_ticks: u32) {
        log::trace!(target: "input.handler", "defer {task:?} by {delay_ticks}");
        self.scheduler.defer(task, delay_ticks);
    }

    fn run_task(&mut self, task: DeferredTask) {
        log::trace!(target: "input.handler", "run {task:?}");
        match task {
            DeferredTask::ResyncAfterCut | DeferredTask::ResyncAfterPaste => {
                let raw = self.adapter.raw_value().to_string();
                let edit = update_field_value(&self.config, &raw, None, false);
                self.apply(Some(edit));
                let value = self.read_value();
                self.set_value(value);
            }
            DeferredTask::DeferredBackspace { caret } => {
                let raw = self.adapter.raw_value().to_string();
                let edit = update_field_value(&self.config, &raw, Some(caret + 1), false);
                self.apply(Some(edit));
                let edit = remove_number(&self.config, &self.state(), DeleteKey::Backward);
                self.apply(edit);
            }
        }
        self.notify_change();
    }

    fn apply_intent(&mut self, intent: EditIntent) {
        log::trace!(target: "input.handler", "intent {intent:?}");
        match intent {
            EditIntent::Ignore => return,
            EditIntent::Positive => {
                let edit = change_to_positive(&self.config, &self.state());
                self.apply(edit);
            }
            EditIntent::Negative => {
                let edit = change_to_negative(&self.config, &self.state());
                self.apply(edit);
            }
            EditIntent::Delete(direction) => {
                let edit = remove_number(&self.config, &self.state(), direction);
                self.apply(edit);
            }
            EditIntent::Insert(key) => {
                let selection = self.adapter.selection();
                let raw = self.adapter.raw_value();
                if can_input_more_numbers(raw, selection, self.adapter.max_length()) {
                    let reset = !raw.is_empty() && selection.len() == char_len(raw);
                    if reset {
                        self.set_value(None);
                    }
                    match add_number(&self.config, &self.state(), key) {
                        Some(edit) => self.apply(Some(edit)),
                        // An unusable key leaves the field and the model alone.
                        None if !reset => return,
                        None => {}
                    }
                }
            }
        }
        self.notify_change();
    }

    /// Caret slots between the prefix and the suffix of the current text.
    fn editable_span(&self) -> (usize, usize) {
        let len = char_len(self.adapter.raw_value());
        let end = len.saturating_sub(self.config.suffix_len());
        (self.config.prefix_len().min(end), end)
    }

    fn state(&self) -> EditState {
        EditState::new(self.adapter.raw_value(), self.adapter.selection())
    }

    fn apply(&mut self, edit: Option<Edit>) {
        if let Some(edit) = edit {
            self.adapter.commit(&edit.text, edit.caret);
        }
    }

    fn notify_change(&mut self) {
        let value = self.read_value();
        if let Some(callback) = self.on_model_change.as_mut() {
            callback(value);
        }
    }
}

impl<F: Field + fmt::Debug, S: Scheduler + fmt::Debug> fmt::Debug for InputHandler<F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputHandler")
            .field("adapter", &self.adapter)
            .field("config", &self.config)
            .field("scheduler", &self.scheduler)
            .field("routing", &self.routing)
            .field("on_model_change", &self.on_model_change.is_some())
            .field("on_model_touched", &self.on_model_touched.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KEY_BACKSPACE, KEY_DELETE, KEY_LOWER_A, KEY_MINUS, KEY_PLUS};
    use input_core::{MemoryField, SelectionRange};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording(
        config: MaskConfig,
        field: MemoryField,
    ) -> (InputHandler<MemoryField>, Rc<RefCell<Vec<NumericValue>>>) {
        let mut handler = InputHandler::new(field, config);
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        handler.set_on_model_change(move |value| sink.borrow_mut().push(value));
        (handler, changes)
    }

    fn type_str(handler: &mut InputHandler<MemoryField>, keys: &str) {
        for ch in keys.chars() {
            handler.handle_keypress(KeyInput::from_char(ch));
        }
    }

    fn text(handler: &InputHandler<MemoryField>) -> &str {
        handler.field().text()
    }

    #[test]
    fn typing_shifts_digits_in_and_notifies() {
        let (mut handler, changes) = recording(MaskConfig::default(), MemoryField::new());
        type_str(&mut handler, "123");

        assert_eq!(text(&handler), "R$ 1.23");
        assert_eq!(handler.field().selection(), SelectionRange::caret(7));
        assert_eq!(*changes.borrow(), vec![Some(0.01), Some(0.12), Some(1.23)]);
    }

    #[test]
    fn set_value_formats_without_notifying() {
        let (mut handler, changes) = recording(MaskConfig::default(), MemoryField::new());
        handler.set_value(Some(-1234.5));
        assert_eq!(text(&handler), "-R$ 1,234.50");
        assert_eq!(handler.read_value(), Some(-1234.5));
        assert!(changes.borrow().is_empty());

        handler.set_value(None);
        assert_eq!(text(&handler), "");
    }

    #[test]
    fn full_span_backspace_clears_nullable_field() {
        let config = MaskConfig::plain().with_nullable(true);
        let (mut handler, changes) = recording(config, MemoryField::new());
        handler.set_value(Some(1.0));
        handler.field_mut().select_all();

        assert!(handler.handle_keydown(KeyInput::new(KEY_BACKSPACE)));
        assert_eq!(text(&handler), "");
        assert_eq!(handler.read_value(), None);
        assert_eq!(*changes.borrow(), vec![None]);
    }

    #[test]
    fn full_span_delete_zeroes_non_nullable_field() {
        let (mut handler, changes) = recording(MaskConfig::default(), MemoryField::new());
        handler.set_value(Some(42.0));
        handler.field_mut().set_selection(3, 8);

        assert!(handler.handle_keydown(KeyInput::new(KEY_DELETE)));
        assert_eq!(text(&handler), "R$ 0.00");
        assert_eq!(*changes.borrow(), vec![Some(0.0)]);
    }

    #[test]
    fn keydown_backspace_removes_digit() {
        let (mut handler, changes) = recording(MaskConfig::plain(), MemoryField::new());
        handler.set_value(Some(12.34));

        assert!(handler.handle_keydown(KeyInput::new(KEY_BACKSPACE)));
        assert_eq!(text(&handler), "1.23");
        assert_eq!(*changes.borrow(), vec![Some(1.23)]);
    }

    #[test]
    fn keydown_ignores_other_keys() {
        let (mut handler, changes) = recording(MaskConfig::plain(), MemoryField::new());
        handler.set_value(Some(1.0));
        assert!(!handler.handle_keydown(KeyInput::from_char('1')));
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn sign_keys_toggle() {
        let (mut handler, changes) = recording(MaskConfig::default(), MemoryField::new());
        handler.set_value(Some(5.0));

        handler.handle_keypress(KeyInput::new(KEY_MINUS));
        assert_eq!(text(&handler), "-R$ 5.00");
        handler.handle_keypress(KeyInput::new(KEY_PLUS));
        assert_eq!(text(&handler), "R$ 5.00");
        assert_eq!(*changes.borrow(), vec![Some(-5.0), Some(5.0)]);
    }

    #[test]
    fn minus_without_negatives_changes_nothing() {
        let config = MaskConfig::plain().with_allow_negative(false);
        let (mut handler, changes) = recording(config, MemoryField::new());
        handler.set_value(Some(5.0));

        handler.handle_keypress(KeyInput::new(KEY_MINUS));
        assert_eq!(text(&handler), "5.00");
        assert_eq!(*changes.borrow(), vec![Some(5.0)]);
    }

    #[test]
    fn ctrl_a_and_tab_do_not_notify() {
        let (mut handler, changes) = recording(MaskConfig::plain(), MemoryField::new());
        handler.set_value(Some(5.0));

        assert!(handler.handle_keypress(KeyInput::with_ctrl(KEY_LOWER_A)));
        assert!(handler.handle_keypress(KeyInput::new(crate::event::KEY_TAB)));
        assert_eq!(text(&handler), "5.00");
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn rejected_characters_do_not_notify() {
        let (mut handler, changes) = recording(MaskConfig::plain(), MemoryField::new());
        handler.set_value(Some(5.0));
        type_str(&mut handler, "x$");
        assert_eq!(text(&handler), "5.00");
        assert_eq!(handler.field().selection(), SelectionRange::caret(4));
        assert!(changes.borrow().is_empty());

        // A separator away from its twin is rejected the same way.
        handler.field_mut().set_caret(1);
        type_str(&mut handler, ",");
        assert_eq!(text(&handler), "5.00");
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn rejected_character_on_empty_field_is_silent() {
        let (mut handler, changes) = recording(MaskConfig::default(), MemoryField::new());
        type_str(&mut handler, "q");
        assert_eq!(text(&handler), "");
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn sign_keys_keep_caret_before_suffix() {
        let config = MaskConfig::plain().with_suffix(" BRL");
        let (mut handler, changes) = recording(config, MemoryField::new());
        handler.set_value(Some(1.0));
        handler.field_mut().set_caret(4);

        handler.handle_keypress(KeyInput::new(KEY_MINUS));
        assert_eq!(text(&handler), "-1.00 BRL");
        assert_eq!(handler.field().selection(), SelectionRange::caret(5));

        handler.handle_keypress(KeyInput::new(KEY_PLUS));
        assert_eq!(text(&handler), "1.00 BRL");
        assert_eq!(handler.field().selection(), SelectionRange::caret(4));
        assert_eq!(*changes.borrow(), vec![Some(-1.0), Some(1.0)]);
    }

    #[test]
    fn written_values_keep_caret_inside_editable_span() {
        let config = MaskConfig::default().with_suffix(" BRL");
        let (mut handler, _) = recording(config, MemoryField::new());
        handler.set_value(Some(1234.5));
        assert_eq!(text(&handler), "R$ 1,234.50 BRL");
        assert_eq!(handler.field().selection(), SelectionRange::caret(11));

        handler.clear_value();
        assert_eq!(text(&handler), "R$ 0.00 BRL");
        assert_eq!(handler.field().selection(), SelectionRange::caret(7));

        handler.set_value(None);
        assert_eq!(handler.field().selection(), SelectionRange::caret(0));
    }

    #[test]
    fn typing_over_full_selection_starts_fresh() {
        let (mut handler, _) = recording(MaskConfig::plain(), MemoryField::new());
        handler.set_value(Some(1.0));
        handler.field_mut().select_all();
        type_str(&mut handler, "7");
        assert_eq!(text(&handler), "0.07");
    }

    #[test]
    fn max_length_blocks_more_digits() {
        let (mut handler, changes) =
            recording(MaskConfig::plain(), MemoryField::with_max_length(4));
        handler.set_value(Some(12.34));
        type_str(&mut handler, "5");

        assert_eq!(text(&handler), "12.34");
        assert_eq!(*changes.borrow(), vec![Some(12.34)]);
    }

    #[test]
    fn input_event_insertion_matches_keypress_path() {
        let config = MaskConfig::plain().with_precision(0);
        let (mut handler, changes) = recording(config.clone(), MemoryField::new());
        handler.set_value(Some(12.0));
        handler.field_mut().insert_text("3");
        assert_eq!(text(&handler), "123");

        handler.handle_input();
        assert_eq!(text(&handler), "123");
        assert_eq!(handler.field().selection(), SelectionRange::caret(3));

        let (mut direct, _) = recording(config, MemoryField::new());
        direct.set_value(Some(12.0));
        type_str(&mut direct, "3");
        assert_eq!(text(&handler), text(&direct));
        assert_eq!(handler.field().selection(), direct.field().selection());
        assert_eq!(*changes.borrow(), vec![Some(123.0)]);
    }

    #[test]
    fn input_event_deletion_is_deferred() {
        let (mut handler, changes) = recording(MaskConfig::plain(), MemoryField::new());
        handler.set_value(Some(1.23));
        handler.field_mut().backspace();
        assert_eq!(text(&handler), "1.2");

        handler.handle_input();
        assert_eq!(text(&handler), "1.23");
        assert!(changes.borrow().is_empty());
        assert_eq!(handler.scheduler().pending(), 1);

        assert_eq!(handler.tick(), 1);
        assert_eq!(text(&handler), "0.12");
        assert_eq!(*changes.borrow(), vec![Some(0.12)]);
    }

    #[test]
    fn input_event_bulk_change_reformats_in_place() {
        let (mut handler, changes) = recording(MaskConfig::plain(), MemoryField::new());
        handler.set_value(Some(1.0));
        handler.field_mut().insert_text("999");

        handler.handle_input();
        assert_eq!(text(&handler), "1,009.99");
        assert_eq!(*changes.borrow(), vec![Some(1009.99)]);
    }

    #[test]
    fn cut_resyncs_on_next_tick() {
        let (mut handler, changes) = recording(MaskConfig::plain(), MemoryField::new());
        handler.set_value(Some(1234.56));
        handler.field_mut().set_selection(0, 2);
        handler.field_mut().cut();
        handler.handle_cut();
        assert_eq!(text(&handler), "234.56");
        assert!(changes.borrow().is_empty());

        handler.tick();
        assert_eq!(text(&handler), "234.56");
        assert_eq!(*changes.borrow(), vec![Some(234.56)]);
    }

    #[test]
    fn paste_resyncs_one_tick_after_cut() {
        let (mut handler, changes) = recording(MaskConfig::plain(), MemoryField::new());
        handler.field_mut().insert_text("1234.50");
        handler.handle_paste();

        assert_eq!(handler.tick(), 0);
        assert_eq!(text(&handler), "1234.50");
        assert_eq!(handler.tick(), 1);
        assert_eq!(text(&handler), "1,234.50");
        assert_eq!(*changes.borrow(), vec![Some(1234.5)]);
    }

    #[test]
    fn run_until_idle_drains_queue() {
        let (mut handler, _) = recording(MaskConfig::plain(), MemoryField::new());
        handler.handle_paste();
        handler.handle_cut();
        assert_eq!(handler.run_until_idle(), 2);
        assert_eq!(handler.scheduler().pending(), 0);
    }

    #[test]
    fn update_options_keeps_value() {
        let (mut handler, changes) = recording(MaskConfig::default(), MemoryField::new());
        handler.set_value(Some(1234.5));
        handler.update_options(
            MaskConfig::default()
                .with_decimal(',')
                .with_thousands(Some('.')),
        );
        assert_eq!(text(&handler), "R$ 1.234,50");
        assert_eq!(handler.read_value(), Some(1234.5));
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn routing_gates_event_families() {
        let (mut handler, changes) = recording(MaskConfig::plain(), MemoryField::new());
        handler.set_value(Some(1.0));

        assert!(!handler.dispatch(EditEvent::Input));
        assert!(handler.dispatch(EditEvent::Keypress(KeyInput::from_char('5'))));
        assert!(handler.dispatch(EditEvent::Drop));
        assert_eq!(text(&handler), "10.05");

        handler.set_routing(EventRouting::InputEvents);
        assert!(!handler.dispatch(EditEvent::Keypress(KeyInput::from_char('5'))));
        assert!(!handler.dispatch(EditEvent::Drop));
        assert_eq!(text(&handler), "10.05");
        assert_eq!(*changes.borrow(), vec![Some(10.05)]);
    }

    #[test]
    fn blur_reports_touched() {
        let (mut handler, changes) = recording(MaskConfig::plain(), MemoryField::new());
        let touched = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&touched);
        handler.set_on_model_touched(move || *sink.borrow_mut() += 1);

        handler.dispatch(EditEvent::Blur);
        handler.set_routing(EventRouting::InputEvents);
        handler.dispatch(EditEvent::Blur);
        assert_eq!(*touched.borrow(), 2);
        assert!(changes.borrow().is_empty());
    }
}
