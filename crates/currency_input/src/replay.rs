//! Scripted event replay.
//!
//! A [`Script`] describes a field (config, routing, max length, initial
//! value) and a list of [`Step`]s: host events, native platform mutations and
//! scheduler ticks. [`run`] plays it against a [`MemoryField`] and renders one
//! line per step:
//!
//! ```text
//! keypress 5: "R$ 0.05" 7..7 change=0.05 prevented
//! ```
//!
//! The field text is `{:?}`-quoted, followed by the selection, then every
//! notification the step fired and finally `prevented` when the host would
//! have suppressed the native action.

use crate::event::{EditEvent, EventRouting, KeyInput, parse_key};
use crate::handler::InputHandler;
use core_types::NumericValue;
use input_core::MemoryField;
use mask::{ConfigError, MaskConfig};
use serde::Deserialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub config: MaskConfig,
    #[serde(default)]
    pub routing: EventRouting,
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Value written (without notification) before the first step.
    #[serde(default)]
    pub initial: Option<f64>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Lines [`check`] compares the replay against.
    #[serde(default)]
    pub expected: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Step {
    Keydown {
        key: String,
    },
    Keypress {
        key: String,
        #[serde(default)]
        ctrl: bool,
    },
    /// One keypress per character.
    Type {
        text: String,
    },
    Select {
        start: usize,
        end: usize,
    },
    Caret {
        at: usize,
    },
    /// Programmatic value write; a missing `value` writes `None`.
    SetValue {
        value: Option<f64>,
    },
    Options {
        config: MaskConfig,
    },
    NativeInsert {
        text: String,
    },
    NativeBackspace,
    NativeDelete,
    NativeCut,
    Input,
    Cut,
    Paste,
    Drop,
    Blur,
    Tick {
        #[serde(default = "one_tick")]
        count: u32,
    },
    /// Run every pending deferred task.
    Flush,
}

fn one_tick() -> u32 {
    1
}

impl Script {
    /// Parse a script and validate its config.
    pub fn from_toml_str(input: &str) -> Result<Self, ReplayError> {
        let script: Self = toml::from_str(input).map_err(ReplayError::Parse)?;
        script.config.validate().map_err(ReplayError::Config)?;
        Ok(script)
    }
}

#[derive(Debug)]
pub enum ReplayError {
    Parse(toml::de::Error),
    Config(ConfigError),
    UnknownKey { step: usize, key: String },
    Mismatch {
        line: usize,
        expected: Option<String>,
        actual: Option<String>,
    },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Parse(err) => write!(f, "invalid script: {err}"),
            ReplayError::Config(err) => write!(f, "invalid config: {err}"),
            ReplayError::UnknownKey { step, key } => {
                write!(f, "step {}: unknown key {key:?}", step + 1)
            }
            ReplayError::Mismatch {
                line,
                expected,
                actual,
            } => {
                let missing = "<missing>";
                write!(
                    f,
                    "line {}: expected {}, got {}",
                    line + 1,
                    expected.as_deref().unwrap_or(missing),
                    actual.as_deref().unwrap_or(missing)
                )
            }
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReplayError::Parse(err) => Some(err),
            ReplayError::Config(err) => Some(err),
            _ => None,
        }
    }
}

enum Notice {
    Change(NumericValue),
    Touched,
}

/// Play `script` and return the rendered lines, starting with an `init` line.
pub fn run(script: &Script) -> Result<Vec<String>, ReplayError> {
    let field = script
        .max_length
        .map_or_else(MemoryField::new, MemoryField::with_max_length);
    let mut handler = InputHandler::new(field, script.config.clone()).with_routing(script.routing);

    let notices = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&notices);
    handler.set_on_model_change(move |value| sink.borrow_mut().push(Notice::Change(value)));
    let sink = Rc::clone(&notices);
    handler.set_on_model_touched(move || sink.borrow_mut().push(Notice::Touched));

    if let Some(initial) = script.initial {
        handler.set_value(Some(initial));
    }

    let mut lines = Vec::with_capacity(script.steps.len() + 1);
    lines.push(render("init", &handler, &mut notices.borrow_mut(), false));

    for (idx, step) in script.steps.iter().enumerate() {
        let key_code = |key: &str| {
            parse_key(key).ok_or_else(|| ReplayError::UnknownKey {
                step: idx,
                key: key.to_string(),
            })
        };
        let (label, prevented) = match step {
            Step::Keydown { key } => {
                let input = KeyInput::new(key_code(key)?);
                (format!("keydown {key}"), handler.dispatch(EditEvent::Keydown(input)))
            }
            Step::Keypress { key, ctrl } => {
                let code = key_code(key)?;
                let (input, label) = if *ctrl {
                    (KeyInput::with_ctrl(code), format!("keypress ctrl+{key}"))
                } else {
                    (KeyInput::new(code), format!("keypress {key}"))
                };
                (label, handler.dispatch(EditEvent::Keypress(input)))
            }
            Step::Type { text } => {
                let mut prevented = false;
                for ch in text.chars() {
                    prevented |= handler.dispatch(EditEvent::Keypress(KeyInput::from_char(ch)));
                }
                (format!("type {text}"), prevented)
            }
            Step::Select { start, end } => {
                handler.field_mut().set_selection(*start, *end);
                (format!("select {start}..{end}"), false)
            }
            Step::Caret { at } => {
                handler.field_mut().set_caret(*at);
                (format!("caret {at}"), false)
            }
            Step::SetValue { value } => {
                handler.set_value(*value);
                (format!("set_value {}", render_value(*value)), false)
            }
            Step::Options { config } => {
                config.validate().map_err(ReplayError::Config)?;
                handler.update_options(config.clone());
                ("options".to_string(), false)
            }
            Step::NativeInsert { text } => {
                handler.field_mut().insert_text(text);
                (format!("native_insert {text:?}"), false)
            }
            Step::NativeBackspace => {
                handler.field_mut().backspace();
                ("native_backspace".to_string(), false)
            }
            Step::NativeDelete => {
                handler.field_mut().delete();
                ("native_delete".to_string(), false)
            }
            Step::NativeCut => {
                let removed = handler.field_mut().cut();
                (format!("native_cut {removed:?}"), false)
            }
            Step::Input => ("input".to_string(), handler.dispatch(EditEvent::Input)),
            Step::Cut => ("cut".to_string(), handler.dispatch(EditEvent::Cut)),
            Step::Paste => ("paste".to_string(), handler.dispatch(EditEvent::Paste)),
            Step::Drop => ("drop".to_string(), handler.dispatch(EditEvent::Drop)),
            Step::Blur => ("blur".to_string(), handler.dispatch(EditEvent::Blur)),
            Step::Tick { count } => {
                for _ in 0..*count {
                    handler.tick();
                }
                (format!("tick {count}"), false)
            }
            Step::Flush => {
                handler.run_until_idle();
                ("flush".to_string(), false)
            }
        };
        lines.push(render(&label, &handler, &mut notices.borrow_mut(), prevented));
    }
    Ok(lines)
}

/// Play `script` and compare against its `expected` lines.
pub fn check(script: &Script) -> Result<Vec<String>, ReplayError> {
    let lines = run(script)?;
    let max = lines.len().max(script.expected.len());
    for idx in 0..max {
        let expected = script.expected.get(idx);
        let actual = lines.get(idx);
        if expected != actual {
            return Err(ReplayError::Mismatch {
                line: idx,
                expected: expected.cloned(),
                actual: actual.cloned(),
            });
        }
    }
    Ok(lines)
}

fn render(
    label: &str,
    handler: &InputHandler<MemoryField>,
    notices: &mut Vec<Notice>,
    prevented: bool,
) -> String {
    let field = handler.field();
    let selection = field.selection();
    let mut line = format!(
        "{label}: {:?} {}..{}",
        field.text(),
        selection.start,
        selection.end
    );
    for notice in notices.drain(..) {
        match notice {
            Notice::Change(value) => {
                line.push_str(" change=");
                line.push_str(&render_value(value));
            }
            Notice::Touched => line.push_str(" touched"),
        }
    }
    if prevented {
        line.push_str(" prevented");
    }
    line
}

fn render_value(value: NumericValue) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "null".to_string(),
    }
}
