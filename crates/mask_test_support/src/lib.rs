pub mod fixtures;

pub use fixtures::{Fixture, fixture_paths, load_fixture, load_fixtures};

use std::fmt::Write;

/// A rendered replay line, `label: "text" start..end notes...`, split into
/// the parts a mismatch report names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayLine<'a> {
    pub label: &'a str,
    /// The `{:?}`-quoted field text, quotes included.
    pub text: &'a str,
    pub selection: &'a str,
    /// Notifications and the `prevented` marker.
    pub notes: &'a str,
}

impl<'a> ReplayLine<'a> {
    /// Split `line`. Returns `None` when it is not shaped like a replay line.
    pub fn parse(line: &'a str) -> Option<Self> {
        let (label, rest) = line.split_once(": \"")?;
        let close = closing_quote(rest)?;
        let text = &line[label.len() + 2..label.len() + 3 + close + 1];
        let rest = rest[close + 1..].strip_prefix(' ')?;
        let (selection, notes) = rest.split_once(' ').unwrap_or((rest, ""));
        Some(Self {
            label,
            text,
            selection,
            notes,
        })
    }

    /// Names of the parts that differ from `other`.
    pub fn differing_parts(&self, other: &ReplayLine<'_>) -> Vec<&'static str> {
        let mut parts = Vec::new();
        if self.label != other.label {
            parts.push("step");
        }
        if self.text != other.text {
            parts.push("text");
        }
        if self.selection != other.selection {
            parts.push("selection");
        }
        if self.notes != other.notes {
            parts.push("notifications");
        }
        parts
    }
}

/// Byte index (within `quoted_tail`) of the quote closing a `{:?}` string
/// whose opening quote was already consumed.
fn closing_quote(quoted_tail: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, ch) in quoted_tail.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Describe the first mismatching replay line between `expected` and
/// `actual`: which parts of it differ, with two lines of context each side.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    let max = expected.len().max(actual.len());
    let mut out = String::new();
    let missing = "<missing>";
    let line_at = |lines: &[String], idx: usize| -> String {
        lines.get(idx).cloned().unwrap_or_else(|| missing.to_string())
    };

    if let Some(i) = (0..max).find(|&i| expected.get(i) != actual.get(i)) {
        let start = i.saturating_sub(2);
        let end = (i + 3).min(max);
        let _ = write!(&mut out, "first mismatch at step line {}", i + 1);
        let parsed = (
            expected.get(i).and_then(|line| ReplayLine::parse(line)),
            actual.get(i).and_then(|line| ReplayLine::parse(line)),
        );
        if let (Some(left), Some(right)) = parsed {
            let parts = left.differing_parts(&right).join(", ");
            let _ = write!(&mut out, ", differs in {parts}");
        }
        let _ = writeln!(&mut out, ":");
        for line_idx in start..end {
            let marker = if line_idx == i { ">" } else { " " };
            let left = line_at(expected, line_idx);
            let right = line_at(actual, line_idx);
            let _ = writeln!(&mut out, "{marker} {:>4}  expected: {left}", line_idx + 1);
            let _ = writeln!(&mut out, "{marker} {:>4}    actual: {right}", line_idx + 1);
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, replay produced {}",
        expected.len(),
        actual.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn parses_replay_line_parts() {
        let raw = r#"keypress 5: "R$ 0.05" 7..7 change=0.05 prevented"#;
        let line = ReplayLine::parse(raw).unwrap();
        assert_eq!(line.label, "keypress 5");
        assert_eq!(line.text, r#""R$ 0.05""#);
        assert_eq!(line.selection, "7..7");
        assert_eq!(line.notes, "change=0.05 prevented");

        let bare = ReplayLine::parse(r#"init: "" 0..0"#).unwrap();
        assert_eq!(bare.text, r#""""#);
        assert_eq!(bare.notes, "");
    }

    #[test]
    fn parses_escaped_quotes_in_labels_and_text() {
        let line = ReplayLine::parse(r#"native_insert "\"": "a\"b" 2..2"#).unwrap();
        assert_eq!(line.label, r#"native_insert "\"""#);
        assert_eq!(line.text, r#""a\"b""#);
        assert_eq!(line.selection, "2..2");
        assert!(ReplayLine::parse("not a replay line").is_none());
    }

    #[test]
    fn diff_names_differing_parts() {
        let expected = lines(&[r#"init: "" 0..0"#, r#"type 1: "0.01" 4..4 change=0.01"#]);
        let actual = lines(&[r#"init: "" 0..0"#, r#"type 1: "0.01" 3..3"#]);
        let diff = diff_lines(&expected, &actual);
        assert!(diff.starts_with(
            "first mismatch at step line 2, differs in selection, notifications:"
        ));
        assert!(diff.contains(r#">    2    actual: type 1: "0.01" 3..3"#));
    }

    #[test]
    fn diff_reports_missing_tail() {
        let diff = diff_lines(&lines(&["a", "b"]), &lines(&["a"]));
        assert!(diff.starts_with("first mismatch at step line 2:"));
        assert!(diff.contains("actual: <missing>"));
        assert!(diff.ends_with("expected 2 lines, replay produced 1\n"));
    }
}
