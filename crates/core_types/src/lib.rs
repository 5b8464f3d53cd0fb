/// Numeric model value behind a masked field. `None` only when the field is
/// nullable and empty.
pub type NumericValue = Option<f64>;

/// Raw key code as reported by the host (`which`/`charCode`/`keyCode`).
pub type KeyCode = u32;

/// How in-progress decimal digits are treated while typing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InputMode {
    /// Digits shift in from the right and the value is always re-rounded
    /// to the configured precision.
    #[default]
    Financial,
    /// Digits are typed left to right; the decimal portion keeps a fixed
    /// width and deletions inside it write zeros.
    Natural,
}
