//! Mask configuration.
//!
//! A [`MaskConfig`] is immutable for the duration of an edit and replaced
//! wholesale when the host changes options. The engine accepts any config,
//! including ones that fail [`MaskConfig::validate`]: a `max` below `min` is
//! raised to `min`, and the remaining checks only guard against separators
//! that would make the mask ambiguous.

use crate::digits::is_mask_digit;
use core_types::InputMode;
use std::fmt;

/// Largest precision accepted by [`MaskConfig::validate`]. `f64` cannot carry
/// more fractional digits than this faithfully.
pub const MAX_PRECISION: u32 = 15;

/// Fully resolved mask options.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct MaskConfig {
    /// Whether a leading `-` may be shown.
    pub allow_negative: bool,
    /// Carried for option compatibility; the engine never consults it.
    pub allow_zero: bool,
    /// Decimal separator.
    pub decimal: char,
    /// Thousands separator, `None` for no grouping.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "separator::deserialize"))]
    pub thousands: Option<char>,
    /// Number of fractional digits.
    pub precision: u32,
    /// Text shown before the number.
    pub prefix: String,
    /// Text shown after the number.
    pub suffix: String,
    /// Lower clamp bound.
    pub min: Option<f64>,
    /// Upper clamp bound.
    pub max: Option<f64>,
    /// Whether an empty field reads back as `None` instead of `0`.
    pub nullable: bool,
    /// How decimal digits behave while typing.
    pub input_mode: InputMode,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            allow_negative: true,
            allow_zero: true,
            decimal: '.',
            thousands: Some(','),
            precision: 2,
            prefix: "R$ ".to_string(),
            suffix: String::new(),
            min: None,
            max: None,
            nullable: false,
            input_mode: InputMode::Financial,
        }
    }
}

impl MaskConfig {
    /// Config with no prefix or suffix and otherwise default options.
    pub fn plain() -> Self {
        Self {
            prefix: String::new(),
            ..Self::default()
        }
    }

    pub fn with_allow_negative(mut self, allow_negative: bool) -> Self {
        self.allow_negative = allow_negative;
        self
    }

    pub fn with_decimal(mut self, decimal: char) -> Self {
        self.decimal = decimal;
        self
    }

    pub fn with_thousands(mut self, thousands: Option<char>) -> Self {
        self.thousands = thousands;
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_min(mut self, min: Option<f64>) -> Self {
        self.min = min;
        self
    }

    pub fn with_max(mut self, max: Option<f64>) -> Self {
        self.max = max;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_input_mode(mut self, input_mode: InputMode) -> Self {
        self.input_mode = input_mode;
        self
    }

    /// `max`, raised to `min` when both are set and out of order.
    pub fn effective_max(&self) -> Option<f64> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some(max.max(min)),
            (_, max) => max,
        }
    }

    /// Prefix length in caret slots.
    #[inline]
    pub fn prefix_len(&self) -> usize {
        self.prefix.chars().count()
    }

    /// Suffix length in caret slots.
    #[inline]
    pub fn suffix_len(&self) -> usize {
        self.suffix.chars().count()
    }

    /// Check that separators and affixes cannot be confused with digits or
    /// with each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_mask_digit(self.decimal) {
            return Err(ConfigError::DigitSeparator {
                kind: SeparatorKind::Decimal,
                separator: self.decimal,
            });
        }
        if let Some(thousands) = self.thousands {
            if is_mask_digit(thousands) {
                return Err(ConfigError::DigitSeparator {
                    kind: SeparatorKind::Thousands,
                    separator: thousands,
                });
            }
            if thousands == self.decimal {
                return Err(ConfigError::SeparatorsCollide {
                    separator: thousands,
                });
            }
        }
        for (affix, text) in [(AffixKind::Prefix, &self.prefix), (AffixKind::Suffix, &self.suffix)]
        {
            if text.chars().any(is_mask_digit) {
                return Err(ConfigError::DigitInAffix {
                    affix,
                    text: text.clone(),
                });
            }
        }
        if self.precision > MAX_PRECISION {
            return Err(ConfigError::PrecisionTooLarge {
                precision: self.precision,
            });
        }
        Ok(())
    }

    /// Parse and validate a config from TOML. Missing keys take their
    /// [`Default`] values.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeparatorKind {
    Decimal,
    Thousands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

#[derive(Debug)]
pub enum ConfigError {
    DigitSeparator {
        kind: SeparatorKind,
        separator: char,
    },
    SeparatorsCollide {
        separator: char,
    },
    DigitInAffix {
        affix: AffixKind,
        text: String,
    },
    PrecisionTooLarge {
        precision: u32,
    },
    #[cfg(feature = "serde")]
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DigitSeparator { kind, separator } => {
                let name = match kind {
                    SeparatorKind::Decimal => "decimal",
                    SeparatorKind::Thousands => "thousands",
                };
                write!(f, "{name} separator {separator:?} is a digit")
            }
            ConfigError::SeparatorsCollide { separator } => {
                write!(f, "decimal and thousands separators are both {separator:?}")
            }
            ConfigError::DigitInAffix { affix, text } => {
                let name = match affix {
                    AffixKind::Prefix => "prefix",
                    AffixKind::Suffix => "suffix",
                };
                write!(f, "{name} {text:?} contains a digit")
            }
            ConfigError::PrecisionTooLarge { precision } => {
                write!(f, "precision {precision} exceeds the maximum of {MAX_PRECISION}")
            }
            #[cfg(feature = "serde")]
            ConfigError::Parse(err) => write!(f, "invalid mask config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "serde")]
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "serde")]
mod separator {
    use serde::de::{Deserialize, Deserializer, Error};

    /// `""` disables the separator; anything else must be a single character.
    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<char>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(None),
            (Some(ch), None) => Ok(Some(ch)),
            _ => Err(D::Error::custom(format!(
                "separator must be a single character, got {raw:?}"
            ))),
        }
    }
}
