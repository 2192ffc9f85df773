//! Cell values and the missing-value rule.
//!
//! Every raw field read from an input record passes through [`Value::normalize`]
//! before a rule sees it: blank text and absent fields become [`Value::Missing`],
//! text is trimmed, and numbers (including zero) are kept as they are.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder written for absent or blank data.
pub const MISSING_SENTINEL: &str = "\\N";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Value {
    #[default]
    Missing,
    Text(String),
    Number(f64),
}

impl Value {
    /// Build a text value, mapping blank input to [`Value::Missing`].
    pub fn text(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.trim().is_empty() {
            Self::Missing
        } else {
            Self::Text(raw)
        }
    }

    /// Read a raw delimited-file cell. Cells holding a finite number (after
    /// trimming) become [`Value::Number`]; anything else is kept verbatim.
    pub fn from_cell(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() && !trimmed.is_empty() => Self::Number(number),
            _ => Self::Text(raw.to_string()),
        }
    }

    /// Apply the missing-value rule to a raw field.
    pub fn normalize(raw: Option<&Value>) -> Value {
        match raw {
            None | Some(Value::Missing) => Value::Missing,
            Some(Value::Text(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Value::Missing
                } else {
                    Value::Text(trimmed.to_string())
                }
            }
            Some(Value::Number(number)) if number.is_nan() => Value::Missing,
            Some(Value::Number(number)) => Value::Number(*number),
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(text) => text == MISSING_SENTINEL,
            Self::Number(_) => false,
        }
    }

    /// Missing, blank or numerically zero. Such values never take part in a
    /// key filter.
    pub fn is_blank_or_zero(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(text) => text.is_empty() || text == MISSING_SENTINEL,
            Self::Number(number) => *number == 0.0 || number.is_nan(),
        }
    }

    /// Numeric view of the value. Text is parsed after trimming.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Missing => None,
            Self::Number(number) => Some(*number),
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
        }
    }

    /// Leading-integer view of the value: optional sign followed by digits,
    /// anything after the digits is ignored (`"12.3"` reads as 12).
    pub fn as_leading_int(&self) -> Option<i64> {
        match self {
            Self::Missing => None,
            Self::Number(number) if number.is_finite() => Some(number.trunc() as i64),
            Self::Number(_) => None,
            Self::Text(text) => parse_leading_int(text),
        }
    }

    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Missing => Cow::Borrowed(MISSING_SENTINEL),
            Self::Text(text) => Cow::Borrowed(text.as_str()),
            Self::Number(number) => Cow::Owned(format_number(*number)),
        }
    }

    /// Equality with the coercion rules of the legacy tool: a number compared
    /// with numeric text compares numerically, everything else compares by
    /// rendered text.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Number(left), Self::Number(right)) => left == right,
            (Self::Number(left), _) => other.as_f64().is_some_and(|right| *left == right),
            (_, Self::Number(right)) => self.as_f64().is_some_and(|left| left == *right),
            _ => self.as_text() == other.as_text(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

/// Render a number without a trailing `.0` when it is integral.
pub fn format_number(number: f64) -> String {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(digits.len(), |(idx, _)| idx);
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_blank_and_absent() {
        assert_eq!(Value::normalize(None), Value::Missing);
        assert_eq!(Value::normalize(Some(&Value::from("   "))), Value::Missing);
        assert_eq!(
            Value::normalize(Some(&Value::from("  Bob "))),
            Value::from("Bob")
        );
    }

    #[test]
    fn cells_cast_finite_numbers_only() {
        assert_eq!(Value::from_cell("01"), Value::Number(1.0));
        assert_eq!(Value::from_cell(" 2.5 "), Value::Number(2.5));
        assert_eq!(Value::from_cell("-3"), Value::Number(-3.0));
        assert_eq!(Value::from_cell("A1"), Value::from("A1"));
        assert_eq!(Value::from_cell(" Ann "), Value::from(" Ann "));
        assert_eq!(Value::from_cell(""), Value::from(""));
        assert_eq!(Value::from_cell("inf"), Value::from("inf"));
        assert_eq!(Value::from_cell("NaN"), Value::from("NaN"));
    }

    #[test]
    fn normalize_keeps_zero() {
        assert_eq!(
            Value::normalize(Some(&Value::Number(0.0))),
            Value::Number(0.0)
        );
    }

    #[test]
    fn loose_equality_coerces_numbers() {
        assert!(Value::Number(1.0).loose_eq(&Value::from("1")));
        assert!(Value::from("1").loose_eq(&Value::Number(1.0)));
        assert!(!Value::from("1.0").loose_eq(&Value::from("1")));
        assert!(Value::Missing.loose_eq(&Value::from("\\N")));
        assert!(!Value::Missing.loose_eq(&Value::from("")));
    }

    #[test]
    fn leading_int_reads_like_parse_int() {
        assert_eq!(Value::from("12.3").as_leading_int(), Some(12));
        assert_eq!(Value::from(" -4x").as_leading_int(), Some(-4));
        assert_eq!(Value::from("abc").as_leading_int(), None);
        assert_eq!(Value::Missing.as_leading_int(), None);
        assert_eq!(Value::Number(7.9).as_leading_int(), Some(7));
    }

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(Value::Number(8.0).to_string(), "8");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::Missing.to_string(), "\\N");
    }
}
