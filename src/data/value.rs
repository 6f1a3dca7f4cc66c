//! Cell values of the sample metadata table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token used when an absent value has to be written back out.
pub const ABSENT_TOKEN: &str = "NA";

/// A single cell: text, a number, or the absent marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Numeric value (ages, BMI, ...).
    Number(f64),
    /// Free text or categorical level.
    Text(String),
    /// Missing value, whatever its encoding in the source file.
    Absent,
}

impl Value {
    /// Check if this is the absent marker.
    ///
    /// A NaN number counts as absent too, so it never inflates completeness.
    pub fn is_absent(&self) -> bool {
        match self {
            Value::Absent => true,
            Value::Number(v) => v.is_nan(),
            Value::Text(_) => false,
        }
    }

    /// Try to get as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Check whether this cell equals the desired value.
    ///
    /// Text compares by exact string equality, numbers compare numerically
    /// against the parsed desired value. Absent never matches.
    pub fn matches(&self, desired: &str) -> bool {
        match self {
            Value::Text(s) => s == desired,
            Value::Number(v) => desired
                .trim()
                .parse::<f64>()
                .map(|d| d == *v)
                .unwrap_or(false),
            Value::Absent => false,
        }
    }

    /// Interpret a raw cell according to the column type.
    ///
    /// Non-finite numbers (`NaN`, `inf`) are stored as absent.
    pub(crate) fn parse(raw: &str, value_type: ValueType) -> Self {
        match value_type {
            ValueType::Numeric => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Number)
                .unwrap_or(Value::Absent),
            ValueType::Text => Value::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) if v.is_nan() => write!(f, "{}", ABSENT_TOKEN),
            Value::Number(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
            Value::Absent => write!(f, "{}", ABSENT_TOKEN),
        }
    }
}

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Text,
    Numeric,
}
