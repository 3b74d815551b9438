//! Literal values carried by literal hops.

use std::fmt;

use crate::types::ValueType;

/// A compile-time known scalar value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiteralValue {
    Double(f64),
    Int(i64),
    Boolean(bool),
    String(String),
}

impl LiteralValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Double(_) => ValueType::Double,
            Self::Int(_) => ValueType::Int,
            Self::Boolean(_) => ValueType::Boolean,
            Self::String(_) => ValueType::String,
        }
    }

    /// The value of a boolean-typed literal, `None` for any other type.
    pub fn boolean_literal(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Double(v) => f.write_str(&format_double(*v)),
            Self::Int(v) => write!(f, "{}", v),
            Self::Boolean(v) => f.write_str(if *v { "TRUE" } else { "FALSE" }),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Canonical text of a double value.
///
/// Integral values keep a fractional digit (`5.0`); non-finite values are
/// spelled `NaN`, `Infinity` and `-Infinity`. Literal display and the scalar
/// runtime's string conversion share this formatting.
pub fn format_double(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{:?}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_keep_fractional_digit() {
        assert_eq!(format_double(5.0), "5.0");
        assert_eq!(format_double(-0.25), "-0.25");
        assert_eq!(format_double(f64::NAN), "NaN");
        assert_eq!(format_double(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn boolean_literal_only_for_booleans() {
        assert_eq!(LiteralValue::Boolean(false).boolean_literal(), Some(false));
        assert_eq!(LiteralValue::Int(0).boolean_literal(), None);
        assert_eq!(LiteralValue::from("false").boolean_literal(), None);
    }

    #[test]
    fn display_matches_value_type() {
        assert_eq!(LiteralValue::Int(20).to_string(), "20");
        assert_eq!(LiteralValue::Boolean(true).to_string(), "TRUE");
        assert_eq!(LiteralValue::Double(0.5).value_type(), ValueType::Double);
    }
}
