//! Typed scalar values produced by the runtime.

use std::fmt;

use linopt_hops::{format_double, LiteralValue, ValueType};

use crate::errors::EvalError;

/// Largest double that still truncates into an `i64` without overflow.
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_807.0;

/// A runtime scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarObject {
    Double(f64),
    Int(i64),
    Boolean(bool),
    String(String),
}

impl ScalarObject {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Double(_) => ValueType::Double,
            Self::Int(_) => ValueType::Int,
            Self::Boolean(_) => ValueType::Boolean,
            Self::String(_) => ValueType::String,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Numeric view; booleans count as 0/1, strings are rejected.
    pub fn as_f64(&self) -> Result<f64, EvalError> {
        match self {
            Self::Double(v) => Ok(*v),
            Self::Int(v) => Ok(*v as f64),
            Self::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Self::String(s) => Err(EvalError::TypeMismatch(format!(
                "string '{}' used as a number",
                s
            ))),
        }
    }

    /// Integer view; doubles truncate toward zero.
    pub fn as_i64(&self) -> Result<i64, EvalError> {
        match self {
            Self::Double(v) => truncate_to_i64(*v),
            Self::Int(v) => Ok(*v),
            Self::Boolean(b) => Ok(i64::from(*b)),
            Self::String(s) => Err(EvalError::TypeMismatch(format!(
                "string '{}' used as an integer",
                s
            ))),
        }
    }

    /// Truth value; numbers are true when non-zero.
    pub fn as_bool(&self) -> Result<bool, EvalError> {
        match self {
            Self::Double(v) => Ok(*v != 0.0),
            Self::Int(v) => Ok(*v != 0),
            Self::Boolean(b) => Ok(*b),
            Self::String(s) => Err(EvalError::TypeMismatch(format!(
                "string '{}' used as a boolean",
                s
            ))),
        }
    }

    /// Text view used by string concatenation and `as.character`-style output.
    pub fn string_value(&self) -> String {
        match self {
            Self::Double(v) => format_double(*v),
            Self::Int(v) => v.to_string(),
            Self::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    /// Convert to the declared output type of an instruction.
    ///
    /// `Unknown` leaves the value as computed.
    pub fn coerce(self, value_type: ValueType) -> Result<Self, EvalError> {
        match (value_type, self) {
            (ValueType::Double, Self::Double(v)) => Ok(Self::Double(v)),
            (ValueType::Int, Self::Int(v)) => Ok(Self::Int(v)),
            (ValueType::Boolean, Self::Boolean(b)) => Ok(Self::Boolean(b)),
            (ValueType::String, Self::String(s)) => Ok(Self::String(s)),
            (ValueType::Unknown, value) => Ok(value),
            (ValueType::Double, value) => Ok(Self::Double(value.as_f64()?)),
            (ValueType::Int, value) => Ok(Self::Int(value.as_i64()?)),
            (ValueType::Boolean, value) => Ok(Self::Boolean(value.as_bool()?)),
            (ValueType::String, value) => Ok(Self::String(value.string_value())),
        }
    }
}

impl From<&LiteralValue> for ScalarObject {
    fn from(value: &LiteralValue) -> Self {
        match value {
            LiteralValue::Double(v) => Self::Double(*v),
            LiteralValue::Int(v) => Self::Int(*v),
            LiteralValue::Boolean(b) => Self::Boolean(*b),
            LiteralValue::String(s) => Self::String(s.clone()),
        }
    }
}

impl fmt::Display for ScalarObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_value())
    }
}

pub(crate) fn truncate_to_i64(v: f64) -> Result<i64, EvalError> {
    if !v.is_finite() {
        return Err(EvalError::InvalidCast(format!(
            "{} cannot be converted to an integer",
            format_double(v)
        )));
    }
    let t = v.trunc();
    if t >= I64_UPPER_BOUND || t < -I64_UPPER_BOUND - 1.0 {
        return Err(EvalError::IntegerOverflow(format!(
            "{} does not fit into a 64-bit integer",
            format_double(v)
        )));
    }
    Ok(t as i64)
}
