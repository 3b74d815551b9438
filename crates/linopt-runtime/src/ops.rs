//! Scalar operator semantics.
//!
//! This module is the single source of truth for scalar results. Run-time
//! instruction execution and compile-time constant folding both go through
//! [`eval_binary`] and [`eval_unary`], so a folded literal is exactly what the
//! unoptimized program would have computed.
//!
//! ## Type rules
//!
//! - `+ - *` stay integral when both operands are integers (checked, overflow
//!   is an error) and are doubles otherwise; `+` with a string operand
//!   concatenates
//! - `/`, `^` and `log` always produce doubles
//! - `%/%` and `%%` use floor semantics; integer division by zero is an error
//! - comparisons produce booleans; two strings compare lexicographically

use std::cmp::Ordering;

use linopt_hops::{OpOp1, OpOp2};

use crate::errors::EvalError;
use crate::scalar::{truncate_to_i64, ScalarObject};

/// Evaluate a binary scalar operation.
pub fn eval_binary(
    op: OpOp2,
    left: &ScalarObject,
    right: &ScalarObject,
) -> Result<ScalarObject, EvalError> {
    use ScalarObject::{Boolean, Double, Int};

    match op {
        OpOp2::Plus if left.is_string() || right.is_string() => Ok(ScalarObject::String(
            format!("{}{}", left.string_value(), right.string_value()),
        )),
        OpOp2::Plus | OpOp2::Minus | OpOp2::Mult => match (left, right) {
            (Int(l), Int(r)) => checked_int_arithmetic(op, *l, *r).map(Int),
            _ => {
                let (l, r) = (left.as_f64()?, right.as_f64()?);
                Ok(Double(match op {
                    OpOp2::Plus => l + r,
                    OpOp2::Minus => l - r,
                    _ => l * r,
                }))
            }
        },
        OpOp2::Div => Ok(Double(left.as_f64()? / right.as_f64()?)),
        OpOp2::IntDiv => match (left, right) {
            (Int(l), Int(r)) => floor_div(*l, *r).map(Int),
            _ => Ok(Double((left.as_f64()? / right.as_f64()?).floor())),
        },
        OpOp2::Modulus => match (left, right) {
            (Int(l), Int(r)) => floor_mod(*l, *r).map(Int),
            _ => {
                let (l, r) = (left.as_f64()?, right.as_f64()?);
                Ok(Double(l - r * (l / r).floor()))
            }
        },
        OpOp2::Pow => Ok(Double(left.as_f64()?.powf(right.as_f64()?))),
        OpOp2::Log => Ok(Double(left.as_f64()?.ln() / right.as_f64()?.ln())),
        OpOp2::Min | OpOp2::Max => match (left, right) {
            (Int(l), Int(r)) => Ok(Int(if op == OpOp2::Min {
                (*l).min(*r)
            } else {
                (*l).max(*r)
            })),
            _ => {
                let (l, r) = (left.as_f64()?, right.as_f64()?);
                if l.is_nan() || r.is_nan() {
                    return Ok(Double(f64::NAN));
                }
                Ok(Double(if op == OpOp2::Min { l.min(r) } else { l.max(r) }))
            }
        },
        OpOp2::Less
        | OpOp2::LessEqual
        | OpOp2::Greater
        | OpOp2::GreaterEqual
        | OpOp2::Equal
        | OpOp2::NotEqual => compare(op, left, right).map(Boolean),
        OpOp2::And => {
            let (l, r) = (left.as_bool()?, right.as_bool()?);
            Ok(Boolean(l && r))
        }
        OpOp2::Or => {
            let (l, r) = (left.as_bool()?, right.as_bool()?);
            Ok(Boolean(l || r))
        }
        OpOp2::CBind | OpOp2::RBind => Err(EvalError::UnsupportedOperation(format!(
            "{} is not defined on scalars",
            op
        ))),
    }
}

/// Evaluate a unary scalar operation.
pub fn eval_unary(op: OpOp1, input: &ScalarObject) -> Result<ScalarObject, EvalError> {
    use ScalarObject::{Boolean, Double, Int};

    match op {
        OpOp1::Not => Ok(Boolean(!input.as_bool()?)),
        OpOp1::Abs => match input {
            Int(v) => v
                .checked_abs()
                .map(Int)
                .ok_or_else(|| EvalError::IntegerOverflow(format!("abs({})", v))),
            _ => Ok(Double(input.as_f64()?.abs())),
        },
        OpOp1::Round | OpOp1::Floor | OpOp1::Ceil => match input {
            Int(v) => Ok(Int(*v)),
            _ => {
                let v = input.as_f64()?;
                Ok(Double(match op {
                    OpOp1::Round => v.round(),
                    OpOp1::Floor => v.floor(),
                    _ => v.ceil(),
                }))
            }
        },
        OpOp1::Sqrt => Ok(Double(input.as_f64()?.sqrt())),
        OpOp1::Exp => Ok(Double(input.as_f64()?.exp())),
        OpOp1::Log => Ok(Double(input.as_f64()?.ln())),
        OpOp1::Sin => Ok(Double(input.as_f64()?.sin())),
        OpOp1::Cos => Ok(Double(input.as_f64()?.cos())),
        OpOp1::CastAsScalar => Ok(input.clone()),
        OpOp1::CastAsMatrix => Err(EvalError::UnsupportedOperation(
            "as.matrix produces a matrix".into(),
        )),
        OpOp1::CastAsDouble => cast_as_double(input).map(Double),
        OpOp1::CastAsInt => cast_as_int(input).map(Int),
        OpOp1::CastAsBoolean => cast_as_boolean(input).map(Boolean),
    }
}

fn checked_int_arithmetic(op: OpOp2, l: i64, r: i64) -> Result<i64, EvalError> {
    let result = match op {
        OpOp2::Plus => l.checked_add(r),
        OpOp2::Minus => l.checked_sub(r),
        _ => l.checked_mul(r),
    };
    result.ok_or_else(|| EvalError::IntegerOverflow(format!("{} {} {}", l, op, r)))
}

fn floor_div(l: i64, r: i64) -> Result<i64, EvalError> {
    if r == 0 {
        return Err(EvalError::DivisionByZero(format!("{} %/% 0", l)));
    }
    let q = l
        .checked_div(r)
        .ok_or_else(|| EvalError::IntegerOverflow(format!("{} %/% {}", l, r)))?;
    if l % r != 0 && ((l < 0) != (r < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

fn floor_mod(l: i64, r: i64) -> Result<i64, EvalError> {
    if r == 0 {
        return Err(EvalError::DivisionByZero(format!("{} %% 0", l)));
    }
    let m = l.checked_rem(r).unwrap_or(0);
    if m != 0 && ((m < 0) != (r < 0)) {
        Ok(m + r)
    } else {
        Ok(m)
    }
}

fn compare(op: OpOp2, left: &ScalarObject, right: &ScalarObject) -> Result<bool, EvalError> {
    let ordering = match (left, right) {
        (ScalarObject::String(l), ScalarObject::String(r)) => Some(l.cmp(r)),
        (ScalarObject::String(_), _) | (_, ScalarObject::String(_)) => {
            return Err(EvalError::TypeMismatch(format!(
                "cannot compare {} with {}",
                left.value_type(),
                right.value_type()
            )));
        }
        (ScalarObject::Int(l), ScalarObject::Int(r)) => Some(l.cmp(r)),
        _ => left.as_f64()?.partial_cmp(&right.as_f64()?),
    };

    // NaN compares unequal to everything, including itself.
    let Some(ordering) = ordering else {
        return Ok(op == OpOp2::NotEqual);
    };
    Ok(match op {
        OpOp2::Less => ordering == Ordering::Less,
        OpOp2::LessEqual => ordering != Ordering::Greater,
        OpOp2::Greater => ordering == Ordering::Greater,
        OpOp2::GreaterEqual => ordering != Ordering::Less,
        OpOp2::Equal => ordering == Ordering::Equal,
        _ => ordering != Ordering::Equal,
    })
}

fn cast_as_double(input: &ScalarObject) -> Result<f64, EvalError> {
    match input {
        ScalarObject::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| EvalError::InvalidCast(format!("'{}' is not a double", s))),
        other => other.as_f64(),
    }
}

fn cast_as_int(input: &ScalarObject) -> Result<i64, EvalError> {
    match input {
        ScalarObject::String(s) => {
            let s = s.trim();
            if let Ok(v) = s.parse::<i64>() {
                return Ok(v);
            }
            let v = s
                .parse::<f64>()
                .map_err(|_| EvalError::InvalidCast(format!("'{}' is not an integer", s)))?;
            truncate_to_i64(v)
        }
        other => other.as_i64(),
    }
}

fn cast_as_boolean(input: &ScalarObject) -> Result<bool, EvalError> {
    match input {
        ScalarObject::String(s) => match s.trim() {
            "TRUE" | "true" => Ok(true),
            "FALSE" | "false" => Ok(false),
            other => Err(EvalError::InvalidCast(format!(
                "'{}' is not a boolean",
                other
            ))),
        },
        other => other.as_bool(),
    }
}
