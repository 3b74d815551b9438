//! Executable scalar instructions.

use std::fmt;

use linopt_hops::{OpOp1, OpOp2, ValueType};

use crate::context::ExecutionContext;
use crate::errors::EvalError;
use crate::ops::{eval_binary, eval_unary};
use crate::scalar::ScalarObject;

/// Instruction operand: an inlined literal or a live variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(ScalarObject),
    Var(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(ScalarObject::String(s)) => write!(f, "\"{}\"", s),
            Self::Literal(value) => write!(f, "{}", value),
            Self::Var(name) => f.write_str(name),
        }
    }
}

/// A scalar control-program instruction.
///
/// Operator instructions carry the declared output value type of the hop they
/// were lowered from; the result is converted to it before being bound.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Binary {
        op: OpOp2,
        left: Operand,
        right: Operand,
        out: String,
        out_type: ValueType,
    },
    Unary {
        op: OpOp1,
        input: Operand,
        out: String,
        out_type: ValueType,
    },
    /// Bind an operand to a named variable (transient write).
    Assign { input: Operand, out: String },
    RemoveVar { name: String },
}

impl Instruction {
    pub fn execute(&self, ec: &mut ExecutionContext) -> Result<(), EvalError> {
        match self {
            Self::Binary {
                op,
                left,
                right,
                out,
                out_type,
            } => {
                let l = ec.resolve(left)?;
                let r = ec.resolve(right)?;
                let value = eval_binary(*op, &l, &r)?.coerce(*out_type)?;
                ec.set_variable(out, value);
            }
            Self::Unary {
                op,
                input,
                out,
                out_type,
            } => {
                let v = ec.resolve(input)?;
                let value = eval_unary(*op, &v)?.coerce(*out_type)?;
                ec.set_variable(out, value);
            }
            Self::Assign { input, out } => {
                let value = ec.resolve(input)?;
                ec.set_variable(out, value);
            }
            Self::RemoveVar { name } => {
                ec.remove_variable(name);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary {
                op,
                left,
                right,
                out,
                out_type,
            } => write!(f, "CP {} {} {} {}.{}", op, left, right, out, out_type),
            Self::Unary {
                op,
                input,
                out,
                out_type,
            } => write!(f, "CP {} {} {}.{}", op, input, out, out_type),
            Self::Assign { input, out } => write!(f, "CP assignvar {} {}", input, out),
            Self::RemoveVar { name } => write!(f, "CP rmvar {}", name),
        }
    }
}
