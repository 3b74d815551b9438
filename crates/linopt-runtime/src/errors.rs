//! Error types for scalar lowering and execution.

use linopt_hops::{HopId, HopsError, ValueType};
use thiserror::Error;

/// Errors that can occur while lowering or executing scalar instructions.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The subexpression cannot be turned into scalar instructions.
    #[error("cannot lower hop {hop}: {reason}")]
    Lowering { hop: HopId, reason: String },

    #[error("unsupported scalar operation: {0}")]
    UnsupportedOperation(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("division by zero: {0}")]
    DivisionByZero(String),

    #[error("integer overflow: {0}")]
    IntegerOverflow(String),

    #[error("invalid cast: {0}")]
    InvalidCast(String),

    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("unsupported literal value type: {0}")]
    UnsupportedValueType(ValueType),

    #[error(transparent)]
    Hops(#[from] HopsError),
}
