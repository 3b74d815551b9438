//! # linopt runtime
//!
//! Scalar execution runtime used both at run time and by compile-time
//! constant folding:
//!
//! - **scalar**: typed scalar values and conversions
//! - **ops**: operator semantics, the single source of truth for scalar results
//! - **instruction**: executable scalar instructions
//! - **lower**: lowering of scalar hop subexpressions into instructions
//! - **context**: execution context and program block
//! - **evaluator**: the `ScalarEvaluator` seam used by the optimizer

pub mod context;
pub mod errors;
pub mod evaluator;
pub mod instruction;
pub mod lower;
pub mod ops;
pub mod scalar;

// Re-export commonly used types
pub use context::{ExecutionContext, ProgramBlock};
pub use errors::EvalError;
pub use evaluator::{execute_scalar, RuntimeEvaluator, ScalarEvaluator, TMP_VAR};
pub use instruction::{Instruction, Operand};
pub use lower::lower_scalar_subexpression;
pub use scalar::ScalarObject;
