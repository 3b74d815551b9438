//! Evaluation of scalar subexpressions through the runtime.
//!
//! The optimizer never computes operator results itself. It asks a
//! [`ScalarEvaluator`] to run the subexpression exactly as the runtime would,
//! which keeps folded literals identical to unoptimized execution.

use linopt_hops::{HopDag, HopId};

use crate::context::{ExecutionContext, ProgramBlock};
use crate::errors::EvalError;
use crate::lower::lower_scalar_subexpression;
use crate::scalar::ScalarObject;

/// Output variable of a single evaluation.
pub const TMP_VAR: &str = "__cf_tmp";

/// Computes the value of a literal-only scalar subexpression.
pub trait ScalarEvaluator {
    /// Evaluate the subexpression rooted at `hop`.
    ///
    /// Implementations must not keep state between calls that influences
    /// results.
    fn evaluate(&mut self, dag: &HopDag, hop: HopId) -> Result<ScalarObject, EvalError>;
}

impl<E: ScalarEvaluator + ?Sized> ScalarEvaluator for &mut E {
    fn evaluate(&mut self, dag: &HopDag, hop: HopId) -> Result<ScalarObject, EvalError> {
        (**self).evaluate(dag, hop)
    }
}

impl<E: ScalarEvaluator + ?Sized> ScalarEvaluator for Box<E> {
    fn evaluate(&mut self, dag: &HopDag, hop: HopId) -> Result<ScalarObject, EvalError> {
        (**self).evaluate(dag, hop)
    }
}

/// Evaluator backed by the scalar instruction runtime.
///
/// Owns one execution context and one program block that are reused across
/// calls and emptied after each evaluation, whether it succeeded or not.
#[derive(Debug, Default)]
pub struct RuntimeEvaluator {
    ec: ExecutionContext,
    block: ProgramBlock,
    evaluations: u64,
}

impl RuntimeEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subexpressions evaluated so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Whether no instructions or variables are left over from a previous call.
    pub fn is_clean(&self) -> bool {
        self.ec.is_empty() && self.block.instructions().is_empty()
    }
}

impl ScalarEvaluator for RuntimeEvaluator {
    fn evaluate(&mut self, dag: &HopDag, hop: HopId) -> Result<ScalarObject, EvalError> {
        self.evaluations += 1;
        let instructions = lower_scalar_subexpression(dag, hop, TMP_VAR)?;
        self.block.set_instructions(instructions);

        let result = self.block.execute(&mut self.ec).and_then(|()| {
            self.ec
                .remove_variable(TMP_VAR)
                .ok_or_else(|| EvalError::UndefinedVariable(TMP_VAR.to_string()))
        });

        self.block.clear_instructions();
        self.ec.clear();
        result
    }
}

/// Run the scalar subexpression rooted at `hop` without any optimization.
pub fn execute_scalar(dag: &HopDag, hop: HopId) -> Result<ScalarObject, EvalError> {
    RuntimeEvaluator::new().evaluate(dag, hop)
}
