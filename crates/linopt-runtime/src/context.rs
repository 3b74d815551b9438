//! Execution context and program block.

use rustc_hash::FxHashMap;

use crate::errors::EvalError;
use crate::instruction::{Instruction, Operand};
use crate::scalar::ScalarObject;

/// Live variables of a running program.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    variables: FxHashMap<String, ScalarObject>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_variable(&self, name: &str) -> Result<&ScalarObject, EvalError> {
        self.variables
            .get(name)
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
    }

    pub fn set_variable(&mut self, name: &str, value: ScalarObject) {
        self.variables.insert(name.to_string(), value);
    }

    pub fn remove_variable(&mut self, name: &str) -> Option<ScalarObject> {
        self.variables.remove(name)
    }

    /// Drop all variables.
    pub fn clear(&mut self) {
        self.variables.clear();
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub(crate) fn resolve(&self, operand: &Operand) -> Result<ScalarObject, EvalError> {
        match operand {
            Operand::Literal(value) => Ok(value.clone()),
            Operand::Var(name) => self.get_variable(name).cloned(),
        }
    }
}

/// A straight-line block of instructions.
#[derive(Debug, Default)]
pub struct ProgramBlock {
    instructions: Vec<Instruction>,
}

impl ProgramBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn set_instructions(&mut self, instructions: Vec<Instruction>) {
        self.instructions = instructions;
    }

    pub fn clear_instructions(&mut self) {
        self.instructions.clear();
    }

    /// Execute all instructions in order, stopping at the first failure.
    pub fn execute(&self, ec: &mut ExecutionContext) -> Result<(), EvalError> {
        for inst in &self.instructions {
            #[cfg(feature = "tracing")]
            tracing::trace!(instruction = %inst, "execute");
            inst.execute(ec)?;
        }
        Ok(())
    }
}
