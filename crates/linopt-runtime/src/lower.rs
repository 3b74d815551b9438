//! Lowering of scalar hop subexpressions into instructions.
//!
//! The subexpression is emitted in post-order. Literals are inlined as
//! operands, every operator hop writes a fresh temporary `_Var{n}`, shared
//! hops are lowered once. The program ends with an assignment of the root's
//! value to the requested output variable followed by removal of all
//! temporaries, so only the output variable survives execution.

use rustc_hash::{FxHashMap, FxHashSet};

use linopt_hops::{HopDag, HopId, HopKind, HopsError};

use crate::errors::EvalError;
use crate::instruction::{Instruction, Operand};
use crate::scalar::ScalarObject;

/// Lower the scalar subexpression rooted at `root` into instructions that
/// leave its value in the variable `out`.
pub fn lower_scalar_subexpression(
    dag: &HopDag,
    root: HopId,
    out: &str,
) -> Result<Vec<Instruction>, EvalError> {
    let mut lowering = Lowering {
        dag,
        instructions: Vec::new(),
        operands: FxHashMap::default(),
        temps: Vec::new(),
    };
    let result = lowering.lower(root)?;

    let mut instructions = lowering.instructions;
    instructions.push(Instruction::Assign {
        input: result,
        out: out.to_string(),
    });
    instructions.extend(
        lowering
            .temps
            .into_iter()
            .map(|name| Instruction::RemoveVar { name }),
    );
    Ok(instructions)
}

struct Lowering<'a> {
    dag: &'a HopDag,
    instructions: Vec<Instruction>,
    operands: FxHashMap<HopId, Operand>,
    temps: Vec<String>,
}

impl Lowering<'_> {
    /// Lower `root` with an explicit work stack. Operator hops are visited
    /// twice: once to schedule their inputs and once to emit their
    /// instruction after every input has an operand.
    fn lower(&mut self, root: HopId) -> Result<Operand, EvalError> {
        let dag = self.dag;
        let mut expanding: FxHashSet<HopId> = FxHashSet::default();
        let mut stack: Vec<(HopId, bool)> = vec![(root, false)];

        while let Some((id, inputs_ready)) = stack.pop() {
            if self.operands.contains_key(&id) {
                continue;
            }
            let hop = dag.get(id)?;
            if !hop.is_scalar() {
                return Err(EvalError::Lowering {
                    hop: id,
                    reason: format!("{} output is not a scalar", hop.data_type()),
                });
            }

            match hop.kind() {
                HopKind::Literal(value) => {
                    self.operands
                        .insert(id, Operand::Literal(ScalarObject::from(value)));
                }
                HopKind::Data { var, .. } => {
                    return Err(EvalError::Lowering {
                        hop: id,
                        reason: format!("variable '{}' has no compile-time value", var),
                    });
                }
                HopKind::Unary(_) | HopKind::Binary(_) if !inputs_ready => {
                    check_operator(id, hop.kind(), hop.inputs().len())?;
                    if !expanding.insert(id) {
                        return Err(HopsError::Cycle(id).into());
                    }
                    stack.push((id, true));
                    for &input in hop.inputs().iter().rev() {
                        if !self.operands.contains_key(&input) {
                            stack.push((input, false));
                        }
                    }
                }
                HopKind::Unary(op) => {
                    let input = self.operand(id, hop.inputs()[0])?;
                    let out = self.fresh_temp();
                    self.instructions.push(Instruction::Unary {
                        op: *op,
                        input,
                        out: out.clone(),
                        out_type: hop.value_type(),
                    });
                    expanding.remove(&id);
                    self.operands.insert(id, Operand::Var(out));
                }
                HopKind::Binary(op) => {
                    let left = self.operand(id, hop.inputs()[0])?;
                    let right = self.operand(id, hop.inputs()[1])?;
                    let out = self.fresh_temp();
                    self.instructions.push(Instruction::Binary {
                        op: *op,
                        left,
                        right,
                        out: out.clone(),
                        out_type: hop.value_type(),
                    });
                    expanding.remove(&id);
                    self.operands.insert(id, Operand::Var(out));
                }
            }
        }

        self.operand(root, root)
    }

    /// Operand already produced for `input` of hop `id`.
    fn operand(&self, id: HopId, input: HopId) -> Result<Operand, EvalError> {
        self.operands
            .get(&input)
            .cloned()
            .ok_or_else(|| EvalError::Lowering {
                hop: id,
                reason: format!("input {} was not lowered", input),
            })
    }

    fn fresh_temp(&mut self) -> String {
        let name = format!("_Var{}", self.temps.len());
        self.temps.push(name.clone());
        name
    }
}

/// Reject operators that have no scalar instruction or the wrong arity.
fn check_operator(id: HopId, kind: &HopKind, arity: usize) -> Result<(), EvalError> {
    match kind {
        HopKind::Binary(op) if op.is_structural() => Err(EvalError::UnsupportedOperation(
            format!("{} is not defined on scalars", op),
        )),
        HopKind::Binary(_) if arity != 2 => Err(arity_error(id, 2, arity)),
        HopKind::Unary(_) if arity != 1 => Err(arity_error(id, 1, arity)),
        _ => Ok(()),
    }
}

fn arity_error(hop: HopId, expected: usize, found: usize) -> EvalError {
    EvalError::Lowering {
        hop,
        reason: format!("expected {} input(s), found {}", expected, found),
    }
}
