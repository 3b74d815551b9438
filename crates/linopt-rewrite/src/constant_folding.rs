//! Constant folding of scalar hop subexpressions.
//!
//! A scalar hop is folded into a literal when
//!
//! - it is a binary operator over two literal inputs (`cbind`/`rbind` excluded),
//! - it is a value-type cast (`as.double`, `as.integer`, `as.logical`) of a literal,
//! - it is `FALSE & x` or `TRUE | x` for a boolean scalar `x`, in either order.
//!
//! The first two cases are evaluated by running the subexpression through a
//! [`ScalarEvaluator`], so folded values are exactly what execution would
//! produce. A failed evaluation leaves the hop as it was; the rewrite goes on
//! with the remaining hops. Because the traversal is post-order, folded inputs
//! make their parents candidates in the same pass.

use linopt_hops::{
    Hop, HopDag, HopId, HopKind, HopsError, LiteralValue, OpOp2, ValueType,
};
use linopt_runtime::{EvalError, RuntimeEvaluator, ScalarEvaluator, ScalarObject};

use crate::rule::{HopRewriteRule, ProgramRewriteStatus};
use crate::traversal::{NodeRewrite, PostOrderTraversal};

/// Rule replacing literal-only scalar expressions with their value.
#[derive(Debug)]
pub struct RewriteConstantFolding<E = RuntimeEvaluator> {
    evaluator: E,
    fold_predicates: bool,
}

impl RewriteConstantFolding<RuntimeEvaluator> {
    pub fn new() -> Self {
        Self::with_evaluator(RuntimeEvaluator::new())
    }
}

impl Default for RewriteConstantFolding<RuntimeEvaluator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ScalarEvaluator> RewriteConstantFolding<E> {
    pub fn with_evaluator(evaluator: E) -> Self {
        Self {
            evaluator,
            fold_predicates: true,
        }
    }

    /// Enable or disable folding of `FALSE & x` and `TRUE | x`.
    pub fn fold_predicates(mut self, enabled: bool) -> Self {
        self.fold_predicates = enabled;
        self
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Evaluate the candidate and convert the result into a literal of the
    /// hop's declared value type.
    fn eval_scalar_operation(&mut self, dag: &HopDag, hop: HopId) -> Result<LiteralValue, EvalError> {
        let value_type = dag.get(hop)?.value_type();
        let value = self.evaluator.evaluate(dag, hop)?;
        literal_from_scalar(value_type, value)
    }
}

impl<E: ScalarEvaluator> NodeRewrite for RewriteConstantFolding<E> {
    fn rewrite_node(
        &mut self,
        dag: &mut HopDag,
        hop: HopId,
        status: &mut ProgramRewriteStatus,
    ) -> Result<Option<HopId>, HopsError> {
        let node = dag.get(hop)?;
        if !node.is_scalar() || node.is_literal() {
            return Ok(None);
        }

        let literal = if is_applicable_binary_op(dag, node)? || is_applicable_unary_op(dag, node)? {
            let is_binary = matches!(node.kind(), HopKind::Binary(_));
            match self.eval_scalar_operation(dag, hop) {
                Ok(value) => {
                    if is_binary {
                        status.binary_folds += 1;
                    } else {
                        status.unary_folds += 1;
                    }
                    Some(value)
                }
                Err(_err) => {
                    status.eval_failures += 1;
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        hop = %hop,
                        name = %dag.hop(hop).name(),
                        error = %_err,
                        "constant folding evaluation failed, hop left unchanged"
                    );
                    None
                }
            }
        } else if self.fold_predicates && is_applicable_false_conjunctive_predicate(dag, node)? {
            status.predicate_folds += 1;
            Some(LiteralValue::Boolean(false))
        } else if self.fold_predicates && is_applicable_true_disjunctive_predicate(dag, node)? {
            status.predicate_folds += 1;
            Some(LiteralValue::Boolean(true))
        } else {
            None
        };

        Ok(literal.map(|value| {
            #[cfg(feature = "tracing")]
            tracing::debug!(hop = %hop, literal = %value, "folded constant");
            dag.literal(value)
        }))
    }
}

impl<E: ScalarEvaluator> HopRewriteRule for RewriteConstantFolding<E> {
    fn name(&self) -> &'static str {
        "constant_folding"
    }

    fn rewrite_hop_dags(
        &mut self,
        dag: &mut HopDag,
        roots: Vec<HopId>,
        state: &mut ProgramRewriteStatus,
    ) -> Result<Vec<HopId>, HopsError> {
        PostOrderTraversal::new(self).rewrite_roots(dag, roots, state)
    }

    fn rewrite_hop_dag(
        &mut self,
        dag: &mut HopDag,
        root: Option<HopId>,
        state: &mut ProgramRewriteStatus,
    ) -> Result<Option<HopId>, HopsError> {
        match root {
            Some(root) => PostOrderTraversal::new(self)
                .rewrite_root(dag, root, state)
                .map(Some),
            None => Ok(None),
        }
    }
}

/// Build a literal of `value_type` from an evaluated scalar.
pub fn literal_from_scalar(value_type: ValueType, value: ScalarObject) -> Result<LiteralValue, EvalError> {
    if value_type == ValueType::Unknown {
        return Err(EvalError::UnsupportedValueType(value_type));
    }
    Ok(match value.coerce(value_type)? {
        ScalarObject::Double(v) => LiteralValue::Double(v),
        ScalarObject::Int(v) => LiteralValue::Int(v),
        ScalarObject::Boolean(b) => LiteralValue::Boolean(b),
        ScalarObject::String(s) => LiteralValue::String(s),
    })
}

fn is_applicable_binary_op(dag: &HopDag, hop: &Hop) -> Result<bool, HopsError> {
    Ok(match (hop.kind(), hop.inputs()) {
        (HopKind::Binary(op), [left, right]) => {
            !op.is_structural() && dag.get(*left)?.is_literal() && dag.get(*right)?.is_literal()
        }
        _ => false,
    })
}

fn is_applicable_unary_op(dag: &HopDag, hop: &Hop) -> Result<bool, HopsError> {
    Ok(match (hop.kind(), hop.inputs()) {
        (HopKind::Unary(op), [input]) => op.is_value_type_cast() && dag.get(*input)?.is_literal(),
        _ => false,
    })
}

fn is_applicable_false_conjunctive_predicate(dag: &HopDag, hop: &Hop) -> Result<bool, HopsError> {
    is_short_circuit(dag, hop, OpOp2::And, false)
}

fn is_applicable_true_disjunctive_predicate(dag: &HopDag, hop: &Hop) -> Result<bool, HopsError> {
    is_short_circuit(dag, hop, OpOp2::Or, true)
}

/// `op` applied to a boolean literal `absorbing` and a boolean scalar, in any order.
fn is_short_circuit(dag: &HopDag, hop: &Hop, op: OpOp2, absorbing: bool) -> Result<bool, HopsError> {
    let (HopKind::Binary(actual), [left, right]) = (hop.kind(), hop.inputs()) else {
        return Ok(false);
    };
    if *actual != op {
        return Ok(false);
    }
    let (left, right) = (dag.get(*left)?, dag.get(*right)?);
    Ok((is_boolean_literal(left, absorbing) && is_boolean_scalar(right))
        || (is_boolean_literal(right, absorbing) && is_boolean_scalar(left)))
}

fn is_boolean_literal(hop: &Hop, value: bool) -> bool {
    hop.literal_value().and_then(LiteralValue::boolean_literal) == Some(value)
}

fn is_boolean_scalar(hop: &Hop) -> bool {
    hop.is_scalar() && hop.value_type() == ValueType::Boolean
}
