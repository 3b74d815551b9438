//! # linopt - Hop DAG optimizer
//!
//! Compile-time rewrites over the hop DAG of a linear-algebra program, with
//! constant folding that evaluates literal-only scalar expressions through
//! the same scalar runtime used at execution time.
//!
//! ## Architecture
//!
//! - **hops**: the hop DAG, its literals and consistent edge editing
//! - **runtime**: scalar instructions, execution context and evaluators
//! - **rewrite**: the rewrite rule contract, post-order traversal, constant
//!   folding and the configured program rewriter
//!
//! ## Usage
//!
//! ```rust
//! use linopt::hops::{DataType, HopDag, LiteralValue, OpOp2, ValueType};
//!
//! let mut dag = HopDag::new();
//! let two = dag.literal(2i64);
//! let three = dag.literal(3i64);
//! let sum = dag.binary(OpOp2::Plus, ValueType::Int, DataType::Scalar, two, three);
//!
//! let (roots, status) = linopt::fold_constants(&mut dag, vec![sum]).unwrap();
//! assert_eq!(dag.literal_value(roots[0]).unwrap(), &LiteralValue::Int(5));
//! assert_eq!(status.folds(), 1);
//! ```

#![forbid(unsafe_code)]

pub use linopt_hops as hops;
pub use linopt_rewrite as rewrite;
pub use linopt_runtime as runtime;

// Re-export commonly used types
pub use linopt_hops::{HopDag, HopId, HopsError};
pub use linopt_rewrite::{
    HopRewriteRule, Program, ProgramRewriteStatus, ProgramRewriter, RewriteConstantFolding,
    RewriteError, RewriterConfig, StatementBlock,
};
pub use linopt_runtime::{EvalError, RuntimeEvaluator, ScalarEvaluator};

/// Run one constant folding pass over the DAG below `roots`.
///
/// This is a convenience wrapper around [`RewriteConstantFolding`] with the
/// runtime evaluator and predicate folding enabled.
pub fn fold_constants(
    dag: &mut HopDag,
    roots: Vec<HopId>,
) -> Result<(Vec<HopId>, ProgramRewriteStatus), HopsError> {
    let mut status = ProgramRewriteStatus::default();
    let roots = RewriteConstantFolding::new().rewrite_hop_dags(dag, roots, &mut status)?;
    Ok((roots, status))
}
