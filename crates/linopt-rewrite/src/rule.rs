//! Rewrite rule contract shared by all hop DAG rewrites.

use std::fmt;

use linopt_hops::{HopDag, HopId, HopsError};

/// Counters collected while rewriting a program.
///
/// One status is threaded through every rule and statement block of a
/// program rewrite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramRewriteStatus {
    /// Hops processed by node-level rewrites.
    pub hops_visited: u64,
    /// Binary operators replaced by their evaluated value.
    pub binary_folds: u64,
    /// Value-type casts replaced by their evaluated value.
    pub unary_folds: u64,
    /// `FALSE & x` and `TRUE | x` predicates replaced by a literal.
    pub predicate_folds: u64,
    /// Candidates left unchanged because evaluation failed.
    pub eval_failures: u64,
}

impl ProgramRewriteStatus {
    /// Total number of hops replaced by literals.
    pub fn folds(&self) -> u64 {
        self.binary_folds + self.unary_folds + self.predicate_folds
    }

    pub fn merge(&mut self, other: &Self) {
        self.hops_visited += other.hops_visited;
        self.binary_folds += other.binary_folds;
        self.unary_folds += other.unary_folds;
        self.predicate_folds += other.predicate_folds;
        self.eval_failures += other.eval_failures;
    }
}

impl fmt::Display for ProgramRewriteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "visited={} folded={} (binary={}, unary={}, predicate={}) eval_failures={}",
            self.hops_visited,
            self.folds(),
            self.binary_folds,
            self.unary_folds,
            self.predicate_folds,
            self.eval_failures
        )
    }
}

/// A rewrite applied to the hop DAG of a statement block.
///
/// Both entry points start a fresh pass: visit status of every hop reachable
/// from the given roots is reset before anything is rewritten. Structural
/// errors abort the pass; rule-specific recoverable failures do not.
pub trait HopRewriteRule {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Rewrite the DAG below `roots` in one pass.
    ///
    /// Returns the roots in the same order, with each root replaced by its
    /// substitute if it was rewritten. An empty sequence is returned as is.
    fn rewrite_hop_dags(
        &mut self,
        dag: &mut HopDag,
        roots: Vec<HopId>,
        state: &mut ProgramRewriteStatus,
    ) -> Result<Vec<HopId>, HopsError>;

    /// Rewrite the DAG below a single root. `None` is returned as is.
    fn rewrite_hop_dag(
        &mut self,
        dag: &mut HopDag,
        root: Option<HopId>,
        state: &mut ProgramRewriteStatus,
    ) -> Result<Option<HopId>, HopsError>;
}

impl<R: HopRewriteRule + ?Sized> HopRewriteRule for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn rewrite_hop_dags(
        &mut self,
        dag: &mut HopDag,
        roots: Vec<HopId>,
        state: &mut ProgramRewriteStatus,
    ) -> Result<Vec<HopId>, HopsError> {
        (**self).rewrite_hop_dags(dag, roots, state)
    }

    fn rewrite_hop_dag(
        &mut self,
        dag: &mut HopDag,
        root: Option<HopId>,
        state: &mut ProgramRewriteStatus,
    ) -> Result<Option<HopId>, HopsError> {
        (**self).rewrite_hop_dag(dag, root, state)
    }
}
