//! Rewriter configuration.

use crate::errors::RewriteError;

/// Selects which rewrites the [`ProgramRewriter`](crate::ProgramRewriter) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriterConfig {
    /// Fold literal-only scalar expressions and value-type casts.
    pub constant_folding: bool,
    /// Also fold `FALSE & x` and `TRUE | x` predicates.
    pub fold_predicates: bool,
    /// Validate each statement block's DAG before and after rewriting.
    pub verify_dag: bool,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            constant_folding: true,
            fold_predicates: true,
            verify_dag: true,
        }
    }
}

impl RewriterConfig {
    /// Configuration with every rewrite switched off.
    pub fn disabled() -> Self {
        Self {
            constant_folding: false,
            fold_predicates: false,
            verify_dag: false,
        }
    }

    pub fn validate(self) -> Result<Self, RewriteError> {
        if self.fold_predicates && !self.constant_folding {
            return Err(RewriteError::InvalidConfig(
                "fold_predicates requires constant_folding".into(),
            ));
        }
        Ok(self)
    }
}
