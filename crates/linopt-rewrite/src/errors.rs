//! Error types for program rewriting.

use linopt_hops::HopsError;
use thiserror::Error;

/// Errors that abort a program rewrite.
///
/// Evaluation failures during constant folding never show up here; they are
/// recovered per hop. Only configuration problems and broken DAG invariants
/// are fatal.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("invalid rewriter configuration: {0}")]
    InvalidConfig(String),

    /// The DAG of a statement block failed validation.
    #[error("statement block '{block}' is malformed: {source}")]
    MalformedDag {
        block: String,
        #[source]
        source: HopsError,
    },

    /// A rule hit a structural error while rewriting a statement block.
    #[error("rule '{rule}' failed on statement block '{block}': {source}")]
    Rule {
        rule: &'static str,
        block: String,
        #[source]
        source: HopsError,
    },
}
