//! # linopt rewrite
//!
//! Hop DAG rewrites applied before code generation.
//!
//! - **traversal**: post-order DAG walk that applies node-level rewrites once per hop
//! - **rule**: the rewrite rule contract used by optimizer pipelines
//! - **constant_folding**: folding of literal-only scalar expressions and
//!   short-circuit predicates through the scalar runtime
//! - **program**: statement blocks and the configured program rewriter

pub mod config;
pub mod constant_folding;
pub mod errors;
pub mod program;
pub mod rule;
pub mod traversal;

// Re-export commonly used types
pub use config::RewriterConfig;
pub use constant_folding::RewriteConstantFolding;
pub use errors::RewriteError;
pub use program::{Program, ProgramRewriter, StatementBlock};
pub use rule::{HopRewriteRule, ProgramRewriteStatus};
pub use traversal::{NodeRewrite, PostOrderTraversal};
