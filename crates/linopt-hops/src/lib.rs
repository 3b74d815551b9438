//! # linopt hops
//!
//! Hop DAG intermediate representation for linear-algebra programs.
//!
//! Hops live in an arena ([`HopDag`]) and reference each other through
//! [`HopId`] handles. Every input edge has a matching parent back-reference;
//! the edit primitives on [`HopDag`] keep both sides consistent.

pub mod dag;
pub mod errors;
pub mod explain;
pub mod hop;
pub mod literal;
pub mod types;
pub mod validate;

// Re-export commonly used types
pub use dag::HopDag;
pub use errors::HopsError;
pub use hop::{Dims, Hop, HopId, HopKind, VisitStatus};
pub use literal::{format_double, LiteralValue};
pub use types::{DataOpType, DataType, OpOp1, OpOp2, ValueType};
