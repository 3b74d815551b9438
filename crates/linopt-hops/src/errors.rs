//! Error types for hop DAG construction and editing.

use thiserror::Error;

use crate::hop::HopId;

/// Errors raised by hop DAG edits and structural checks.
///
/// Everything except [`HopsError::NotALiteral`] reports a broken DAG
/// invariant and names the offending hop.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HopsError {
    /// Handle does not belong to this DAG.
    #[error("invalid hop handle {0}")]
    InvalidHop(HopId),

    #[error("slot {slot} out of range for hop {hop} with {len} inputs")]
    SlotOutOfRange { hop: HopId, slot: usize, len: usize },

    /// An input edge without the matching parent back-reference.
    #[error("hop {child} is an input of hop {parent} but does not list it as a parent")]
    MissingBackReference { child: HopId, parent: HopId },

    /// A parent back-reference without any matching input edge.
    #[error("hop {hop} lists parent {parent} which does not reference it")]
    DanglingParent { hop: HopId, parent: HopId },

    #[error(
        "hop {hop} is referenced {inputs} time(s) by parent {parent} but lists it {back_refs} time(s)"
    )]
    BackReferenceMismatch {
        hop: HopId,
        parent: HopId,
        inputs: usize,
        back_refs: usize,
    },

    #[error("cycle detected through hop {0}")]
    Cycle(HopId),

    #[error("hop {0} is not a literal")]
    NotALiteral(HopId),
}

impl HopsError {
    /// Whether this error reports a broken DAG invariant.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::NotALiteral(_))
    }
}
