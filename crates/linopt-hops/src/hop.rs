//! Hop nodes and handles.

use std::fmt;

use smallvec::SmallVec;

use crate::literal::LiteralValue;
use crate::types::{DataOpType, DataType, OpOp1, OpOp2, ValueType};

/// Handle of a hop inside a [`HopDag`](crate::HopDag).
///
/// Handles are arena indexes; they stay valid for the lifetime of the DAG.
/// A DAG holds at most `u32::MAX` hops.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HopId(pub u32);

impl HopId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Handle for arena slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit in a `u32`.
    pub(crate) fn from_index(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(raw) => Self(raw),
            Err(_) => panic!("hop arena is full: {} exceeds u32::MAX", index),
        }
    }
}

impl fmt::Display for HopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-pass traversal mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitStatus {
    #[default]
    NotVisited,
    Done,
}

/// Size and blocking metadata. `-1` marks unknown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dims {
    pub rows: i64,
    pub cols: i64,
    pub rows_in_block: i64,
    pub cols_in_block: i64,
}

impl Dims {
    /// Scalars are 0x0 and carry no blocking.
    pub const SCALAR: Dims = Dims {
        rows: 0,
        cols: 0,
        rows_in_block: -1,
        cols_in_block: -1,
    };

    pub const UNKNOWN: Dims = Dims {
        rows: -1,
        cols: -1,
        rows_in_block: -1,
        cols_in_block: -1,
    };

    pub(crate) fn for_data_type(data_type: DataType) -> Self {
        match data_type {
            DataType::Scalar => Self::SCALAR,
            DataType::Matrix | DataType::Frame => Self::UNKNOWN,
        }
    }
}

/// Operator payload of a hop.
#[derive(Debug, Clone, PartialEq)]
pub enum HopKind {
    Literal(LiteralValue),
    Unary(OpOp1),
    Binary(OpOp2),
    /// Variable read or write.
    Data { op: DataOpType, var: String },
}

/// One operator application or literal in the DAG.
///
/// Edges are only mutated through [`HopDag`](crate::HopDag) so that inputs and
/// parent back-references stay consistent.
#[derive(Debug, Clone)]
pub struct Hop {
    pub(crate) id: HopId,
    pub(crate) name: String,
    pub(crate) kind: HopKind,
    pub(crate) value_type: ValueType,
    pub(crate) data_type: DataType,
    pub(crate) dims: Dims,
    pub(crate) inputs: SmallVec<[HopId; 2]>,
    pub(crate) parents: SmallVec<[HopId; 2]>,
    pub(crate) visit: VisitStatus,
}

impl Hop {
    pub fn id(&self) -> HopId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &HopKind {
        &self.kind
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Ordered input handles.
    pub fn inputs(&self) -> &[HopId] {
        &self.inputs
    }

    /// Parent back-references, one entry per input slot held by the parent.
    pub fn parents(&self) -> &[HopId] {
        &self.parents
    }

    pub fn visit_status(&self) -> VisitStatus {
        self.visit
    }

    pub fn is_scalar(&self) -> bool {
        self.data_type == DataType::Scalar
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, HopKind::Literal(_))
    }

    pub fn literal_value(&self) -> Option<&LiteralValue> {
        match &self.kind {
            HopKind::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Display name used by explain output. String literals are quoted so
    /// they cannot be mistaken for variable accesses.
    pub(crate) fn default_name(kind: &HopKind) -> String {
        match kind {
            HopKind::Literal(LiteralValue::String(s)) => format!("\"{}\"", s),
            HopKind::Literal(value) => value.to_string(),
            HopKind::Unary(op) => format!("u({})", op),
            HopKind::Binary(op) => format!("b({})", op),
            HopKind::Data { op, var } => format!("{} {}", op, var),
        }
    }
}
