//! Value types, data types and operator codes attached to hops.

use std::fmt;

/// Value domain of a hop's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueType {
    Double,
    Int,
    Boolean,
    String,
    /// Not yet resolved by the upstream type pass.
    Unknown,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Double => "DOUBLE",
            Self::Int => "INT",
            Self::Boolean => "BOOLEAN",
            Self::String => "STRING",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Shape class of a hop's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    Scalar,
    Matrix,
    Frame,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Scalar => "SCALAR",
            Self::Matrix => "MATRIX",
            Self::Frame => "FRAME",
        };
        f.write_str(s)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpOp1 {
    Not,
    Abs,
    Sqrt,
    Exp,
    Log,
    Round,
    Floor,
    Ceil,
    Sin,
    Cos,
    CastAsScalar,
    CastAsMatrix,
    CastAsDouble,
    CastAsInt,
    CastAsBoolean,
}

impl OpOp1 {
    /// Source-level spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Abs => "abs",
            Self::Sqrt => "sqrt",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Round => "round",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::CastAsScalar => "as.scalar",
            Self::CastAsMatrix => "as.matrix",
            Self::CastAsDouble => "as.double",
            Self::CastAsInt => "as.integer",
            Self::CastAsBoolean => "as.logical",
        }
    }

    /// Whether this operator only changes the value type of a scalar.
    pub fn is_value_type_cast(self) -> bool {
        matches!(
            self,
            Self::CastAsDouble | Self::CastAsInt | Self::CastAsBoolean
        )
    }
}

impl fmt::Display for OpOp1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpOp2 {
    Plus,
    Minus,
    Mult,
    Div,
    Modulus,
    IntDiv,
    Pow,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
    Or,
    Min,
    Max,
    Log,
    CBind,
    RBind,
}

impl OpOp2 {
    /// Source-level spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Mult => "*",
            Self::Div => "/",
            Self::Modulus => "%%",
            Self::IntDiv => "%/%",
            Self::Pow => "^",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::And => "&",
            Self::Or => "|",
            Self::Min => "min",
            Self::Max => "max",
            Self::Log => "log",
            Self::CBind => "cbind",
            Self::RBind => "rbind",
        }
    }

    /// Row/column binding operators that append operands into a larger structure.
    pub fn is_structural(self) -> bool {
        matches!(self, Self::CBind | Self::RBind)
    }
}

impl fmt::Display for OpOp2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Variable access kinds of data hops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataOpType {
    TransientRead,
    TransientWrite,
}

impl fmt::Display for DataOpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TransientRead => "TRead",
            Self::TransientWrite => "TWrite",
        };
        f.write_str(s)
    }
}
