//! Expression type tags and rendering atomicity tables.

use crate::codec::{DecodeError, DecodeResult};

/// Closed set of expression kinds. The discriminant is the wire tag.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionType {
    // Leaves
    Constant = 0,
    TimeSeries = 1,
    Timestamp = 2,
    Null = 3,

    // Arithmetic
    Addition = 4,
    Subtraction = 5,
    Multiplication = 6,
    Division = 7,
    Modulo = 8,

    // Comparison
    EqualTo = 9,
    NonEqual = 10,
    GreaterThan = 11,
    GreaterEqual = 12,
    LessThan = 13,
    LessEqual = 14,

    // Logical
    LogicAnd = 15,
    LogicOr = 16,

    // Unary
    LogicNot = 17,
    Negation = 18,
    IsNull = 19,
    Like = 20,
    In = 21,

    Function = 22,
}

/// Which of the two textual forms is being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Fully parenthesized text suitable for re-parsing.
    ExpressionString,
    /// Result-column name.
    OutputSymbol,
}

impl ExpressionType {
    pub fn from_u8(value: u8) -> DecodeResult<Self> {
        use ExpressionType::*;
        let expression_type = match value {
            0 => Constant,
            1 => TimeSeries,
            2 => Timestamp,
            3 => Null,
            4 => Addition,
            5 => Subtraction,
            6 => Multiplication,
            7 => Division,
            8 => Modulo,
            9 => EqualTo,
            10 => NonEqual,
            11 => GreaterThan,
            12 => GreaterEqual,
            13 => LessThan,
            14 => LessEqual,
            15 => LogicAnd,
            16 => LogicOr,
            17 => LogicNot,
            18 => Negation,
            19 => IsNull,
            20 => Like,
            21 => In,
            22 => Function,
            _ => return Err(DecodeError::UnknownTag(value)),
        };
        Ok(expression_type)
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            ExpressionType::Constant
                | ExpressionType::TimeSeries
                | ExpressionType::Timestamp
                | ExpressionType::Null
        )
    }

    pub fn is_binary(self) -> bool {
        (ExpressionType::Addition as u8..=ExpressionType::LogicOr as u8).contains(&(self as u8))
    }

    pub fn is_unary(self) -> bool {
        (ExpressionType::LogicNot as u8..=ExpressionType::In as u8).contains(&(self as u8))
    }

    /// Whether an operand of this kind is rendered without surrounding
    /// parentheses.
    ///
    /// The two modes deliberately differ: expression strings treat every leaf
    /// as atomic, while output symbols only exempt constants and time series
    /// columns, so `Time` and `null` operands get parenthesized there.
    pub fn is_atomic(self, mode: RenderMode) -> bool {
        match mode {
            RenderMode::ExpressionString => self == ExpressionType::Function || self.is_leaf(),
            RenderMode::OutputSymbol => matches!(
                self,
                ExpressionType::Function | ExpressionType::Constant | ExpressionType::TimeSeries
            ),
        }
    }
}
