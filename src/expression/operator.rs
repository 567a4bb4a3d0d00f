//! Operator definitions for binary expressions.

use crate::expression::ExpressionType;

/// Binary operators supported in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,

    // Logical
    And,
    Or,
}

/// Coarse grouping of binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    Arithmetic,
    Comparison,
    Logical,
}

impl BinaryOperator {
    pub fn category(&self) -> OperatorCategory {
        match self {
            BinaryOperator::Add
            | BinaryOperator::Sub
            | BinaryOperator::Mul
            | BinaryOperator::Div
            | BinaryOperator::Mod => OperatorCategory::Arithmetic,

            BinaryOperator::Eq
            | BinaryOperator::Ne
            | BinaryOperator::Gt
            | BinaryOperator::Ge
            | BinaryOperator::Lt
            | BinaryOperator::Le => OperatorCategory::Comparison,

            BinaryOperator::And | BinaryOperator::Or => OperatorCategory::Logical,
        }
    }

    /// Wire tag of the expression built from this operator
    pub fn expression_type(&self) -> ExpressionType {
        match self {
            BinaryOperator::Add => ExpressionType::Addition,
            BinaryOperator::Sub => ExpressionType::Subtraction,
            BinaryOperator::Mul => ExpressionType::Multiplication,
            BinaryOperator::Div => ExpressionType::Division,
            BinaryOperator::Mod => ExpressionType::Modulo,
            BinaryOperator::Eq => ExpressionType::EqualTo,
            BinaryOperator::Ne => ExpressionType::NonEqual,
            BinaryOperator::Gt => ExpressionType::GreaterThan,
            BinaryOperator::Ge => ExpressionType::GreaterEqual,
            BinaryOperator::Lt => ExpressionType::LessThan,
            BinaryOperator::Le => ExpressionType::LessEqual,
            BinaryOperator::And => ExpressionType::LogicAnd,
            BinaryOperator::Or => ExpressionType::LogicOr,
        }
    }

    /// Inverse of [`BinaryOperator::expression_type`]; `None` for non-binary tags
    pub fn from_expression_type(expression_type: ExpressionType) -> Option<Self> {
        let op = match expression_type {
            ExpressionType::Addition => BinaryOperator::Add,
            ExpressionType::Subtraction => BinaryOperator::Sub,
            ExpressionType::Multiplication => BinaryOperator::Mul,
            ExpressionType::Division => BinaryOperator::Div,
            ExpressionType::Modulo => BinaryOperator::Mod,
            ExpressionType::EqualTo => BinaryOperator::Eq,
            ExpressionType::NonEqual => BinaryOperator::Ne,
            ExpressionType::GreaterThan => BinaryOperator::Gt,
            ExpressionType::GreaterEqual => BinaryOperator::Ge,
            ExpressionType::LessThan => BinaryOperator::Lt,
            ExpressionType::LessEqual => BinaryOperator::Le,
            ExpressionType::LogicAnd => BinaryOperator::And,
            ExpressionType::LogicOr => BinaryOperator::Or,
            _ => return None,
        };
        Some(op)
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Eq => "=",
            BinaryOperator::Ne => "!=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        }
    }

    /// Text placed between the operands: symbols are written tight, keywords
    /// are padded with spaces.
    pub fn infix(&self) -> &'static str {
        match self {
            BinaryOperator::And => " AND ",
            BinaryOperator::Or => " OR ",
            _ => self.as_str(),
        }
    }
}
