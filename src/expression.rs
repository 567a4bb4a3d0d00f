//! Expression tree node model for query plans.
//!
//! This module provides:
//! - The closed set of expression kinds and their wire tags
//! - Expression string and output symbol rendering
//! - Binary serialization with a dispatcher-owned type tag
//! - Visitor dispatch and memory estimation

pub mod binary;
pub mod expr;
pub mod function;
pub mod kind;
pub mod leaf;
pub mod operator;
pub mod unary;
pub mod visitor;

pub use binary::BinaryExpression;
pub use expr::{Expression, MAX_NESTING_DEPTH};
pub use function::FunctionExpression;
pub use kind::{ExpressionType, RenderMode};
pub use leaf::{ConstantOperand, DataType, TimeSeriesOperand};
pub use operator::{BinaryOperator, OperatorCategory};
pub use unary::in_expression::InExpression;
pub use unary::{IsNullExpression, LikeExpression, UnaryExpression};
pub use visitor::{walk_children, ExpressionVisitor};
