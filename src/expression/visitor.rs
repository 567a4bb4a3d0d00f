//! Double-dispatch visitor over expression kinds.
//!
//! # Usage
//!
//! Implement [`ExpressionVisitor`] with one method per node kind and call
//! [`Expression::accept`]. Recurse into children by calling `accept` on them
//! from within your methods; accumulate results in the context.
//!
//! ```ignore
//! impl ExpressionVisitor<(), Vec<String>> for CollectPaths {
//!     fn visit_time_series(&mut self, operand: &TimeSeriesOperand, paths: &mut Vec<String>) {
//!         paths.push(operand.path().to_string());
//!     }
//!     fn visit_in(&mut self, expr: &InExpression, paths: &mut Vec<String>) {
//!         expr.expression().accept(self, paths)
//!     }
//!     // ...
//! }
//! ```

use crate::expression::{
    BinaryExpression, ConstantOperand, Expression, FunctionExpression, InExpression,
    IsNullExpression, LikeExpression, TimeSeriesOperand, UnaryExpression,
};

/// One method per expression kind. `R` is the per-node result, `C` the
/// caller-supplied context threaded through the traversal.
pub trait ExpressionVisitor<R, C> {
    fn visit_constant(&mut self, operand: &ConstantOperand, context: &mut C) -> R;

    fn visit_time_series(&mut self, operand: &TimeSeriesOperand, context: &mut C) -> R;

    fn visit_timestamp(&mut self, context: &mut C) -> R;

    fn visit_null(&mut self, context: &mut C) -> R;

    /// Arithmetic, comparison and logical connectives; see
    /// [`BinaryExpression::operator`].
    fn visit_binary(&mut self, expression: &BinaryExpression, context: &mut C) -> R;

    fn visit_logic_not(&mut self, expression: &UnaryExpression, context: &mut C) -> R;

    fn visit_negation(&mut self, expression: &UnaryExpression, context: &mut C) -> R;

    fn visit_is_null(&mut self, expression: &IsNullExpression, context: &mut C) -> R;

    fn visit_like(&mut self, expression: &LikeExpression, context: &mut C) -> R;

    fn visit_in(&mut self, expression: &InExpression, context: &mut C) -> R;

    fn visit_function(&mut self, expression: &FunctionExpression, context: &mut C) -> R;
}

/// Visit every child of `expression`, collecting the results in order.
pub fn walk_children<R, C, V>(visitor: &mut V, expression: &Expression, context: &mut C) -> Vec<R>
where
    V: ExpressionVisitor<R, C> + ?Sized,
{
    expression
        .children()
        .into_iter()
        .map(|child| child.accept(visitor, context))
        .collect()
}
