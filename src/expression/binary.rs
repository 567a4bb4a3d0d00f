//! Two-operand expressions: arithmetic, comparison and logical connectives.

use crate::codec::{DecodeResult, WireSink, WireSource};
use crate::expression::{BinaryOperator, Expression, RenderMode};
use crate::memory::{estimate, shallow_size_of};

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    operator: BinaryOperator,
    left: Box<Expression>,
    right: Box<Expression>,
}

impl BinaryExpression {
    const INSTANCE_SIZE: u64 = shallow_size_of::<BinaryExpression>();

    pub fn new(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn operator(&self) -> BinaryOperator {
        self.operator
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn right(&self) -> &Expression {
        &self.right
    }

    pub(crate) fn render(&self, mode: RenderMode) -> String {
        format!(
            "{}{}{}",
            self.left.render_operand(mode),
            self.operator.infix(),
            self.right.render_operand(mode)
        )
    }

    pub(crate) fn serialize_payload<S: WireSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        self.left.encode(sink)?;
        self.right.encode(sink)
    }

    pub(crate) fn deserialize_payload<S: WireSource>(
        operator: BinaryOperator,
        source: &mut S,
        depth: usize,
    ) -> DecodeResult<Self> {
        let left = Expression::decode_at(source, depth + 1)?;
        let right = Expression::decode_at(source, depth + 1)?;
        Ok(Self::new(operator, left, right))
    }

    pub fn ram_bytes_used(&self) -> u64 {
        Self::INSTANCE_SIZE + estimate(&self.left) + estimate(&self.right)
    }
}
