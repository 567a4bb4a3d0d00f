//! Single-child expressions.
//!
//! [`UnaryExpression`] is the shared shape: it owns the child and supplies the
//! leading part of every unary payload (the child, encoded through the
//! dispatcher with its own tag). Kinds with extra fields embed it and append
//! their fields after it.

pub mod in_expression;

use crate::codec::{DecodeResult, WireSink, WireSource};
use crate::expression::{Expression, RenderMode};
use crate::memory::{estimate, shallow_size_of, size_of_string};

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    expression: Box<Expression>,
}

impl UnaryExpression {
    const INSTANCE_SIZE: u64 = shallow_size_of::<UnaryExpression>();

    pub fn new(expression: Expression) -> Self {
        Self {
            expression: Box::new(expression),
        }
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn into_expression(self) -> Expression {
        *self.expression
    }

    /// Child text, parenthesized unless its kind is atomic in `mode`.
    pub(crate) fn render_operand(&self, mode: RenderMode) -> String {
        self.expression.render_operand(mode)
    }

    pub(crate) fn serialize_payload<S: WireSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        self.expression.encode(sink)
    }

    /// Read the child of a node sitting at `depth`.
    pub(crate) fn deserialize_payload<S: WireSource>(
        source: &mut S,
        depth: usize,
    ) -> DecodeResult<Self> {
        Ok(Self::new(Expression::decode_at(source, depth + 1)?))
    }

    pub fn ram_bytes_used(&self) -> u64 {
        Self::INSTANCE_SIZE + estimate(&self.expression)
    }
}

/// `x IS NULL` / `x IS NOT NULL`
#[derive(Debug, Clone, PartialEq)]
pub struct IsNullExpression {
    unary: UnaryExpression,
    is_not: bool,
}

impl IsNullExpression {
    const INSTANCE_SIZE: u64 = shallow_size_of::<IsNullExpression>();

    pub fn new(expression: Expression, is_not: bool) -> Self {
        Self {
            unary: UnaryExpression::new(expression),
            is_not,
        }
    }

    pub fn expression(&self) -> &Expression {
        self.unary.expression()
    }

    pub fn is_not(&self) -> bool {
        self.is_not
    }

    pub(crate) fn render(&self, mode: RenderMode) -> String {
        let operator = if self.is_not { " IS NOT NULL" } else { " IS NULL" };
        format!("{}{}", self.unary.render_operand(mode), operator)
    }

    pub(crate) fn serialize_payload<S: WireSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        self.unary.serialize_payload(sink)?;
        sink.encode_bool(self.is_not)
    }

    pub(crate) fn deserialize_payload<S: WireSource>(
        source: &mut S,
        depth: usize,
    ) -> DecodeResult<Self> {
        let unary = UnaryExpression::deserialize_payload(source, depth)?;
        let is_not = source.decode_bool()?;
        Ok(Self { unary, is_not })
    }

    pub fn ram_bytes_used(&self) -> u64 {
        Self::INSTANCE_SIZE + estimate(self.expression())
    }
}

/// `x LIKE 'pattern'` / `x NOT LIKE 'pattern'`
#[derive(Debug, Clone, PartialEq)]
pub struct LikeExpression {
    unary: UnaryExpression,
    is_not: bool,
    pattern: String,
}

impl LikeExpression {
    const INSTANCE_SIZE: u64 = shallow_size_of::<LikeExpression>();

    pub fn new(expression: Expression, is_not: bool, pattern: impl Into<String>) -> Self {
        Self {
            unary: UnaryExpression::new(expression),
            is_not,
            pattern: pattern.into(),
        }
    }

    pub fn expression(&self) -> &Expression {
        self.unary.expression()
    }

    pub fn is_not(&self) -> bool {
        self.is_not
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub(crate) fn render(&self, mode: RenderMode) -> String {
        let operator = if self.is_not { " NOT LIKE '" } else { " LIKE '" };
        format!(
            "{}{}{}'",
            self.unary.render_operand(mode),
            operator,
            self.pattern
        )
    }

    pub(crate) fn serialize_payload<S: WireSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        self.unary.serialize_payload(sink)?;
        sink.encode_bool(self.is_not)?;
        sink.encode_string(&self.pattern)
    }

    pub(crate) fn deserialize_payload<S: WireSource>(
        source: &mut S,
        depth: usize,
    ) -> DecodeResult<Self> {
        let unary = UnaryExpression::deserialize_payload(source, depth)?;
        let is_not = source.decode_bool()?;
        let pattern = source.decode_string()?;
        Ok(Self {
            unary,
            is_not,
            pattern,
        })
    }

    pub fn ram_bytes_used(&self) -> u64 {
        Self::INSTANCE_SIZE + estimate(self.expression()) + size_of_string(&self.pattern)
    }
}
