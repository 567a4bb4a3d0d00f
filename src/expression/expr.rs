//! Expression tree definition and the generic node protocol.
//!
//! [`Expression`] owns the type tag: [`Expression::encode`] writes the tag
//! byte and then lets the node write its payload, and [`Expression::decode`]
//! reads the tag and hands the rest of the input to the matching node. Nodes
//! never read or write their own tag.

use std::fmt;
use std::io::{self, Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use indexmap::IndexSet;
use log::{debug, trace};

use crate::codec::{
    DecodeError, DecodeResult, StreamSink, StreamSource, WireSink, WireSource,
};
use crate::expression::{
    BinaryExpression, BinaryOperator, ConstantOperand, ExpressionType, ExpressionVisitor,
    FunctionExpression, InExpression, IsNullExpression, LikeExpression, RenderMode,
    TimeSeriesOperand, UnaryExpression,
};
use crate::memory::shallow_size_of;

/// Deepest node level accepted when decoding; the root is level 0.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Constant value
    Constant(ConstantOperand),

    /// Time series column reference
    TimeSeries(TimeSeriesOperand),

    /// The row timestamp column
    Timestamp,

    /// NULL literal
    Null,

    /// Arithmetic, comparison or logical binary operation
    Binary(BinaryExpression),

    /// Logical negation
    LogicNot(UnaryExpression),

    /// Arithmetic negation
    Negation(UnaryExpression),

    /// IS [NOT] NULL
    IsNull(IsNullExpression),

    /// [NOT] LIKE
    Like(LikeExpression),

    /// [NOT] IN (value, ...)
    In(InExpression),

    /// Function call
    Function(FunctionExpression),
}

impl Expression {
    /// Create a constant expression
    pub fn constant(operand: ConstantOperand) -> Self {
        Expression::Constant(operand)
    }

    /// Create an INT32 constant
    pub fn constant_int32(value: i32) -> Self {
        Expression::Constant(ConstantOperand::int32(value))
    }

    /// Create an INT64 constant
    pub fn constant_int64(value: i64) -> Self {
        Expression::Constant(ConstantOperand::int64(value))
    }

    /// Create a TEXT constant
    pub fn constant_text(value: impl Into<String>) -> Self {
        Expression::Constant(ConstantOperand::text(value))
    }

    /// Create a time series column reference
    pub fn time_series(path: impl Into<String>) -> Self {
        Expression::TimeSeries(TimeSeriesOperand::new(path))
    }

    /// Create a binary operation expression
    pub fn binary_op(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary(BinaryExpression::new(op, left, right))
    }

    /// Create an AND expression
    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::And, left, right)
    }

    /// Create an OR expression
    pub fn or(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Or, left, right)
    }

    /// Create an equality expression
    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Eq, left, right)
    }

    /// Create a not-equal expression
    pub fn ne(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Ne, left, right)
    }

    /// Create a less-than expression
    pub fn lt(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Lt, left, right)
    }

    /// Create a less-than-or-equal expression
    pub fn le(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Le, left, right)
    }

    /// Create a greater-than expression
    pub fn gt(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Gt, left, right)
    }

    /// Create a greater-than-or-equal expression
    pub fn ge(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Ge, left, right)
    }

    /// Create an addition expression
    pub fn add_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Add, left, right)
    }

    /// Create a subtraction expression
    pub fn sub_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Sub, left, right)
    }

    /// Create a multiplication expression
    pub fn mul_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Mul, left, right)
    }

    /// Create a division expression
    pub fn div_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Div, left, right)
    }

    /// Create a modulo expression
    pub fn mod_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Mod, left, right)
    }

    /// Create a NOT expression
    pub fn not_expr(operand: Expression) -> Self {
        Expression::LogicNot(UnaryExpression::new(operand))
    }

    /// Create an arithmetic negation
    pub fn negation(operand: Expression) -> Self {
        Expression::Negation(UnaryExpression::new(operand))
    }

    /// Create an IS NULL expression
    pub fn is_null(operand: Expression) -> Self {
        Expression::IsNull(IsNullExpression::new(operand, false))
    }

    /// Create an IS NOT NULL expression
    pub fn is_not_null(operand: Expression) -> Self {
        Expression::IsNull(IsNullExpression::new(operand, true))
    }

    /// Create a LIKE expression
    pub fn like(operand: Expression, pattern: impl Into<String>) -> Self {
        Expression::Like(LikeExpression::new(operand, false, pattern))
    }

    /// Create a NOT LIKE expression
    pub fn not_like(operand: Expression, pattern: impl Into<String>) -> Self {
        Expression::Like(LikeExpression::new(operand, true, pattern))
    }

    /// Create an IN expression from an already deduplicated value set
    pub fn in_set(operand: Expression, is_not_in: bool, values: IndexSet<String>) -> Self {
        Expression::In(InExpression::new(operand, is_not_in, values))
    }

    /// Create an IN expression; duplicate values collapse to their first occurrence
    pub fn in_list<I, V>(operand: Expression, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Expression::In(InExpression::from_values(operand, false, values))
    }

    /// Create a NOT IN expression; duplicate values collapse to their first occurrence
    pub fn not_in_list<I, V>(operand: Expression, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Expression::In(InExpression::from_values(operand, true, values))
    }

    /// Create a function call expression
    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Function(FunctionExpression::new(name, args))
    }

    pub fn expression_type(&self) -> ExpressionType {
        match self {
            Expression::Constant(_) => ExpressionType::Constant,
            Expression::TimeSeries(_) => ExpressionType::TimeSeries,
            Expression::Timestamp => ExpressionType::Timestamp,
            Expression::Null => ExpressionType::Null,
            Expression::Binary(binary) => binary.operator().expression_type(),
            Expression::LogicNot(_) => ExpressionType::LogicNot,
            Expression::Negation(_) => ExpressionType::Negation,
            Expression::IsNull(_) => ExpressionType::IsNull,
            Expression::Like(_) => ExpressionType::Like,
            Expression::In(_) => ExpressionType::In,
            Expression::Function(_) => ExpressionType::Function,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.expression_type().is_leaf()
    }

    /// Direct children, left to right
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Constant(_)
            | Expression::TimeSeries(_)
            | Expression::Timestamp
            | Expression::Null => vec![],
            Expression::Binary(binary) => vec![binary.left(), binary.right()],
            Expression::LogicNot(unary) | Expression::Negation(unary) => vec![unary.expression()],
            Expression::IsNull(is_null) => vec![is_null.expression()],
            Expression::Like(like) => vec![like.expression()],
            Expression::In(in_expr) => vec![in_expr.expression()],
            Expression::Function(func) => func.arguments().iter().collect(),
        }
    }

    /// Check if this expression is a constant (contains no column or timestamp references)
    pub fn is_constant(&self) -> bool {
        match self {
            Expression::Constant(_) | Expression::Null => true,
            Expression::TimeSeries(_) | Expression::Timestamp => false,
            _ => self.children().iter().all(|child| child.is_constant()),
        }
    }

    /// Fully parenthesized text that a parser can read back
    pub fn expression_string(&self) -> String {
        self.render(RenderMode::ExpressionString)
    }

    /// Name used when this expression is a result column
    pub fn output_symbol(&self) -> String {
        self.render(RenderMode::OutputSymbol)
    }

    pub(crate) fn render(&self, mode: RenderMode) -> String {
        match self {
            Expression::Constant(constant) => constant.render(mode),
            Expression::TimeSeries(series) => series.render(mode),
            Expression::Timestamp => "Time".to_string(),
            Expression::Null => "null".to_string(),
            Expression::Binary(binary) => binary.render(mode),
            Expression::LogicNot(unary) => format!("!{}", unary.render_operand(mode)),
            Expression::Negation(unary) => format!("-{}", unary.render_operand(mode)),
            Expression::IsNull(is_null) => is_null.render(mode),
            Expression::Like(like) => like.render(mode),
            Expression::In(in_expr) => in_expr.render(mode),
            Expression::Function(func) => func.render(mode),
        }
    }

    /// Rendering used when this expression is an operand of another node.
    pub(crate) fn render_operand(&self, mode: RenderMode) -> String {
        if self.expression_type().is_atomic(mode) {
            self.render(mode)
        } else {
            format!("({})", self.render(mode))
        }
    }

    /// Write the type tag followed by this node's payload.
    pub fn encode<S: WireSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.encode_u8(self.expression_type().as_u8())?;
        match self {
            Expression::Constant(constant) => constant.serialize_payload(sink),
            Expression::TimeSeries(series) => series.serialize_payload(sink),
            Expression::Timestamp | Expression::Null => Ok(()),
            Expression::Binary(binary) => binary.serialize_payload(sink),
            Expression::LogicNot(unary) | Expression::Negation(unary) => {
                unary.serialize_payload(sink)
            }
            Expression::IsNull(is_null) => is_null.serialize_payload(sink),
            Expression::Like(like) => like.serialize_payload(sink),
            Expression::In(in_expr) => in_expr.serialize_payload(sink),
            Expression::Function(func) => func.serialize_payload(sink),
        }
    }

    /// Read a type tag and the payload of the matching node.
    ///
    /// Trees nested deeper than [`MAX_NESTING_DEPTH`] are rejected with
    /// [`DecodeError::NestingTooDeep`].
    pub fn decode<S: WireSource>(source: &mut S) -> DecodeResult<Self> {
        Self::decode_at(source, 0)
    }

    /// Decode a node sitting `depth` levels below the root.
    pub(crate) fn decode_at<S: WireSource>(source: &mut S, depth: usize) -> DecodeResult<Self> {
        if depth > MAX_NESTING_DEPTH {
            return Err(DecodeError::NestingTooDeep(MAX_NESTING_DEPTH));
        }
        let expression_type = ExpressionType::from_u8(source.decode_u8()?)?;
        trace!("decoding {:?} expression at depth {}", expression_type, depth);

        let expression = match expression_type {
            ExpressionType::Constant => {
                Expression::Constant(ConstantOperand::deserialize_payload(source)?)
            }
            ExpressionType::TimeSeries => {
                Expression::TimeSeries(TimeSeriesOperand::deserialize_payload(source)?)
            }
            ExpressionType::Timestamp => Expression::Timestamp,
            ExpressionType::Null => Expression::Null,
            ExpressionType::LogicNot => {
                Expression::LogicNot(UnaryExpression::deserialize_payload(source, depth)?)
            }
            ExpressionType::Negation => {
                Expression::Negation(UnaryExpression::deserialize_payload(source, depth)?)
            }
            ExpressionType::IsNull => {
                Expression::IsNull(IsNullExpression::deserialize_payload(source, depth)?)
            }
            ExpressionType::Like => {
                Expression::Like(LikeExpression::deserialize_payload(source, depth)?)
            }
            ExpressionType::In => Expression::In(InExpression::deserialize_payload(source, depth)?),
            ExpressionType::Function => {
                Expression::Function(FunctionExpression::deserialize_payload(source, depth)?)
            }
            other => match BinaryOperator::from_expression_type(other) {
                Some(op) => {
                    Expression::Binary(BinaryExpression::deserialize_payload(op, source, depth)?)
                }
                None => return Err(DecodeError::UnknownTag(other.as_u8())),
            },
        };
        Ok(expression)
    }

    /// Serialize into a buffer.
    pub fn serialize<B: BufMut>(&self, buf: &mut B) {
        match self.encode(buf) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Serialize into a forward-only stream. The bytes are identical to
    /// [`Expression::serialize`].
    pub fn serialize_to_stream<W: Write>(&self, stream: &mut W) -> io::Result<()> {
        self.encode(&mut StreamSink::new(stream))
    }

    /// Decode one expression from the buffer's cursor, advancing it past the
    /// expression. Bytes after the expression are left in place.
    pub fn deserialize<B: Buf>(buf: &mut B) -> DecodeResult<Self> {
        Self::decode(buf).inspect_err(|e| debug!("failed to decode expression: {}", e))
    }

    /// Decode one expression from a forward-only stream.
    pub fn deserialize_from_stream<R: Read>(reader: &mut R) -> DecodeResult<Self> {
        Self::decode(&mut StreamSource::new(reader))
            .inspect_err(|e| debug!("failed to decode expression from stream: {}", e))
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.serialize(&mut buf);
        buf.freeze()
    }

    /// Decode an expression that must span all of `data`.
    pub fn from_bytes(data: &[u8]) -> DecodeResult<Self> {
        let mut cursor = data;
        let expression = Self::deserialize(&mut cursor)?;
        if !cursor.is_empty() {
            return Err(DecodeError::TrailingBytes(cursor.len()));
        }
        Ok(expression)
    }

    /// Dispatch to the visitor method for this node's kind.
    pub fn accept<R, C, V>(&self, visitor: &mut V, context: &mut C) -> R
    where
        V: ExpressionVisitor<R, C> + ?Sized,
    {
        match self {
            Expression::Constant(constant) => visitor.visit_constant(constant, context),
            Expression::TimeSeries(series) => visitor.visit_time_series(series, context),
            Expression::Timestamp => visitor.visit_timestamp(context),
            Expression::Null => visitor.visit_null(context),
            Expression::Binary(binary) => visitor.visit_binary(binary, context),
            Expression::LogicNot(unary) => visitor.visit_logic_not(unary, context),
            Expression::Negation(unary) => visitor.visit_negation(unary, context),
            Expression::IsNull(is_null) => visitor.visit_is_null(is_null, context),
            Expression::Like(like) => visitor.visit_like(like, context),
            Expression::In(in_expr) => visitor.visit_in(in_expr, context),
            Expression::Function(func) => visitor.visit_function(func, context),
        }
    }

    /// Estimated bytes retained by this node and everything it owns.
    ///
    /// Every node costs one `Expression` slot, which already holds the
    /// node's own struct, plus whatever that struct owns.
    pub fn ram_bytes_used(&self) -> u64 {
        match self {
            Expression::Constant(constant) => {
                slot_bytes::<ConstantOperand>(constant.ram_bytes_used())
            }
            Expression::TimeSeries(series) => {
                slot_bytes::<TimeSeriesOperand>(series.ram_bytes_used())
            }
            Expression::Timestamp | Expression::Null => shallow_size_of::<Expression>(),
            Expression::Binary(binary) => slot_bytes::<BinaryExpression>(binary.ram_bytes_used()),
            Expression::LogicNot(unary) | Expression::Negation(unary) => {
                slot_bytes::<UnaryExpression>(unary.ram_bytes_used())
            }
            Expression::IsNull(is_null) => slot_bytes::<IsNullExpression>(is_null.ram_bytes_used()),
            Expression::Like(like) => slot_bytes::<LikeExpression>(like.ram_bytes_used()),
            Expression::In(in_expr) => slot_bytes::<InExpression>(in_expr.ram_bytes_used()),
            Expression::Function(func) => slot_bytes::<FunctionExpression>(func.ram_bytes_used()),
        }
    }
}

/// Widen a node struct's estimate to the `Expression` slot it lives in.
fn slot_bytes<T>(node_bytes: u64) -> u64 {
    shallow_size_of::<Expression>() - shallow_size_of::<T>() + node_bytes
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression_string())
    }
}
