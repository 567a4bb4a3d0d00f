//! Set-membership predicate: `x IN (a,b,c)` / `x NOT IN (a,b,c)`.
//!
//! Payload layout after the dispatcher's tag byte:
//!
//! | Field        | Encoding                                   |
//! |--------------|--------------------------------------------|
//! | child        | tag byte + child payload                   |
//! | `is_not_in`  | 1 byte, `0` or `1`                         |
//! | value count  | `i32`, big-endian                          |
//! | values       | per value: `i32` byte length + UTF-8 bytes |
//!
//! Values are kept in an insertion-ordered set, so duplicates collapse to
//! their first occurrence and the wire order is the insertion order.

use indexmap::IndexSet;

use crate::codec::{DecodeResult, WireSink, WireSource};
use crate::expression::unary::UnaryExpression;
use crate::expression::{Expression, RenderMode};
use crate::memory::{estimate, shallow_size_of, size_of_string};

#[derive(Debug, Clone)]
pub struct InExpression {
    unary: UnaryExpression,
    is_not_in: bool,
    values: IndexSet<String>,
}

impl InExpression {
    const INSTANCE_SIZE: u64 = shallow_size_of::<InExpression>();

    /// Takes ownership of `values`; the node never shares it with the caller.
    pub fn new(expression: Expression, is_not_in: bool, values: IndexSet<String>) -> Self {
        Self {
            unary: UnaryExpression::new(expression),
            is_not_in,
            values,
        }
    }

    /// Builds the value set from any sequence, keeping the first occurrence of
    /// each duplicate.
    pub fn from_values<I, V>(expression: Expression, is_not_in: bool, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(
            expression,
            is_not_in,
            values.into_iter().map(Into::into).collect(),
        )
    }

    pub fn expression(&self) -> &Expression {
        self.unary.expression()
    }

    pub fn is_not_in(&self) -> bool {
        self.is_not_in
    }

    pub fn values(&self) -> &IndexSet<String> {
        &self.values
    }

    pub(crate) fn render(&self, mode: RenderMode) -> String {
        let operator = if self.is_not_in { " NOT IN (" } else { " IN (" };
        let mut text = self.unary.render_operand(mode);
        text.push_str(operator);
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                text.push(',');
            }
            text.push_str(value);
        }
        text.push(')');
        text
    }

    pub(crate) fn serialize_payload<S: WireSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        self.unary.serialize_payload(sink)?;
        sink.encode_bool(self.is_not_in)?;
        sink.encode_len(self.values.len())?;
        for value in &self.values {
            sink.encode_string(value)?;
        }
        Ok(())
    }

    pub(crate) fn deserialize_payload<S: WireSource>(
        source: &mut S,
        depth: usize,
    ) -> DecodeResult<Self> {
        let unary = UnaryExpression::deserialize_payload(source, depth)?;
        let is_not_in = source.decode_bool()?;
        let count = source.decode_len()?;
        // The count is untrusted; let the set grow as values actually arrive.
        let mut values = IndexSet::new();
        for _ in 0..count {
            values.insert(source.decode_string()?);
        }
        Ok(Self {
            unary,
            is_not_in,
            values,
        })
    }

    pub fn ram_bytes_used(&self) -> u64 {
        Self::INSTANCE_SIZE
            + estimate(self.expression())
            + self.values.iter().map(|v| size_of_string(v)).sum::<u64>()
    }
}

/// Order-sensitive: two nodes are equal only if their values appear in the
/// same sequence.
impl PartialEq for InExpression {
    fn eq(&self, other: &Self) -> bool {
        self.is_not_in == other.is_not_in
            && self.unary == other.unary
            && self.values.iter().eq(other.values.iter())
    }
}
