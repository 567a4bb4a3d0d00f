//! Function call expressions.

use indexmap::IndexMap;

use crate::codec::{DecodeResult, WireSink, WireSource};
use crate::expression::{Expression, RenderMode};
use crate::memory::{estimate, shallow_size_of, size_of_string};

/// `name(arg, ..., "key"="value", ...)`
#[derive(Debug, Clone)]
pub struct FunctionExpression {
    name: String,
    /// Named attributes, rendered after the arguments in insertion order
    attributes: IndexMap<String, String>,
    arguments: Vec<Expression>,
}

impl FunctionExpression {
    const INSTANCE_SIZE: u64 = shallow_size_of::<FunctionExpression>();

    pub fn new(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            arguments,
        }
    }

    pub fn with_attributes(
        name: impl Into<String>,
        attributes: IndexMap<String, String>,
        arguments: Vec<Expression>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            arguments,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn arguments(&self) -> &[Expression] {
        &self.arguments
    }

    /// Arguments are comma-delimited, so they are never parenthesized.
    pub(crate) fn render(&self, mode: RenderMode) -> String {
        let mut parts: Vec<String> = self.arguments.iter().map(|arg| arg.render(mode)).collect();
        parts.extend(
            self.attributes
                .iter()
                .map(|(key, value)| format!("\"{}\"=\"{}\"", key, value)),
        );
        format!("{}({})", self.name, parts.join(", "))
    }

    pub(crate) fn serialize_payload<S: WireSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.encode_string(&self.name)?;
        sink.encode_len(self.attributes.len())?;
        for (key, value) in &self.attributes {
            sink.encode_string(key)?;
            sink.encode_string(value)?;
        }
        sink.encode_len(self.arguments.len())?;
        for argument in &self.arguments {
            argument.encode(sink)?;
        }
        Ok(())
    }

    pub(crate) fn deserialize_payload<S: WireSource>(
        source: &mut S,
        depth: usize,
    ) -> DecodeResult<Self> {
        let name = source.decode_string()?;

        let attribute_count = source.decode_len()?;
        let mut attributes = IndexMap::new();
        for _ in 0..attribute_count {
            let key = source.decode_string()?;
            let value = source.decode_string()?;
            attributes.insert(key, value);
        }

        let argument_count = source.decode_len()?;
        let mut arguments = Vec::new();
        for _ in 0..argument_count {
            arguments.push(Expression::decode_at(source, depth + 1)?);
        }

        Ok(Self {
            name,
            attributes,
            arguments,
        })
    }

    pub fn ram_bytes_used(&self) -> u64 {
        Self::INSTANCE_SIZE
            + size_of_string(&self.name)
            + self
                .attributes
                .iter()
                .map(|(k, v)| size_of_string(k) + size_of_string(v))
                .sum::<u64>()
            + self.arguments.iter().map(estimate).sum::<u64>()
    }
}

impl PartialEq for FunctionExpression {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.arguments == other.arguments
            && self.attributes.iter().eq(other.attributes.iter())
    }
}
