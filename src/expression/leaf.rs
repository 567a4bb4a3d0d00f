//! Leaf operands: constants and column references.

use crate::codec::{DecodeError, DecodeResult, WireSink, WireSource};
use crate::expression::RenderMode;
use crate::memory::{shallow_size_of, size_of_string};

/// Data type carried by a constant operand
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean = 1,
    Int32 = 2,
    Int64 = 3,
    Float = 4,
    Double = 5,
    Text = 6,
}

impl DataType {
    pub fn from_u8(value: u8) -> DecodeResult<Self> {
        match value {
            1 => Ok(DataType::Boolean),
            2 => Ok(DataType::Int32),
            3 => Ok(DataType::Int64),
            4 => Ok(DataType::Float),
            5 => Ok(DataType::Double),
            6 => Ok(DataType::Text),
            _ => Err(DecodeError::UnknownDataType(value)),
        }
    }
}

/// Constant value, kept in its textual form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantOperand {
    data_type: DataType,
    value: String,
}

impl ConstantOperand {
    const INSTANCE_SIZE: u64 = shallow_size_of::<ConstantOperand>();

    pub fn new(data_type: DataType, value: impl Into<String>) -> Self {
        Self {
            data_type,
            value: value.into(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(DataType::Boolean, value.to_string())
    }

    pub fn int32(value: i32) -> Self {
        Self::new(DataType::Int32, value.to_string())
    }

    pub fn int64(value: i64) -> Self {
        Self::new(DataType::Int64, value.to_string())
    }

    pub fn double(value: f64) -> Self {
        Self::new(DataType::Double, value.to_string())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(DataType::Text, value)
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn render(&self, _mode: RenderMode) -> String {
        self.value.clone()
    }

    pub(crate) fn serialize_payload<S: WireSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.encode_u8(self.data_type as u8)?;
        sink.encode_string(&self.value)
    }

    pub(crate) fn deserialize_payload<S: WireSource>(source: &mut S) -> DecodeResult<Self> {
        let data_type = DataType::from_u8(source.decode_u8()?)?;
        let value = source.decode_string()?;
        Ok(Self { data_type, value })
    }

    pub fn ram_bytes_used(&self) -> u64 {
        Self::INSTANCE_SIZE + size_of_string(&self.value)
    }
}

/// Reference to a time series column, optionally aliased in the select list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeSeriesOperand {
    path: String,
    alias: Option<String>,
}

impl TimeSeriesOperand {
    const INSTANCE_SIZE: u64 = shallow_size_of::<TimeSeriesOperand>();

    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    pub fn with_alias(path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The full path for expression strings; the alias, when present, for
    /// output symbols.
    pub(crate) fn render(&self, mode: RenderMode) -> String {
        match (mode, &self.alias) {
            (RenderMode::OutputSymbol, Some(alias)) => alias.clone(),
            _ => self.path.clone(),
        }
    }

    pub(crate) fn serialize_payload<S: WireSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.encode_string(&self.path)?;
        match &self.alias {
            Some(alias) => {
                sink.encode_bool(true)?;
                sink.encode_string(alias)
            }
            None => sink.encode_bool(false),
        }
    }

    pub(crate) fn deserialize_payload<S: WireSource>(source: &mut S) -> DecodeResult<Self> {
        let path = source.decode_string()?;
        let alias = if source.decode_bool()? {
            Some(source.decode_string()?)
        } else {
            None
        };
        Ok(Self { path, alias })
    }

    pub fn ram_bytes_used(&self) -> u64 {
        Self::INSTANCE_SIZE
            + size_of_string(&self.path)
            + self.alias.as_deref().map_or(0, size_of_string)
    }
}
