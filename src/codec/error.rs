//! Decode error types.

use thiserror::Error;

/// Errors that can occur while decoding serialized expressions.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unexpected end of input: needed {needed} bytes but only {remaining} remain")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("Invalid length prefix: {0}")]
    InvalidLength(i32),

    #[error("Invalid boolean byte: {0}")]
    InvalidBool(u8),

    #[error("Invalid UTF-8 in string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Unknown expression type tag: {0}")]
    UnknownTag(u8),

    #[error("Unknown data type: {0}")]
    UnknownDataType(u8),

    #[error("Expression nesting exceeds the limit of {0} levels")]
    NestingTooDeep(usize),

    #[error("{0} trailing bytes after expression")]
    TrailingBytes(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
