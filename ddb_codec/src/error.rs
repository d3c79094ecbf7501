//! Error types for the wire codec

use std::io;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors that can occur while encoding or decoding data forms
#[derive(Debug, Error)]
pub enum CodecError {
    /// The underlying source or sink failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source closed before the requested number of bytes arrived
    #[error("Unexpected end of stream: wanted {wanted} bytes, got {got}")]
    UnexpectedEof { wanted: usize, got: usize },

    /// The source closed before the delimiter arrived
    #[error("Delimiter {delimiter:#04x} not found, read {read:?}")]
    MissingDelimiter { delimiter: u8, read: Vec<u8> },

    #[error("failed to read DataType and DataForm. {0}")]
    Category(Box<CodecError>),

    #[error("invalid response format. {raw:?}")]
    InvalidResponse { raw: Vec<u8> },

    #[error("invalid byte order {0:?}")]
    InvalidByteOrder(u8),

    #[error("client error response. {0}")]
    ServerError(String),

    #[error("Unknown data form {0}")]
    UnknownForm(u8),

    #[error("Invalid symbol base {0}")]
    InvalidSymbolBase(u32),

    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// A value of one element type was handed to a slot of another
    #[error("Mismatched type: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Unsupported data type {0}")]
    Unsupported(String),

    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Scale {scale} of {ty} is out of range 0..={max}")]
    InvalidScale { ty: String, scale: i32, max: i32 },

    #[error("Decimal overflow: {0}")]
    DecimalOverflow(String),

    #[error("Invalid {ty} value {value:?}: {reason}")]
    InvalidValue {
        ty: String,
        value: String,
        reason: String,
    },

    /// A header announced more bytes than this platform can address
    #[error("Length overflow: {count} items of width {width}")]
    LengthOverflow { count: usize, width: usize },

    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl CodecError {
    pub(crate) fn invalid_value(
        ty: impl ToString,
        value: impl ToString,
        reason: impl ToString,
    ) -> Self {
        CodecError::InvalidValue {
            ty: ty.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn type_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        CodecError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
