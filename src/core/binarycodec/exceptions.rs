//! General binary codec exceptions.

use thiserror::Error;

use super::types::exceptions::XRPLTypeException;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum XRPLBinaryCodecException {
    #[error("BinaryParser can't skip {found} bytes, only contains {max}")]
    UnexpectedParserSkipOverflow { max: usize, found: usize },
    #[error("Parser read out of bounds")]
    UnexpectedEndOfBytes,
    #[error("Unexpected length prefix range (min {min}, max {max})")]
    UnexpectedLengthPrefixRange { min: usize, max: usize },
    #[error("Unexpected type code range (min {min}, max {max})")]
    UnexpectedTypeCodeRange { min: usize, max: usize },
    #[error("Unexpected field code range (min {min}, max {max})")]
    UnexpectedFieldCodeRange { min: usize, max: usize },
    #[error("Unexpected field id byte range (min {min}, max {max})")]
    UnexpectedFieldIdByteRange { min: usize, max: usize },
    #[error("Unknown field name `{0}`")]
    UnknownFieldName(String),
    #[error("Unknown field header `{0}`")]
    UnknownFieldHeader(String),
    #[error("VariableLength field must be <= {max} bytes long")]
    InvalidVariableLengthTooLarge { max: usize },
    #[error("Invalid hash length (expected {expected}, found {found})")]
    InvalidHashLength { expected: usize, found: usize },
    #[error("Field `{field}` is not serializable from `{found}`")]
    UnsupportedValue { field: String, found: String },
    #[error("Type error: {0}")]
    XRPLTypeError(#[from] XRPLTypeException),
    #[error("Hex error: {0}")]
    HexError(String),
}

impl From<hex::FromHexError> for XRPLBinaryCodecException {
    fn from(err: hex::FromHexError) -> Self {
        XRPLBinaryCodecException::HexError(err.to_string())
    }
}
