//! Exceptions for the binary codec's wire value types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum XRPLTypeException {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),
    #[error("Invalid account: {0}")]
    InvalidAccount(String),
    #[error("Invalid issue: {0}")]
    InvalidIssue(String),
    #[error("Invalid hash length (expected {expected}, found {found})")]
    InvalidHashLength { expected: usize, found: usize },
    #[error("Field `{field}` expects a {expected} value")]
    UnexpectedJsonType {
        field: String,
        expected: &'static str,
    },
    #[error("Hex error: {0}")]
    HexError(String),
}

impl From<hex::FromHexError> for XRPLTypeException {
    fn from(err: hex::FromHexError) -> Self {
        XRPLTypeException::HexError(err.to_string())
    }
}
