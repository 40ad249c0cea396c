//! General address codec exceptions.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum XRPLAddressCodecException {
    #[error("Invalid classic address id length (length {length})")]
    InvalidCAddressIdLength { length: usize },
    #[error("Unknown seed encoding")]
    UnknownSeedEncoding,
    #[error("Invalid seed entropy length (length {length})")]
    InvalidSeedEntropyLength { length: usize },
    #[error("Invalid encoding prefix")]
    InvalidEncodingPrefix,
    #[error("Unexpected payload length (expected {expected}, found {found})")]
    UnexpectedPayloadLength { expected: usize, found: usize },
    #[error("Base58 decode error: {0}")]
    Base58DecodeError(String),
    #[error("Hex error: {0}")]
    HexError(String),
}

impl From<bs58::decode::Error> for XRPLAddressCodecException {
    fn from(err: bs58::decode::Error) -> Self {
        XRPLAddressCodecException::Base58DecodeError(err.to_string())
    }
}

impl From<hex::FromHexError> for XRPLAddressCodecException {
    fn from(err: hex::FromHexError) -> Self {
        XRPLAddressCodecException::HexError(err.to_string())
    }
}
