//! Keypair codec exceptions.

use thiserror::Error;

use crate::constants::CryptoAlgorithm;
use crate::core::addresscodec::exceptions::XRPLAddressCodecException;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum XRPLKeypairsException {
    #[error("Derived keypair did not verify its own signature")]
    InvalidSignature,
    #[error("Validator keys are not supported for {expected}")]
    UnsupportedValidatorAlgorithm { expected: CryptoAlgorithm },
    #[error("No valid secp256k1 key could be derived from the seed")]
    UnderivableKey,
    #[error("Address codec error: {0}")]
    AddressCodecException(#[from] XRPLAddressCodecException),
    #[error("ed25519 error: {0}")]
    ED25519Error(String),
    #[error("secp256k1 error: {0}")]
    SECP256K1Error(String),
    #[error("Hex error: {0}")]
    HexError(String),
}

impl From<ed25519_dalek::ed25519::Error> for XRPLKeypairsException {
    fn from(err: ed25519_dalek::ed25519::Error) -> Self {
        XRPLKeypairsException::ED25519Error(err.to_string())
    }
}

impl From<secp256k1::Error> for XRPLKeypairsException {
    fn from(err: secp256k1::Error) -> Self {
        XRPLKeypairsException::SECP256K1Error(err.to_string())
    }
}

impl From<hex::FromHexError> for XRPLKeypairsException {
    fn from(err: hex::FromHexError) -> Self {
        XRPLKeypairsException::HexError(err.to_string())
    }
}
