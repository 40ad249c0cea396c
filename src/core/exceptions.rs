//! Aggregated exceptions for the core codecs.

use thiserror::Error;

use crate::utils::exceptions::{ISOCodeException, XRPLUtilsException};

use super::{
    addresscodec::exceptions::XRPLAddressCodecException,
    binarycodec::exceptions::XRPLBinaryCodecException,
    keypairs::exceptions::XRPLKeypairsException,
};

pub type XRPLCoreResult<T, E = XRPLCoreException> = core::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum XRPLCoreException {
    #[error("XRPL Address Codec error: {0}")]
    XRPLAddressCodecError(#[from] XRPLAddressCodecException),
    #[error("XRPL Binary Codec error: {0}")]
    XRPLBinaryCodecError(#[from] XRPLBinaryCodecException),
    #[error("XRPL Keypairs error: {0}")]
    XRPLKeypairsError(#[from] XRPLKeypairsException),
    #[error("serde_json error: {0}")]
    SerdeJsonError(String),
    #[error("XRPL utils error: {0}")]
    XRPLUtilsError(String),
    #[error("From hex error: {0}")]
    FromHexError(#[from] hex::FromHexError),
    #[error("ISO code error: {0}")]
    ISOCodeError(#[from] ISOCodeException),
    #[error("Base58 error: {0}")]
    Bs58Error(#[from] bs58::decode::Error),
}

impl From<serde_json::Error> for XRPLCoreException {
    fn from(error: serde_json::Error) -> Self {
        XRPLCoreException::SerdeJsonError(error.to_string())
    }
}

impl From<XRPLUtilsException> for XRPLCoreException {
    fn from(error: XRPLUtilsException) -> Self {
        XRPLCoreException::XRPLUtilsError(error.to_string())
    }
}
