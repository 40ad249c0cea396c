//! Exceptions for invalid ledger amount and currency data.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum XRPRangeException {
    #[error("XRP amount is too small (min {min}, found {found})")]
    InvalidXRPAmountTooSmall { min: String, found: String },
    #[error("XRP amount is too large (max {max}, found {found})")]
    InvalidXRPAmountTooLarge { max: u64, found: String },
    #[error("Drops amount is too large (max {max}, found {found})")]
    InvalidDropsAmountTooLarge { max: String, found: String },
    #[error("Decimal error: {0}")]
    DecimalError(#[from] rust_decimal::Error),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ISOCodeException {
    #[error("Invalid ISO code")]
    InvalidISOCode,
    #[error("Invalid ISO length")]
    InvalidISOLength,
    #[error("The ISO code `XRP` has no 160-bit form")]
    InvalidXRPBytes,
    #[error("Hex error: {0}")]
    HexError(#[from] hex::FromHexError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum XRPLTimeRangeException {
    #[error("{time} is not convertible to ripple time")]
    InvalidTime { time: i64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum XRPLUtilsException {
    #[error("XRP range error: {0}")]
    XRPRangeError(#[from] XRPRangeException),
    #[error("ISO code error: {0}")]
    ISOCodeError(#[from] ISOCodeException),
    #[error("Time range error: {0}")]
    XRPLTimeRangeError(#[from] XRPLTimeRangeException),
}

pub type XRPLUtilsResult<T, E = XRPLUtilsException> = core::result::Result<T, E>;
