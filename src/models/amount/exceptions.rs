use core::num::ParseFloatError;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum XRPLAmountException {
    #[error("Unable to convert amount `value` into `Decimal`.")]
    ToDecimalError(#[from] rust_decimal::Error),
    #[error("Unable to convert amount `value` into `f64`.")]
    ToFloatError(#[from] ParseFloatError),
    #[error("Unable to convert amount `value` into `i64`.")]
    ToIntError(#[from] core::num::ParseIntError),
}
