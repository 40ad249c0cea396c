//! General model exceptions.

use thiserror::Error;

pub type XRPLModelResult<T, E = XRPLModelException> = core::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum XRPLModelException {
    #[error("The value of the field `{field:?}` is defined above its maximum (max {max}, found {found})")]
    ValueTooHigh { field: String, max: u32, found: u32 },
    #[error("The value of the field `{field:?}` is defined below its minimum (min {min}, found {found})")]
    ValueTooLow { field: String, min: u32, found: u32 },
    #[error("The value of the field `{field:?}` exceeds its maximum length of characters (max {max}, found {found})")]
    ValueTooLong {
        field: String,
        max: usize,
        found: usize,
    },
    #[error("The value of the field `{field:?}` does not have the correct format (expected {format:?}, found {found:?})")]
    InvalidValueFormat {
        field: String,
        format: String,
        found: String,
    },
    #[error("The field `{field:?}` is required")]
    MissingField { field: String },
    #[error("The field `{field:?}` is not allowed here ({context})")]
    IllegalField { field: String, context: String },
    #[error("A flag cannot be set and unset at the same time (found {found})")]
    SetAndUnsetSameFlag { found: String },
    #[error("For the flag `{flag}` to be set it is required to define the field `{field:?}`")]
    FlagRequiresField { flag: String, field: String },
    #[error("For the field `{field:?}` to be defined it is required to set the flag `{flag}`")]
    FieldRequiresFlag { field: String, flag: String },
    #[error("The field `{field:?}` cannot be defined if its required flag `{flag}` is being unset")]
    SetFieldWhenUnsetRequiredFlag { field: String, flag: String },
    #[error("Exactly one of the fields {first:?} and {second:?} must be defined")]
    ExactlyOneOf { first: String, second: String },
    #[error("The fields {first:?} and {second:?} cannot name the same account")]
    AccountsMustDiffer { first: String, second: String },
    #[error("Flags error: {0}")]
    FlagsError(String),
    #[error("Unknown transaction type `{0}`")]
    UnknownTransactionType(String),
    #[error("serde_json error: {0}")]
    SerdeJsonError(String),
}

impl From<serde_json::Error> for XRPLModelException {
    fn from(error: serde_json::Error) -> Self {
        XRPLModelException::SerdeJsonError(error.to_string())
    }
}
