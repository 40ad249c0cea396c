use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, XRPLModelException, XRPLModelResult};

pub const MAX_BATCH_TRANSACTIONS: usize = 8;

/// The batch mode flags. Exactly one must be set.
#[derive(
    Debug, Eq, PartialEq, Clone, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter, Copy,
)]
#[repr(u32)]
pub enum BatchFlag {
    /// All inner transactions succeed, or none apply.
    TfAllOrNothing = 0x00010000,
    /// Apply the first inner transaction to succeed, then stop.
    TfOnlyOne = 0x00020000,
    /// Apply inner transactions until the first failure.
    TfUntilFailure = 0x00040000,
    /// Apply every inner transaction regardless of outcome.
    TfIndependent = 0x00080000,
}

/// Wraps one inner transaction of a batch.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct RawTransaction {
    #[serde(rename = "RawTransaction")]
    pub raw_transaction: Value,
}

/// Applies a group of up to eight inner transactions under one outer
/// fee and signature, with all-or-nothing and related modes.
///
/// See Batch:
/// `<https://xrpl.org/batch.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Batch<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, BatchFlag>,
    /// The inner transactions, each a full transaction object with a
    /// zero fee and empty signing fields.
    pub raw_transactions: Vec<RawTransaction>,
}

impl<'a> Model for Batch<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        use strum::IntoEnumIterator;
        let modes = BatchFlag::iter()
            .filter(|flag| self.has_flag(flag))
            .count();
        if modes != 1 {
            return Err(XRPLModelException::FlagsError(format!(
                "exactly one batch mode flag is required, found {modes}"
            )));
        }

        if self.raw_transactions.is_empty()
            || self.raw_transactions.len() > MAX_BATCH_TRANSACTIONS
        {
            return Err(XRPLModelException::ValueTooHigh {
                field: "raw_transactions".to_string(),
                max: MAX_BATCH_TRANSACTIONS as u32,
                found: self.raw_transactions.len() as u32,
            });
        }

        Ok(())
    }
}

impl<'a> Transaction<'a, BatchFlag> for Batch<'a> {
    fn has_flag(&self, flag: &BatchFlag) -> bool {
        self.common_fields.has_flag(flag)
    }

    fn get_transaction_type(&self) -> &TransactionType {
        self.common_fields.get_transaction_type()
    }

    fn get_common_fields(&self) -> &CommonFields<'_, BatchFlag> {
        self.common_fields.get_common_fields()
    }

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, BatchFlag> {
        self.common_fields.get_mut_common_fields()
    }
}

impl<'a> CommonTransactionBuilder<'a, BatchFlag> for Batch<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, BatchFlag> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> Batch<'a> {
    pub fn new(account: Cow<'a, str>, raw_transactions: Vec<RawTransaction>) -> Self {
        Batch {
            common_fields: CommonFields::from_account(account, TransactionType::Batch),
            raw_transactions,
        }
    }

    pub fn with_flag(mut self, flag: BatchFlag) -> Self {
        self.common_fields.flags.0.push(flag);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_mode_flag() {
        let inner = RawTransaction {
            raw_transaction: serde_json::json!({"TransactionType": "AccountSet"}),
        };

        let none = Batch::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(), vec![inner.clone()])
            .with_sequence(1);
        assert!(none.validate().is_err());

        let one = Batch::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(), vec![inner])
            .with_sequence(1)
            .with_flag(BatchFlag::TfAllOrNothing);
        assert!(one.validate().is_ok());
    }
}
