use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::addresscodec::is_valid_classic_address;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Assigns, changes, or removes an account's regular key pair.
/// Omitting RegularKey removes the current one.
///
/// See SetRegularKey:
/// `<https://xrpl.org/setregularkey.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct SetRegularKey<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The classic address derived from the key pair to authorize for
    /// this account.
    pub regular_key: Option<Cow<'a, str>>,
}

impl<'a> Model for SetRegularKey<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if let Some(regular_key) = &self.regular_key {
            // The address decodes here, before any ledger read.
            if !is_valid_classic_address(regular_key) {
                return Err(XRPLModelException::InvalidValueFormat {
                    field: "regular_key".to_string(),
                    format: "classic address".to_string(),
                    found: regular_key.to_string(),
                });
            }
            if *regular_key == self.common_fields.account {
                return Err(XRPLModelException::AccountsMustDiffer {
                    first: "account".to_string(),
                    second: "regular_key".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl<'a> Transaction<'a, NoFlags> for SetRegularKey<'a> {
    fn get_transaction_type(&self) -> &TransactionType {
        self.common_fields.get_transaction_type()
    }

    fn get_common_fields(&self) -> &CommonFields<'_, NoFlags> {
        self.common_fields.get_common_fields()
    }

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        self.common_fields.get_mut_common_fields()
    }
}

impl<'a> CommonTransactionBuilder<'a, NoFlags> for SetRegularKey<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> SetRegularKey<'a> {
    pub fn new(account: Cow<'a, str>) -> Self {
        SetRegularKey {
            common_fields: CommonFields::from_account(account, TransactionType::SetRegularKey),
            regular_key: None,
        }
    }

    pub fn with_regular_key(mut self, regular_key: Cow<'a, str>) -> Self {
        self.regular_key = Some(regular_key);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_key_must_decode() {
        let set = SetRegularKey::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into())
            .with_sequence(1)
            .with_regular_key("not-an-address".into());

        assert!(set.validate().is_err());
    }

    #[test]
    fn test_clearing_needs_no_key() {
        let clear = SetRegularKey::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into())
            .with_sequence(1);

        assert!(clear.validate().is_ok());
    }
}
