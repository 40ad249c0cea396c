use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Deletes an account and transfers its remaining XRP to a
/// destination account.
///
/// See AccountDelete:
/// `<https://xrpl.org/accountdelete.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AccountDelete<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The address of the account to receive the deleted account's
    /// remaining XRP.
    pub destination: Cow<'a, str>,
    /// Arbitrary destination tag that identifies a hosted recipient
    /// or other information for the recipient.
    pub destination_tag: Option<u32>,
}

impl<'a> Model for AccountDelete<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.common_fields.account == self.destination {
            return Err(XRPLModelException::AccountsMustDiffer {
                first: "account".to_string(),
                second: "destination".to_string(),
            });
        }
        Ok(())
    }
}

impl<'a> Transaction<'a, NoFlags> for AccountDelete<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for AccountDelete<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> AccountDelete<'a> {
    pub fn new(account: Cow<'a, str>, destination: Cow<'a, str>) -> Self {
        AccountDelete {
            common_fields: CommonFields::from_account(account, TransactionType::AccountDelete),
            destination,
            destination_tag: None,
        }
    }

    pub fn with_destination_tag(mut self, destination_tag: u32) -> Self {
        self.destination_tag = Some(destination_tag);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_destination_rejected_at_validate() {
        let delete = AccountDelete::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
        )
        .with_sequence(100);

        assert!(delete.validate().is_err());
    }
}
