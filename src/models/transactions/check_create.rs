use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::amount::Amount;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Creates a Check object in the ledger: a deferred payment that the
/// destination may cash.
///
/// See CheckCreate:
/// `<https://xrpl.org/checkcreate.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct CheckCreate<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The unique address of the account that can cash the Check.
    pub destination: Cow<'a, str>,
    /// Maximum amount of source currency the Check is allowed to
    /// debit the sender, including transfer fees on non-XRP
    /// currencies.
    pub send_max: Amount<'a>,
    /// Arbitrary tag that identifies the reason for the Check, or a
    /// hosted recipient to pay.
    pub destination_tag: Option<u32>,
    /// Time after which the Check is no longer valid, in seconds
    /// since the Ripple Epoch.
    pub expiration: Option<u32>,
    /// Arbitrary 256-bit hash representing a specific reason or
    /// identifier for this Check.
    #[serde(rename = "InvoiceID")]
    pub invoice_id: Option<Cow<'a, str>>,
}

impl<'a> Model for CheckCreate<'a> {
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

impl<'a> Transaction<'a, NoFlags> for CheckCreate<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for CheckCreate<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> CheckCreate<'a> {
    pub fn new(account: Cow<'a, str>, destination: Cow<'a, str>, send_max: Amount<'a>) -> Self {
        CheckCreate {
            common_fields: CommonFields::from_account(account, TransactionType::CheckCreate),
            destination,
            send_max,
            destination_tag: None,
            expiration: None,
            invoice_id: None,
        }
    }

    pub fn with_destination_tag(mut self, destination_tag: u32) -> Self {
        self.destination_tag = Some(destination_tag);
        self
    }

    pub fn with_expiration(mut self, expiration: u32) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn with_invoice_id(mut self, invoice_id: Cow<'a, str>) -> Self {
        self.invoice_id = Some(invoice_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_to_self_rejected() {
        let check = CheckCreate::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            "10000000".into(),
        )
        .with_sequence(1);
        assert!(check.validate().is_err());
    }
}
