use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Removes an Offer object from the ledger.
///
/// See OfferCancel:
/// `<https://xrpl.org/offercancel.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct OfferCancel<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The sequence number of a previous OfferCreate transaction.
    pub offer_sequence: u32,
}

impl<'a> Model for OfferCancel<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.offer_sequence == 0 {
            return Err(XRPLModelException::ValueTooLow {
                field: "offer_sequence".to_string(),
                min: 1,
                found: 0,
            });
        }
        Ok(())
    }
}

impl<'a> Transaction<'a, NoFlags> for OfferCancel<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for OfferCancel<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> OfferCancel<'a> {
    pub fn new(account: Cow<'a, str>, offer_sequence: u32) -> Self {
        OfferCancel {
            common_fields: CommonFields::from_account(account, TransactionType::OfferCancel),
            offer_sequence,
        }
    }
}
