use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelResult};

/// Returns escrowed XRP to the sender after the escrow has expired.
///
/// See EscrowCancel:
/// `<https://xrpl.org/escrowcancel.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct EscrowCancel<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// Address of the source account that funded the escrow.
    pub owner: Cow<'a, str>,
    /// Transaction sequence of the EscrowCreate transaction that
    /// created the escrow to cancel.
    pub offer_sequence: u32,
}

impl<'a> Model for EscrowCancel<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()
    }
}

impl<'a> Transaction<'a, NoFlags> for EscrowCancel<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for EscrowCancel<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> EscrowCancel<'a> {
    pub fn new(account: Cow<'a, str>, owner: Cow<'a, str>, offer_sequence: u32) -> Self {
        EscrowCancel {
            common_fields: CommonFields::from_account(account, TransactionType::EscrowCancel),
            owner,
            offer_sequence,
        }
    }
}
