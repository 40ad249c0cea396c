use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::binarycodec::types::Issue;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelResult};

/// Deletes an empty AMM instance: one whose LP tokens have all been
/// redeemed.
///
/// See AMMDelete:
/// `<https://xrpl.org/ammdelete.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AMMDelete<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The definition for one of the AMM's assets.
    pub asset: Issue,
    /// The definition for the other of the AMM's assets.
    pub asset2: Issue,
}

impl<'a> Model for AMMDelete<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()
    }
}

impl<'a> Transaction<'a, NoFlags> for AMMDelete<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for AMMDelete<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> AMMDelete<'a> {
    pub fn new(account: Cow<'a, str>, asset: Issue, asset2: Issue) -> Self {
        AMMDelete {
            common_fields: CommonFields::from_account(account, TransactionType::AMMDelete),
            asset,
            asset2,
        }
    }
}
