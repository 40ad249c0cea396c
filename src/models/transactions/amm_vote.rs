use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::constants::MAX_TRADING_FEE;
use crate::core::binarycodec::types::Issue;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Votes on the trading fee for an AMM instance. Votes are weighted
/// by the sender's LP token holding.
///
/// See AMMVote:
/// `<https://xrpl.org/ammvote.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AMMVote<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The definition for one of the AMM's assets.
    pub asset: Issue,
    /// The definition for the other of the AMM's assets.
    pub asset2: Issue,
    /// The proposed fee, in units of 1/100,000.
    pub trading_fee: u16,
}

impl<'a> Model for AMMVote<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.trading_fee > MAX_TRADING_FEE {
            return Err(XRPLModelException::ValueTooHigh {
                field: "trading_fee".to_string(),
                max: MAX_TRADING_FEE as u32,
                found: self.trading_fee as u32,
            });
        }
        Ok(())
    }
}

impl<'a> Transaction<'a, NoFlags> for AMMVote<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for AMMVote<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> AMMVote<'a> {
    pub fn new(account: Cow<'a, str>, asset: Issue, asset2: Issue, trading_fee: u16) -> Self {
        AMMVote {
            common_fields: CommonFields::from_account(account, TransactionType::AMMVote),
            asset,
            asset2,
            trading_fee,
        }
    }
}
