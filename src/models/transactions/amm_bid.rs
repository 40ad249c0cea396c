use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::binarycodec::types::Issue;
use crate::models::amount::IssuedCurrencyAmount;
use crate::models::transactions::{
    AuthAccount, CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Largest number of accounts an auction slot bid may authorize.
const MAX_AUTH_ACCOUNTS: usize = 4;

/// Bids on an AMM's auction slot, which grants a discounted trading
/// fee.
///
/// See AMMBid:
/// `<https://xrpl.org/ammbid.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AMMBid<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The definition for one of the AMM's assets.
    pub asset: Issue,
    /// The definition for the other of the AMM's assets.
    pub asset2: Issue,
    /// Pay at least this LP token amount for the slot.
    pub bid_min: Option<IssuedCurrencyAmount<'a>>,
    /// Pay at most this LP token amount for the slot.
    pub bid_max: Option<IssuedCurrencyAmount<'a>>,
    /// Additional accounts that can trade at the discounted fee.
    pub auth_accounts: Option<Vec<AuthAccount>>,
}

impl<'a> Model for AMMBid<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if let Some(auth_accounts) = &self.auth_accounts {
            if auth_accounts.len() > MAX_AUTH_ACCOUNTS {
                return Err(XRPLModelException::ValueTooHigh {
                    field: "auth_accounts".to_string(),
                    max: MAX_AUTH_ACCOUNTS as u32,
                    found: auth_accounts.len() as u32,
                });
            }
        }
        Ok(())
    }
}

impl<'a> Transaction<'a, NoFlags> for AMMBid<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for AMMBid<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> AMMBid<'a> {
    pub fn new(account: Cow<'a, str>, asset: Issue, asset2: Issue) -> Self {
        AMMBid {
            common_fields: CommonFields::from_account(account, TransactionType::AMMBid),
            asset,
            asset2,
            bid_min: None,
            bid_max: None,
            auth_accounts: None,
        }
    }

    pub fn with_bid_min(mut self, bid_min: IssuedCurrencyAmount<'a>) -> Self {
        self.bid_min = Some(bid_min);
        self
    }

    pub fn with_bid_max(mut self, bid_max: IssuedCurrencyAmount<'a>) -> Self {
        self.bid_max = Some(bid_max);
        self
    }

    pub fn with_auth_accounts(mut self, auth_accounts: Vec<AuthAccount>) -> Self {
        self.auth_accounts = Some(auth_accounts);
        self
    }
}
