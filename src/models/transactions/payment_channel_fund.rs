use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::amount::XRPAmount;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelResult};

/// Adds XRP to an open payment channel and optionally updates its
/// expiration.
///
/// See PaymentChannelFund:
/// `<https://xrpl.org/paymentchannelfund.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentChannelFund<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The unique ID of the channel to fund.
    pub channel: Cow<'a, str>,
    /// Amount of XRP, in drops, to add to the channel.
    pub amount: XRPAmount<'a>,
    /// New Expiration time to set for the channel.
    pub expiration: Option<u32>,
}

impl<'a> Model for PaymentChannelFund<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()
    }
}

impl<'a> Transaction<'a, NoFlags> for PaymentChannelFund<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for PaymentChannelFund<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> PaymentChannelFund<'a> {
    pub fn new(account: Cow<'a, str>, channel: Cow<'a, str>, amount: XRPAmount<'a>) -> Self {
        PaymentChannelFund {
            common_fields: CommonFields::from_account(account, TransactionType::PaymentChannelFund),
            channel,
            amount,
            expiration: None,
        }
    }

    pub fn with_expiration(mut self, expiration: u32) -> Self {
        self.expiration = Some(expiration);
        self
    }
}
