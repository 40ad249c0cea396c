use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::models::amount::XRPAmount;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, XRPLModelException, XRPLModelResult};

/// Transactions of the PaymentChannelClaim type support additional
/// values in the Flags field.
///
/// See PaymentChannelClaim flags:
/// `<https://xrpl.org/paymentchannelclaim.html#paymentchannelclaim-flags>`
#[derive(
    Debug, Eq, PartialEq, Clone, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter, Copy,
)]
#[repr(u32)]
pub enum PaymentChannelClaimFlag {
    /// Clear the channel's Expiration time.
    TfRenew = 0x00010000,
    /// Request to close the channel.
    TfClose = 0x00020000,
}

/// Claims XRP from a payment channel, adjusts its expiration, or both.
///
/// See PaymentChannelClaim:
/// `<https://xrpl.org/paymentchannelclaim.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentChannelClaim<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, PaymentChannelClaimFlag>,
    /// The unique ID of the channel.
    pub channel: Cow<'a, str>,
    /// Total amount of XRP, in drops, delivered by this channel after
    /// processing this claim.
    pub balance: Option<XRPAmount<'a>>,
    /// The amount of XRP, in drops, authorized by the Signature.
    pub amount: Option<XRPAmount<'a>>,
    /// The signature of this claim, in hexadecimal.
    pub signature: Option<Cow<'a, str>>,
    /// The public key used for the signature.
    pub public_key: Option<Cow<'a, str>>,
}

impl<'a> Model for PaymentChannelClaim<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.signature.is_some() && self.public_key.is_none() {
            return Err(XRPLModelException::FlagRequiresField {
                flag: "a signed claim".to_string(),
                field: "public_key".to_string(),
            });
        }
        Ok(())
    }
}

impl<'a> Transaction<'a, PaymentChannelClaimFlag> for PaymentChannelClaim<'a> {
    fn has_flag(&self, flag: &PaymentChannelClaimFlag) -> bool {
        self.common_fields.has_flag(flag)
    }

    fn get_transaction_type(&self) -> &TransactionType {
        self.common_fields.get_transaction_type()
    }

    fn get_common_fields(&self) -> &CommonFields<'_, PaymentChannelClaimFlag> {
        self.common_fields.get_common_fields()
    }

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, PaymentChannelClaimFlag> {
        self.common_fields.get_mut_common_fields()
    }
}

impl<'a> CommonTransactionBuilder<'a, PaymentChannelClaimFlag> for PaymentChannelClaim<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, PaymentChannelClaimFlag> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> PaymentChannelClaim<'a> {
    pub fn new(account: Cow<'a, str>, channel: Cow<'a, str>) -> Self {
        PaymentChannelClaim {
            common_fields: CommonFields::from_account(
                account,
                TransactionType::PaymentChannelClaim,
            ),
            channel,
            balance: None,
            amount: None,
            signature: None,
            public_key: None,
        }
    }

    pub fn with_balance(mut self, balance: XRPAmount<'a>) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn with_amount(mut self, amount: XRPAmount<'a>) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_signature(mut self, signature: Cow<'a, str>) -> Self {
        self.signature = Some(signature);
        self
    }

    pub fn with_public_key(mut self, public_key: Cow<'a, str>) -> Self {
        self.public_key = Some(public_key);
        self
    }

    pub fn with_flag(mut self, flag: PaymentChannelClaimFlag) -> Self {
        self.common_fields.flags.0.push(flag);
        self
    }
}
