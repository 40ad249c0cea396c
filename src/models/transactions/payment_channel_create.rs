use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::amount::XRPAmount;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Creates a payment channel and funds it with XRP.
///
/// See PaymentChannelCreate:
/// `<https://xrpl.org/paymentchannelcreate.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentChannelCreate<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// Amount of XRP, in drops, to deduct from the sender's balance
    /// and set aside in this channel.
    pub amount: XRPAmount<'a>,
    /// Address to receive XRP claims against this channel.
    pub destination: Cow<'a, str>,
    /// Amount of time the source address must wait before closing the
    /// channel if it has unclaimed XRP.
    pub settle_delay: u32,
    /// The public key of the key pair the source will use to sign
    /// claims against this channel, in hexadecimal.
    pub public_key: Cow<'a, str>,
    /// The time, in seconds since the Ripple Epoch, when this channel
    /// expires.
    pub cancel_after: Option<u32>,
    /// Arbitrary tag to further specify the destination.
    pub destination_tag: Option<u32>,
}

impl<'a> Model for PaymentChannelCreate<'a> {
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

impl<'a> Transaction<'a, NoFlags> for PaymentChannelCreate<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for PaymentChannelCreate<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> PaymentChannelCreate<'a> {
    pub fn new(
        account: Cow<'a, str>,
        amount: XRPAmount<'a>,
        destination: Cow<'a, str>,
        settle_delay: u32,
        public_key: Cow<'a, str>,
    ) -> Self {
        PaymentChannelCreate {
            common_fields: CommonFields::from_account(
                account,
                TransactionType::PaymentChannelCreate,
            ),
            amount,
            destination,
            settle_delay,
            public_key,
            cancel_after: None,
            destination_tag: None,
        }
    }

    pub fn with_cancel_after(mut self, cancel_after: u32) -> Self {
        self.cancel_after = Some(cancel_after);
        self
    }

    pub fn with_destination_tag(mut self, destination_tag: u32) -> Self {
        self.destination_tag = Some(destination_tag);
        self
    }
}
