use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::models::amount::Amount;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, XRPLModelException, XRPLModelResult};

/// Transactions of the OfferCreate type support additional values in
/// the Flags field.
///
/// See OfferCreate flags:
/// `<https://xrpl.org/offercreate.html#offercreate-flags>`
#[derive(
    Debug, Eq, PartialEq, Clone, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter, Copy,
)]
#[repr(u32)]
pub enum OfferCreateFlag {
    /// If enabled, the Offer does not consume Offers that exactly
    /// match it, and instead becomes an Offer object in the ledger.
    TfPassive = 0x00010000,
    /// Treat the Offer as an Immediate or Cancel order.
    TfImmediateOrCancel = 0x00020000,
    /// Treat the offer as a Fill or Kill order.
    TfFillOrKill = 0x00040000,
    /// Exchange the entire TakerGets amount, even if it means
    /// obtaining more than the TakerPays amount in exchange.
    TfSell = 0x00080000,
}

/// Places an Offer in the decentralized exchange.
///
/// See OfferCreate:
/// `<https://xrpl.org/offercreate.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct OfferCreate<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, OfferCreateFlag>,
    /// The amount and type of currency being sold.
    pub taker_gets: Amount<'a>,
    /// The amount and type of currency being bought.
    pub taker_pays: Amount<'a>,
    /// Time after which the Offer is no longer active.
    pub expiration: Option<u32>,
    /// An Offer to delete first, specified by its sequence number.
    pub offer_sequence: Option<u32>,
}

impl<'a> Model for OfferCreate<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.taker_gets.is_xrp() && self.taker_pays.is_xrp() {
            return Err(XRPLModelException::IllegalField {
                field: "taker_pays".to_string(),
                context: "an offer cannot trade XRP for XRP".to_string(),
            });
        }
        if self.has_flag(&OfferCreateFlag::TfImmediateOrCancel)
            && self.has_flag(&OfferCreateFlag::TfFillOrKill)
        {
            return Err(XRPLModelException::SetAndUnsetSameFlag {
                found: "TfImmediateOrCancel with TfFillOrKill".to_string(),
            });
        }

        Ok(())
    }
}

impl<'a> Transaction<'a, OfferCreateFlag> for OfferCreate<'a> {
    fn has_flag(&self, flag: &OfferCreateFlag) -> bool {
        self.common_fields.has_flag(flag)
    }

    fn get_transaction_type(&self) -> &TransactionType {
        self.common_fields.get_transaction_type()
    }

    fn get_common_fields(&self) -> &CommonFields<'_, OfferCreateFlag> {
        self.common_fields.get_common_fields()
    }

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, OfferCreateFlag> {
        self.common_fields.get_mut_common_fields()
    }
}

impl<'a> CommonTransactionBuilder<'a, OfferCreateFlag> for OfferCreate<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, OfferCreateFlag> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> OfferCreate<'a> {
    pub fn new(account: Cow<'a, str>, taker_gets: Amount<'a>, taker_pays: Amount<'a>) -> Self {
        OfferCreate {
            common_fields: CommonFields::from_account(account, TransactionType::OfferCreate),
            taker_gets,
            taker_pays,
            expiration: None,
            offer_sequence: None,
        }
    }

    pub fn with_expiration(mut self, expiration: u32) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn with_offer_sequence(mut self, offer_sequence: u32) -> Self {
        self.offer_sequence = Some(offer_sequence);
        self
    }

    pub fn with_flag(mut self, flag: OfferCreateFlag) -> Self {
        self.common_fields.flags.0.push(flag);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xrp_for_xrp_rejected() {
        let offer = OfferCreate::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            "1000000".into(),
            "2000000".into(),
        )
        .with_sequence(1);
        assert!(offer.validate().is_err());
    }
}
