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

/// Transactions of the NFTokenCreateOffer type support additional
/// values in the Flags field.
#[derive(
    Debug, Eq, PartialEq, Clone, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter, Copy,
)]
#[repr(u32)]
pub enum NFTokenCreateOfferFlag {
    /// The offer is selling the token; unset means buying.
    TfSellOffer = 0x00000001,
}

/// Creates an offer to buy or sell a non-fungible token.
///
/// See NFTokenCreateOffer:
/// `<https://xrpl.org/nftokencreateoffer.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct NFTokenCreateOffer<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NFTokenCreateOfferFlag>,
    /// The token the offer concerns.
    #[serde(rename = "NFTokenID")]
    pub nftoken_id: Cow<'a, str>,
    /// The amount offered (buy) or asked (sell).
    pub amount: Amount<'a>,
    /// The token's current owner; required for buy offers.
    pub owner: Option<Cow<'a, str>>,
    /// Time after which the offer is no longer active.
    pub expiration: Option<u32>,
    /// The only account allowed to accept the offer.
    pub destination: Option<Cow<'a, str>>,
}

impl<'a> Model for NFTokenCreateOffer<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        let is_sell = self.has_flag(&NFTokenCreateOfferFlag::TfSellOffer);
        match (&self.owner, is_sell) {
            (Some(_), true) => Err(XRPLModelException::IllegalField {
                field: "owner".to_string(),
                context: "a sell offer concerns the sender's own token".to_string(),
            }),
            (None, false) => Err(XRPLModelException::MissingField {
                field: "owner".to_string(),
            }),
            (Some(owner), false) if *owner == self.common_fields.account => {
                Err(XRPLModelException::AccountsMustDiffer {
                    first: "account".to_string(),
                    second: "owner".to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl<'a> Transaction<'a, NFTokenCreateOfferFlag> for NFTokenCreateOffer<'a> {
    fn has_flag(&self, flag: &NFTokenCreateOfferFlag) -> bool {
        self.common_fields.has_flag(flag)
    }

    fn get_transaction_type(&self) -> &TransactionType {
        self.common_fields.get_transaction_type()
    }

    fn get_common_fields(&self) -> &CommonFields<'_, NFTokenCreateOfferFlag> {
        self.common_fields.get_common_fields()
    }

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NFTokenCreateOfferFlag> {
        self.common_fields.get_mut_common_fields()
    }
}

impl<'a> CommonTransactionBuilder<'a, NFTokenCreateOfferFlag> for NFTokenCreateOffer<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NFTokenCreateOfferFlag> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> NFTokenCreateOffer<'a> {
    pub fn new(account: Cow<'a, str>, nftoken_id: Cow<'a, str>, amount: Amount<'a>) -> Self {
        NFTokenCreateOffer {
            common_fields: CommonFields::from_account(account, TransactionType::NFTokenCreateOffer),
            nftoken_id,
            amount,
            owner: None,
            expiration: None,
            destination: None,
        }
    }

    pub fn with_owner(mut self, owner: Cow<'a, str>) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_expiration(mut self, expiration: u32) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn with_destination(mut self, destination: Cow<'a, str>) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn with_flag(mut self, flag: NFTokenCreateOfferFlag) -> Self {
        self.common_fields.flags.0.push(flag);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_offer_requires_owner() {
        let token = "000100001E962F495F07A990F4ED55ACCFEEF365DBAA76B6A048C0A200000007";

        let buy = NFTokenCreateOffer::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            token.into(),
            "1000000".into(),
        )
        .with_sequence(1);
        assert!(buy.validate().is_err());

        let sell = NFTokenCreateOffer::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            token.into(),
            "1000000".into(),
        )
        .with_sequence(1)
        .with_flag(NFTokenCreateOfferFlag::TfSellOffer);
        assert!(sell.validate().is_ok());
    }
}
