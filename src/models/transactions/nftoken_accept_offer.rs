use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::amount::Amount;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Accepts an offer to buy or sell a non-fungible token, optionally
/// brokering two matching offers.
///
/// See NFTokenAcceptOffer:
/// `<https://xrpl.org/nftokenacceptoffer.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct NFTokenAcceptOffer<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The sell offer being accepted.
    #[serde(rename = "NFTokenSellOffer")]
    pub nftoken_sell_offer: Option<Cow<'a, str>>,
    /// The buy offer being accepted.
    #[serde(rename = "NFTokenBuyOffer")]
    pub nftoken_buy_offer: Option<Cow<'a, str>>,
    /// The broker's cut, in brokered mode.
    #[serde(rename = "NFTokenBrokerFee")]
    pub nftoken_broker_fee: Option<Amount<'a>>,
}

impl<'a> Model for NFTokenAcceptOffer<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.nftoken_sell_offer.is_none() && self.nftoken_buy_offer.is_none() {
            return Err(XRPLModelException::MissingField {
                field: "nftoken_sell_offer or nftoken_buy_offer".to_string(),
            });
        }
        if self.nftoken_broker_fee.is_some()
            && (self.nftoken_sell_offer.is_none() || self.nftoken_buy_offer.is_none())
        {
            return Err(XRPLModelException::FlagRequiresField {
                flag: "brokered mode".to_string(),
                field: "both offers".to_string(),
            });
        }
        Ok(())
    }
}

impl<'a> Transaction<'a, NoFlags> for NFTokenAcceptOffer<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for NFTokenAcceptOffer<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> NFTokenAcceptOffer<'a> {
    pub fn new(account: Cow<'a, str>) -> Self {
        NFTokenAcceptOffer {
            common_fields: CommonFields::from_account(account, TransactionType::NFTokenAcceptOffer),
            nftoken_sell_offer: None,
            nftoken_buy_offer: None,
            nftoken_broker_fee: None,
        }
    }

    pub fn with_sell_offer(mut self, nftoken_sell_offer: Cow<'a, str>) -> Self {
        self.nftoken_sell_offer = Some(nftoken_sell_offer);
        self
    }

    pub fn with_buy_offer(mut self, nftoken_buy_offer: Cow<'a, str>) -> Self {
        self.nftoken_buy_offer = Some(nftoken_buy_offer);
        self
    }

    pub fn with_broker_fee(mut self, nftoken_broker_fee: Amount<'a>) -> Self {
        self.nftoken_broker_fee = Some(nftoken_broker_fee);
        self
    }
}
