use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::constants::MAX_TRADING_FEE;
use crate::models::amount::Amount;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Creates an Automated Market Maker instance for an asset pair,
/// funding its initial reserves.
///
/// See AMMCreate:
/// `<https://xrpl.org/ammcreate.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AMMCreate<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The first of the two assets to fund this AMM with.
    pub amount: Amount<'a>,
    /// The second of the two assets to fund this AMM with.
    pub amount2: Amount<'a>,
    /// The fee to charge for trades against this AMM instance, in
    /// units of 1/100,000; a value of 1 is equivalent to 0.001%.
    pub trading_fee: u16,
}

impl<'a> Model for AMMCreate<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.trading_fee > MAX_TRADING_FEE {
            return Err(XRPLModelException::ValueTooHigh {
                field: "trading_fee".to_string(),
                max: MAX_TRADING_FEE as u32,
                found: self.trading_fee as u32,
            });
        }
        if self.amount.is_xrp() && self.amount2.is_xrp() {
            return Err(XRPLModelException::IllegalField {
                field: "amount2".to_string(),
                context: "an AMM needs two distinct assets".to_string(),
            });
        }

        Ok(())
    }
}

impl<'a> Transaction<'a, NoFlags> for AMMCreate<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for AMMCreate<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> AMMCreate<'a> {
    pub fn new(
        account: Cow<'a, str>,
        amount: Amount<'a>,
        amount2: Amount<'a>,
        trading_fee: u16,
    ) -> Self {
        AMMCreate {
            common_fields: CommonFields::from_account(account, TransactionType::AMMCreate),
            amount,
            amount2,
            trading_fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::amount::IssuedCurrencyAmount;

    #[test]
    fn test_trading_fee_bound() {
        let create = AMMCreate::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            "10000000".into(),
            Amount::IssuedCurrencyAmount(IssuedCurrencyAmount::new(
                "USD".into(),
                "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into(),
                "10000".into(),
            )),
            1001,
        )
        .with_sequence(1);
        assert!(create.validate().is_err());
    }

    #[test]
    fn test_two_xrp_sides_rejected() {
        let create = AMMCreate::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            "10000000".into(),
            "20000000".into(),
            500,
        )
        .with_sequence(1);
        assert!(create.validate().is_err());
    }
}
