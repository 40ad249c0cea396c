use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::amount::IssuedCurrencyAmount;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Claws back tokens the account has issued. The `issuer` inside
/// `Amount` names the holder being clawed back from, not the issuer
/// itself.
///
/// See Clawback:
/// `<https://xrpl.org/clawback.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Clawback<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The amount being clawed back; the `issuer` sub-field is the
    /// token holder's address.
    pub amount: IssuedCurrencyAmount<'a>,
}

impl<'a> Model for Clawback<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.amount.issuer == self.common_fields.account {
            return Err(XRPLModelException::AccountsMustDiffer {
                first: "account".to_string(),
                second: "amount.issuer".to_string(),
            });
        }

        let value: Decimal = self
            .amount
            .clone()
            .try_into()
            .map_err(|_| XRPLModelException::InvalidValueFormat {
                field: "amount.value".to_string(),
                format: "decimal".to_string(),
                found: self.amount.value.to_string(),
            })?;
        if value <= Decimal::ZERO {
            return Err(XRPLModelException::ValueTooLow {
                field: "amount".to_string(),
                min: 1,
                found: 0,
            });
        }

        Ok(())
    }
}

impl<'a> Transaction<'a, NoFlags> for Clawback<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for Clawback<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> Clawback<'a> {
    pub fn new(account: Cow<'a, str>, amount: IssuedCurrencyAmount<'a>) -> Self {
        Clawback {
            common_fields: CommonFields::from_account(account, TransactionType::Clawback),
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cannot_claw_from_self() {
        let clawback = Clawback::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            IssuedCurrencyAmount::new(
                "USD".into(),
                "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
                "5".into(),
            ),
        )
        .with_sequence(1);
        assert!(clawback.validate().is_err());
    }

    #[test]
    fn test_amount_must_be_positive() {
        let clawback = Clawback::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            IssuedCurrencyAmount::new(
                "USD".into(),
                "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into(),
                "-5".into(),
            ),
        )
        .with_sequence(1);
        assert!(clawback.validate().is_err());
    }
}
