use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::amount::Amount;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Attempts to redeem a Check object to receive up to the amount
/// authorized by it.
///
/// See CheckCash:
/// `<https://xrpl.org/checkcash.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct CheckCash<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The ID of the Check ledger object to cash.
    #[serde(rename = "CheckID")]
    pub check_id: Cow<'a, str>,
    /// Redeem the Check for exactly this amount, if possible.
    pub amount: Option<Amount<'a>>,
    /// Redeem the Check for at least this amount and for as much as
    /// possible.
    pub deliver_min: Option<Amount<'a>>,
}

impl<'a> Model for CheckCash<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        // Exactly one redemption mode.
        match (&self.amount, &self.deliver_min) {
            (Some(_), Some(_)) | (None, None) => Err(XRPLModelException::ExactlyOneOf {
                first: "amount".to_string(),
                second: "deliver_min".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl<'a> Transaction<'a, NoFlags> for CheckCash<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for CheckCash<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> CheckCash<'a> {
    pub fn new(account: Cow<'a, str>, check_id: Cow<'a, str>) -> Self {
        CheckCash {
            common_fields: CommonFields::from_account(account, TransactionType::CheckCash),
            check_id,
            amount: None,
            deliver_min: None,
        }
    }

    pub fn with_amount(mut self, amount: Amount<'a>) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_deliver_min(mut self, deliver_min: Amount<'a>) -> Self {
        self.deliver_min = Some(deliver_min);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_and_deliver_min_are_exclusive() {
        let check_id = "49647F0D748DC3FE26BDACBC57F251AADEFFF391403EC9BF87C97F67E9977FB0";

        let neither = CheckCash::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(), check_id.into())
            .with_sequence(1);
        assert!(neither.validate().is_err());

        let both = CheckCash::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(), check_id.into())
            .with_sequence(1)
            .with_amount("100".into())
            .with_deliver_min("50".into());
        assert!(both.validate().is_err());

        let amount_only =
            CheckCash::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(), check_id.into())
                .with_sequence(1)
                .with_amount("100".into());
        assert!(amount_only.validate().is_ok());
    }
}
