use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Delivers escrowed XRP to the destination once the escrow's
/// conditions are met.
///
/// See EscrowFinish:
/// `<https://xrpl.org/escrowfinish.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct EscrowFinish<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// Address of the source account that funded the escrow.
    pub owner: Cow<'a, str>,
    /// Transaction sequence of the EscrowCreate transaction that
    /// created the escrow to finish.
    pub offer_sequence: u32,
    /// Hex value matching the previously-supplied PREIMAGE-SHA-256
    /// crypto-condition of the escrow.
    pub condition: Option<Cow<'a, str>>,
    /// Hex value of the PREIMAGE-SHA-256 crypto-condition
    /// fulfillment matching the escrow's condition.
    pub fulfillment: Option<Cow<'a, str>>,
}

impl<'a> Model for EscrowFinish<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        // The condition and its fulfillment travel together.
        match (&self.condition, &self.fulfillment) {
            (Some(_), None) | (None, Some(_)) => Err(XRPLModelException::ExactlyOneOf {
                first: "condition with fulfillment".to_string(),
                second: "neither".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl<'a> Transaction<'a, NoFlags> for EscrowFinish<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for EscrowFinish<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> EscrowFinish<'a> {
    pub fn new(account: Cow<'a, str>, owner: Cow<'a, str>, offer_sequence: u32) -> Self {
        EscrowFinish {
            common_fields: CommonFields::from_account(account, TransactionType::EscrowFinish),
            owner,
            offer_sequence,
            condition: None,
            fulfillment: None,
        }
    }

    pub fn with_condition(mut self, condition: Cow<'a, str>) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_fulfillment(mut self, fulfillment: Cow<'a, str>) -> Self {
        self.fulfillment = Some(fulfillment);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_requires_fulfillment() {
        let finish = EscrowFinish::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into(),
            7,
        )
        .with_sequence(1)
        .with_condition("A0258020".into());
        assert!(finish.validate().is_err());
    }
}
