use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::amount::XRPAmount;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Sequesters XRP until the escrow's time or crypto-condition
/// releases it.
///
/// See EscrowCreate:
/// `<https://xrpl.org/escrowcreate.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct EscrowCreate<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// Amount of XRP, in drops, to deduct from the sender's balance
    /// and escrow.
    pub amount: XRPAmount<'a>,
    /// Address to receive escrowed XRP.
    pub destination: Cow<'a, str>,
    /// Arbitrary tag to further specify the destination.
    pub destination_tag: Option<u32>,
    /// The time when this escrow expires, in seconds since the Ripple
    /// Epoch.
    pub cancel_after: Option<u32>,
    /// The time when the escrowed XRP can be released to the
    /// recipient.
    pub finish_after: Option<u32>,
    /// Hex value representing a PREIMAGE-SHA-256 crypto-condition.
    /// Funds can only be delivered if this condition is fulfilled.
    pub condition: Option<Cow<'a, str>>,
}

impl<'a> Model for EscrowCreate<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.cancel_after.is_none() && self.finish_after.is_none() {
            return Err(XRPLModelException::MissingField {
                field: "cancel_after or finish_after".to_string(),
            });
        }
        if let (Some(cancel_after), Some(finish_after)) = (self.cancel_after, self.finish_after) {
            if finish_after >= cancel_after {
                return Err(XRPLModelException::ValueTooHigh {
                    field: "finish_after".to_string(),
                    max: cancel_after,
                    found: finish_after,
                });
            }
        }
        if self.finish_after.is_none() && self.condition.is_none() {
            return Err(XRPLModelException::MissingField {
                field: "finish_after or condition".to_string(),
            });
        }

        Ok(())
    }
}

impl<'a> Transaction<'a, NoFlags> for EscrowCreate<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for EscrowCreate<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> EscrowCreate<'a> {
    pub fn new(
        account: Cow<'a, str>,
        amount: XRPAmount<'a>,
        destination: Cow<'a, str>,
    ) -> Self {
        EscrowCreate {
            common_fields: CommonFields::from_account(account, TransactionType::EscrowCreate),
            amount,
            destination,
            destination_tag: None,
            cancel_after: None,
            finish_after: None,
            condition: None,
        }
    }

    pub fn with_destination_tag(mut self, destination_tag: u32) -> Self {
        self.destination_tag = Some(destination_tag);
        self
    }

    pub fn with_cancel_after(mut self, cancel_after: u32) -> Self {
        self.cancel_after = Some(cancel_after);
        self
    }

    pub fn with_finish_after(mut self, finish_after: u32) -> Self {
        self.finish_after = Some(finish_after);
        self
    }

    pub fn with_condition(mut self, condition: Cow<'a, str>) -> Self {
        self.condition = Some(condition);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_must_precede_cancel() {
        let escrow = EscrowCreate::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            "1000000".into(),
            "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into(),
        )
        .with_sequence(1)
        .with_cancel_after(500)
        .with_finish_after(500);
        assert!(escrow.validate().is_err());
    }

    #[test]
    fn test_needs_a_release_path() {
        let escrow = EscrowCreate::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            "1000000".into(),
            "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into(),
        )
        .with_sequence(1)
        .with_cancel_after(500);
        // cancel_after alone cannot release the funds.
        assert!(escrow.validate().is_err());
    }
}
