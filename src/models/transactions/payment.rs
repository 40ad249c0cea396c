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

/// Transactions of the Payment type support additional values in the
/// Flags field.
///
/// See Payment flags:
/// `<https://xrpl.org/payment.html#payment-flags>`
#[derive(
    Debug, Eq, PartialEq, Clone, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter, Copy,
)]
#[repr(u32)]
pub enum PaymentFlag {
    /// Do not use the default path; only use paths included in the
    /// Paths field.
    TfNoDirectRipple = 0x00010000,
    /// If the specified Amount cannot be sent without spending more
    /// than SendMax, reduce the received amount instead of failing
    /// outright.
    TfPartialPayment = 0x00020000,
    /// Only take paths where all the conversions have an input:output
    /// ratio that is equal or better than the ratio of Amount:SendMax.
    TfLimitQuality = 0x00040000,
}

/// Transfers value from one account to another.
///
/// See Payment:
/// `<https://xrpl.org/payment.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Payment<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, PaymentFlag>,
    /// The amount of currency to deliver.
    pub amount: Amount<'a>,
    /// The unique address of the account receiving the payment.
    pub destination: Cow<'a, str>,
    /// Arbitrary tag that identifies the reason for the payment to
    /// the destination, or a hosted recipient to pay.
    pub destination_tag: Option<u32>,
    /// Arbitrary 256-bit hash representing a specific reason or
    /// identifier for this payment.
    #[serde(rename = "InvoiceID")]
    pub invoice_id: Option<Cow<'a, str>>,
    /// Highest amount of source currency this transaction is allowed
    /// to cost.
    pub send_max: Option<Amount<'a>>,
    /// Minimum amount of destination currency this transaction should
    /// deliver. Only valid if this is a partial payment.
    pub deliver_min: Option<Amount<'a>>,
}

impl<'a> Model for Payment<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.amount.is_xrp()
            && self.send_max.is_none()
            && self.common_fields.account == self.destination
        {
            return Err(XRPLModelException::AccountsMustDiffer {
                first: "account".to_string(),
                second: "destination".to_string(),
            });
        }

        if self.amount.is_xrp() && self.send_max.as_ref().map_or(false, Amount::is_xrp) {
            return Err(XRPLModelException::IllegalField {
                field: "send_max".to_string(),
                context: "an XRP-to-XRP payment needs no send maximum".to_string(),
            });
        }

        if self.deliver_min.is_some() && !self.has_flag(&PaymentFlag::TfPartialPayment) {
            return Err(XRPLModelException::FieldRequiresFlag {
                field: "deliver_min".to_string(),
                flag: PaymentFlag::TfPartialPayment.to_string(),
            });
        }

        Ok(())
    }
}

impl<'a> Transaction<'a, PaymentFlag> for Payment<'a> {
    fn has_flag(&self, flag: &PaymentFlag) -> bool {
        self.common_fields.has_flag(flag)
    }

    fn get_transaction_type(&self) -> &TransactionType {
        self.common_fields.get_transaction_type()
    }

    fn get_common_fields(&self) -> &CommonFields<'_, PaymentFlag> {
        self.common_fields.get_common_fields()
    }

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, PaymentFlag> {
        self.common_fields.get_mut_common_fields()
    }
}

impl<'a> CommonTransactionBuilder<'a, PaymentFlag> for Payment<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, PaymentFlag> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> Payment<'a> {
    pub fn new(
        account: Cow<'a, str>,
        amount: Amount<'a>,
        destination: Cow<'a, str>,
    ) -> Self {
        Payment {
            common_fields: CommonFields::from_account(account, TransactionType::Payment),
            amount,
            destination,
            destination_tag: None,
            invoice_id: None,
            send_max: None,
            deliver_min: None,
        }
    }

    pub fn with_destination_tag(mut self, destination_tag: u32) -> Self {
        self.destination_tag = Some(destination_tag);
        self
    }

    pub fn with_invoice_id(mut self, invoice_id: Cow<'a, str>) -> Self {
        self.invoice_id = Some(invoice_id);
        self
    }

    pub fn with_send_max(mut self, send_max: Amount<'a>) -> Self {
        self.send_max = Some(send_max);
        self
    }

    pub fn with_deliver_min(mut self, deliver_min: Amount<'a>) -> Self {
        self.deliver_min = Some(deliver_min);
        self
    }

    pub fn with_flag(mut self, flag: PaymentFlag) -> Self {
        self.common_fields.flags.0.push(flag);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::amount::IssuedCurrencyAmount;

    #[test]
    fn test_xrp_self_payment_is_rejected() {
        let payment = Payment::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            "1000000".into(),
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
        )
        .with_sequence(1);

        assert!(payment.validate().is_err());
    }

    #[test]
    fn test_deliver_min_requires_partial_payment() {
        let payment = Payment::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            Amount::IssuedCurrencyAmount(IssuedCurrencyAmount::new(
                "USD".into(),
                "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into(),
                "10".into(),
            )),
            "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into(),
        )
        .with_sequence(1)
        .with_deliver_min(Amount::IssuedCurrencyAmount(IssuedCurrencyAmount::new(
            "USD".into(),
            "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into(),
            "5".into(),
        )));

        assert_eq!(
            payment.validate().unwrap_err().to_string(),
            "For the field `\"deliver_min\"` to be defined it is required to set the flag `TfPartialPayment`"
        );

        let payment = payment.with_flag(PaymentFlag::TfPartialPayment);
        assert!(payment.validate().is_ok());
    }

    #[test]
    fn test_serde_flattens_common_fields() {
        let payment = Payment::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            "1000000".into(),
            "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into(),
        )
        .with_fee("10".into())
        .with_sequence(3);

        let value = serde_json::to_value(&payment).unwrap();
        assert_eq!(value["TransactionType"], "Payment");
        assert_eq!(value["Amount"], "1000000");
        assert_eq!(value["Fee"], "10");
        assert_eq!(value["Flags"], 0);

        let parsed: Payment = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, payment);
    }
}
