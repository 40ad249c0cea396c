pub mod exceptions;
mod issued_currency_amount;
mod xrp_amount;

pub use issued_currency_amount::*;
pub use xrp_amount::*;

use core::convert::TryInto;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::models::Model;

use self::exceptions::XRPLAmountException;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Display)]
#[serde(untagged)]
pub enum Amount<'a> {
    IssuedCurrencyAmount(IssuedCurrencyAmount<'a>),
    XRPAmount(XRPAmount<'a>),
}

impl<'a> TryInto<Decimal> for Amount<'a> {
    type Error = XRPLAmountException;

    fn try_into(self) -> Result<Decimal, Self::Error> {
        match self {
            Amount::IssuedCurrencyAmount(amount) => amount.try_into(),
            Amount::XRPAmount(amount) => amount.try_into(),
        }
    }
}

impl<'a> Model for Amount<'a> {}

impl<'a> Default for Amount<'a> {
    fn default() -> Self {
        Self::XRPAmount("0".into())
    }
}

impl<'a> Amount<'a> {
    pub fn is_xrp(&self) -> bool {
        match self {
            Amount::IssuedCurrencyAmount(_) => false,
            Amount::XRPAmount(_) => true,
        }
    }

    pub fn is_issued_currency(&self) -> bool {
        !self.is_xrp()
    }
}

impl<'a> From<IssuedCurrencyAmount<'a>> for Amount<'a> {
    fn from(value: IssuedCurrencyAmount<'a>) -> Self {
        Self::IssuedCurrencyAmount(value)
    }
}

impl<'a> From<XRPAmount<'a>> for Amount<'a> {
    fn from(value: XRPAmount<'a>) -> Self {
        Self::XRPAmount(value)
    }
}

impl<'a> From<&'a str> for Amount<'a> {
    fn from(value: &'a str) -> Self {
        Self::XRPAmount(value.into())
    }
}

impl<'a> From<String> for Amount<'a> {
    fn from(value: String) -> Self {
        Self::XRPAmount(value.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_untagged_serde() {
        let xrp: Amount = "1000000".into();
        assert_eq!(serde_json::to_value(&xrp).unwrap(), "1000000");

        let iou: Amount = IssuedCurrencyAmount::new(
            "USD".into(),
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            "12.5".into(),
        )
        .into();
        let value = serde_json::to_value(&iou).unwrap();
        assert_eq!(value["currency"], "USD");

        let parsed: Amount = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, iou);
    }
}
