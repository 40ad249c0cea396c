use core::convert::TryInto;
use core::str::FromStr;
use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Model;

use super::exceptions::XRPLAmountException;

/// An amount of XRP, as a string of drops.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Default)]
pub struct XRPAmount<'a>(pub Cow<'a, str>);

impl<'a> Model for XRPAmount<'a> {}

impl<'a> From<Cow<'a, str>> for XRPAmount<'a> {
    fn from(value: Cow<'a, str>) -> Self {
        Self(value)
    }
}

impl<'a> From<&'a str> for XRPAmount<'a> {
    fn from(value: &'a str) -> Self {
        Self(value.into())
    }
}

impl From<String> for XRPAmount<'_> {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<i64> for XRPAmount<'_> {
    fn from(drops: i64) -> Self {
        Self(drops.to_string().into())
    }
}

impl<'a> XRPAmount<'a> {
    /// The drops magnitude.
    pub fn as_drops(&self) -> Result<i64, XRPLAmountException> {
        Ok(self.0.parse()?)
    }
}

impl<'a> TryInto<Decimal> for XRPAmount<'a> {
    type Error = XRPLAmountException;

    fn try_into(self) -> Result<Decimal, Self::Error> {
        Ok(Decimal::from_str(&self.0)?)
    }
}
