use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::models::amount::IssuedCurrencyAmount;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, XRPLModelException, XRPLModelResult};

/// Transactions of the TrustSet type support additional values in the
/// Flags field.
///
/// See TrustSet flags:
/// `<https://xrpl.org/trustset.html#trustset-flags>`
#[derive(
    Debug, Eq, PartialEq, Clone, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter, Copy,
)]
#[repr(u32)]
pub enum TrustSetFlag {
    /// Authorize the other party to hold currency issued by this
    /// account. Cannot be unset.
    TfSetfAuth = 0x00010000,
    /// Enable the No Ripple flag, blocking rippling between two trust
    /// lines of the same currency.
    TfSetNoRipple = 0x00020000,
    /// Disable the No Ripple flag.
    TfClearNoRipple = 0x00040000,
    /// Freeze the trust line.
    TfSetFreeze = 0x00100000,
    /// Unfreeze the trust line.
    TfClearFreeze = 0x00200000,
}

/// Creates or modifies a trust line linking two accounts.
///
/// See TrustSet:
/// `<https://xrpl.org/trustset.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TrustSet<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, TrustSetFlag>,
    /// The limit of the trust line: its currency, the issuer being
    /// trusted, and the maximum amount to trust.
    pub limit_amount: IssuedCurrencyAmount<'a>,
    /// Value incoming balances on this trust line at the ratio of
    /// this number per 1,000,000,000 units.
    pub quality_in: Option<u32>,
    /// Value outgoing balances on this trust line at the ratio of
    /// this number per 1,000,000,000 units.
    pub quality_out: Option<u32>,
}

impl<'a> Model for TrustSet<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.limit_amount.issuer == self.common_fields.account {
            return Err(XRPLModelException::AccountsMustDiffer {
                first: "account".to_string(),
                second: "limit_amount.issuer".to_string(),
            });
        }
        if self.has_flag(&TrustSetFlag::TfSetNoRipple)
            && self.has_flag(&TrustSetFlag::TfClearNoRipple)
        {
            return Err(XRPLModelException::SetAndUnsetSameFlag {
                found: TrustSetFlag::TfSetNoRipple.to_string(),
            });
        }
        if self.has_flag(&TrustSetFlag::TfSetFreeze)
            && self.has_flag(&TrustSetFlag::TfClearFreeze)
        {
            return Err(XRPLModelException::SetAndUnsetSameFlag {
                found: TrustSetFlag::TfSetFreeze.to_string(),
            });
        }
        if self.limit_amount.currency == "XRP" {
            return Err(XRPLModelException::InvalidValueFormat {
                field: "limit_amount.currency".to_string(),
                format: "an issued currency".to_string(),
                found: "XRP".to_string(),
            });
        }

        Ok(())
    }
}

impl<'a> Transaction<'a, TrustSetFlag> for TrustSet<'a> {
    fn has_flag(&self, flag: &TrustSetFlag) -> bool {
        self.common_fields.has_flag(flag)
    }

    fn get_transaction_type(&self) -> &TransactionType {
        self.common_fields.get_transaction_type()
    }

    fn get_common_fields(&self) -> &CommonFields<'_, TrustSetFlag> {
        self.common_fields.get_common_fields()
    }

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, TrustSetFlag> {
        self.common_fields.get_mut_common_fields()
    }
}

impl<'a> CommonTransactionBuilder<'a, TrustSetFlag> for TrustSet<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, TrustSetFlag> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> TrustSet<'a> {
    pub fn new(account: Cow<'a, str>, limit_amount: IssuedCurrencyAmount<'a>) -> Self {
        TrustSet {
            common_fields: CommonFields::from_account(account, TransactionType::TrustSet),
            limit_amount,
            quality_in: None,
            quality_out: None,
        }
    }

    pub fn with_quality_in(mut self, quality_in: u32) -> Self {
        self.quality_in = Some(quality_in);
        self
    }

    pub fn with_quality_out(mut self, quality_out: u32) -> Self {
        self.quality_out = Some(quality_out);
        self
    }

    pub fn with_flag(mut self, flag: TrustSetFlag) -> Self {
        self.common_fields.flags.0.push(flag);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd_limit() -> IssuedCurrencyAmount<'static> {
        IssuedCurrencyAmount::new(
            "USD".into(),
            "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into(),
            "1000".into(),
        )
    }

    #[test]
    fn test_self_trust_line_rejected() {
        let trust_set = TrustSet::new(
            "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into(),
            usd_limit(),
        )
        .with_sequence(1);
        assert!(trust_set.validate().is_err());
    }

    #[test]
    fn test_no_ripple_set_and_clear_conflict() {
        let trust_set = TrustSet::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(), usd_limit())
            .with_sequence(1)
            .with_flag(TrustSetFlag::TfSetNoRipple)
            .with_flag(TrustSetFlag::TfClearNoRipple);
        assert!(trust_set.validate().is_err());
    }

    #[test]
    fn test_xrp_trust_line_rejected() {
        let trust_set = TrustSet::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            IssuedCurrencyAmount::new(
                "XRP".into(),
                "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into(),
                "1000".into(),
            ),
        )
        .with_sequence(1);
        assert!(trust_set.validate().is_err());
    }
}
