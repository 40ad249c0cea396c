use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::binarycodec::types::Issue;
use crate::models::amount::{Amount, IssuedCurrencyAmount};
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, XRPLModelException, XRPLModelResult};

/// The withdraw mode flags. Exactly one must be set.
///
/// See AMMWithdraw flags:
/// `<https://xrpl.org/ammwithdraw.html#ammwithdraw-flags>`
#[derive(
    Debug, Eq, PartialEq, Clone, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter, Copy,
)]
#[repr(u32)]
pub enum AMMWithdrawFlag {
    /// Return the LPTokenIn and receive both assets pro rata.
    TfLpToken = 0x00010000,
    /// Return all of the sender's LP tokens.
    TfWithdrawAll = 0x00020000,
    /// Withdraw as much of one asset as the sender's LP tokens allow.
    TfOneAssetWithdrawAll = 0x00040000,
    /// Withdraw exactly Amount of one asset.
    TfSingleAsset = 0x00080000,
    /// Withdraw both Amount and Amount2 pro rata.
    TfTwoAsset = 0x00100000,
    /// Withdraw one asset, returning at most LPTokenIn.
    TfOneAssetLpToken = 0x00200000,
    /// Withdraw one asset, bounded by an effective price.
    TfLimitLpToken = 0x00400000,
}

/// Removes liquidity from an AMM, returning LP tokens.
///
/// See AMMWithdraw:
/// `<https://xrpl.org/ammwithdraw.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AMMWithdraw<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, AMMWithdrawFlag>,
    /// The definition for one of the AMM's assets.
    pub asset: Issue,
    /// The definition for the other of the AMM's assets.
    pub asset2: Issue,
    /// The amount of one asset to withdraw.
    pub amount: Option<Amount<'a>>,
    /// The amount of the other asset to withdraw.
    pub amount2: Option<Amount<'a>>,
    /// The minimum effective price to accept, per LP token.
    #[serde(rename = "EPrice")]
    pub e_price: Option<Amount<'a>>,
    /// How many of the AMM's LP tokens to redeem.
    #[serde(rename = "LPTokenIn")]
    pub lp_token_in: Option<IssuedCurrencyAmount<'a>>,
}

impl<'a> AMMWithdraw<'a> {
    fn mode_flags(&self) -> Vec<AMMWithdrawFlag> {
        use strum::IntoEnumIterator;
        AMMWithdrawFlag::iter()
            .filter(|flag| self.has_flag(flag))
            .collect()
    }
}

impl<'a> Model for AMMWithdraw<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        let modes = self.mode_flags();
        if modes.len() != 1 {
            return Err(XRPLModelException::FlagsError(format!(
                "exactly one withdraw mode flag is required, found {}",
                modes.len()
            )));
        }

        match modes[0] {
            AMMWithdrawFlag::TfLpToken if self.lp_token_in.is_none() => {
                Err(XRPLModelException::FlagRequiresField {
                    flag: AMMWithdrawFlag::TfLpToken.to_string(),
                    field: "lp_token_in".to_string(),
                })
            }
            AMMWithdrawFlag::TfSingleAsset
            | AMMWithdrawFlag::TfOneAssetWithdrawAll
            | AMMWithdrawFlag::TfLimitLpToken
                if self.amount.is_none() =>
            {
                Err(XRPLModelException::FlagRequiresField {
                    flag: modes[0].to_string(),
                    field: "amount".to_string(),
                })
            }
            AMMWithdrawFlag::TfTwoAsset
                if self.amount.is_none() || self.amount2.is_none() =>
            {
                Err(XRPLModelException::FlagRequiresField {
                    flag: AMMWithdrawFlag::TfTwoAsset.to_string(),
                    field: "amount and amount2".to_string(),
                })
            }
            AMMWithdrawFlag::TfOneAssetLpToken
                if self.amount.is_none() || self.lp_token_in.is_none() =>
            {
                Err(XRPLModelException::FlagRequiresField {
                    flag: AMMWithdrawFlag::TfOneAssetLpToken.to_string(),
                    field: "amount and lp_token_in".to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl<'a> Transaction<'a, AMMWithdrawFlag> for AMMWithdraw<'a> {
    fn has_flag(&self, flag: &AMMWithdrawFlag) -> bool {
        self.common_fields.has_flag(flag)
    }

    fn get_transaction_type(&self) -> &TransactionType {
        self.common_fields.get_transaction_type()
    }

    fn get_common_fields(&self) -> &CommonFields<'_, AMMWithdrawFlag> {
        self.common_fields.get_common_fields()
    }

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, AMMWithdrawFlag> {
        self.common_fields.get_mut_common_fields()
    }
}

impl<'a> CommonTransactionBuilder<'a, AMMWithdrawFlag> for AMMWithdraw<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, AMMWithdrawFlag> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> AMMWithdraw<'a> {
    pub fn new(account: Cow<'a, str>, asset: Issue, asset2: Issue) -> Self {
        AMMWithdraw {
            common_fields: CommonFields::from_account(account, TransactionType::AMMWithdraw),
            asset,
            asset2,
            amount: None,
            amount2: None,
            e_price: None,
            lp_token_in: None,
        }
    }

    pub fn with_amount(mut self, amount: Amount<'a>) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_amount2(mut self, amount2: Amount<'a>) -> Self {
        self.amount2 = Some(amount2);
        self
    }

    pub fn with_e_price(mut self, e_price: Amount<'a>) -> Self {
        self.e_price = Some(e_price);
        self
    }

    pub fn with_lp_token_in(mut self, lp_token_in: IssuedCurrencyAmount<'a>) -> Self {
        self.lp_token_in = Some(lp_token_in);
        self
    }

    pub fn with_flag(mut self, flag: AMMWithdrawFlag) -> Self {
        self.common_fields.flags.0.push(flag);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_mode() {
        let withdraw = AMMWithdraw::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            Issue::xrp(),
            Issue::issued(
                "USD".parse().unwrap(),
                "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".parse().unwrap(),
            ),
        )
        .with_sequence(1);
        assert!(withdraw.validate().is_err());

        let all = withdraw.with_flag(AMMWithdrawFlag::TfWithdrawAll);
        assert!(all.validate().is_ok());
    }
}
