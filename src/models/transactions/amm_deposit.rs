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

/// The deposit mode flags. Exactly one must be set.
///
/// See AMMDeposit flags:
/// `<https://xrpl.org/ammdeposit.html#ammdeposit-flags>`
#[derive(
    Debug, Eq, PartialEq, Clone, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter, Copy,
)]
#[repr(u32)]
pub enum AMMDepositFlag {
    /// Deposit both assets in amounts that buy exactly LPTokenOut.
    TfLpToken = 0x00010000,
    /// Deposit exactly Amount of one asset.
    TfSingleAsset = 0x00080000,
    /// Deposit both Amount and Amount2 pro rata.
    TfTwoAsset = 0x00100000,
    /// Deposit one asset to receive at least LPTokenOut.
    TfOneAssetLpToken = 0x00200000,
    /// Deposit one asset, bounded by an effective price.
    TfLimitLpToken = 0x00400000,
    /// Refill an empty AMM with both assets.
    TfTwoAssetIfEmpty = 0x00800000,
}

/// Adds liquidity to an AMM in exchange for LP tokens.
///
/// See AMMDeposit:
/// `<https://xrpl.org/ammdeposit.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AMMDeposit<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, AMMDepositFlag>,
    /// The definition for one of the AMM's assets.
    pub asset: Issue,
    /// The definition for the other of the AMM's assets.
    pub asset2: Issue,
    /// The amount of one asset to deposit.
    pub amount: Option<Amount<'a>>,
    /// The amount of the other asset to deposit.
    pub amount2: Option<Amount<'a>>,
    /// The maximum effective price to pay, per LP token.
    #[serde(rename = "EPrice")]
    pub e_price: Option<Amount<'a>>,
    /// How many of the AMM's LP tokens to buy.
    #[serde(rename = "LPTokenOut")]
    pub lp_token_out: Option<IssuedCurrencyAmount<'a>>,
}

impl<'a> AMMDeposit<'a> {
    fn mode_flags(&self) -> Vec<AMMDepositFlag> {
        use strum::IntoEnumIterator;
        AMMDepositFlag::iter()
            .filter(|flag| self.has_flag(flag))
            .collect()
    }
}

impl<'a> Model for AMMDeposit<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        let modes = self.mode_flags();
        if modes.len() != 1 {
            return Err(XRPLModelException::FlagsError(format!(
                "exactly one deposit mode flag is required, found {}",
                modes.len()
            )));
        }

        match modes[0] {
            AMMDepositFlag::TfLpToken if self.lp_token_out.is_none() => {
                Err(XRPLModelException::FlagRequiresField {
                    flag: AMMDepositFlag::TfLpToken.to_string(),
                    field: "lp_token_out".to_string(),
                })
            }
            AMMDepositFlag::TfSingleAsset | AMMDepositFlag::TfLimitLpToken
                if self.amount.is_none() =>
            {
                Err(XRPLModelException::FlagRequiresField {
                    flag: modes[0].to_string(),
                    field: "amount".to_string(),
                })
            }
            AMMDepositFlag::TfTwoAsset | AMMDepositFlag::TfTwoAssetIfEmpty
                if self.amount.is_none() || self.amount2.is_none() =>
            {
                Err(XRPLModelException::FlagRequiresField {
                    flag: modes[0].to_string(),
                    field: "amount and amount2".to_string(),
                })
            }
            AMMDepositFlag::TfOneAssetLpToken
                if self.amount.is_none() || self.lp_token_out.is_none() =>
            {
                Err(XRPLModelException::FlagRequiresField {
                    flag: AMMDepositFlag::TfOneAssetLpToken.to_string(),
                    field: "amount and lp_token_out".to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl<'a> Transaction<'a, AMMDepositFlag> for AMMDeposit<'a> {
    fn has_flag(&self, flag: &AMMDepositFlag) -> bool {
        self.common_fields.has_flag(flag)
    }

    fn get_transaction_type(&self) -> &TransactionType {
        self.common_fields.get_transaction_type()
    }

    fn get_common_fields(&self) -> &CommonFields<'_, AMMDepositFlag> {
        self.common_fields.get_common_fields()
    }

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, AMMDepositFlag> {
        self.common_fields.get_mut_common_fields()
    }
}

impl<'a> CommonTransactionBuilder<'a, AMMDepositFlag> for AMMDeposit<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, AMMDepositFlag> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> AMMDeposit<'a> {
    pub fn new(account: Cow<'a, str>, asset: Issue, asset2: Issue) -> Self {
        AMMDeposit {
            common_fields: CommonFields::from_account(account, TransactionType::AMMDeposit),
            asset,
            asset2,
            amount: None,
            amount2: None,
            e_price: None,
            lp_token_out: None,
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

    pub fn with_lp_token_out(mut self, lp_token_out: IssuedCurrencyAmount<'a>) -> Self {
        self.lp_token_out = Some(lp_token_out);
        self
    }

    pub fn with_flag(mut self, flag: AMMDepositFlag) -> Self {
        self.common_fields.flags.0.push(flag);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deposit() -> AMMDeposit<'static> {
        AMMDeposit::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            Issue::xrp(),
            Issue::issued(
                "USD".parse().unwrap(),
                "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".parse().unwrap(),
            ),
        )
        .with_sequence(1)
    }

    #[test]
    fn test_mode_flags_are_mutually_exclusive() {
        let none = deposit().with_amount("1000000".into());
        assert!(none.validate().is_err());

        let two = deposit()
            .with_amount("1000000".into())
            .with_flag(AMMDepositFlag::TfSingleAsset)
            .with_flag(AMMDepositFlag::TfTwoAsset);
        assert!(two.validate().is_err());

        let single = deposit()
            .with_amount("1000000".into())
            .with_flag(AMMDepositFlag::TfSingleAsset);
        assert!(single.validate().is_ok());
    }

    #[test]
    fn test_two_asset_requires_both_amounts() {
        let missing = deposit()
            .with_amount("1000000".into())
            .with_flag(AMMDepositFlag::TfTwoAsset);
        assert!(missing.validate().is_err());
    }
}
