use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::core::binarycodec::types::Issue;
use crate::models::amount::IssuedCurrencyAmount;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, XRPLModelException, XRPLModelResult};

/// See AMMClawback flags.
#[derive(
    Debug, Eq, PartialEq, Clone, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter, Copy,
)]
#[repr(u32)]
pub enum AMMClawbackFlag {
    /// Claw back the paired asset as well.
    TfClawTwoAssets = 0x00000001,
}

/// Claws back tokens a holder has deposited into an AMM pool.
///
/// See AMMClawback:
/// `<https://xrpl.org/ammclawback.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AMMClawback<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, AMMClawbackFlag>,
    /// The holder whose AMM position is being clawed back.
    pub holder: Cow<'a, str>,
    /// The asset issued by the sender, identifying the AMM.
    pub asset: Issue,
    /// The other of the AMM's two assets.
    pub asset2: Issue,
    /// The maximum amount to claw back; omitted claws back the
    /// holder's entire position in the asset.
    pub amount: Option<IssuedCurrencyAmount<'a>>,
}

impl<'a> Model for AMMClawback<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.holder == self.common_fields.account {
            return Err(XRPLModelException::AccountsMustDiffer {
                first: "account".to_string(),
                second: "holder".to_string(),
            });
        }
        match self.asset.issuer {
            Some(issuer) if issuer.to_address() == self.common_fields.account => Ok(()),
            _ => Err(XRPLModelException::InvalidValueFormat {
                field: "asset".to_string(),
                format: "an asset issued by the sender".to_string(),
                found: format!("{}", self.asset),
            }),
        }
    }
}

impl<'a> Transaction<'a, AMMClawbackFlag> for AMMClawback<'a> {
    fn has_flag(&self, flag: &AMMClawbackFlag) -> bool {
        self.common_fields.has_flag(flag)
    }

    fn get_transaction_type(&self) -> &TransactionType {
        self.common_fields.get_transaction_type()
    }

    fn get_common_fields(&self) -> &CommonFields<'_, AMMClawbackFlag> {
        self.common_fields.get_common_fields()
    }

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, AMMClawbackFlag> {
        self.common_fields.get_mut_common_fields()
    }
}

impl<'a> CommonTransactionBuilder<'a, AMMClawbackFlag> for AMMClawback<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, AMMClawbackFlag> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> AMMClawback<'a> {
    pub fn new(account: Cow<'a, str>, holder: Cow<'a, str>, asset: Issue, asset2: Issue) -> Self {
        AMMClawback {
            common_fields: CommonFields::from_account(account, TransactionType::AMMClawback),
            holder,
            asset,
            asset2,
            amount: None,
        }
    }

    pub fn with_amount(mut self, amount: IssuedCurrencyAmount<'a>) -> Self {
        self.amount = Some(amount);
        self
    }
}
