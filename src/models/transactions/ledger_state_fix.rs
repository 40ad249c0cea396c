use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Fix type 1 repairs a broken link in an account's NFToken page
/// chain and requires Owner.
pub const LEDGER_FIX_NFTOKEN_PAGE_LINK: u16 = 1;

/// Repairs a known class of corrupted ledger state.
///
/// See LedgerStateFix:
/// `<https://xrpl.org/ledgerstatefix.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct LedgerStateFix<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The kind of repair to perform.
    pub ledger_fix_type: u16,
    /// The account whose state the fix concerns.
    pub owner: Option<Cow<'a, str>>,
}

impl<'a> Model for LedgerStateFix<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.ledger_fix_type == LEDGER_FIX_NFTOKEN_PAGE_LINK && self.owner.is_none() {
            return Err(XRPLModelException::MissingField {
                field: "owner".to_string(),
            });
        }
        Ok(())
    }
}

impl<'a> Transaction<'a, NoFlags> for LedgerStateFix<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for LedgerStateFix<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> LedgerStateFix<'a> {
    pub fn new(account: Cow<'a, str>, ledger_fix_type: u16) -> Self {
        LedgerStateFix {
            common_fields: CommonFields::from_account(account, TransactionType::LedgerStateFix),
            ledger_fix_type,
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: Cow<'a, str>) -> Self {
        self.owner = Some(owner);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nftoken_page_link_requires_owner() {
        let fix = LedgerStateFix::new(
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(),
            LEDGER_FIX_NFTOKEN_PAGE_LINK,
        )
        .with_sequence(1);
        assert!(fix.validate().is_err());

        let fix = fix.with_owner("rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into());
        assert!(fix.validate().is_ok());
    }
}
