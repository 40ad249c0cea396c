use std::borrow::Cow;

use derive_new::new;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::constants::MAX_SIGNER_ENTRIES;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};
use crate::serde_with_tag;

serde_with_tag! {
/// One member of a signer list: a potential signer and the weight its
/// signature contributes toward the quorum.
#[derive(Debug, PartialEq, Eq, Default, Clone, new)]
pub struct SignerEntry {
    pub account: String,
    pub signer_weight: u16,
}
}

/// Creates, replaces, or removes a list of signers that can be used
/// to multi-sign a transaction. A quorum of zero removes the list.
///
/// See SignerListSet:
/// `<https://xrpl.org/signerlistset.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct SignerListSet<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The target number for the signer weights that must be reached
    /// to authorize a transaction.
    pub signer_quorum: u32,
    /// The members of the new list; omitted when deleting.
    pub signer_entries: Option<Vec<SignerEntry>>,
}

impl<'a> Model for SignerListSet<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        let Some(entries) = &self.signer_entries else {
            if self.signer_quorum != 0 {
                return Err(XRPLModelException::FlagRequiresField {
                    flag: "non-zero signer_quorum".to_string(),
                    field: "signer_entries".to_string(),
                });
            }
            return Ok(());
        };

        if self.signer_quorum == 0 {
            return Err(XRPLModelException::IllegalField {
                field: "signer_entries".to_string(),
                context: "a zero quorum deletes the list".to_string(),
            });
        }
        if entries.is_empty() || entries.len() > MAX_SIGNER_ENTRIES {
            return Err(XRPLModelException::ValueTooHigh {
                field: "signer_entries".to_string(),
                max: MAX_SIGNER_ENTRIES as u32,
                found: entries.len() as u32,
            });
        }

        let mut weight_sum: u64 = 0;
        for (position, entry) in entries.iter().enumerate() {
            weight_sum += entry.signer_weight as u64;
            if entry.account == self.common_fields.account {
                return Err(XRPLModelException::AccountsMustDiffer {
                    first: "account".to_string(),
                    second: "signer_entries".to_string(),
                });
            }
            if entries[position + 1..]
                .iter()
                .any(|other| other.account == entry.account)
            {
                return Err(XRPLModelException::InvalidValueFormat {
                    field: "signer_entries".to_string(),
                    format: "unique signer accounts".to_string(),
                    found: entry.account.clone(),
                });
            }
        }

        if (self.signer_quorum as u64) > weight_sum {
            return Err(XRPLModelException::ValueTooHigh {
                field: "signer_quorum".to_string(),
                max: weight_sum as u32,
                found: self.signer_quorum,
            });
        }

        Ok(())
    }
}

impl<'a> Transaction<'a, NoFlags> for SignerListSet<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for SignerListSet<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> SignerListSet<'a> {
    pub fn new(account: Cow<'a, str>, signer_quorum: u32) -> Self {
        SignerListSet {
            common_fields: CommonFields::from_account(account, TransactionType::SignerListSet),
            signer_quorum,
            signer_entries: None,
        }
    }

    pub fn with_signer_entries(mut self, signer_entries: Vec<SignerEntry>) -> Self {
        self.signer_entries = Some(signer_entries);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<SignerEntry> {
        vec![
            SignerEntry::new("rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".to_string(), 2),
            SignerEntry::new("rLSn6Z3T8uCxbcd1oxwfGQN1Fdn5CyGujK".to_string(), 1),
        ]
    }

    #[test]
    fn test_quorum_cannot_exceed_weights() {
        let set = SignerListSet::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(), 4)
            .with_sequence(1)
            .with_signer_entries(entries());
        assert!(set.validate().is_err());

        let set = SignerListSet::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(), 3)
            .with_sequence(1)
            .with_signer_entries(entries());
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_owner_cannot_be_a_signer() {
        let set = SignerListSet::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(), 1)
            .with_sequence(1)
            .with_signer_entries(vec![SignerEntry::new(
                "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".to_string(),
                1,
            )]);
        assert!(set.validate().is_err());
    }

    #[test]
    fn test_delete_takes_no_entries() {
        let delete =
            SignerListSet::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(), 0).with_sequence(1);
        assert!(delete.validate().is_ok());

        let bad = SignerListSet::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(), 0)
            .with_sequence(1)
            .with_signer_entries(entries());
        assert!(bad.validate().is_err());
    }
}
