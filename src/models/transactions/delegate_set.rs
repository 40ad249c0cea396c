use std::borrow::Cow;

use derive_new::new;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};
use crate::serde_with_tag;

pub const MAX_PERMISSIONS: usize = 10;

serde_with_tag! {
/// One delegated permission, named by the wire code of the permitted
/// transaction type plus one.
#[derive(Debug, PartialEq, Eq, Default, Clone, new)]
pub struct Permission {
    pub permission_value: u32,
}
}

/// Delegates a set of transaction permissions to another account. An
/// empty permission list removes the delegation.
///
/// See DelegateSet:
/// `<https://xrpl.org/delegateset.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DelegateSet<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The account receiving the delegated permissions.
    pub authorize: Cow<'a, str>,
    /// The permissions being delegated.
    pub permissions: Vec<Permission>,
}

impl<'a> Model for DelegateSet<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if self.authorize == self.common_fields.account {
            return Err(XRPLModelException::AccountsMustDiffer {
                first: "account".to_string(),
                second: "authorize".to_string(),
            });
        }
        if self.permissions.len() > MAX_PERMISSIONS {
            return Err(XRPLModelException::ValueTooHigh {
                field: "permissions".to_string(),
                max: MAX_PERMISSIONS as u32,
                found: self.permissions.len() as u32,
            });
        }

        Ok(())
    }
}

impl<'a> Transaction<'a, NoFlags> for DelegateSet<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for DelegateSet<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> DelegateSet<'a> {
    pub fn new(account: Cow<'a, str>, authorize: Cow<'a, str>, permissions: Vec<Permission>) -> Self {
        DelegateSet {
            common_fields: CommonFields::from_account(account, TransactionType::DelegateSet),
            authorize,
            permissions,
        }
    }
}
