use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Grants or revokes preauthorization of a sender to deliver payments
/// to the account while Deposit Authorization is enabled.
///
/// See DepositPreauth:
/// `<https://xrpl.org/depositpreauth.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DepositPreauth<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The account to preauthorize.
    pub authorize: Option<Cow<'a, str>>,
    /// The account whose preauthorization to revoke.
    pub unauthorize: Option<Cow<'a, str>>,
}

impl<'a> Model for DepositPreauth<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        match (&self.authorize, &self.unauthorize) {
            (Some(_), Some(_)) | (None, None) => Err(XRPLModelException::ExactlyOneOf {
                first: "authorize".to_string(),
                second: "unauthorize".to_string(),
            }),
            (Some(target), None) | (None, Some(target)) => {
                if *target == self.common_fields.account {
                    Err(XRPLModelException::AccountsMustDiffer {
                        first: "account".to_string(),
                        second: "authorize".to_string(),
                    })
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl<'a> Transaction<'a, NoFlags> for DepositPreauth<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for DepositPreauth<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> DepositPreauth<'a> {
    pub fn new(account: Cow<'a, str>) -> Self {
        DepositPreauth {
            common_fields: CommonFields::from_account(account, TransactionType::DepositPreauth),
            authorize: None,
            unauthorize: None,
        }
    }

    pub fn with_authorize(mut self, authorize: Cow<'a, str>) -> Self {
        self.authorize = Some(authorize);
        self
    }

    pub fn with_unauthorize(mut self, unauthorize: Cow<'a, str>) -> Self {
        self.unauthorize = Some(unauthorize);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_of_authorize_unauthorize() {
        let neither =
            DepositPreauth::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into()).with_sequence(1);
        assert!(neither.validate().is_err());

        let both = DepositPreauth::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into())
            .with_sequence(1)
            .with_authorize("rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into())
            .with_unauthorize("rLSn6Z3T8uCxbcd1oxwfGQN1Fdn5CyGujK".into());
        assert!(both.validate().is_err());

        let one = DepositPreauth::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into())
            .with_sequence(1)
            .with_authorize("rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".into());
        assert!(one.validate().is_ok());
    }
}
