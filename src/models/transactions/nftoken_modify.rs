use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::transactions::nftoken_mint::MAX_URI_LENGTH;
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, NoFlags, XRPLModelException, XRPLModelResult};

/// Updates the URI of a mutable non-fungible token.
///
/// See NFTokenModify:
/// `<https://xrpl.org/nftokenmodify.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct NFTokenModify<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NoFlags>,
    /// The token being modified.
    #[serde(rename = "NFTokenID")]
    pub nftoken_id: Cow<'a, str>,
    /// The token's owner, when modifying on the issuer's authority.
    pub owner: Option<Cow<'a, str>>,
    /// The new URI; empty clears the field.
    #[serde(rename = "URI")]
    pub uri: Option<Cow<'a, str>>,
}

impl<'a> Model for NFTokenModify<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if let Some(uri) = &self.uri {
            if uri.len() > MAX_URI_LENGTH * 2 {
                return Err(XRPLModelException::ValueTooLong {
                    field: "uri".to_string(),
                    max: MAX_URI_LENGTH * 2,
                    found: uri.len(),
                });
            }
        }
        Ok(())
    }
}

impl<'a> Transaction<'a, NoFlags> for NFTokenModify<'a> {
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

impl<'a> CommonTransactionBuilder<'a, NoFlags> for NFTokenModify<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NoFlags> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> NFTokenModify<'a> {
    pub fn new(account: Cow<'a, str>, nftoken_id: Cow<'a, str>) -> Self {
        NFTokenModify {
            common_fields: CommonFields::from_account(account, TransactionType::NFTokenModify),
            nftoken_id,
            owner: None,
            uri: None,
        }
    }

    pub fn with_owner(mut self, owner: Cow<'a, str>) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_uri(mut self, uri: Cow<'a, str>) -> Self {
        self.uri = Some(uri);
        self
    }
}
