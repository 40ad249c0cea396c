use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, XRPLModelException, XRPLModelResult};

/// Largest transfer fee a token may carry, in units of 1/100,000.
pub const MAX_NFTOKEN_TRANSFER_FEE: u16 = 50_000;
/// Longest URI, in bytes.
pub const MAX_URI_LENGTH: usize = 256;

/// Transactions of the NFTokenMint type support additional values in
/// the Flags field.
///
/// See NFTokenMint flags:
/// `<https://xrpl.org/nftokenmint.html#nftokenmint-flags>`
#[derive(
    Debug, Eq, PartialEq, Clone, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter, Copy,
)]
#[repr(u32)]
pub enum NFTokenMintFlag {
    /// The issuer (or an entity it authorizes) can destroy the token.
    TfBurnable = 0x00000001,
    /// The token can only be offered or sold for XRP.
    TfOnlyXRP = 0x00000002,
    /// The token can be transferred to others.
    TfTransferable = 0x00000008,
    /// The token's URI can be updated later.
    TfMutable = 0x00000010,
}

/// Creates a non-fungible token.
///
/// See NFTokenMint:
/// `<https://xrpl.org/nftokenmint.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct NFTokenMint<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, NFTokenMintFlag>,
    /// An arbitrary taxon, or shared identifier, for a series of
    /// related tokens.
    #[serde(rename = "NFTokenTaxon")]
    pub nftoken_taxon: u32,
    /// The issuer of the token, if minted on another account's
    /// behalf.
    pub issuer: Option<Cow<'a, str>>,
    /// The fee charged by the issuer on secondary sales, in units of
    /// 1/100,000.
    pub transfer_fee: Option<u16>,
    /// Up to 256 bytes of arbitrary data, as hex.
    #[serde(rename = "URI")]
    pub uri: Option<Cow<'a, str>>,
}

impl<'a> Model for NFTokenMint<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;

        if let Some(issuer) = &self.issuer {
            if *issuer == self.common_fields.account {
                return Err(XRPLModelException::AccountsMustDiffer {
                    first: "account".to_string(),
                    second: "issuer".to_string(),
                });
            }
        }
        if let Some(transfer_fee) = self.transfer_fee {
            if transfer_fee > MAX_NFTOKEN_TRANSFER_FEE {
                return Err(XRPLModelException::ValueTooHigh {
                    field: "transfer_fee".to_string(),
                    max: MAX_NFTOKEN_TRANSFER_FEE as u32,
                    found: transfer_fee as u32,
                });
            }
            if !self.has_flag(&NFTokenMintFlag::TfTransferable) {
                return Err(XRPLModelException::FieldRequiresFlag {
                    field: "transfer_fee".to_string(),
                    flag: NFTokenMintFlag::TfTransferable.to_string(),
                });
            }
        }
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

impl<'a> Transaction<'a, NFTokenMintFlag> for NFTokenMint<'a> {
    fn has_flag(&self, flag: &NFTokenMintFlag) -> bool {
        self.common_fields.has_flag(flag)
    }

    fn get_transaction_type(&self) -> &TransactionType {
        self.common_fields.get_transaction_type()
    }

    fn get_common_fields(&self) -> &CommonFields<'_, NFTokenMintFlag> {
        self.common_fields.get_common_fields()
    }

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NFTokenMintFlag> {
        self.common_fields.get_mut_common_fields()
    }
}

impl<'a> CommonTransactionBuilder<'a, NFTokenMintFlag> for NFTokenMint<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, NFTokenMintFlag> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> NFTokenMint<'a> {
    pub fn new(account: Cow<'a, str>, nftoken_taxon: u32) -> Self {
        NFTokenMint {
            common_fields: CommonFields::from_account(account, TransactionType::NFTokenMint),
            nftoken_taxon,
            issuer: None,
            transfer_fee: None,
            uri: None,
        }
    }

    pub fn with_issuer(mut self, issuer: Cow<'a, str>) -> Self {
        self.issuer = Some(issuer);
        self
    }

    pub fn with_transfer_fee(mut self, transfer_fee: u16) -> Self {
        self.transfer_fee = Some(transfer_fee);
        self
    }

    pub fn with_uri(mut self, uri: Cow<'a, str>) -> Self {
        self.uri = Some(uri);
        self
    }

    pub fn with_flag(mut self, flag: NFTokenMintFlag) -> Self {
        self.common_fields.flags.0.push(flag);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_fee_requires_transferable() {
        let mint = NFTokenMint::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into(), 0)
            .with_sequence(1)
            .with_transfer_fee(100);
        assert!(mint.validate().is_err());

        let mint = mint.with_flag(NFTokenMintFlag::TfTransferable);
        assert!(mint.validate().is_ok());
    }
}
