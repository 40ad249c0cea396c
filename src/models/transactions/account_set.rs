use core::str::FromStr;
use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::constants::{
    DISABLE_TICK_SIZE, MAX_DOMAIN_LENGTH, MAX_TICK_SIZE, MAX_TRANSFER_RATE, MIN_TICK_SIZE,
    MIN_TRANSFER_RATE, SPECIAL_CASE_TRANSFER_RATE,
};
use crate::models::transactions::{
    CommonFields, CommonTransactionBuilder, Transaction, TransactionType,
};
use crate::models::{Model, XRPLModelException, XRPLModelResult};

/// Transactions of the AccountSet type support additional values in
/// the Flags field. This enum represents those options.
///
/// See AccountSet flags:
/// `<https://xrpl.org/docs/references/protocol/transactions/types/accountset>`
#[derive(
    Debug, Eq, PartialEq, Clone, Serialize_repr, Deserialize_repr, Display, AsRefStr, EnumIter, Copy,
)]
#[repr(u32)]
pub enum AccountSetFlag {
    /// Require a destination tag to send transactions to this account.
    AsfRequireDest = 1,
    /// Require authorization for users to hold balances issued by
    /// this address. Can only be enabled if the address has no
    /// trust lines connected to it.
    AsfRequireAuth = 2,
    /// XRP should not be sent to this account.
    AsfDisallowXRP = 3,
    /// Disallow use of the master key pair. Can only be enabled if
    /// the account has configured another way to sign transactions,
    /// such as a Regular Key or a Signer List.
    AsfDisableMaster = 4,
    /// Track the ID of this account's most recent transaction.
    /// Required for AccountTxnID.
    AsfAccountTxnID = 5,
    /// Permanently give up the ability to freeze individual trust
    /// lines or disable Global Freeze. This flag can never be
    /// disabled after being enabled.
    AsfNoFreeze = 6,
    /// Freeze all assets issued by this account.
    AsfGlobalFreeze = 7,
    /// Enable rippling on this account's trust lines by default.
    AsfDefaultRipple = 8,
    /// Enable Deposit Authorization on this account.
    AsfDepositAuth = 9,
    /// Allow another account to mint non-fungible tokens on this
    /// account's behalf.
    AsfAuthorizedNFTokenMinter = 10,
    /// Disallow incoming Checks from other accounts.
    AsfDisallowIncomingCheck = 11,
    /// Disallow incoming Payment Channels from other accounts.
    AsfDisallowIncomingPayChan = 12,
    /// Disallow incoming trust lines from other accounts.
    AsfDisallowIncomingTrustline = 13,
    /// Disallow incoming NFToken offers from other accounts.
    AsfDisallowIncomingNFTokenOffer = 14,
    /// Allow the issuer to claw back issued balances from opted-in
    /// trust lines.
    AsfAllowTrustLineClawback = 15,
}

/// An AccountSet transaction modifies the properties of an account in
/// the ledger.
///
/// See AccountSet:
/// `<https://xrpl.org/docs/references/protocol/transactions/types/accountset>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct AccountSet<'a> {
    #[serde(flatten)]
    pub common_fields: CommonFields<'a, AccountSetFlag>,
    /// Unique identifier of a flag to disable for this account.
    pub clear_flag: Option<AccountSetFlag>,
    /// The domain that owns this account, as a string of hex
    /// representing the ASCII for the domain in lowercase.
    /// Cannot be more than 256 bytes in length.
    pub domain: Option<Cow<'a, str>>,
    /// Hash of an email address to be used for generating an avatar
    /// image. The all-zero value clears the field.
    pub email_hash: Option<Cow<'a, str>>,
    /// Public key for sending encrypted messages to this account.
    /// To set the key, it must be exactly 33 bytes. To remove the
    /// key, use an empty value.
    pub message_key: Option<Cow<'a, str>>,
    /// Sets an alternate account that is allowed to mint NFTokens on
    /// this account's behalf.
    #[serde(rename = "NFTokenMinter")]
    pub nftoken_minter: Option<Cow<'a, str>>,
    /// Flag to enable for this account.
    pub set_flag: Option<AccountSetFlag>,
    /// The fee to charge when users transfer this account's tokens,
    /// represented as billionths of a unit. Cannot be more than
    /// 2000000000 or less than 1000000000, except for the special
    /// case 0 meaning no fee.
    pub transfer_rate: Option<u32>,
    /// Tick size to use for offers involving a currency issued by
    /// this address. Valid values are 3 to 15 inclusive, or 0 to
    /// disable.
    pub tick_size: Option<u32>,
    /// An arbitrary 256-bit value. The all-zero value clears the
    /// field.
    pub wallet_locator: Option<Cow<'a, str>>,
}

impl<'a> Model for AccountSet<'a> {
    fn get_errors(&self) -> XRPLModelResult<()> {
        self.common_fields.sequence_errors()?;
        self.get_tick_size_error()?;
        self.get_transfer_rate_error()?;
        self.get_domain_error()?;
        self.get_clear_flag_error()?;
        self.get_nftoken_minter_error()?;

        Ok(())
    }
}

impl<'a> Transaction<'a, AccountSetFlag> for AccountSet<'a> {
    fn has_flag(&self, flag: &AccountSetFlag) -> bool {
        self.common_fields.has_flag(flag)
    }

    fn get_transaction_type(&self) -> &TransactionType {
        self.common_fields.get_transaction_type()
    }

    fn get_common_fields(&self) -> &CommonFields<'_, AccountSetFlag> {
        self.common_fields.get_common_fields()
    }

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, AccountSetFlag> {
        self.common_fields.get_mut_common_fields()
    }
}

impl<'a> CommonTransactionBuilder<'a, AccountSetFlag> for AccountSet<'a> {
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, AccountSetFlag> {
        &mut self.common_fields
    }

    fn into_self(self) -> Self {
        self
    }
}

impl<'a> AccountSet<'a> {
    pub fn new(account: Cow<'a, str>) -> Self {
        AccountSet {
            common_fields: CommonFields::from_account(account, TransactionType::AccountSet),
            ..Default::default()
        }
    }

    fn get_tick_size_error(&self) -> XRPLModelResult<()> {
        if let Some(tick_size) = self.tick_size {
            if tick_size > MAX_TICK_SIZE {
                Err(XRPLModelException::ValueTooHigh {
                    field: "tick_size".into(),
                    max: MAX_TICK_SIZE,
                    found: tick_size,
                })
            } else if tick_size < MIN_TICK_SIZE && tick_size != DISABLE_TICK_SIZE {
                Err(XRPLModelException::ValueTooLow {
                    field: "tick_size".into(),
                    min: MIN_TICK_SIZE,
                    found: tick_size,
                })
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }

    fn get_transfer_rate_error(&self) -> XRPLModelResult<()> {
        if let Some(transfer_rate) = self.transfer_rate {
            if transfer_rate > MAX_TRANSFER_RATE {
                Err(XRPLModelException::ValueTooHigh {
                    field: "transfer_rate".into(),
                    max: MAX_TRANSFER_RATE,
                    found: transfer_rate,
                })
            } else if transfer_rate < MIN_TRANSFER_RATE
                && transfer_rate != SPECIAL_CASE_TRANSFER_RATE
            {
                Err(XRPLModelException::ValueTooLow {
                    field: "transfer_rate".into(),
                    min: MIN_TRANSFER_RATE,
                    found: transfer_rate,
                })
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }

    fn get_domain_error(&self) -> XRPLModelResult<()> {
        if let Some(domain) = &self.domain {
            if domain.to_lowercase().as_str() != domain {
                Err(XRPLModelException::InvalidValueFormat {
                    field: "domain".into(),
                    format: "lowercase".into(),
                    found: domain.to_string(),
                })
            } else if domain.len() > MAX_DOMAIN_LENGTH {
                Err(XRPLModelException::ValueTooLong {
                    field: "domain".into(),
                    max: MAX_DOMAIN_LENGTH,
                    found: domain.len(),
                })
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }

    fn get_clear_flag_error(&self) -> XRPLModelResult<()> {
        if self.clear_flag.is_some() && self.clear_flag == self.set_flag {
            Err(XRPLModelException::SetAndUnsetSameFlag {
                found: self.clear_flag.unwrap().to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn get_nftoken_minter_error(&self) -> XRPLModelResult<()> {
        if self.nftoken_minter.is_some() {
            if self.set_flag != Some(AccountSetFlag::AsfAuthorizedNFTokenMinter) {
                if self.clear_flag == Some(AccountSetFlag::AsfAuthorizedNFTokenMinter) {
                    Err(XRPLModelException::SetFieldWhenUnsetRequiredFlag {
                        field: "nftoken_minter".into(),
                        flag: AccountSetFlag::AsfAuthorizedNFTokenMinter.to_string(),
                    })
                } else {
                    Err(XRPLModelException::FieldRequiresFlag {
                        field: "set_flag".into(),
                        flag: AccountSetFlag::AsfAuthorizedNFTokenMinter.to_string(),
                    })
                }
            } else {
                Ok(())
            }
        } else if self.set_flag == Some(AccountSetFlag::AsfAuthorizedNFTokenMinter) {
            Err(XRPLModelException::FlagRequiresField {
                flag: AccountSetFlag::AsfAuthorizedNFTokenMinter.to_string(),
                field: "nftoken_minter".into(),
            })
        } else {
            Ok(())
        }
    }

    pub fn with_clear_flag(mut self, flag: AccountSetFlag) -> Self {
        self.clear_flag = Some(flag);
        self
    }

    pub fn with_domain(mut self, domain: Cow<'a, str>) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn with_email_hash(mut self, email_hash: Cow<'a, str>) -> Self {
        self.email_hash = Some(email_hash);
        self
    }

    pub fn with_message_key(mut self, message_key: Cow<'a, str>) -> Self {
        self.message_key = Some(message_key);
        self
    }

    pub fn with_nftoken_minter(mut self, nftoken_minter: Cow<'a, str>) -> Self {
        self.nftoken_minter = Some(nftoken_minter);
        self
    }

    pub fn with_set_flag(mut self, flag: AccountSetFlag) -> Self {
        self.set_flag = Some(flag);
        self
    }

    pub fn with_transfer_rate(mut self, transfer_rate: u32) -> Self {
        self.transfer_rate = Some(transfer_rate);
        self
    }

    pub fn with_tick_size(mut self, tick_size: u32) -> Self {
        self.tick_size = Some(tick_size);
        self
    }

    pub fn with_wallet_locator(mut self, wallet_locator: Cow<'a, str>) -> Self {
        self.wallet_locator = Some(wallet_locator);
        self
    }
}

impl FromStr for AccountSetFlag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asfRequireDest" => Ok(AccountSetFlag::AsfRequireDest),
            "asfRequireAuth" => Ok(AccountSetFlag::AsfRequireAuth),
            "asfDisallowXRP" => Ok(AccountSetFlag::AsfDisallowXRP),
            "asfDisableMaster" => Ok(AccountSetFlag::AsfDisableMaster),
            "asfAccountTxnID" => Ok(AccountSetFlag::AsfAccountTxnID),
            "asfNoFreeze" => Ok(AccountSetFlag::AsfNoFreeze),
            "asfGlobalFreeze" => Ok(AccountSetFlag::AsfGlobalFreeze),
            "asfDefaultRipple" => Ok(AccountSetFlag::AsfDefaultRipple),
            "asfDepositAuth" => Ok(AccountSetFlag::AsfDepositAuth),
            "asfAuthorizedNFTokenMinter" => Ok(AccountSetFlag::AsfAuthorizedNFTokenMinter),
            "asfDisallowIncomingCheck" => Ok(AccountSetFlag::AsfDisallowIncomingCheck),
            "asfDisallowIncomingPayChan" => Ok(AccountSetFlag::AsfDisallowIncomingPayChan),
            "asfDisallowIncomingTrustline" => Ok(AccountSetFlag::AsfDisallowIncomingTrustline),
            "asfDisallowIncomingNFTokenOffer" => {
                Ok(AccountSetFlag::AsfDisallowIncomingNFTokenOffer)
            }
            "asfAllowTrustLineClawback" => Ok(AccountSetFlag::AsfAllowTrustLineClawback),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AccountSet<'static> {
        AccountSet::new("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".into()).with_sequence(1)
    }

    #[test]
    fn test_tick_size_error() {
        let mut account_set = base();
        account_set.tick_size = Some(2);

        assert_eq!(
            account_set.validate().unwrap_err().to_string().as_str(),
            "The value of the field `\"tick_size\"` is defined below its minimum (min 3, found 2)"
        );

        account_set.tick_size = Some(16);

        assert_eq!(
            account_set.validate().unwrap_err().to_string().as_str(),
            "The value of the field `\"tick_size\"` is defined above its maximum (max 15, found 16)"
        );
    }

    #[test]
    fn test_transfer_rate_error() {
        let mut account_set = base();
        account_set.transfer_rate = Some(999999999);

        assert_eq!(
            account_set.validate().unwrap_err().to_string().as_str(),
            "The value of the field `\"transfer_rate\"` is defined below its minimum (min 1000000000, found 999999999)"
        );

        account_set.transfer_rate = Some(2000000001);

        assert_eq!(
            account_set.validate().unwrap_err().to_string().as_str(),
            "The value of the field `\"transfer_rate\"` is defined above its maximum (max 2000000000, found 2000000001)"
        );
    }

    #[test]
    fn test_domain_error() {
        let mut account_set = base();
        account_set.domain = Some("https://Example.com/".into());

        assert_eq!(
            account_set.validate().unwrap_err().to_string().as_str(),
            "The value of the field `\"domain\"` does not have the correct format (expected \"lowercase\", found \"https://Example.com/\")"
        );
    }

    #[test]
    fn test_flag_error() {
        let account_set = base()
            .with_set_flag(AccountSetFlag::AsfDisallowXRP)
            .with_clear_flag(AccountSetFlag::AsfDisallowXRP);

        assert_eq!(
            account_set.validate().unwrap_err().to_string().as_str(),
            "A flag cannot be set and unset at the same time (found AsfDisallowXRP)"
        );
    }

    #[test]
    fn test_asf_authorized_nftoken_minter_error() {
        let mut account_set = base();
        account_set.nftoken_minter = Some("rLSn6Z3T8uCxbcd1oxwfGQN1Fdn5CyGujK".into());

        assert_eq!(
            account_set.validate().unwrap_err().to_string().as_str(),
            "For the field `\"set_flag\"` to be defined it is required to set the flag `AsfAuthorizedNFTokenMinter`"
        );

        account_set.nftoken_minter = None;
        account_set.set_flag = Some(AccountSetFlag::AsfAuthorizedNFTokenMinter);

        assert_eq!(
            account_set.validate().unwrap_err().to_string().as_str(),
            "For the flag `AsfAuthorizedNFTokenMinter` to be set it is required to define the field `\"nftoken_minter\"`"
        );
    }

    #[test]
    fn test_serde() {
        let account_set = base()
            .with_domain("6578616d706c652e636f6d".into())
            .with_set_flag(AccountSetFlag::AsfAccountTxnID)
            .with_fee("12".into());

        let value = serde_json::to_value(&account_set).unwrap();
        assert_eq!(value["TransactionType"], "AccountSet");
        assert_eq!(value["SetFlag"], 5);
        assert_eq!(value["Domain"], "6578616d706c652e636f6d");

        let parsed: AccountSet = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, account_set);
    }
}
