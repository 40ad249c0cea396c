//! Typed ledger entries (SLEs) and their flag tables.
//!
//! Every entry serializes through the binary codec for storage in the
//! state tree; the JSON field names here are exactly the catalogue's.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use serde_with::skip_serializing_none;
use strum_macros::{AsRefStr, Display};

use crate::core::binarycodec::types::{AccountId, Hash128, Hash256, Issue};
use crate::models::amount::{Amount, IssuedCurrencyAmount};

/// AccountRoot flags.
pub const LSF_PASSWORD_SPENT: u32 = 0x00010000;
pub const LSF_REQUIRE_DEST_TAG: u32 = 0x00020000;
pub const LSF_REQUIRE_AUTH: u32 = 0x00040000;
pub const LSF_DISALLOW_XRP: u32 = 0x00080000;
pub const LSF_DISABLE_MASTER: u32 = 0x00100000;
pub const LSF_NO_FREEZE: u32 = 0x00200000;
pub const LSF_GLOBAL_FREEZE: u32 = 0x00400000;
pub const LSF_DEFAULT_RIPPLE: u32 = 0x00800000;
pub const LSF_DEPOSIT_AUTH: u32 = 0x01000000;
pub const LSF_AMM: u32 = 0x02000000;
pub const LSF_DISALLOW_INCOMING_NFTOKEN_OFFER: u32 = 0x04000000;
pub const LSF_DISALLOW_INCOMING_CHECK: u32 = 0x08000000;
pub const LSF_DISALLOW_INCOMING_PAYCHAN: u32 = 0x10000000;
pub const LSF_DISALLOW_INCOMING_TRUSTLINE: u32 = 0x20000000;
pub const LSF_ALLOW_TRUSTLINE_CLAWBACK: u32 = 0x80000000;

/// RippleState flags.
pub const LSF_LOW_RESERVE: u32 = 0x00010000;
pub const LSF_HIGH_RESERVE: u32 = 0x00020000;
pub const LSF_LOW_AUTH: u32 = 0x00040000;
pub const LSF_HIGH_AUTH: u32 = 0x00080000;
pub const LSF_LOW_NO_RIPPLE: u32 = 0x00100000;
pub const LSF_HIGH_NO_RIPPLE: u32 = 0x00200000;
pub const LSF_LOW_FREEZE: u32 = 0x00400000;
pub const LSF_HIGH_FREEZE: u32 = 0x00800000;

/// Offer flags.
pub const LSF_PASSIVE: u32 = 0x00010000;
pub const LSF_SELL: u32 = 0x00020000;

/// NFTokenOffer flags.
pub const LSF_SELL_NFTOKEN: u32 = 0x00000001;

/// Serializes drops balances as the decimal strings the wire format
/// expects.
pub mod drops_string {
    use super::*;

    pub fn serialize<S: Serializer>(drops: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&drops.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Serializes directory hints as the 16-digit hex strings the wire
/// format expects for UInt64 fields.
pub mod uint64_hex {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:016X}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let value = String::deserialize(deserializer)?;
        u64::from_str_radix(&value, 16).map_err(serde::de::Error::custom)
    }
}

/// The type discriminant each entry carries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr,
)]
pub enum LedgerEntryType {
    AccountRoot,
    Amendments,
    #[serde(rename = "AMM")]
    #[strum(serialize = "AMM")]
    Amm,
    Check,
    Delegate,
    DepositPreauth,
    DirectoryNode,
    Escrow,
    FeeSettings,
    LedgerHashes,
    NFTokenOffer,
    NFTokenPage,
    Offer,
    PayChannel,
    RippleState,
    SignerList,
    Ticket,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountRoot {
    pub ledger_entry_type: LedgerEntryType,
    pub account: AccountId,
    #[serde(with = "drops_string")]
    pub balance: i64,
    pub sequence: u32,
    pub owner_count: u32,
    pub flags: u32,
    pub regular_key: Option<AccountId>,
    pub domain: Option<String>,
    pub email_hash: Option<Hash128>,
    pub message_key: Option<String>,
    #[serde(rename = "NFTokenMinter")]
    pub nftoken_minter: Option<AccountId>,
    pub transfer_rate: Option<u32>,
    pub tick_size: Option<u8>,
    #[serde(rename = "AccountTxnID")]
    pub account_txn_id: Option<Hash256>,
    pub wallet_locator: Option<Hash256>,
    pub ticket_count: Option<u32>,
    #[serde(rename = "MintedNFTokens")]
    pub minted_nftokens: Option<u32>,
    #[serde(rename = "BurnedNFTokens")]
    pub burned_nftokens: Option<u32>,
    #[serde(rename = "FirstNFTokenSequence")]
    pub first_nftoken_sequence: Option<u32>,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

impl AccountRoot {
    pub fn new(account: AccountId, balance: i64, sequence: u32) -> Self {
        AccountRoot {
            ledger_entry_type: LedgerEntryType::AccountRoot,
            account,
            balance,
            sequence,
            owner_count: 0,
            flags: 0,
            regular_key: None,
            domain: None,
            email_hash: None,
            message_key: None,
            nftoken_minter: None,
            transfer_rate: None,
            tick_size: None,
            account_txn_id: None,
            wallet_locator: None,
            ticket_count: None,
            minted_nftokens: None,
            burned_nftokens: None,
            first_nftoken_sequence: None,
            previous_txn_id: None,
            previous_txn_lgr_seq: None,
        }
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RippleState {
    pub ledger_entry_type: LedgerEntryType,
    pub flags: u32,
    /// Positive when the low account holds the high account's issue.
    pub balance: IssuedCurrencyAmount<'static>,
    pub low_limit: IssuedCurrencyAmount<'static>,
    pub high_limit: IssuedCurrencyAmount<'static>,
    pub low_quality_in: Option<u32>,
    pub low_quality_out: Option<u32>,
    pub high_quality_in: Option<u32>,
    pub high_quality_out: Option<u32>,
    #[serde(with = "uint64_hex")]
    #[serde(default)]
    pub low_node: u64,
    #[serde(with = "uint64_hex")]
    #[serde(default)]
    pub high_node: u64,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

impl RippleState {
    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Offer {
    pub ledger_entry_type: LedgerEntryType,
    pub flags: u32,
    pub account: AccountId,
    pub sequence: u32,
    pub taker_pays: Amount<'static>,
    pub taker_gets: Amount<'static>,
    pub expiration: Option<u32>,
    #[serde(with = "uint64_hex")]
    #[serde(default)]
    pub owner_node: u64,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Check {
    pub ledger_entry_type: LedgerEntryType,
    pub flags: u32,
    pub account: AccountId,
    pub destination: AccountId,
    pub send_max: Amount<'static>,
    pub sequence: u32,
    pub source_tag: Option<u32>,
    pub destination_tag: Option<u32>,
    pub expiration: Option<u32>,
    #[serde(rename = "InvoiceID")]
    pub invoice_id: Option<Hash256>,
    #[serde(with = "uint64_hex")]
    #[serde(default)]
    pub owner_node: u64,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignerEntry {
    pub account: AccountId,
    pub signer_weight: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignerEntryWrapper {
    pub signer_entry: SignerEntry,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignerList {
    pub ledger_entry_type: LedgerEntryType,
    pub flags: u32,
    #[serde(rename = "SignerListID")]
    pub signer_list_id: u32,
    pub signer_quorum: u32,
    pub signer_entries: Vec<SignerEntryWrapper>,
    #[serde(with = "uint64_hex")]
    #[serde(default)]
    pub owner_node: u64,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ticket {
    pub ledger_entry_type: LedgerEntryType,
    pub flags: u32,
    pub account: AccountId,
    pub ticket_sequence: u32,
    #[serde(with = "uint64_hex")]
    #[serde(default)]
    pub owner_node: u64,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepositPreauthObj {
    pub ledger_entry_type: LedgerEntryType,
    pub flags: u32,
    pub account: AccountId,
    pub authorize: AccountId,
    #[serde(with = "uint64_hex")]
    #[serde(default)]
    pub owner_node: u64,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Escrow {
    pub ledger_entry_type: LedgerEntryType,
    pub flags: u32,
    pub account: AccountId,
    pub destination: AccountId,
    #[serde(with = "drops_string")]
    pub amount: i64,
    pub condition: Option<String>,
    pub cancel_after: Option<u32>,
    pub finish_after: Option<u32>,
    pub source_tag: Option<u32>,
    pub destination_tag: Option<u32>,
    #[serde(with = "uint64_hex")]
    #[serde(default)]
    pub owner_node: u64,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PayChannel {
    pub ledger_entry_type: LedgerEntryType,
    pub flags: u32,
    pub account: AccountId,
    pub destination: AccountId,
    #[serde(with = "drops_string")]
    pub amount: i64,
    /// Drops already paid out of the channel.
    #[serde(with = "drops_string")]
    pub balance: i64,
    pub public_key: String,
    pub settle_delay: u32,
    pub expiration: Option<u32>,
    pub cancel_after: Option<u32>,
    pub source_tag: Option<u32>,
    pub destination_tag: Option<u32>,
    #[serde(with = "uint64_hex")]
    #[serde(default)]
    pub owner_node: u64,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoteEntry {
    pub account: AccountId,
    pub trading_fee: u16,
    pub vote_weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoteEntryWrapper {
    pub vote_entry: VoteEntry,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuctionSlot {
    pub account: AccountId,
    pub discounted_fee: Option<u16>,
    pub price: IssuedCurrencyAmount<'static>,
    pub expiration: u32,
    pub auth_accounts: Option<Vec<AuthAccountWrapper>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthAccountEntry {
    pub account: AccountId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthAccountWrapper {
    pub auth_account: AuthAccountEntry,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Amm {
    pub ledger_entry_type: LedgerEntryType,
    pub flags: u32,
    /// The pseudo-account holding the pool reserves.
    pub account: AccountId,
    pub asset: Issue,
    pub asset2: Issue,
    #[serde(rename = "LPTokenBalance")]
    pub lp_token_balance: IssuedCurrencyAmount<'static>,
    pub trading_fee: u16,
    pub vote_slots: Option<Vec<VoteEntryWrapper>>,
    pub auction_slot: Option<AuctionSlot>,
    #[serde(with = "uint64_hex")]
    #[serde(default)]
    pub owner_node: u64,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirectoryNode {
    pub ledger_entry_type: LedgerEntryType,
    pub flags: u32,
    pub owner: Option<AccountId>,
    pub root_index: Hash256,
    pub indexes: Vec<Hash256>,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NfToken {
    #[serde(rename = "NFTokenID")]
    pub nftoken_id: Hash256,
    #[serde(rename = "URI")]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NfTokenWrapper {
    #[serde(rename = "NFToken")]
    pub nftoken: NfToken,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NfTokenPage {
    pub ledger_entry_type: LedgerEntryType,
    pub flags: u32,
    #[serde(rename = "NFTokens")]
    pub nftokens: Vec<NfTokenWrapper>,
    pub previous_page_min: Option<Hash256>,
    pub next_page_min: Option<Hash256>,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NfTokenOffer {
    pub ledger_entry_type: LedgerEntryType,
    pub flags: u32,
    pub owner: AccountId,
    #[serde(rename = "NFTokenID")]
    pub nftoken_id: Hash256,
    pub amount: Amount<'static>,
    pub destination: Option<AccountId>,
    pub expiration: Option<u32>,
    #[serde(with = "uint64_hex")]
    #[serde(default)]
    pub owner_node: u64,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PermissionEntry {
    pub permission_value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PermissionWrapper {
    pub permission: PermissionEntry,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Delegate {
    pub ledger_entry_type: LedgerEntryType,
    pub flags: u32,
    pub account: AccountId,
    pub authorize: AccountId,
    pub permissions: Vec<PermissionWrapper>,
    #[serde(with = "uint64_hex")]
    #[serde(default)]
    pub owner_node: u64,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeeSettings {
    pub ledger_entry_type: LedgerEntryType,
    pub flags: u32,
    #[serde(with = "uint64_hex")]
    pub base_fee: u64,
    pub reserve_base: u32,
    pub reserve_increment: u32,
    #[serde(rename = "PreviousTxnID")]
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
}

/// One typed record keyed by a 256-bit index.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEntry {
    AccountRoot(AccountRoot),
    RippleState(RippleState),
    Offer(Offer),
    Check(Check),
    SignerList(SignerList),
    Ticket(Ticket),
    DepositPreauth(DepositPreauthObj),
    Escrow(Escrow),
    PayChannel(PayChannel),
    Amm(Amm),
    DirectoryNode(DirectoryNode),
    NfTokenPage(NfTokenPage),
    NfTokenOffer(NfTokenOffer),
    Delegate(Delegate),
    FeeSettings(FeeSettings),
}

impl LedgerEntry {
    pub fn entry_type(&self) -> LedgerEntryType {
        match self {
            LedgerEntry::AccountRoot(_) => LedgerEntryType::AccountRoot,
            LedgerEntry::RippleState(_) => LedgerEntryType::RippleState,
            LedgerEntry::Offer(_) => LedgerEntryType::Offer,
            LedgerEntry::Check(_) => LedgerEntryType::Check,
            LedgerEntry::SignerList(_) => LedgerEntryType::SignerList,
            LedgerEntry::Ticket(_) => LedgerEntryType::Ticket,
            LedgerEntry::DepositPreauth(_) => LedgerEntryType::DepositPreauth,
            LedgerEntry::Escrow(_) => LedgerEntryType::Escrow,
            LedgerEntry::PayChannel(_) => LedgerEntryType::PayChannel,
            LedgerEntry::Amm(_) => LedgerEntryType::Amm,
            LedgerEntry::DirectoryNode(_) => LedgerEntryType::DirectoryNode,
            LedgerEntry::NfTokenPage(_) => LedgerEntryType::NFTokenPage,
            LedgerEntry::NfTokenOffer(_) => LedgerEntryType::NFTokenOffer,
            LedgerEntry::Delegate(_) => LedgerEntryType::Delegate,
            LedgerEntry::FeeSettings(_) => LedgerEntryType::FeeSettings,
        }
    }

    pub fn to_value(&self) -> Value {
        let result = match self {
            LedgerEntry::AccountRoot(entry) => serde_json::to_value(entry),
            LedgerEntry::RippleState(entry) => serde_json::to_value(entry),
            LedgerEntry::Offer(entry) => serde_json::to_value(entry),
            LedgerEntry::Check(entry) => serde_json::to_value(entry),
            LedgerEntry::SignerList(entry) => serde_json::to_value(entry),
            LedgerEntry::Ticket(entry) => serde_json::to_value(entry),
            LedgerEntry::DepositPreauth(entry) => serde_json::to_value(entry),
            LedgerEntry::Escrow(entry) => serde_json::to_value(entry),
            LedgerEntry::PayChannel(entry) => serde_json::to_value(entry),
            LedgerEntry::Amm(entry) => serde_json::to_value(entry),
            LedgerEntry::DirectoryNode(entry) => serde_json::to_value(entry),
            LedgerEntry::NfTokenPage(entry) => serde_json::to_value(entry),
            LedgerEntry::NfTokenOffer(entry) => serde_json::to_value(entry),
            LedgerEntry::Delegate(entry) => serde_json::to_value(entry),
            LedgerEntry::FeeSettings(entry) => serde_json::to_value(entry),
        };
        result.expect("ledger entries always serialize")
    }

    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        let entry_type: LedgerEntryType =
            serde_json::from_value(value["LedgerEntryType"].clone())?;

        Ok(match entry_type {
            LedgerEntryType::AccountRoot => {
                LedgerEntry::AccountRoot(serde_json::from_value(value.clone())?)
            }
            LedgerEntryType::RippleState => {
                LedgerEntry::RippleState(serde_json::from_value(value.clone())?)
            }
            LedgerEntryType::Offer => LedgerEntry::Offer(serde_json::from_value(value.clone())?),
            LedgerEntryType::Check => LedgerEntry::Check(serde_json::from_value(value.clone())?),
            LedgerEntryType::SignerList => {
                LedgerEntry::SignerList(serde_json::from_value(value.clone())?)
            }
            LedgerEntryType::Ticket => LedgerEntry::Ticket(serde_json::from_value(value.clone())?),
            LedgerEntryType::DepositPreauth => {
                LedgerEntry::DepositPreauth(serde_json::from_value(value.clone())?)
            }
            LedgerEntryType::Escrow => LedgerEntry::Escrow(serde_json::from_value(value.clone())?),
            LedgerEntryType::PayChannel => {
                LedgerEntry::PayChannel(serde_json::from_value(value.clone())?)
            }
            LedgerEntryType::Amm => LedgerEntry::Amm(serde_json::from_value(value.clone())?),
            LedgerEntryType::DirectoryNode => {
                LedgerEntry::DirectoryNode(serde_json::from_value(value.clone())?)
            }
            LedgerEntryType::NFTokenPage => {
                LedgerEntry::NfTokenPage(serde_json::from_value(value.clone())?)
            }
            LedgerEntryType::NFTokenOffer => {
                LedgerEntry::NfTokenOffer(serde_json::from_value(value.clone())?)
            }
            LedgerEntryType::Delegate => {
                LedgerEntry::Delegate(serde_json::from_value(value.clone())?)
            }
            LedgerEntryType::FeeSettings => {
                LedgerEntry::FeeSettings(serde_json::from_value(value.clone())?)
            }
            other => {
                return Err(serde::de::Error::custom(format!(
                    "unsupported ledger entry type {other}"
                )))
            }
        })
    }

    /// Stamps the last-modifying transaction.
    pub fn set_previous_txn(&mut self, txn_id: Hash256, ledger_seq: u32) {
        macro_rules! stamp {
            ($entry:expr) => {{
                $entry.previous_txn_id = Some(txn_id);
                $entry.previous_txn_lgr_seq = Some(ledger_seq);
            }};
        }

        match self {
            LedgerEntry::AccountRoot(entry) => stamp!(entry),
            LedgerEntry::RippleState(entry) => stamp!(entry),
            LedgerEntry::Offer(entry) => stamp!(entry),
            LedgerEntry::Check(entry) => stamp!(entry),
            LedgerEntry::SignerList(entry) => stamp!(entry),
            LedgerEntry::Ticket(entry) => stamp!(entry),
            LedgerEntry::DepositPreauth(entry) => stamp!(entry),
            LedgerEntry::Escrow(entry) => stamp!(entry),
            LedgerEntry::PayChannel(entry) => stamp!(entry),
            LedgerEntry::Amm(entry) => stamp!(entry),
            LedgerEntry::DirectoryNode(entry) => stamp!(entry),
            LedgerEntry::NfTokenPage(entry) => stamp!(entry),
            LedgerEntry::NfTokenOffer(entry) => stamp!(entry),
            LedgerEntry::Delegate(entry) => stamp!(entry),
            LedgerEntry::FeeSettings(entry) => stamp!(entry),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_account_root_round_trip() {
        let account: AccountId = "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".parse().unwrap();
        let mut root = AccountRoot::new(account, 25_000_000, 7);
        root.flags = LSF_REQUIRE_DEST_TAG;
        root.domain = Some("6578616D706C652E636F6D".to_string());

        let value = serde_json::to_value(&root).unwrap();
        assert_eq!(value["Balance"], "25000000");
        assert_eq!(value["LedgerEntryType"], "AccountRoot");
        assert!(value.get("RegularKey").is_none());

        let entry = LedgerEntry::from_value(&value).unwrap();
        assert_eq!(entry, LedgerEntry::AccountRoot(root));
    }

    #[test]
    fn test_entry_dispatch_by_type() {
        let value = serde_json::json!({
            "LedgerEntryType": "Ticket",
            "Flags": 0,
            "Account": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
            "TicketSequence": 9,
            "OwnerNode": "0000000000000000",
        });
        let entry = LedgerEntry::from_value(&value).unwrap();
        assert_eq!(entry.entry_type(), LedgerEntryType::Ticket);
    }

    #[test]
    fn test_stamp_previous_txn() {
        let account: AccountId = "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".parse().unwrap();
        let mut entry = LedgerEntry::AccountRoot(AccountRoot::new(account, 0, 1));
        entry.set_previous_txn(Hash256([7u8; 32]), 42);

        let value = entry.to_value();
        assert_eq!(value["PreviousTxnLgrSeq"], 42);
    }
}
