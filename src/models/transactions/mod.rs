pub mod account_delete;
pub mod account_set;
pub mod amm_bid;
pub mod amm_clawback;
pub mod amm_create;
pub mod amm_delete;
pub mod amm_deposit;
pub mod amm_vote;
pub mod amm_withdraw;
pub mod batch;
pub mod check_cancel;
pub mod check_cash;
pub mod check_create;
pub mod clawback;
pub mod delegate_set;
pub mod deposit_preauth;
pub mod escrow_cancel;
pub mod escrow_create;
pub mod escrow_finish;
pub mod ledger_state_fix;
pub mod nftoken_accept_offer;
pub mod nftoken_burn;
pub mod nftoken_cancel_offer;
pub mod nftoken_create_offer;
pub mod nftoken_mint;
pub mod nftoken_modify;
pub mod offer_cancel;
pub mod offer_create;
pub mod payment;
pub mod payment_channel_claim;
pub mod payment_channel_create;
pub mod payment_channel_fund;
pub mod registry;
pub mod set_regular_key;
pub mod signer_list_set;
pub mod ticket_create;
pub mod trust_set;

use core::fmt::Debug;
use core::str::FromStr;
use std::borrow::Cow;

use derive_new::new;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display};

use crate::models::amount::XRPAmount;
use crate::models::{FlagCollection, XRPLModelException, XRPLModelResult};
use crate::serde_with_tag;

pub use registry::TransactionEnvelope;

/// Enum containing the different Transaction types.
#[derive(Debug, Clone, Serialize, Deserialize, Display, AsRefStr, PartialEq, Eq)]
pub enum TransactionType {
    AccountDelete,
    AccountSet,
    AMMBid,
    AMMClawback,
    AMMCreate,
    AMMDelete,
    AMMDeposit,
    AMMVote,
    AMMWithdraw,
    Batch,
    CheckCancel,
    CheckCash,
    CheckCreate,
    Clawback,
    DelegateSet,
    DepositPreauth,
    EscrowCancel,
    EscrowCreate,
    EscrowFinish,
    LedgerStateFix,
    NFTokenAcceptOffer,
    NFTokenBurn,
    NFTokenCancelOffer,
    NFTokenCreateOffer,
    NFTokenMint,
    NFTokenModify,
    OfferCancel,
    OfferCreate,
    Payment,
    PaymentChannelClaim,
    PaymentChannelCreate,
    PaymentChannelFund,
    SetRegularKey,
    SignerListSet,
    TicketCreate,
    TrustSet,
}

/// The base fields for all transaction models.
///
/// See Transaction Common Fields:
/// `<https://xrpl.org/transaction-common-fields.html>`
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct CommonFields<'a, F>
where
    F: IntoEnumIterator + Serialize + core::fmt::Debug,
{
    /// The unique address of the account that initiated the
    /// transaction.
    pub account: Cow<'a, str>,
    /// The type of transaction.
    pub transaction_type: TransactionType,
    /// Hash value identifying another transaction. If provided, this
    /// transaction is only valid if the sending account's
    /// previously-sent transaction matches the provided hash.
    #[serde(rename = "AccountTxnID")]
    pub account_txn_id: Option<Cow<'a, str>>,
    /// Integer amount of XRP, in drops, to be destroyed as a cost for
    /// distributing this transaction to the network.
    pub fee: Option<XRPAmount<'a>>,
    /// Set of bit-flags for this transaction.
    #[serde(with = "crate::models::txn_flags")]
    #[serde(default = "flag_collection_default")]
    pub flags: FlagCollection<F>,
    /// Highest ledger index this transaction can appear in.
    pub last_ledger_sequence: Option<u32>,
    /// Additional arbitrary information used to identify this
    /// transaction.
    pub memos: Option<Vec<Memo>>,
    /// The network ID of the chain this transaction is intended for.
    /// MUST BE OMITTED for Mainnet and some test networks. REQUIRED on
    /// chains whose network ID is 1025 or higher.
    #[serde(rename = "NetworkID")]
    pub network_id: Option<u32>,
    /// The sequence number of the account sending the transaction.
    /// The special case 0 means the transaction is using a Ticket
    /// instead.
    pub sequence: Option<u32>,
    /// Signing data authorizing a multi-signed transaction.
    pub signers: Option<Vec<Signer>>,
    /// Hex representation of the public key that corresponds to the
    /// private key used to sign this transaction. An empty string
    /// indicates a multi-signature is present in the Signers field
    /// instead.
    pub signing_pub_key: Option<Cow<'a, str>>,
    /// Arbitrary integer used to identify the reason for this
    /// payment, or a sender on whose behalf this transaction is made.
    pub source_tag: Option<u32>,
    /// The sequence number of the ticket to use in place of a
    /// Sequence number. If this is provided, Sequence must be 0.
    pub ticket_sequence: Option<u32>,
    /// The signature that verifies this transaction as originating
    /// from the account it says it is from.
    pub txn_signature: Option<Cow<'a, str>>,
}

impl<'a, F> CommonFields<'a, F>
where
    F: IntoEnumIterator + Serialize + core::fmt::Debug,
{
    pub fn from_account(account: impl Into<Cow<'a, str>>, transaction_type: TransactionType) -> Self {
        CommonFields {
            account: account.into(),
            transaction_type,
            ..Default::default()
        }
    }

    /// Exactly one of `Sequence` and `TicketSequence` must identify
    /// the transaction's slot.
    pub fn sequence_errors(&self) -> XRPLModelResult<()> {
        match (self.sequence, self.ticket_sequence) {
            (Some(_), Some(_)) | (None, None) => Err(XRPLModelException::ExactlyOneOf {
                first: "sequence".to_string(),
                second: "ticket_sequence".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl<F> CommonFields<'_, F>
where
    F: IntoEnumIterator + Serialize + Debug + PartialEq + Clone,
{
    pub fn is_signed(&self) -> bool {
        if let Some(signers) = &self.signers {
            signers
                .iter()
                .all(|signer| !signer.txn_signature.is_empty() && !signer.signing_pub_key.is_empty())
        } else {
            self.txn_signature.is_some() && self.signing_pub_key.is_some()
        }
    }
}

impl<'a, T> Transaction<'a, T> for CommonFields<'a, T>
where
    T: IntoEnumIterator + Serialize + PartialEq + core::fmt::Debug,
{
    fn has_flag(&self, flag: &T) -> bool {
        self.flags.contains(flag)
    }

    fn get_transaction_type(&self) -> &TransactionType {
        &self.transaction_type
    }

    fn get_common_fields(&self) -> &CommonFields<'_, T> {
        self
    }

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, T> {
        self
    }
}

impl<'a, T> Default for CommonFields<'a, T>
where
    T: IntoEnumIterator + Serialize + core::fmt::Debug,
{
    fn default() -> Self {
        Self {
            account: "".into(),
            transaction_type: TransactionType::Payment,
            account_txn_id: None,
            fee: None,
            flags: FlagCollection::default(),
            last_ledger_sequence: None,
            memos: None,
            network_id: None,
            sequence: None,
            signers: None,
            signing_pub_key: None,
            source_tag: None,
            ticket_sequence: None,
            txn_signature: None,
        }
    }
}

impl<'a, T> FromStr for CommonFields<'a, T>
where
    T: IntoEnumIterator + Serialize + core::fmt::Debug,
{
    type Err = core::convert::Infallible;

    fn from_str(account: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            account: Cow::Owned(account.to_string()),
            ..Default::default()
        })
    }
}

fn flag_collection_default<T>() -> FlagCollection<T>
where
    T: IntoEnumIterator + Serialize + core::fmt::Debug,
{
    FlagCollection::<T>::default()
}

serde_with_tag! {
/// An arbitrary piece of data attached to a transaction. A
/// transaction can have multiple Memo objects as an array in the
/// Memos field.
#[derive(Debug, PartialEq, Eq, Default, Clone, new)]
pub struct Memo {
    pub memo_data: Option<String>,
    pub memo_format: Option<String>,
    pub memo_type: Option<String>,
}
}

serde_with_tag! {
/// One Signer in a multi-signature. A multi-signed transaction can
/// have an array of up to 32 Signers, each contributing a signature,
/// in the Signers field.
#[derive(Debug, PartialEq, Eq, Default, Clone, new)]
pub struct Signer {
    pub account: String,
    pub txn_signature: String,
    pub signing_pub_key: String,
}
}

serde_with_tag! {
/// Represents one entry in a list of AuthAccounts used in AMMBid
/// transactions.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct AuthAccount {
    pub account: String,
}
}

/// The capability set every transaction variant exposes.
pub trait Transaction<'a, T>
where
    T: IntoEnumIterator + Serialize + core::fmt::Debug,
    Self: Serialize,
{
    fn has_flag(&self, flag: &T) -> bool {
        let _ = flag;
        false
    }

    fn get_transaction_type(&self) -> &TransactionType;

    fn get_common_fields(&self) -> &CommonFields<'_, T>;

    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, T>;

    /// Projects the transaction into a string-keyed map for canonical
    /// serialization and hashing.
    fn flatten(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("transactions always flatten")
    }
}

/// Fluent configuration shared by every transaction builder.
pub trait CommonTransactionBuilder<'a, T>: Sized
where
    T: IntoEnumIterator + Serialize + PartialEq + core::fmt::Debug,
{
    fn get_mut_common_fields(&mut self) -> &mut CommonFields<'a, T>;

    fn into_self(self) -> Self;

    fn with_fee(mut self, fee: XRPAmount<'a>) -> Self {
        self.get_mut_common_fields().fee = Some(fee);
        self.into_self()
    }

    fn with_sequence(mut self, sequence: u32) -> Self {
        self.get_mut_common_fields().sequence = Some(sequence);
        self.into_self()
    }

    fn with_last_ledger_sequence(mut self, last_ledger_sequence: u32) -> Self {
        self.get_mut_common_fields().last_ledger_sequence = Some(last_ledger_sequence);
        self.into_self()
    }

    fn with_source_tag(mut self, source_tag: u32) -> Self {
        self.get_mut_common_fields().source_tag = Some(source_tag);
        self.into_self()
    }

    fn with_memo(mut self, memo: Memo) -> Self {
        match self.get_mut_common_fields().memos {
            Some(ref mut memos) => memos.push(memo),
            None => self.get_mut_common_fields().memos = Some(vec![memo]),
        }
        self.into_self()
    }

    fn with_network_id(mut self, network_id: u32) -> Self {
        self.get_mut_common_fields().network_id = Some(network_id);
        self.into_self()
    }

    fn with_ticket_sequence(mut self, ticket_sequence: u32) -> Self {
        self.get_mut_common_fields().ticket_sequence = Some(ticket_sequence);
        self.into_self()
    }

    fn with_account_txn_id(mut self, account_txn_id: Cow<'a, str>) -> Self {
        self.get_mut_common_fields().account_txn_id = Some(account_txn_id);
        self.into_self()
    }

    fn with_signers(mut self, signers: Vec<Signer>) -> Self {
        self.get_mut_common_fields().signers = Some(signers);
        self.into_self()
    }

    fn with_signing_pub_key(mut self, signing_pub_key: Cow<'a, str>) -> Self {
        self.get_mut_common_fields().signing_pub_key = Some(signing_pub_key);
        self.into_self()
    }

    fn with_txn_signature(mut self, txn_signature: Cow<'a, str>) -> Self {
        self.get_mut_common_fields().txn_signature = Some(txn_signature);
        self.into_self()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::NoFlags;

    #[test]
    fn test_sequence_errors() {
        let mut common: CommonFields<'_, NoFlags> =
            CommonFields::from_account("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb", TransactionType::AccountSet);
        assert!(common.sequence_errors().is_err());

        common.sequence = Some(5);
        assert!(common.sequence_errors().is_ok());

        common.ticket_sequence = Some(9);
        assert!(common.sequence_errors().is_err());
    }

    #[test]
    fn test_memo_wire_form() {
        let memo = Memo {
            memo_data: Some("0102".to_string()),
            memo_format: None,
            memo_type: Some("74657374".to_string()),
        };
        let value = serde_json::to_value(&memo).unwrap();
        assert_eq!(value["Memo"]["MemoData"], "0102");
        assert!(value["Memo"].get("MemoFormat").is_none());

        let parsed: Memo = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, memo);
    }

    #[test]
    fn test_signer_wire_form() {
        let signer = Signer {
            account: "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".to_string(),
            txn_signature: "DEAD".to_string(),
            signing_pub_key: "ED01".to_string(),
        };
        let value = serde_json::to_value(&signer).unwrap();
        assert_eq!(
            value["Signer"]["Account"],
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb"
        );

        let parsed: Signer = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, signer);
    }
}
