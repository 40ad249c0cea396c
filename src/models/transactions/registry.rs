//! The transaction registry: dynamic construction of typed variants
//! from JSON or wire form, dispatched by explicit match.

use serde_json::Value;

use crate::models::transactions::account_delete::AccountDelete;
use crate::models::transactions::account_set::AccountSet;
use crate::models::transactions::amm_bid::AMMBid;
use crate::models::transactions::amm_clawback::AMMClawback;
use crate::models::transactions::amm_create::AMMCreate;
use crate::models::transactions::amm_delete::AMMDelete;
use crate::models::transactions::amm_deposit::AMMDeposit;
use crate::models::transactions::amm_vote::AMMVote;
use crate::models::transactions::amm_withdraw::AMMWithdraw;
use crate::models::transactions::batch::Batch;
use crate::models::transactions::check_cancel::CheckCancel;
use crate::models::transactions::check_cash::CheckCash;
use crate::models::transactions::check_create::CheckCreate;
use crate::models::transactions::clawback::Clawback;
use crate::models::transactions::delegate_set::DelegateSet;
use crate::models::transactions::deposit_preauth::DepositPreauth;
use crate::models::transactions::escrow_cancel::EscrowCancel;
use crate::models::transactions::escrow_create::EscrowCreate;
use crate::models::transactions::escrow_finish::EscrowFinish;
use crate::models::transactions::ledger_state_fix::LedgerStateFix;
use crate::models::transactions::nftoken_accept_offer::NFTokenAcceptOffer;
use crate::models::transactions::nftoken_burn::NFTokenBurn;
use crate::models::transactions::nftoken_cancel_offer::NFTokenCancelOffer;
use crate::models::transactions::nftoken_create_offer::NFTokenCreateOffer;
use crate::models::transactions::nftoken_mint::NFTokenMint;
use crate::models::transactions::nftoken_modify::NFTokenModify;
use crate::models::transactions::offer_cancel::OfferCancel;
use crate::models::transactions::offer_create::OfferCreate;
use crate::models::transactions::payment::Payment;
use crate::models::transactions::payment_channel_claim::PaymentChannelClaim;
use crate::models::transactions::payment_channel_create::PaymentChannelCreate;
use crate::models::transactions::payment_channel_fund::PaymentChannelFund;
use crate::models::transactions::set_regular_key::SetRegularKey;
use crate::models::transactions::signer_list_set::SignerListSet;
use crate::models::transactions::ticket_create::TicketCreate;
use crate::models::transactions::trust_set::TrustSet;
use crate::models::transactions::{Signer, TransactionType};
use crate::models::{Model, XRPLModelException, XRPLModelResult};

/// A typed transaction of any kind, owned by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionEnvelope {
    AccountDelete(AccountDelete<'static>),
    AccountSet(AccountSet<'static>),
    AMMBid(AMMBid<'static>),
    AMMClawback(AMMClawback<'static>),
    AMMCreate(AMMCreate<'static>),
    AMMDelete(AMMDelete<'static>),
    AMMDeposit(AMMDeposit<'static>),
    AMMVote(AMMVote<'static>),
    AMMWithdraw(AMMWithdraw<'static>),
    Batch(Batch<'static>),
    CheckCancel(CheckCancel<'static>),
    CheckCash(CheckCash<'static>),
    CheckCreate(CheckCreate<'static>),
    Clawback(Clawback<'static>),
    DelegateSet(DelegateSet<'static>),
    DepositPreauth(DepositPreauth<'static>),
    EscrowCancel(EscrowCancel<'static>),
    EscrowCreate(EscrowCreate<'static>),
    EscrowFinish(EscrowFinish<'static>),
    LedgerStateFix(LedgerStateFix<'static>),
    NFTokenAcceptOffer(NFTokenAcceptOffer<'static>),
    NFTokenBurn(NFTokenBurn<'static>),
    NFTokenCancelOffer(NFTokenCancelOffer<'static>),
    NFTokenCreateOffer(NFTokenCreateOffer<'static>),
    NFTokenMint(NFTokenMint<'static>),
    NFTokenModify(NFTokenModify<'static>),
    OfferCancel(OfferCancel<'static>),
    OfferCreate(OfferCreate<'static>),
    Payment(Payment<'static>),
    PaymentChannelClaim(PaymentChannelClaim<'static>),
    PaymentChannelCreate(PaymentChannelCreate<'static>),
    PaymentChannelFund(PaymentChannelFund<'static>),
    SetRegularKey(SetRegularKey<'static>),
    SignerListSet(SignerListSet<'static>),
    TicketCreate(TicketCreate<'static>),
    TrustSet(TrustSet<'static>),
}

/// Runs `$body` with `$tx` bound to the inner typed transaction.
macro_rules! with_variant {
    ($envelope:expr, $tx:ident => $body:expr) => {
        match $envelope {
            TransactionEnvelope::AccountDelete($tx) => $body,
            TransactionEnvelope::AccountSet($tx) => $body,
            TransactionEnvelope::AMMBid($tx) => $body,
            TransactionEnvelope::AMMClawback($tx) => $body,
            TransactionEnvelope::AMMCreate($tx) => $body,
            TransactionEnvelope::AMMDelete($tx) => $body,
            TransactionEnvelope::AMMDeposit($tx) => $body,
            TransactionEnvelope::AMMVote($tx) => $body,
            TransactionEnvelope::AMMWithdraw($tx) => $body,
            TransactionEnvelope::Batch($tx) => $body,
            TransactionEnvelope::CheckCancel($tx) => $body,
            TransactionEnvelope::CheckCash($tx) => $body,
            TransactionEnvelope::CheckCreate($tx) => $body,
            TransactionEnvelope::Clawback($tx) => $body,
            TransactionEnvelope::DelegateSet($tx) => $body,
            TransactionEnvelope::DepositPreauth($tx) => $body,
            TransactionEnvelope::EscrowCancel($tx) => $body,
            TransactionEnvelope::EscrowCreate($tx) => $body,
            TransactionEnvelope::EscrowFinish($tx) => $body,
            TransactionEnvelope::LedgerStateFix($tx) => $body,
            TransactionEnvelope::NFTokenAcceptOffer($tx) => $body,
            TransactionEnvelope::NFTokenBurn($tx) => $body,
            TransactionEnvelope::NFTokenCancelOffer($tx) => $body,
            TransactionEnvelope::NFTokenCreateOffer($tx) => $body,
            TransactionEnvelope::NFTokenMint($tx) => $body,
            TransactionEnvelope::NFTokenModify($tx) => $body,
            TransactionEnvelope::OfferCancel($tx) => $body,
            TransactionEnvelope::OfferCreate($tx) => $body,
            TransactionEnvelope::Payment($tx) => $body,
            TransactionEnvelope::PaymentChannelClaim($tx) => $body,
            TransactionEnvelope::PaymentChannelCreate($tx) => $body,
            TransactionEnvelope::PaymentChannelFund($tx) => $body,
            TransactionEnvelope::SetRegularKey($tx) => $body,
            TransactionEnvelope::SignerListSet($tx) => $body,
            TransactionEnvelope::TicketCreate($tx) => $body,
            TransactionEnvelope::TrustSet($tx) => $body,
        }
    };
}

macro_rules! impl_from_variant {
    ($($variant:ident => $model:ident),* $(,)?) => {
        $(
            impl From<$model<'static>> for TransactionEnvelope {
                fn from(tx: $model<'static>) -> Self {
                    TransactionEnvelope::$variant(tx)
                }
            }
        )*
    };
}

impl_from_variant! {
    AccountDelete => AccountDelete,
    AccountSet => AccountSet,
    AMMBid => AMMBid,
    AMMClawback => AMMClawback,
    AMMCreate => AMMCreate,
    AMMDelete => AMMDelete,
    AMMDeposit => AMMDeposit,
    AMMVote => AMMVote,
    AMMWithdraw => AMMWithdraw,
    Batch => Batch,
    CheckCancel => CheckCancel,
    CheckCash => CheckCash,
    CheckCreate => CheckCreate,
    Clawback => Clawback,
    DelegateSet => DelegateSet,
    DepositPreauth => DepositPreauth,
    EscrowCancel => EscrowCancel,
    EscrowCreate => EscrowCreate,
    EscrowFinish => EscrowFinish,
    LedgerStateFix => LedgerStateFix,
    NFTokenAcceptOffer => NFTokenAcceptOffer,
    NFTokenBurn => NFTokenBurn,
    NFTokenCancelOffer => NFTokenCancelOffer,
    NFTokenCreateOffer => NFTokenCreateOffer,
    NFTokenMint => NFTokenMint,
    NFTokenModify => NFTokenModify,
    OfferCancel => OfferCancel,
    OfferCreate => OfferCreate,
    Payment => Payment,
    PaymentChannelClaim => PaymentChannelClaim,
    PaymentChannelCreate => PaymentChannelCreate,
    PaymentChannelFund => PaymentChannelFund,
    SetRegularKey => SetRegularKey,
    SignerListSet => SignerListSet,
    TicketCreate => TicketCreate,
    TrustSet => TrustSet,
}

impl TransactionEnvelope {
    /// Constructs the typed variant a JSON transaction names.
    /// Unknown types are malformed.
    pub fn from_value(value: &Value) -> XRPLModelResult<Self> {
        let type_name = value
            .get("TransactionType")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                XRPLModelException::MissingField {
                    field: "TransactionType".to_string(),
                }
            })?;
        let transaction_type: TransactionType = serde_json::from_value(Value::String(
            type_name.to_string(),
        ))
        .map_err(|_| XRPLModelException::UnknownTransactionType(type_name.to_string()))?;

        Ok(match transaction_type {
            TransactionType::AccountDelete => {
                TransactionEnvelope::AccountDelete(serde_json::from_value(value.clone())?)
            }
            TransactionType::AccountSet => {
                TransactionEnvelope::AccountSet(serde_json::from_value(value.clone())?)
            }
            TransactionType::AMMBid => {
                TransactionEnvelope::AMMBid(serde_json::from_value(value.clone())?)
            }
            TransactionType::AMMClawback => {
                TransactionEnvelope::AMMClawback(serde_json::from_value(value.clone())?)
            }
            TransactionType::AMMCreate => {
                TransactionEnvelope::AMMCreate(serde_json::from_value(value.clone())?)
            }
            TransactionType::AMMDelete => {
                TransactionEnvelope::AMMDelete(serde_json::from_value(value.clone())?)
            }
            TransactionType::AMMDeposit => {
                TransactionEnvelope::AMMDeposit(serde_json::from_value(value.clone())?)
            }
            TransactionType::AMMVote => {
                TransactionEnvelope::AMMVote(serde_json::from_value(value.clone())?)
            }
            TransactionType::AMMWithdraw => {
                TransactionEnvelope::AMMWithdraw(serde_json::from_value(value.clone())?)
            }
            TransactionType::Batch => {
                TransactionEnvelope::Batch(serde_json::from_value(value.clone())?)
            }
            TransactionType::CheckCancel => {
                TransactionEnvelope::CheckCancel(serde_json::from_value(value.clone())?)
            }
            TransactionType::CheckCash => {
                TransactionEnvelope::CheckCash(serde_json::from_value(value.clone())?)
            }
            TransactionType::CheckCreate => {
                TransactionEnvelope::CheckCreate(serde_json::from_value(value.clone())?)
            }
            TransactionType::Clawback => {
                TransactionEnvelope::Clawback(serde_json::from_value(value.clone())?)
            }
            TransactionType::DelegateSet => {
                TransactionEnvelope::DelegateSet(serde_json::from_value(value.clone())?)
            }
            TransactionType::DepositPreauth => {
                TransactionEnvelope::DepositPreauth(serde_json::from_value(value.clone())?)
            }
            TransactionType::EscrowCancel => {
                TransactionEnvelope::EscrowCancel(serde_json::from_value(value.clone())?)
            }
            TransactionType::EscrowCreate => {
                TransactionEnvelope::EscrowCreate(serde_json::from_value(value.clone())?)
            }
            TransactionType::EscrowFinish => {
                TransactionEnvelope::EscrowFinish(serde_json::from_value(value.clone())?)
            }
            TransactionType::LedgerStateFix => {
                TransactionEnvelope::LedgerStateFix(serde_json::from_value(value.clone())?)
            }
            TransactionType::NFTokenAcceptOffer => {
                TransactionEnvelope::NFTokenAcceptOffer(serde_json::from_value(value.clone())?)
            }
            TransactionType::NFTokenBurn => {
                TransactionEnvelope::NFTokenBurn(serde_json::from_value(value.clone())?)
            }
            TransactionType::NFTokenCancelOffer => {
                TransactionEnvelope::NFTokenCancelOffer(serde_json::from_value(value.clone())?)
            }
            TransactionType::NFTokenCreateOffer => {
                TransactionEnvelope::NFTokenCreateOffer(serde_json::from_value(value.clone())?)
            }
            TransactionType::NFTokenMint => {
                TransactionEnvelope::NFTokenMint(serde_json::from_value(value.clone())?)
            }
            TransactionType::NFTokenModify => {
                TransactionEnvelope::NFTokenModify(serde_json::from_value(value.clone())?)
            }
            TransactionType::OfferCancel => {
                TransactionEnvelope::OfferCancel(serde_json::from_value(value.clone())?)
            }
            TransactionType::OfferCreate => {
                TransactionEnvelope::OfferCreate(serde_json::from_value(value.clone())?)
            }
            TransactionType::Payment => {
                TransactionEnvelope::Payment(serde_json::from_value(value.clone())?)
            }
            TransactionType::PaymentChannelClaim => {
                TransactionEnvelope::PaymentChannelClaim(serde_json::from_value(value.clone())?)
            }
            TransactionType::PaymentChannelCreate => {
                TransactionEnvelope::PaymentChannelCreate(serde_json::from_value(value.clone())?)
            }
            TransactionType::PaymentChannelFund => {
                TransactionEnvelope::PaymentChannelFund(serde_json::from_value(value.clone())?)
            }
            TransactionType::SetRegularKey => {
                TransactionEnvelope::SetRegularKey(serde_json::from_value(value.clone())?)
            }
            TransactionType::SignerListSet => {
                TransactionEnvelope::SignerListSet(serde_json::from_value(value.clone())?)
            }
            TransactionType::TicketCreate => {
                TransactionEnvelope::TicketCreate(serde_json::from_value(value.clone())?)
            }
            TransactionType::TrustSet => {
                TransactionEnvelope::TrustSet(serde_json::from_value(value.clone())?)
            }
        })
    }

    /// Decodes a canonical wire encoding into the typed variant.
    pub fn from_wire(blob_hex: &str) -> XRPLModelResult<Self> {
        let value = crate::core::binarycodec::decode(blob_hex)
            .map_err(|err| XRPLModelException::SerdeJsonError(err.to_string()))?;
        TransactionEnvelope::from_value(&value)
    }

    pub fn tx_type(&self) -> TransactionType {
        use crate::models::transactions::Transaction;
        with_variant!(self, tx => tx.get_transaction_type().clone())
    }

    /// Syntactic validation only; ledger-dependent checks live in the
    /// engine's preclaim.
    pub fn validate(&self) -> XRPLModelResult<()> {
        with_variant!(self, tx => tx.validate())
    }

    /// The canonical string-keyed projection used for serialization
    /// and hashing.
    pub fn flatten(&self) -> Value {
        with_variant!(self, tx => serde_json::to_value(tx).expect("transactions always flatten"))
    }

    pub fn account(&self) -> String {
        with_variant!(self, tx => tx.common_fields.account.to_string())
    }

    pub fn fee_drops(&self) -> Option<i64> {
        with_variant!(self, tx => tx.common_fields.fee.as_ref().and_then(|fee| fee.as_drops().ok()))
    }

    pub fn sequence(&self) -> Option<u32> {
        with_variant!(self, tx => tx.common_fields.sequence)
    }

    pub fn ticket_sequence(&self) -> Option<u32> {
        with_variant!(self, tx => tx.common_fields.ticket_sequence)
    }

    pub fn last_ledger_sequence(&self) -> Option<u32> {
        with_variant!(self, tx => tx.common_fields.last_ledger_sequence)
    }

    pub fn network_id(&self) -> Option<u32> {
        with_variant!(self, tx => tx.common_fields.network_id)
    }

    pub fn source_tag(&self) -> Option<u32> {
        with_variant!(self, tx => tx.common_fields.source_tag)
    }

    pub fn account_txn_id(&self) -> Option<String> {
        with_variant!(self, tx => tx.common_fields.account_txn_id.as_ref().map(|id| id.to_string()))
    }

    pub fn signing_pub_key(&self) -> Option<String> {
        with_variant!(self, tx => tx.common_fields.signing_pub_key.as_ref().map(|key| key.to_string()))
    }

    pub fn txn_signature(&self) -> Option<String> {
        with_variant!(self, tx => tx.common_fields.txn_signature.as_ref().map(|sig| sig.to_string()))
    }

    pub fn signers(&self) -> Option<Vec<Signer>> {
        with_variant!(self, tx => tx.common_fields.signers.clone())
    }

    pub fn flags_u32(&self) -> u32 {
        with_variant!(self, tx => u32::try_from(&tx.common_fields.flags).unwrap_or_default())
    }

    pub fn set_fee(&mut self, fee_drops: i64) {
        with_variant!(self, tx => tx.common_fields.fee = Some(fee_drops.into()));
    }

    pub fn set_sequence(&mut self, sequence: u32) {
        with_variant!(self, tx => tx.common_fields.sequence = Some(sequence));
    }

    pub fn set_last_ledger_sequence(&mut self, last_ledger_sequence: u32) {
        with_variant!(
            self,
            tx => tx.common_fields.last_ledger_sequence = Some(last_ledger_sequence)
        );
    }

    pub fn set_signing_pub_key(&mut self, signing_pub_key: String) {
        with_variant!(self, tx => tx.common_fields.signing_pub_key = Some(signing_pub_key.into()));
    }

    pub fn set_txn_signature(&mut self, txn_signature: String) {
        with_variant!(self, tx => tx.common_fields.txn_signature = Some(txn_signature.into()));
    }

    pub fn set_signers(&mut self, signers: Vec<Signer>) {
        with_variant!(self, tx => tx.common_fields.signers = Some(signers));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dispatch_by_type_name() {
        let value = serde_json::json!({
            "Account": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
            "TransactionType": "AccountSet",
            "Sequence": 1,
        });
        let envelope = TransactionEnvelope::from_value(&value).unwrap();
        assert_eq!(envelope.tx_type(), TransactionType::AccountSet);
        assert_eq!(envelope.account(), "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb");
    }

    #[test]
    fn test_unknown_type_is_malformed() {
        let value = serde_json::json!({
            "Account": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
            "TransactionType": "TotallyMadeUp",
        });
        assert!(matches!(
            TransactionEnvelope::from_value(&value),
            Err(XRPLModelException::UnknownTransactionType(_))
        ));
    }

    #[test]
    fn test_flatten_round_trips_through_registry() {
        let value = serde_json::json!({
            "Account": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
            "Amount": "1000000",
            "Destination": "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn",
            "TransactionType": "Payment",
            "Sequence": 2,
        });
        let envelope = TransactionEnvelope::from_value(&value).unwrap();
        let flattened = envelope.flatten();
        assert_eq!(
            TransactionEnvelope::from_value(&flattened).unwrap(),
            envelope
        );
    }
}
