//! Per-transaction-type semantics, dispatched by explicit match.

pub mod account_delete;
pub mod account_set;
pub mod amm;
pub mod batch;
pub mod check;
pub mod clawback;
pub mod common;
pub mod delegate_set;
pub mod deposit_preauth;
pub mod escrow;
pub mod ledger_state_fix;
pub mod nftoken;
pub mod offer;
pub mod payment;
pub mod payment_channel;
pub mod set_regular_key;
pub mod signer_list_set;
pub mod ticket_create;
pub mod trust_set;

use crate::engine::results::TransactionResult;
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::rules::{self, Rules};
use crate::models::transactions::{TransactionEnvelope, TransactionType};

/// The amendments each variant declares as prerequisites; a missing
/// one is `temDISABLED` at preflight.
pub fn required_features(transaction_type: &TransactionType) -> &'static [&'static str] {
    match transaction_type {
        TransactionType::CheckCancel
        | TransactionType::CheckCash
        | TransactionType::CheckCreate => &[rules::FEATURE_CHECKS],
        TransactionType::Clawback => &[rules::FEATURE_CLAWBACK],
        TransactionType::AMMBid
        | TransactionType::AMMCreate
        | TransactionType::AMMDelete
        | TransactionType::AMMDeposit
        | TransactionType::AMMVote
        | TransactionType::AMMWithdraw => &[rules::FEATURE_AMM],
        TransactionType::AMMClawback => &[rules::FEATURE_AMM, rules::FEATURE_AMM_CLAWBACK],
        TransactionType::DepositPreauth => &[rules::FEATURE_DEPOSIT_PREAUTH],
        TransactionType::TicketCreate => &[rules::FEATURE_TICKET_BATCH],
        TransactionType::SignerListSet => &[rules::FEATURE_MULTI_SIGN],
        TransactionType::NFTokenAcceptOffer
        | TransactionType::NFTokenBurn
        | TransactionType::NFTokenCancelOffer
        | TransactionType::NFTokenCreateOffer
        | TransactionType::NFTokenMint => &[rules::FEATURE_NFTOKEN],
        TransactionType::NFTokenModify => {
            &[rules::FEATURE_NFTOKEN, rules::FEATURE_DYNAMIC_NFT]
        }
        TransactionType::LedgerStateFix => &[rules::FEATURE_FIX_NFTOKEN_PAGE_LINKS],
        TransactionType::Batch => &[rules::FEATURE_BATCH],
        TransactionType::DelegateSet => &[rules::FEATURE_PERMISSION_DELEGATION],
        _ => &[],
    }
}

/// Static checks requiring no ledger state.
pub fn preflight(tx: &TransactionEnvelope, rules: &Rules) -> TransactionResult {
    match tx {
        TransactionEnvelope::Payment(tx) => payment::preflight(tx),
        TransactionEnvelope::AccountSet(tx) => account_set::preflight(tx),
        TransactionEnvelope::AccountDelete(tx) => account_delete::preflight(tx),
        TransactionEnvelope::SetRegularKey(tx) => set_regular_key::preflight(tx),
        TransactionEnvelope::SignerListSet(tx) => signer_list_set::preflight(tx),
        TransactionEnvelope::TicketCreate(tx) => ticket_create::preflight(tx),
        TransactionEnvelope::DepositPreauth(tx) => deposit_preauth::preflight(tx),
        TransactionEnvelope::TrustSet(tx) => trust_set::preflight(tx),
        TransactionEnvelope::CheckCreate(tx) => check::preflight_create(tx),
        TransactionEnvelope::CheckCash(tx) => check::preflight_cash(tx),
        TransactionEnvelope::CheckCancel(tx) => check::preflight_cancel(tx),
        TransactionEnvelope::Clawback(tx) => clawback::preflight(tx),
        TransactionEnvelope::EscrowCreate(tx) => escrow::preflight_create(tx),
        TransactionEnvelope::EscrowFinish(tx) => escrow::preflight_finish(tx),
        TransactionEnvelope::EscrowCancel(tx) => escrow::preflight_cancel(tx),
        TransactionEnvelope::OfferCreate(tx) => offer::preflight_create(tx),
        TransactionEnvelope::OfferCancel(tx) => offer::preflight_cancel(tx),
        TransactionEnvelope::PaymentChannelCreate(tx) => {
            payment_channel::preflight_create(tx)
        }
        TransactionEnvelope::PaymentChannelFund(tx) => payment_channel::preflight_fund(tx),
        TransactionEnvelope::PaymentChannelClaim(tx) => payment_channel::preflight_claim(tx),
        TransactionEnvelope::AMMCreate(tx) => amm::preflight_create(tx),
        TransactionEnvelope::AMMDeposit(tx) => amm::preflight_deposit(tx),
        TransactionEnvelope::AMMWithdraw(tx) => amm::preflight_withdraw(tx),
        TransactionEnvelope::AMMVote(tx) => amm::preflight_vote(tx),
        TransactionEnvelope::AMMBid(tx) => amm::preflight_bid(tx),
        TransactionEnvelope::AMMDelete(tx) => amm::preflight_delete(tx),
        TransactionEnvelope::AMMClawback(tx) => amm::preflight_clawback(tx),
        TransactionEnvelope::NFTokenMint(tx) => nftoken::preflight_mint(tx),
        TransactionEnvelope::NFTokenBurn(tx) => nftoken::preflight_burn(tx),
        TransactionEnvelope::NFTokenCreateOffer(tx) => nftoken::preflight_create_offer(tx),
        TransactionEnvelope::NFTokenCancelOffer(tx) => nftoken::preflight_cancel_offer(tx),
        TransactionEnvelope::NFTokenAcceptOffer(tx) => nftoken::preflight_accept_offer(tx),
        TransactionEnvelope::NFTokenModify(tx) => nftoken::preflight_modify(tx),
        TransactionEnvelope::LedgerStateFix(tx) => ledger_state_fix::preflight(tx),
        TransactionEnvelope::Batch(tx) => batch::preflight(tx, rules),
        TransactionEnvelope::DelegateSet(tx) => delegate_set::preflight(tx),
    }
}

/// Ledger-dependent checks.
pub fn preclaim(tx: &TransactionEnvelope, ctx: &PreclaimContext<'_>) -> TransactionResult {
    match tx {
        TransactionEnvelope::Payment(tx) => payment::preclaim(tx, ctx),
        TransactionEnvelope::AccountSet(tx) => account_set::preclaim(tx, ctx),
        TransactionEnvelope::AccountDelete(tx) => account_delete::preclaim(tx, ctx),
        TransactionEnvelope::SetRegularKey(tx) => set_regular_key::preclaim(tx, ctx),
        TransactionEnvelope::SignerListSet(tx) => signer_list_set::preclaim(tx, ctx),
        TransactionEnvelope::TicketCreate(tx) => ticket_create::preclaim(tx, ctx),
        TransactionEnvelope::DepositPreauth(tx) => deposit_preauth::preclaim(tx, ctx),
        TransactionEnvelope::TrustSet(tx) => trust_set::preclaim(tx, ctx),
        TransactionEnvelope::CheckCreate(tx) => check::preclaim_create(tx, ctx),
        TransactionEnvelope::CheckCash(tx) => check::preclaim_cash(tx, ctx),
        TransactionEnvelope::CheckCancel(tx) => check::preclaim_cancel(tx, ctx),
        TransactionEnvelope::Clawback(tx) => clawback::preclaim(tx, ctx),
        TransactionEnvelope::EscrowCreate(tx) => escrow::preclaim_create(tx, ctx),
        TransactionEnvelope::EscrowFinish(tx) => escrow::preclaim_finish(tx, ctx),
        TransactionEnvelope::EscrowCancel(tx) => escrow::preclaim_cancel(tx, ctx),
        TransactionEnvelope::OfferCreate(tx) => offer::preclaim_create(tx, ctx),
        TransactionEnvelope::OfferCancel(tx) => offer::preclaim_cancel(tx, ctx),
        TransactionEnvelope::PaymentChannelCreate(tx) => {
            payment_channel::preclaim_create(tx, ctx)
        }
        TransactionEnvelope::PaymentChannelFund(tx) => {
            payment_channel::preclaim_fund(tx, ctx)
        }
        TransactionEnvelope::PaymentChannelClaim(tx) => {
            payment_channel::preclaim_claim(tx, ctx)
        }
        TransactionEnvelope::AMMCreate(tx) => amm::preclaim_create(tx, ctx),
        TransactionEnvelope::AMMDeposit(tx) => amm::preclaim_deposit(tx, ctx),
        TransactionEnvelope::AMMWithdraw(tx) => amm::preclaim_withdraw(tx, ctx),
        TransactionEnvelope::AMMVote(tx) => amm::preclaim_vote(tx, ctx),
        TransactionEnvelope::AMMBid(tx) => amm::preclaim_bid(tx, ctx),
        TransactionEnvelope::AMMDelete(tx) => amm::preclaim_delete(tx, ctx),
        TransactionEnvelope::AMMClawback(tx) => amm::preclaim_clawback(tx, ctx),
        TransactionEnvelope::NFTokenMint(tx) => nftoken::preclaim_mint(tx, ctx),
        TransactionEnvelope::NFTokenBurn(tx) => nftoken::preclaim_burn(tx, ctx),
        TransactionEnvelope::NFTokenCreateOffer(tx) => {
            nftoken::preclaim_create_offer(tx, ctx)
        }
        TransactionEnvelope::NFTokenCancelOffer(tx) => {
            nftoken::preclaim_cancel_offer(tx, ctx)
        }
        TransactionEnvelope::NFTokenAcceptOffer(tx) => {
            nftoken::preclaim_accept_offer(tx, ctx)
        }
        TransactionEnvelope::NFTokenModify(tx) => nftoken::preclaim_modify(tx, ctx),
        TransactionEnvelope::LedgerStateFix(tx) => ledger_state_fix::preclaim(tx, ctx),
        TransactionEnvelope::Batch(tx) => batch::preclaim(tx, ctx),
        TransactionEnvelope::DelegateSet(tx) => delegate_set::preclaim(tx, ctx),
    }
}

/// The effect phase, inside the engine's checkpointed view.
pub fn apply(tx: &TransactionEnvelope, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    match tx {
        TransactionEnvelope::Payment(tx) => payment::apply(tx, ctx),
        TransactionEnvelope::AccountSet(tx) => account_set::apply(tx, ctx),
        TransactionEnvelope::AccountDelete(tx) => account_delete::apply(tx, ctx),
        TransactionEnvelope::SetRegularKey(tx) => set_regular_key::apply(tx, ctx),
        TransactionEnvelope::SignerListSet(tx) => signer_list_set::apply(tx, ctx),
        TransactionEnvelope::TicketCreate(tx) => ticket_create::apply(tx, ctx),
        TransactionEnvelope::DepositPreauth(tx) => deposit_preauth::apply(tx, ctx),
        TransactionEnvelope::TrustSet(tx) => trust_set::apply(tx, ctx),
        TransactionEnvelope::CheckCreate(tx) => check::apply_create(tx, ctx),
        TransactionEnvelope::CheckCash(tx) => check::apply_cash(tx, ctx),
        TransactionEnvelope::CheckCancel(tx) => check::apply_cancel(tx, ctx),
        TransactionEnvelope::Clawback(tx) => clawback::apply(tx, ctx),
        TransactionEnvelope::EscrowCreate(tx) => escrow::apply_create(tx, ctx),
        TransactionEnvelope::EscrowFinish(tx) => escrow::apply_finish(tx, ctx),
        TransactionEnvelope::EscrowCancel(tx) => escrow::apply_cancel(tx, ctx),
        TransactionEnvelope::OfferCreate(tx) => offer::apply_create(tx, ctx),
        TransactionEnvelope::OfferCancel(tx) => offer::apply_cancel(tx, ctx),
        TransactionEnvelope::PaymentChannelCreate(tx) => {
            payment_channel::apply_create(tx, ctx)
        }
        TransactionEnvelope::PaymentChannelFund(tx) => payment_channel::apply_fund(tx, ctx),
        TransactionEnvelope::PaymentChannelClaim(tx) => {
            payment_channel::apply_claim(tx, ctx)
        }
        TransactionEnvelope::AMMCreate(tx) => amm::apply_create(tx, ctx),
        TransactionEnvelope::AMMDeposit(tx) => amm::apply_deposit(tx, ctx),
        TransactionEnvelope::AMMWithdraw(tx) => amm::apply_withdraw(tx, ctx),
        TransactionEnvelope::AMMVote(tx) => amm::apply_vote(tx, ctx),
        TransactionEnvelope::AMMBid(tx) => amm::apply_bid(tx, ctx),
        TransactionEnvelope::AMMDelete(tx) => amm::apply_delete(tx, ctx),
        TransactionEnvelope::AMMClawback(tx) => amm::apply_clawback(tx, ctx),
        TransactionEnvelope::NFTokenMint(tx) => nftoken::apply_mint(tx, ctx),
        TransactionEnvelope::NFTokenBurn(tx) => nftoken::apply_burn(tx, ctx),
        TransactionEnvelope::NFTokenCreateOffer(tx) => nftoken::apply_create_offer(tx, ctx),
        TransactionEnvelope::NFTokenCancelOffer(tx) => nftoken::apply_cancel_offer(tx, ctx),
        TransactionEnvelope::NFTokenAcceptOffer(tx) => nftoken::apply_accept_offer(tx, ctx),
        TransactionEnvelope::NFTokenModify(tx) => nftoken::apply_modify(tx, ctx),
        TransactionEnvelope::LedgerStateFix(tx) => ledger_state_fix::apply(tx, ctx),
        TransactionEnvelope::Batch(tx) => batch::apply(tx, ctx),
        TransactionEnvelope::DelegateSet(tx) => delegate_set::apply(tx, ctx),
    }
}
