//! The Offer family: placement and cancellation. The core does not
//! run an order book; offers rest in the ledger until cancelled or
//! expired.

use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::amount::LedgerAmount;
use crate::ledger::objects::{
    LedgerEntry, LedgerEntryType, Offer as OfferObj, LSF_PASSIVE, LSF_SELL,
};
use crate::models::transactions::offer_cancel::OfferCancel;
use crate::models::transactions::offer_create::{OfferCreate, OfferCreateFlag};
use crate::models::transactions::Transaction;

pub fn preflight_create(tx: &OfferCreate<'_>) -> TransactionResult {
    let gets = match common::parse_amount(&tx.taker_gets) {
        Ok(gets) => gets,
        Err(code) => return code,
    };
    let pays = match common::parse_amount(&tx.taker_pays) {
        Ok(pays) => pays,
        Err(code) => return code,
    };
    if !gets.is_positive() || !pays.is_positive() {
        return TransactionResult::temBAD_OFFER;
    }
    if gets.currency() == pays.currency() && gets.issuer() == pays.issuer() {
        return TransactionResult::temBAD_OFFER;
    }
    if tx.expiration == Some(0) {
        return TransactionResult::temBAD_EXPIRATION;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_create(tx: &OfferCreate<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    if let Some(expiration) = tx.expiration {
        if expiration <= ctx.parent_close_time {
            return TransactionResult::tecEXPIRED;
        }
    }

    // The offered side must be at least partly funded.
    match common::parse_amount(&tx.taker_gets) {
        Ok(LedgerAmount::Xrp(_)) => {
            if common::spendable_xrp(ctx.view, &ctx.root) <= 0 {
                return TransactionResult::tecUNFUNDED_OFFER;
            }
        }
        Ok(LedgerAmount::Issued(issued)) => {
            if ctx.account != issued.issuer {
                let balance = common::issued_balance(
                    ctx.view,
                    &ctx.account,
                    &issued.currency,
                    &issued.issuer,
                )
                .unwrap_or(crate::core::binarycodec::types::IssuedValue::ZERO);
                if balance.is_zero() || balance.is_negative() {
                    return TransactionResult::tecUNFUNDED_OFFER;
                }
            }
            match common::is_frozen(ctx.view, &ctx.account, &issued.currency, &issued.issuer) {
                Ok(true) => return TransactionResult::tecFROZEN,
                Ok(false) => {}
                Err(code) => return code,
            }
        }
        Err(code) => return code,
    }

    TransactionResult::tesSUCCESS
}

pub fn apply_create(tx: &OfferCreate<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_create_steps(tx, ctx))
}

fn apply_create_steps(tx: &OfferCreate<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    // Without a book to cross, immediate modes can never fill.
    if tx.has_flag(&OfferCreateFlag::TfImmediateOrCancel)
        || tx.has_flag(&OfferCreateFlag::TfFillOrKill)
    {
        return Err(TransactionResult::tecKILLED);
    }

    // An explicit replacement cancels the older offer first.
    if let Some(offer_sequence) = tx.offer_sequence {
        let old_key = keylet::offer(&ctx.account, offer_sequence);
        if common::internal(ctx.view.exists(&old_key))? {
            remove_offer(ctx, &old_key, &ctx.account.clone())?;
        }
    }

    let root = common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;
    if root.balance < ctx.view.reserve(root.owner_count + 1) {
        return Err(TransactionResult::tecINSUF_RESERVE_OFFER);
    }

    let sequence = tx
        .common_fields
        .sequence
        .or(tx.common_fields.ticket_sequence)
        .ok_or(TransactionResult::tefINTERNAL)?;
    let key = keylet::offer(&ctx.account, sequence);

    let mut flags = 0;
    if tx.has_flag(&OfferCreateFlag::TfPassive) {
        flags |= LSF_PASSIVE;
    }
    if tx.has_flag(&OfferCreateFlag::TfSell) {
        flags |= LSF_SELL;
    }

    let offer = OfferObj {
        ledger_entry_type: LedgerEntryType::Offer,
        flags,
        account: ctx.account,
        sequence,
        taker_pays: to_static(&tx.taker_pays),
        taker_gets: to_static(&tx.taker_gets),
        expiration: tx.expiration,
        owner_node: 0,
        previous_txn_id: None,
        previous_txn_lgr_seq: None,
    };

    common::internal(ctx.view.insert(key, LedgerEntry::Offer(offer)))?;
    common::add_to_owner_dir(ctx.view, &ctx.account, &key)?;
    common::internal(ctx.view.adjust_owner_count(&ctx.account, 1))?;
    Ok(())
}

pub fn preflight_cancel(tx: &OfferCancel<'_>) -> TransactionResult {
    if tx.offer_sequence == 0 {
        return TransactionResult::temBAD_SEQUENCE;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_cancel(_tx: &OfferCancel<'_>, _ctx: &PreclaimContext<'_>) -> TransactionResult {
    TransactionResult::tesSUCCESS
}

pub fn apply_cancel(tx: &OfferCancel<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_cancel_steps(tx, ctx))
}

fn apply_cancel_steps(tx: &OfferCancel<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let key = keylet::offer(&ctx.account, tx.offer_sequence);
    // Cancelling an offer that never rested is a no-op success.
    if common::internal(ctx.view.exists(&key))? {
        remove_offer(ctx, &key, &ctx.account.clone())?;
    }
    Ok(())
}

fn remove_offer(
    ctx: &mut ApplyContext<'_>,
    key: &crate::core::binarycodec::types::Hash256,
    owner: &crate::core::binarycodec::types::AccountId,
) -> TxStep {
    common::internal(ctx.view.erase(key))?;
    common::remove_from_owner_dir(ctx.view, owner, key)?;
    common::internal(ctx.view.adjust_owner_count(owner, -1))?;
    Ok(())
}

fn to_static(
    amount: &crate::models::amount::Amount<'_>,
) -> crate::models::amount::Amount<'static> {
    use crate::models::amount::{Amount, IssuedCurrencyAmount};
    match amount {
        Amount::XRPAmount(drops) => Amount::XRPAmount(drops.0.to_string().into()),
        Amount::IssuedCurrencyAmount(issued) => {
            Amount::IssuedCurrencyAmount(IssuedCurrencyAmount::new(
                issued.currency.to_string().into(),
                issued.issuer.to_string().into(),
                issued.value.to_string().into(),
            ))
        }
    }
}
