//! Batch: applies a group of inner transactions under one outer fee,
//! with all-or-nothing and related modes.
//!
//! Inner transactions here are same-account, fee-free, unsigned
//! envelopes; the outer signature covers them all.

use core::str::FromStr;

use crate::core::binarycodec::types::AccountId;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::rules::Rules;
use crate::models::transactions::batch::{Batch, BatchFlag, MAX_BATCH_TRANSACTIONS};
use crate::models::transactions::{Transaction, TransactionEnvelope, TransactionType};

pub fn preflight(tx: &Batch<'_>, rules: &Rules) -> TransactionResult {
    use strum::IntoEnumIterator;
    let modes = BatchFlag::iter().filter(|flag| tx.has_flag(flag)).count();
    if modes != 1 {
        return TransactionResult::temINVALID_FLAG;
    }
    if tx.raw_transactions.is_empty() || tx.raw_transactions.len() > MAX_BATCH_TRANSACTIONS {
        return TransactionResult::temARRAY_TOO_LARGE;
    }

    for raw in &tx.raw_transactions {
        let Ok(inner) = TransactionEnvelope::from_value(&raw.raw_transaction) else {
            return TransactionResult::temMALFORMED;
        };
        // No nesting, no separate economics inside the batch.
        if inner.tx_type() == TransactionType::Batch {
            return TransactionResult::temMALFORMED;
        }
        if inner.account() != tx.common_fields.account {
            return TransactionResult::temBAD_SRC_ACCOUNT;
        }
        if inner.fee_drops().unwrap_or(0) != 0 {
            return TransactionResult::temBAD_FEE;
        }
        if inner.txn_signature().is_some() || inner.signers().is_some() {
            return TransactionResult::temBAD_SIGNATURE;
        }
        for feature in super::required_features(&inner.tx_type()) {
            if !rules.enabled(feature) {
                return TransactionResult::temDISABLED;
            }
        }
    }

    TransactionResult::tesSUCCESS
}

pub fn preclaim(_tx: &Batch<'_>, _ctx: &PreclaimContext<'_>) -> TransactionResult {
    // Inner preconditions shift between inner applications; each one
    // is judged in sequence during apply.
    TransactionResult::tesSUCCESS
}

pub fn apply(tx: &Batch<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_steps(tx, ctx))
}

fn apply_steps(tx: &Batch<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let all_or_nothing = tx.has_flag(&BatchFlag::TfAllOrNothing);
    let only_one = tx.has_flag(&BatchFlag::TfOnlyOne);
    let until_failure = tx.has_flag(&BatchFlag::TfUntilFailure);

    let batch_start = ctx.view.checkpoint();
    let mut any_succeeded = false;

    for raw in &tx.raw_transactions {
        let inner = TransactionEnvelope::from_value(&raw.raw_transaction)
            .map_err(|_| TransactionResult::temMALFORMED)?;

        let attempt_start = ctx.view.checkpoint();
        let result = apply_inner(&inner, ctx);

        if result.is_success() {
            any_succeeded = true;
            if only_one {
                return Ok(());
            }
        } else {
            ctx.view.rollback(attempt_start);
            if all_or_nothing {
                ctx.view.rollback(batch_start);
                return Err(TransactionResult::tecINCOMPLETE);
            }
            if until_failure {
                break;
            }
        }
    }

    if !any_succeeded {
        ctx.view.rollback(batch_start);
        return Err(TransactionResult::tecINCOMPLETE);
    }
    Ok(())
}

/// One inner transaction: sequence consumption plus its transactor
/// phases, with no fee and no signature of its own.
fn apply_inner(inner: &TransactionEnvelope, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    let Ok(account) = AccountId::from_str(&inner.account()) else {
        return TransactionResult::temBAD_SRC_ACCOUNT;
    };
    debug_assert_eq!(account, ctx.account);

    let Ok(Some(mut root)) = ctx.view.account_root(&account) else {
        return TransactionResult::terNO_ACCOUNT;
    };

    if let Some(sequence) = inner.sequence() {
        if sequence != root.sequence {
            return if sequence < root.sequence {
                TransactionResult::tefPAST_SEQ
            } else {
                TransactionResult::terPRE_SEQ
            };
        }
        root.sequence += 1;
        if ctx.view.put_account_root(root.clone()).is_err() {
            return TransactionResult::tefINTERNAL;
        }
    }

    let preclaim_ctx = PreclaimContext {
        view: &*ctx.view,
        rules: ctx.rules,
        account,
        root,
        ledger_seq: ctx.ledger_seq,
        parent_close_time: ctx.parent_close_time,
        standalone: ctx.standalone,
    };
    let preclaim = super::preclaim(inner, &preclaim_ctx);
    if preclaim != TransactionResult::tesSUCCESS {
        return preclaim;
    }

    let mut inner_ctx = ApplyContext {
        view: &mut *ctx.view,
        rules: ctx.rules,
        account,
        tx_hash: ctx.tx_hash,
        ledger_seq: ctx.ledger_seq,
        parent_close_time: ctx.parent_close_time,
        standalone: ctx.standalone,
        delivered_amount: None,
    };
    super::apply(inner, &mut inner_ctx)
}
