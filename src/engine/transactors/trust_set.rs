//! TrustSet: creates or adjusts one side of a trust line.

use core::str::FromStr;

use crate::core::binarycodec::types::{Currency, IssuedValue};
use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::objects::{
    LedgerEntry, LSF_HIGH_AUTH, LSF_HIGH_FREEZE, LSF_HIGH_NO_RIPPLE, LSF_HIGH_RESERVE,
    LSF_LOW_AUTH, LSF_LOW_FREEZE, LSF_LOW_NO_RIPPLE, LSF_LOW_RESERVE, LSF_NO_FREEZE,
    LSF_DISALLOW_INCOMING_TRUSTLINE,
};
use crate::models::transactions::trust_set::{TrustSet, TrustSetFlag};
use crate::models::transactions::Transaction;

pub fn preflight(tx: &TrustSet<'_>) -> TransactionResult {
    let Ok(currency) = Currency::from_str(&tx.limit_amount.currency) else {
        return TransactionResult::temBAD_CURRENCY;
    };
    if currency.is_xrp() {
        return TransactionResult::temBAD_LIMIT;
    }
    let Ok(limit) = IssuedValue::from_str(&tx.limit_amount.value) else {
        return TransactionResult::temBAD_LIMIT;
    };
    if limit.is_negative() {
        return TransactionResult::temBAD_LIMIT;
    }
    if common::parse_account(&tx.limit_amount.issuer).is_err() {
        return TransactionResult::temDST_NEEDED;
    }
    if tx.has_flag(&TrustSetFlag::TfSetNoRipple) && tx.has_flag(&TrustSetFlag::TfClearNoRipple)
    {
        return TransactionResult::temINVALID_FLAG;
    }
    if tx.has_flag(&TrustSetFlag::TfSetFreeze) && tx.has_flag(&TrustSetFlag::TfClearFreeze) {
        return TransactionResult::temINVALID_FLAG;
    }

    TransactionResult::tesSUCCESS
}

pub fn preclaim(tx: &TrustSet<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let Ok(issuer) = common::parse_account(&tx.limit_amount.issuer) else {
        return TransactionResult::temDST_NEEDED;
    };

    let issuer_root = match ctx.view.account_root(&issuer) {
        Ok(Some(root)) => root,
        Ok(None) => return TransactionResult::tecNO_ISSUER,
        Err(_) => return TransactionResult::tefINTERNAL,
    };

    // Freezing is renounceable; the NoFreeze account cannot freeze.
    if tx.has_flag(&TrustSetFlag::TfSetFreeze) && ctx.root.has_flag(LSF_NO_FREEZE) {
        return TransactionResult::tecNO_PERMISSION;
    }

    // A brand-new incoming line can be refused wholesale.
    let currency = match Currency::from_str(&tx.limit_amount.currency) {
        Ok(currency) => currency,
        Err(_) => return TransactionResult::temBAD_CURRENCY,
    };
    let line_exists = ctx
        .view
        .exists(&keylet::line(&ctx.account, &issuer, &currency))
        .unwrap_or(false);
    if !line_exists && issuer_root.has_flag(LSF_DISALLOW_INCOMING_TRUSTLINE) {
        return TransactionResult::tecNO_PERMISSION;
    }

    TransactionResult::tesSUCCESS
}

pub fn apply(tx: &TrustSet<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_steps(tx, ctx))
}

fn apply_steps(tx: &TrustSet<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let issuer = common::parse_account(&tx.limit_amount.issuer)?;
    let currency =
        Currency::from_str(&tx.limit_amount.currency).map_err(|_| TransactionResult::temBAD_CURRENCY)?;
    let limit =
        IssuedValue::from_str(&tx.limit_amount.value).map_err(|_| TransactionResult::temBAD_LIMIT)?;

    let key = keylet::line(&ctx.account, &issuer, &currency);
    let (low, _high) = common::line_sides(&ctx.account, &issuer);
    let account_is_low = low == ctx.account;

    let existing = common::get_line(ctx.view, &ctx.account, &issuer, &currency)?;

    let Some(mut state) = existing else {
        if limit.is_zero() && tx.quality_in.is_none() && tx.quality_out.is_none() {
            // Nothing to record.
            return Err(TransactionResult::tecNO_LINE_REDUNDANT);
        }

        let root =
            common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;
        if root.balance < ctx.view.reserve(root.owner_count + 1) {
            return Err(TransactionResult::tecINSUF_RESERVE_LINE);
        }

        common::create_line_with_balance(
            ctx.view,
            &ctx.account,
            &issuer,
            &currency,
            IssuedValue::ZERO,
            limit,
            true,
        )?;
        let mut state = common::get_line(ctx.view, &ctx.account, &issuer, &currency)?
            .ok_or(TransactionResult::tefINTERNAL)?;
        apply_line_flags(tx, &mut state, account_is_low);
        set_qualities(tx, &mut state, account_is_low);
        common::internal(ctx.view.update(key, LedgerEntry::RippleState(state)))?;
        return Ok(());
    };

    // Adjust the caller's side of an existing line.
    if account_is_low {
        state.low_limit.value = limit.to_string().into();
    } else {
        state.high_limit.value = limit.to_string().into();
    }
    set_qualities(tx, &mut state, account_is_low);
    apply_line_flags(tx, &mut state, account_is_low);

    // Freshly trusting a side picks up the reserve; dropping back to
    // default releases it (or deletes the line outright).
    let reserve_flag = if account_is_low {
        LSF_LOW_RESERVE
    } else {
        LSF_HIGH_RESERVE
    };
    let side_in_use = !limit.is_zero()
        || tx.quality_in.unwrap_or(0) != 0
        || tx.quality_out.unwrap_or(0) != 0;

    if side_in_use && state.flags & reserve_flag == 0 {
        let root =
            common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;
        if root.balance < ctx.view.reserve(root.owner_count + 1) {
            return Err(TransactionResult::tecINSUF_RESERVE_LINE);
        }
        state.flags |= reserve_flag;
        common::add_to_owner_dir(ctx.view, &ctx.account, &key)?;
        common::internal(ctx.view.adjust_owner_count(&ctx.account, 1))?;
    } else if !side_in_use && state.flags & reserve_flag != 0 {
        let balance = IssuedValue::from_str(&state.balance.value)
            .map_err(|_| TransactionResult::tefINTERNAL)?;
        let holder_balance = if account_is_low {
            balance
        } else {
            balance.negate()
        };
        // Only an empty side can surrender its reserve.
        if holder_balance.is_zero() || holder_balance.is_negative() {
            state.flags &= !reserve_flag;
            common::remove_from_owner_dir(ctx.view, &ctx.account, &key)?;
            common::internal(ctx.view.adjust_owner_count(&ctx.account, -1))?;
        }
    }

    if common::line_is_default(&state)?
        && state.flags & (LSF_LOW_RESERVE | LSF_HIGH_RESERVE) == 0
    {
        common::internal(ctx.view.erase(&key))?;
    } else {
        common::internal(ctx.view.update(key, LedgerEntry::RippleState(state)))?;
    }
    Ok(())
}

fn set_qualities(
    tx: &TrustSet<'_>,
    state: &mut crate::ledger::objects::RippleState,
    account_is_low: bool,
) {
    let quality_in = tx.quality_in.filter(|quality| *quality != 0);
    let quality_out = tx.quality_out.filter(|quality| *quality != 0);

    if account_is_low {
        if tx.quality_in.is_some() {
            state.low_quality_in = quality_in;
        }
        if tx.quality_out.is_some() {
            state.low_quality_out = quality_out;
        }
    } else {
        if tx.quality_in.is_some() {
            state.high_quality_in = quality_in;
        }
        if tx.quality_out.is_some() {
            state.high_quality_out = quality_out;
        }
    }
}

fn apply_line_flags(
    tx: &TrustSet<'_>,
    state: &mut crate::ledger::objects::RippleState,
    account_is_low: bool,
) {
    let (no_ripple, freeze, auth) = if account_is_low {
        (LSF_LOW_NO_RIPPLE, LSF_LOW_FREEZE, LSF_LOW_AUTH)
    } else {
        (LSF_HIGH_NO_RIPPLE, LSF_HIGH_FREEZE, LSF_HIGH_AUTH)
    };

    if tx.has_flag(&TrustSetFlag::TfSetNoRipple) {
        state.flags |= no_ripple;
    }
    if tx.has_flag(&TrustSetFlag::TfClearNoRipple) {
        state.flags &= !no_ripple;
    }
    if tx.has_flag(&TrustSetFlag::TfSetFreeze) {
        state.flags |= freeze;
    }
    if tx.has_flag(&TrustSetFlag::TfClearFreeze) {
        state.flags &= !freeze;
    }
    // Authorization, once granted, stays.
    if tx.has_flag(&TrustSetFlag::TfSetfAuth) {
        state.flags |= auth;
    }
}
