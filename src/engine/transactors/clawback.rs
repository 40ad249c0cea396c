//! Clawback: issuer-initiated reversal of an issued holding on an
//! opted-in trust line.

use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::objects::LSF_ALLOW_TRUSTLINE_CLAWBACK;
use crate::models::transactions::clawback::Clawback;

pub fn preflight(tx: &Clawback<'_>) -> TransactionResult {
    // In Clawback's Amount, the issuer sub-field names the holder.
    let issued = match common::parse_issued(&tx.amount) {
        Ok(issued) => issued,
        Err(code) => return code,
    };
    if issued.is_zero() || issued.is_negative() {
        return TransactionResult::temBAD_AMOUNT;
    }
    if issued.issuer.to_address() == tx.common_fields.account {
        return TransactionResult::temBAD_ISSUER;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim(tx: &Clawback<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    if !ctx.root.has_flag(LSF_ALLOW_TRUSTLINE_CLAWBACK) {
        return TransactionResult::tecNO_PERMISSION;
    }

    let Ok(issued) = common::parse_issued(&tx.amount) else {
        return TransactionResult::temBAD_AMOUNT;
    };
    let holder = issued.issuer;

    match common::get_line(ctx.view, &ctx.account, &holder, &issued.currency) {
        Ok(Some(_)) => TransactionResult::tesSUCCESS,
        Ok(None) => TransactionResult::tecNO_LINE,
        Err(code) => code,
    }
}

pub fn apply(tx: &Clawback<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_steps(tx, ctx))
}

fn apply_steps(tx: &Clawback<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let issued = common::parse_issued(&tx.amount)?;
    let holder = issued.issuer;
    let currency = issued.currency;
    let issuer = ctx.account;

    let held = common::issued_balance(ctx.view, &holder, &currency, &issuer)?;
    if held.is_zero() || held.is_negative() {
        return Err(TransactionResult::tecINSUFFICIENT_FUNDS);
    }

    // Partial amounts are fine; claw back at most what is held.
    let clawed = if issued.value < held { issued.value } else { held };

    let remaining = crate::ledger::amount::add_values(&held, &clawed.negate())
        .map_err(|_| TransactionResult::tefINTERNAL)?;
    common::set_line_balance(ctx.view, &holder, &issuer, &currency, remaining)?;
    Ok(())
}
