//! Payment: XRP transfers (creating destinations when funded past
//! the base reserve) and issued-currency transfers over direct trust
//! lines through the issuer.

use core::str::FromStr;

use crate::constants::TRANSFER_RATE_PARTS;
use crate::core::binarycodec::types::IssuedValue;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::amount::{scale_value, with_transfer_rate, LedgerAmount};
use crate::ledger::objects::{AccountRoot, LSF_DISALLOW_XRP};
use crate::models::amount::Amount;
use crate::models::transactions::payment::{Payment, PaymentFlag};
use crate::models::transactions::Transaction;

pub fn preflight(tx: &Payment<'_>) -> TransactionResult {
    complete(preflight_steps(tx))
}

fn preflight_steps(tx: &Payment<'_>) -> TxStep {
    let amount = common::parse_amount(&tx.amount)?;
    if !amount.is_positive() {
        return Err(TransactionResult::temBAD_AMOUNT);
    }
    common::parse_account(&tx.destination)?;

    let partial = tx.has_flag(&PaymentFlag::TfPartialPayment);
    if amount.is_xrp() {
        if let Some(send_max) = &tx.send_max {
            if send_max.is_xrp() {
                return Err(TransactionResult::temBAD_SEND_XRP_MAX);
            }
        }
        if tx.send_max.is_none() && partial {
            return Err(TransactionResult::temBAD_SEND_XRP_PARTIAL);
        }
    }

    if let Some(send_max) = &tx.send_max {
        if !common::parse_amount(send_max)?.is_positive() {
            return Err(TransactionResult::temBAD_AMOUNT);
        }
    }
    if let Some(deliver_min) = &tx.deliver_min {
        let deliver_min = common::parse_amount(deliver_min)?;
        if !deliver_min.is_positive() || deliver_min.currency() != amount.currency() {
            return Err(TransactionResult::temBAD_AMOUNT);
        }
    }

    Ok(())
}

pub fn preclaim(_tx: &Payment<'_>, _ctx: &PreclaimContext<'_>) -> TransactionResult {
    // Destination and funding states can change before apply; they
    // are judged there, as claimed failures.
    TransactionResult::tesSUCCESS
}

pub fn apply(tx: &Payment<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_steps(tx, ctx))
}

fn apply_steps(tx: &Payment<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let destination = common::parse_account(&tx.destination)?;

    match common::parse_amount(&tx.amount)? {
        LedgerAmount::Xrp(drops) => apply_xrp(tx, ctx, destination, drops.0),
        LedgerAmount::Issued(issued) => apply_issued(tx, ctx, destination, issued),
    }
}

fn apply_xrp(
    tx: &Payment<'_>,
    ctx: &mut ApplyContext<'_>,
    destination: crate::core::binarycodec::types::AccountId,
    drops: i64,
) -> TxStep {
    match common::internal(ctx.view.account_root(&destination))? {
        Some(destination_root) => {
            common::check_destination_tag(&destination_root, tx.destination_tag)?;
            if destination_root.has_flag(LSF_DISALLOW_XRP) {
                return Err(TransactionResult::tecNO_PERMISSION);
            }
            common::check_deposit_auth(ctx.view, &ctx.account, &destination, &destination_root)?;
            common::transfer_xrp(ctx.view, &ctx.account, &destination, drops, true)?;
        }
        None => {
            // Funding a new account requires at least the base
            // reserve.
            if drops < ctx.view.reserve(0) {
                return Err(TransactionResult::tecNO_DST_INSUF_XRP);
            }

            let mut source =
                common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;
            if source.balance - drops < ctx.view.reserve(source.owner_count) {
                return Err(TransactionResult::tecUNFUNDED_PAYMENT);
            }
            source.balance -= drops;
            common::internal(ctx.view.put_account_root(source))?;

            let created = AccountRoot::new(destination, drops, ctx.ledger_seq);
            common::internal(ctx.view.put_account_root(created))?;
        }
    }

    ctx.delivered_amount = Some(serde_json::json!(drops.to_string()));
    Ok(())
}

fn apply_issued(
    tx: &Payment<'_>,
    ctx: &mut ApplyContext<'_>,
    destination: crate::core::binarycodec::types::AccountId,
    issued: crate::ledger::amount::IssuedAmount,
) -> TxStep {
    let destination_root =
        common::load_account(ctx.view, &destination, TransactionResult::tecNO_DST)?;
    common::check_destination_tag(&destination_root, tx.destination_tag)?;
    common::check_deposit_auth(ctx.view, &ctx.account, &destination, &destination_root)?;

    let currency = issued.currency;
    let issuer = issued.issuer;
    let requested = issued.value;
    let partial = tx.has_flag(&PaymentFlag::TfPartialPayment);

    // The transfer rate applies only when riding through the issuer.
    let transfer_rate = if ctx.account != issuer && destination != issuer {
        common::load_account(ctx.view, &issuer, TransactionResult::tecNO_ISSUER)?
            .transfer_rate
            .unwrap_or(TRANSFER_RATE_PARTS)
    } else {
        TRANSFER_RATE_PARTS
    };

    // How much the sender could deliver at most.
    let deliverable = if ctx.account == issuer {
        requested
    } else {
        let available = common::issued_balance(ctx.view, &ctx.account, &currency, &issuer)?;
        let send_max_cap = match &tx.send_max {
            Some(Amount::IssuedCurrencyAmount(cap)) => {
                IssuedValue::from_str(&cap.value).map_err(|_| TransactionResult::temBAD_AMOUNT)?
            }
            _ => with_transfer_rate(&requested, transfer_rate)
                .map_err(|_| TransactionResult::temBAD_AMOUNT)?,
        };
        let debit_limit = if available < send_max_cap {
            available
        } else {
            send_max_cap
        };
        scale_value(&debit_limit, TRANSFER_RATE_PARTS, transfer_rate)
            .map_err(|_| TransactionResult::temBAD_AMOUNT)?
    };

    let delivered = if deliverable < requested {
        if !partial {
            return Err(TransactionResult::tecPATH_PARTIAL);
        }
        deliverable
    } else {
        requested
    };

    if let Some(Amount::IssuedCurrencyAmount(deliver_min)) = &tx.deliver_min {
        let floor = IssuedValue::from_str(&deliver_min.value)
            .map_err(|_| TransactionResult::temBAD_AMOUNT)?;
        if delivered < floor {
            return Err(TransactionResult::tecPATH_PARTIAL);
        }
    }
    if delivered.is_zero() || delivered.is_negative() {
        return Err(TransactionResult::tecPATH_DRY);
    }

    common::transfer_issued(
        ctx.view,
        &ctx.account,
        &destination,
        &currency,
        &issuer,
        delivered,
        transfer_rate,
    )?;

    ctx.delivered_amount = Some(serde_json::json!({
        "currency": currency.to_string(),
        "issuer": issuer.to_string(),
        "value": delivered.to_string(),
    }));
    Ok(())
}
