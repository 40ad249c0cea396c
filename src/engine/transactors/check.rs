//! The Check family: deferred payments created by the sender and
//! cashed by the destination.

use core::str::FromStr;

use crate::core::binarycodec::types::{Hash256, IssuedValue};
use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::amount::LedgerAmount;
use crate::ledger::objects::{
    Check as CheckObj, LedgerEntry, LedgerEntryType, LSF_DISALLOW_INCOMING_CHECK,
};
use crate::ledger::rules::FEATURE_CHECK_CASH_MAKES_TRUST_LINE;
use crate::models::amount::Amount;
use crate::models::transactions::check_cancel::CheckCancel;
use crate::models::transactions::check_cash::CheckCash;
use crate::models::transactions::check_create::CheckCreate;

pub fn preflight_create(tx: &CheckCreate<'_>) -> TransactionResult {
    match common::parse_amount(&tx.send_max) {
        Ok(send_max) if send_max.is_positive() => {}
        Ok(_) => return TransactionResult::temBAD_AMOUNT,
        Err(code) => return code,
    }
    if tx.expiration == Some(0) {
        return TransactionResult::temBAD_EXPIRATION;
    }
    if common::parse_account(&tx.destination).is_err() {
        return TransactionResult::temDST_NEEDED;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_create(tx: &CheckCreate<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let Ok(destination) = common::parse_account(&tx.destination) else {
        return TransactionResult::temDST_NEEDED;
    };
    let destination_root = match ctx.view.account_root(&destination) {
        Ok(Some(root)) => root,
        Ok(None) => return TransactionResult::tecNO_DST,
        Err(_) => return TransactionResult::tefINTERNAL,
    };

    if let Err(code) = common::check_destination_tag(&destination_root, tx.destination_tag) {
        return code;
    }
    if destination_root.has_flag(LSF_DISALLOW_INCOMING_CHECK) {
        return TransactionResult::tecNO_PERMISSION;
    }

    // An expired check cannot be written.
    if let Some(expiration) = tx.expiration {
        if expiration <= ctx.parent_close_time {
            return TransactionResult::tecEXPIRED;
        }
    }

    // A frozen source cannot promise funds it could not send.
    if let Ok(LedgerAmount::Issued(issued)) = common::parse_amount(&tx.send_max) {
        match common::is_frozen(ctx.view, &ctx.account, &issued.currency, &issued.issuer) {
            Ok(true) => return TransactionResult::tecFROZEN,
            Ok(false) => {}
            Err(code) => return code,
        }
    }

    TransactionResult::tesSUCCESS
}

pub fn apply_create(tx: &CheckCreate<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_create_steps(tx, ctx))
}

fn apply_create_steps(tx: &CheckCreate<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let destination = common::parse_account(&tx.destination)?;
    let root = common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;

    if root.balance < ctx.view.reserve(root.owner_count + 1) {
        return Err(TransactionResult::tecINSUFFICIENT_RESERVE);
    }

    // Keyed by the sequence (or ticket) the transaction consumed.
    let sequence = tx
        .common_fields
        .sequence
        .or(tx.common_fields.ticket_sequence)
        .ok_or(TransactionResult::tefINTERNAL)?;
    let key = keylet::check(&ctx.account, sequence);

    let check = CheckObj {
        ledger_entry_type: LedgerEntryType::Check,
        flags: 0,
        account: ctx.account,
        destination,
        send_max: to_static_amount(&tx.send_max),
        sequence,
        source_tag: tx.common_fields.source_tag,
        destination_tag: tx.destination_tag,
        expiration: tx.expiration,
        invoice_id: match &tx.invoice_id {
            Some(invoice_id) => Some(
                Hash256::from_str(invoice_id).map_err(|_| TransactionResult::temMALFORMED)?,
            ),
            None => None,
        },
        owner_node: 0,
        previous_txn_id: None,
        previous_txn_lgr_seq: None,
    };

    common::internal(ctx.view.insert(key, LedgerEntry::Check(check)))?;
    common::add_to_owner_dir(ctx.view, &ctx.account, &key)?;
    common::internal(ctx.view.adjust_owner_count(&ctx.account, 1))?;
    Ok(())
}

pub fn preflight_cash(tx: &CheckCash<'_>) -> TransactionResult {
    let requested = tx.amount.as_ref().or(tx.deliver_min.as_ref());
    match requested {
        Some(amount) => match common::parse_amount(amount) {
            Ok(amount) if amount.is_positive() => {}
            Ok(_) => return TransactionResult::temBAD_AMOUNT,
            Err(code) => return code,
        },
        None => return TransactionResult::temMALFORMED,
    }
    if Hash256::from_str(&tx.check_id).is_err() {
        return TransactionResult::temMALFORMED;
    }
    TransactionResult::tesSUCCESS
}

fn load_check(
    view: &crate::ledger::view::LedgerView,
    check_id: &str,
) -> TxStep<(Hash256, CheckObj)> {
    let key = Hash256::from_str(check_id).map_err(|_| TransactionResult::temMALFORMED)?;
    match common::internal(view.peek(&key))? {
        Some(LedgerEntry::Check(check)) => Ok((key, check)),
        _ => Err(TransactionResult::tecNO_ENTRY),
    }
}

pub fn preclaim_cash(tx: &CheckCash<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let (_, check) = match load_check(ctx.view, &tx.check_id) {
        Ok(found) => found,
        Err(code) => return code,
    };

    // Only the named destination may cash.
    if check.destination != ctx.account {
        return TransactionResult::tecNO_PERMISSION;
    }
    if let Some(expiration) = check.expiration {
        if expiration <= ctx.parent_close_time {
            return TransactionResult::tecEXPIRED;
        }
    }

    // The cashed currency must match the promise.
    let requested = tx.amount.as_ref().or(tx.deliver_min.as_ref());
    if let (Some(requested), Ok(promised)) =
        (requested, common::parse_amount(&check.send_max))
    {
        match common::parse_amount(requested) {
            Ok(requested) if requested.currency() == promised.currency() => {}
            Ok(_) => return TransactionResult::temBAD_CURRENCY,
            Err(code) => return code,
        }
    }

    TransactionResult::tesSUCCESS
}

pub fn apply_cash(tx: &CheckCash<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_cash_steps(tx, ctx))
}

fn apply_cash_steps(tx: &CheckCash<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let (check_key, check) = load_check(ctx.view, &tx.check_id)?;
    let writer = check.account;

    let exact_mode = tx.amount.is_some();
    let requested = common::parse_amount(
        tx.amount
            .as_ref()
            .or(tx.deliver_min.as_ref())
            .ok_or(TransactionResult::temMALFORMED)?,
    )?;
    let promised = common::parse_amount(&check.send_max)?;

    match (promised, requested) {
        (LedgerAmount::Xrp(promised), LedgerAmount::Xrp(requested)) => {
            let writer_root =
                common::load_account(ctx.view, &writer, TransactionResult::tefINTERNAL)?;
            let available = common::spendable_xrp(ctx.view, &writer_root).min(promised.0);

            let delivered = if exact_mode {
                if requested.0 > promised.0 {
                    return Err(TransactionResult::tecPATH_PARTIAL);
                }
                if requested.0 > available {
                    return Err(TransactionResult::tecUNFUNDED_PAYMENT);
                }
                requested.0
            } else {
                if available < requested.0 {
                    return Err(TransactionResult::tecPATH_PARTIAL);
                }
                available
            };

            common::transfer_xrp(ctx.view, &writer, &ctx.account, delivered, true)?;
            ctx.delivered_amount = Some(serde_json::json!(delivered.to_string()));
        }
        (LedgerAmount::Issued(promised), LedgerAmount::Issued(requested)) => {
            let currency = promised.currency;
            let issuer = promised.issuer;

            let available = if writer == issuer {
                promised.value
            } else {
                let balance =
                    common::issued_balance(ctx.view, &writer, &currency, &issuer)?;
                if balance < promised.value {
                    balance
                } else {
                    promised.value
                }
            };

            let delivered = if exact_mode {
                if requested.value > promised.value {
                    return Err(TransactionResult::tecPATH_PARTIAL);
                }
                if requested.value > available {
                    return Err(TransactionResult::tecUNFUNDED_PAYMENT);
                }
                requested.value
            } else {
                if available < requested.value {
                    return Err(TransactionResult::tecPATH_PARTIAL);
                }
                available
            };
            if delivered.is_zero() {
                return Err(TransactionResult::tecPATH_PARTIAL);
            }

            // The casher may need a fresh trust line, amendment
            // permitting, and must be able to afford its reserve.
            let line_missing =
                common::get_line(ctx.view, &ctx.account, &issuer, &currency)?.is_none()
                    && ctx.account != issuer;
            if line_missing {
                if !ctx.rules.enabled(FEATURE_CHECK_CASH_MAKES_TRUST_LINE) {
                    return Err(TransactionResult::tecNO_LINE);
                }
                let casher_root = common::load_account(
                    ctx.view,
                    &ctx.account,
                    TransactionResult::tefINTERNAL,
                )?;
                if casher_root.balance < ctx.view.reserve(casher_root.owner_count + 1) {
                    return Err(TransactionResult::tecNO_LINE_INSUF_RESERVE);
                }
                common::create_line_with_balance(
                    ctx.view,
                    &ctx.account,
                    &issuer,
                    &currency,
                    IssuedValue::ZERO,
                    delivered,
                    true,
                )?;
            }

            common::transfer_issued(
                ctx.view,
                &writer,
                &ctx.account,
                &currency,
                &issuer,
                delivered,
                crate::constants::TRANSFER_RATE_PARTS,
            )?;
            ctx.delivered_amount = Some(serde_json::json!({
                "currency": currency.to_string(),
                "issuer": issuer.to_string(),
                "value": delivered.to_string(),
            }));
        }
        _ => return Err(TransactionResult::temBAD_CURRENCY),
    }

    remove_check(ctx, &check_key, &writer)
}

pub fn preflight_cancel(tx: &CheckCancel<'_>) -> TransactionResult {
    if Hash256::from_str(&tx.check_id).is_err() {
        return TransactionResult::temMALFORMED;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_cancel(tx: &CheckCancel<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let (_, check) = match load_check(ctx.view, &tx.check_id) {
        Ok(found) => found,
        Err(code) => return code,
    };

    let expired = check
        .expiration
        .map(|expiration| expiration <= ctx.parent_close_time)
        .unwrap_or(false);

    // Creator and destination may cancel any time; after expiration,
    // anyone may clean up.
    if !expired && check.account != ctx.account && check.destination != ctx.account {
        return TransactionResult::tecNO_PERMISSION;
    }
    TransactionResult::tesSUCCESS
}

pub fn apply_cancel(tx: &CheckCancel<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_cancel_steps(tx, ctx))
}

fn apply_cancel_steps(tx: &CheckCancel<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let (check_key, check) = load_check(ctx.view, &tx.check_id)?;
    let writer = check.account;
    remove_check(ctx, &check_key, &writer)
}

fn remove_check(
    ctx: &mut ApplyContext<'_>,
    check_key: &Hash256,
    writer: &crate::core::binarycodec::types::AccountId,
) -> TxStep {
    common::internal(ctx.view.erase(check_key))?;
    common::remove_from_owner_dir(ctx.view, writer, check_key)?;
    common::internal(ctx.view.adjust_owner_count(writer, -1))?;
    Ok(())
}

fn to_static_amount(amount: &Amount<'_>) -> Amount<'static> {
    match amount {
        Amount::XRPAmount(drops) => Amount::XRPAmount(drops.0.to_string().into()),
        Amount::IssuedCurrencyAmount(issued) => {
            Amount::IssuedCurrencyAmount(crate::models::amount::IssuedCurrencyAmount::new(
                issued.currency.to_string().into(),
                issued.issuer.to_string().into(),
                issued.value.to_string().into(),
            ))
        }
    }
}
