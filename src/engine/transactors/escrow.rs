//! The Escrow family: time- and condition-gated XRP.

use sha2::{Digest, Sha256};

use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::objects::{Escrow as EscrowObj, LedgerEntry, LedgerEntryType};
use crate::models::transactions::escrow_cancel::EscrowCancel;
use crate::models::transactions::escrow_create::EscrowCreate;
use crate::models::transactions::escrow_finish::EscrowFinish;

pub fn preflight_create(tx: &EscrowCreate<'_>) -> TransactionResult {
    match tx.amount.as_drops() {
        Ok(drops) if drops > 0 => {}
        _ => return TransactionResult::temBAD_AMOUNT,
    }
    if common::parse_account(&tx.destination).is_err() {
        return TransactionResult::temDST_NEEDED;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_create(tx: &EscrowCreate<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    // The gates must still be in the future.
    if let Some(cancel_after) = tx.cancel_after {
        if cancel_after <= ctx.parent_close_time {
            return TransactionResult::tecNO_PERMISSION;
        }
    }

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

    TransactionResult::tesSUCCESS
}

pub fn apply_create(tx: &EscrowCreate<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_create_steps(tx, ctx))
}

fn apply_create_steps(tx: &EscrowCreate<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let destination = common::parse_account(&tx.destination)?;
    let drops = tx
        .amount
        .as_drops()
        .map_err(|_| TransactionResult::temBAD_AMOUNT)?;

    let mut root = common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;
    if root.balance - drops < ctx.view.reserve(root.owner_count + 1) {
        return Err(TransactionResult::tecUNFUNDED);
    }
    root.balance -= drops;
    common::internal(ctx.view.put_account_root(root))?;

    let sequence = tx
        .common_fields
        .sequence
        .or(tx.common_fields.ticket_sequence)
        .ok_or(TransactionResult::tefINTERNAL)?;
    let key = keylet::escrow(&ctx.account, sequence);

    let escrow = EscrowObj {
        ledger_entry_type: LedgerEntryType::Escrow,
        flags: 0,
        account: ctx.account,
        destination,
        amount: drops,
        condition: tx.condition.as_ref().map(|condition| condition.to_string()),
        cancel_after: tx.cancel_after,
        finish_after: tx.finish_after,
        source_tag: tx.common_fields.source_tag,
        destination_tag: tx.destination_tag,
        owner_node: 0,
        previous_txn_id: None,
        previous_txn_lgr_seq: None,
    };

    common::internal(ctx.view.insert(key, LedgerEntry::Escrow(escrow)))?;
    common::add_to_owner_dir(ctx.view, &ctx.account, &key)?;
    common::internal(ctx.view.adjust_owner_count(&ctx.account, 1))?;
    Ok(())
}

pub fn preflight_finish(tx: &EscrowFinish<'_>) -> TransactionResult {
    if common::parse_account(&tx.owner).is_err() {
        return TransactionResult::temINVALID_ACCOUNT_ID;
    }
    match (&tx.condition, &tx.fulfillment) {
        (Some(_), Some(_)) | (None, None) => TransactionResult::tesSUCCESS,
        _ => TransactionResult::temMALFORMED,
    }
}

fn load_escrow(
    view: &crate::ledger::view::LedgerView,
    owner: &crate::core::binarycodec::types::AccountId,
    offer_sequence: u32,
) -> TxStep<(crate::core::binarycodec::types::Hash256, EscrowObj)> {
    let key = keylet::escrow(owner, offer_sequence);
    match common::internal(view.peek(&key))? {
        Some(LedgerEntry::Escrow(escrow)) => Ok((key, escrow)),
        _ => Err(TransactionResult::tecNO_TARGET),
    }
}

pub fn preclaim_finish(tx: &EscrowFinish<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let Ok(owner) = common::parse_account(&tx.owner) else {
        return TransactionResult::temINVALID_ACCOUNT_ID;
    };
    let (_, escrow) = match load_escrow(ctx.view, &owner, tx.offer_sequence) {
        Ok(found) => found,
        Err(code) => return code,
    };

    // Time gates: not before finish_after, not after cancel_after.
    if let Some(finish_after) = escrow.finish_after {
        if ctx.parent_close_time < finish_after {
            return TransactionResult::tecNO_PERMISSION;
        }
    }
    if let Some(cancel_after) = escrow.cancel_after {
        if ctx.parent_close_time >= cancel_after {
            return TransactionResult::tecNO_PERMISSION;
        }
    }

    // The stored condition is the SHA-256 digest the fulfillment
    // preimage must hash to.
    match (&escrow.condition, &tx.fulfillment) {
        (Some(condition), Some(fulfillment)) => {
            let Ok(preimage) = hex::decode(fulfillment.as_bytes()) else {
                return TransactionResult::tecCRYPTOCONDITION_ERROR;
            };
            let digest = hex::encode_upper(Sha256::digest(&preimage));
            if !condition.eq_ignore_ascii_case(&digest) {
                return TransactionResult::tecCRYPTOCONDITION_ERROR;
            }
        }
        (Some(_), None) => return TransactionResult::tecCRYPTOCONDITION_ERROR,
        (None, Some(_)) => return TransactionResult::tecCRYPTOCONDITION_ERROR,
        (None, None) => {}
    }

    TransactionResult::tesSUCCESS
}

pub fn apply_finish(tx: &EscrowFinish<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_finish_steps(tx, ctx))
}

fn apply_finish_steps(tx: &EscrowFinish<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let owner = common::parse_account(&tx.owner)?;
    let (key, escrow) = load_escrow(ctx.view, &owner, tx.offer_sequence)?;

    let destination_root =
        common::load_account(ctx.view, &escrow.destination, TransactionResult::tecNO_DST)?;
    common::check_deposit_auth(ctx.view, &ctx.account, &escrow.destination, &destination_root)?;

    let mut destination_root = destination_root;
    destination_root.balance += escrow.amount;
    common::internal(ctx.view.put_account_root(destination_root))?;

    common::internal(ctx.view.erase(&key))?;
    common::remove_from_owner_dir(ctx.view, &owner, &key)?;
    common::internal(ctx.view.adjust_owner_count(&owner, -1))?;

    ctx.delivered_amount = Some(serde_json::json!(escrow.amount.to_string()));
    Ok(())
}

pub fn preflight_cancel(tx: &EscrowCancel<'_>) -> TransactionResult {
    if common::parse_account(&tx.owner).is_err() {
        return TransactionResult::temINVALID_ACCOUNT_ID;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_cancel(tx: &EscrowCancel<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let Ok(owner) = common::parse_account(&tx.owner) else {
        return TransactionResult::temINVALID_ACCOUNT_ID;
    };
    let (_, escrow) = match load_escrow(ctx.view, &owner, tx.offer_sequence) {
        Ok(found) => found,
        Err(code) => return code,
    };

    // Only an expired escrow can be cancelled.
    match escrow.cancel_after {
        Some(cancel_after) if ctx.parent_close_time >= cancel_after => {
            TransactionResult::tesSUCCESS
        }
        _ => TransactionResult::tecNO_PERMISSION,
    }
}

pub fn apply_cancel(tx: &EscrowCancel<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_cancel_steps(tx, ctx))
}

fn apply_cancel_steps(tx: &EscrowCancel<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let owner = common::parse_account(&tx.owner)?;
    let (key, escrow) = load_escrow(ctx.view, &owner, tx.offer_sequence)?;

    let mut owner_root =
        common::load_account(ctx.view, &owner, TransactionResult::tefINTERNAL)?;
    owner_root.balance += escrow.amount;
    common::internal(ctx.view.put_account_root(owner_root))?;

    common::internal(ctx.view.erase(&key))?;
    common::remove_from_owner_dir(ctx.view, &owner, &key)?;
    common::internal(ctx.view.adjust_owner_count(&owner, -1))?;
    Ok(())
}
