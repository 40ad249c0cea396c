//! AccountDelete: removes an emptied account, forwarding its
//! remaining XRP to the destination.

use crate::constants::ACCOUNT_DELETE_SEQUENCE_GAP;
use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::models::transactions::account_delete::AccountDelete;

pub fn preflight(tx: &AccountDelete<'_>) -> TransactionResult {
    match common::parse_account(&tx.destination) {
        Ok(destination) if destination.to_address() != tx.common_fields.account => {
            TransactionResult::tesSUCCESS
        }
        Ok(_) => TransactionResult::temDST_IS_SRC,
        Err(code) => code,
    }
}

pub fn preclaim(tx: &AccountDelete<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    // The account must have burned through enough sequence numbers
    // that a replayed history cannot resurrect it. Standalone test
    // ledgers skip the wait.
    if !ctx.standalone
        && ctx.root.sequence + ACCOUNT_DELETE_SEQUENCE_GAP > ctx.ledger_seq
    {
        return TransactionResult::tefTOO_BIG;
    }

    if ctx.root.owner_count > 0 {
        return TransactionResult::tecHAS_OBLIGATIONS;
    }

    let destination = match common::parse_account(&tx.destination) {
        Ok(destination) => destination,
        Err(code) => return code,
    };
    let destination_root = match ctx.view.account_root(&destination) {
        Ok(Some(root)) => root,
        Ok(None) => return TransactionResult::tecNO_DST,
        Err(_) => return TransactionResult::tefINTERNAL,
    };

    if let Err(code) = common::check_destination_tag(&destination_root, tx.destination_tag) {
        return code;
    }
    if let Err(code) =
        common::check_deposit_auth(ctx.view, &ctx.account, &destination, &destination_root)
    {
        return code;
    }

    TransactionResult::tesSUCCESS
}

pub fn apply(tx: &AccountDelete<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_steps(tx, ctx))
}

fn apply_steps(tx: &AccountDelete<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let destination = common::parse_account(&tx.destination)?;

    let root = common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;
    let mut destination_root =
        common::load_account(ctx.view, &destination, TransactionResult::tecNO_DST)?;

    destination_root.balance += root.balance;
    common::internal(ctx.view.put_account_root(destination_root))?;

    // The directory is empty once the owner count reaches zero.
    let dir_key = keylet::owner_dir(&ctx.account);
    if common::internal(ctx.view.exists(&dir_key))? {
        common::internal(ctx.view.erase(&dir_key))?;
    }
    common::internal(ctx.view.erase(&keylet::account(&ctx.account)))?;
    Ok(())
}
