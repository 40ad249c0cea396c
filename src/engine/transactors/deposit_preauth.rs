//! DepositPreauth: grants or revokes a sender's preauthorization to
//! deliver into a deposit-guarded account.

use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::objects::{DepositPreauthObj, LedgerEntry, LedgerEntryType};
use crate::models::transactions::deposit_preauth::DepositPreauth;

pub fn preflight(tx: &DepositPreauth<'_>) -> TransactionResult {
    let target = match (&tx.authorize, &tx.unauthorize) {
        (Some(target), None) | (None, Some(target)) => target,
        _ => return TransactionResult::temMALFORMED,
    };
    if *target == tx.common_fields.account {
        return TransactionResult::temCANNOT_PREAUTH_SELF;
    }
    if common::parse_account(target).is_err() {
        return TransactionResult::temINVALID_ACCOUNT_ID;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim(tx: &DepositPreauth<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    if let Some(authorize) = &tx.authorize {
        let Ok(authorized) = common::parse_account(authorize) else {
            return TransactionResult::temINVALID_ACCOUNT_ID;
        };

        match ctx.view.account_root(&authorized) {
            Ok(Some(_)) => {}
            Ok(None) => return TransactionResult::tecNO_TARGET,
            Err(_) => return TransactionResult::tefINTERNAL,
        }

        let key = keylet::deposit_preauth(&ctx.account, &authorized);
        if ctx.view.exists(&key).unwrap_or(false) {
            return TransactionResult::tecDUPLICATE;
        }
    }

    if let Some(unauthorize) = &tx.unauthorize {
        let Ok(unauthorized) = common::parse_account(unauthorize) else {
            return TransactionResult::temINVALID_ACCOUNT_ID;
        };
        let key = keylet::deposit_preauth(&ctx.account, &unauthorized);
        if !ctx.view.exists(&key).unwrap_or(false) {
            return TransactionResult::tecNO_ENTRY;
        }
    }

    TransactionResult::tesSUCCESS
}

pub fn apply(tx: &DepositPreauth<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_steps(tx, ctx))
}

fn apply_steps(tx: &DepositPreauth<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    if let Some(authorize) = &tx.authorize {
        let authorized = common::parse_account(authorize)?;

        let root =
            common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;
        if root.balance < ctx.view.reserve(root.owner_count + 1) {
            return Err(TransactionResult::tecINSUFFICIENT_RESERVE);
        }

        let key = keylet::deposit_preauth(&ctx.account, &authorized);
        let entry = DepositPreauthObj {
            ledger_entry_type: LedgerEntryType::DepositPreauth,
            flags: 0,
            account: ctx.account,
            authorize: authorized,
            owner_node: 0,
            previous_txn_id: None,
            previous_txn_lgr_seq: None,
        };
        common::internal(ctx.view.insert(key, LedgerEntry::DepositPreauth(entry)))?;
        common::add_to_owner_dir(ctx.view, &ctx.account, &key)?;
        common::internal(ctx.view.adjust_owner_count(&ctx.account, 1))?;
    }

    if let Some(unauthorize) = &tx.unauthorize {
        let unauthorized = common::parse_account(unauthorize)?;
        let key = keylet::deposit_preauth(&ctx.account, &unauthorized);
        common::internal(ctx.view.erase(&key))?;
        common::remove_from_owner_dir(ctx.view, &ctx.account, &key)?;
        common::internal(ctx.view.adjust_owner_count(&ctx.account, -1))?;
    }
    Ok(())
}
