//! DelegateSet: delegates transaction permissions to another account.

use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::objects::{
    Delegate, LedgerEntry, LedgerEntryType, PermissionEntry, PermissionWrapper,
};
use crate::models::transactions::delegate_set::{DelegateSet, MAX_PERMISSIONS};

pub fn preflight(tx: &DelegateSet<'_>) -> TransactionResult {
    if common::parse_account(&tx.authorize).is_err() {
        return TransactionResult::temINVALID_ACCOUNT_ID;
    }
    if tx.authorize == tx.common_fields.account {
        return TransactionResult::temMALFORMED;
    }
    if tx.permissions.len() > MAX_PERMISSIONS {
        return TransactionResult::temARRAY_TOO_LARGE;
    }

    let mut seen = Vec::with_capacity(tx.permissions.len());
    for permission in &tx.permissions {
        if seen.contains(&permission.permission_value) {
            return TransactionResult::temMALFORMED;
        }
        seen.push(permission.permission_value);
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim(tx: &DelegateSet<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let Ok(authorized) = common::parse_account(&tx.authorize) else {
        return TransactionResult::temINVALID_ACCOUNT_ID;
    };
    match ctx.view.account_root(&authorized) {
        Ok(Some(_)) => {}
        Ok(None) => return TransactionResult::tecNO_TARGET,
        Err(_) => return TransactionResult::tefINTERNAL,
    }

    if tx.permissions.is_empty() {
        let key = keylet::delegate(&ctx.account, &authorized);
        if !ctx.view.exists(&key).unwrap_or(false) {
            return TransactionResult::tecNO_ENTRY;
        }
    }
    TransactionResult::tesSUCCESS
}

pub fn apply(tx: &DelegateSet<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_steps(tx, ctx))
}

fn apply_steps(tx: &DelegateSet<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let authorized = common::parse_account(&tx.authorize)?;
    let key = keylet::delegate(&ctx.account, &authorized);
    let existed = common::internal(ctx.view.exists(&key))?;

    // An empty permission list removes the delegation.
    if tx.permissions.is_empty() {
        common::internal(ctx.view.erase(&key))?;
        common::remove_from_owner_dir(ctx.view, &ctx.account, &key)?;
        common::internal(ctx.view.adjust_owner_count(&ctx.account, -1))?;
        return Ok(());
    }

    let root = common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;
    if !existed && root.balance < ctx.view.reserve(root.owner_count + 1) {
        return Err(TransactionResult::tecINSUFFICIENT_RESERVE);
    }

    let permissions = tx
        .permissions
        .iter()
        .map(|permission| PermissionWrapper {
            permission: PermissionEntry {
                permission_value: permission.permission_value,
            },
        })
        .collect();

    let delegate = Delegate {
        ledger_entry_type: LedgerEntryType::Delegate,
        flags: 0,
        account: ctx.account,
        authorize: authorized,
        permissions,
        owner_node: 0,
        previous_txn_id: None,
        previous_txn_lgr_seq: None,
    };

    if existed {
        common::internal(ctx.view.update(key, LedgerEntry::Delegate(delegate)))?;
    } else {
        common::internal(ctx.view.insert(key, LedgerEntry::Delegate(delegate)))?;
        common::add_to_owner_dir(ctx.view, &ctx.account, &key)?;
        common::internal(ctx.view.adjust_owner_count(&ctx.account, 1))?;
    }
    Ok(())
}
