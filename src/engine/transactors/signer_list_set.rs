//! SignerListSet: installs, replaces, or removes the account's
//! multi-signing list.

use crate::constants::MAX_SIGNER_ENTRIES;
use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::objects::{
    LedgerEntry, LedgerEntryType, SignerEntry as SignerEntryObj, SignerEntryWrapper, SignerList,
};
use crate::models::transactions::signer_list_set::SignerListSet;

pub fn preflight(tx: &SignerListSet<'_>) -> TransactionResult {
    let Some(entries) = &tx.signer_entries else {
        return if tx.signer_quorum == 0 {
            TransactionResult::tesSUCCESS
        } else {
            TransactionResult::temMALFORMED
        };
    };

    if tx.signer_quorum == 0 {
        return TransactionResult::temMALFORMED;
    }
    if entries.is_empty() || entries.len() > MAX_SIGNER_ENTRIES {
        return TransactionResult::temARRAY_TOO_LARGE;
    }

    let mut weight_sum: u64 = 0;
    for (position, entry) in entries.iter().enumerate() {
        if common::parse_account(&entry.account).is_err() {
            return TransactionResult::temBAD_SIGNER;
        }
        if entry.signer_weight == 0 {
            return TransactionResult::temBAD_WEIGHT;
        }
        if entry.account == tx.common_fields.account
            || entries[position + 1..]
                .iter()
                .any(|other| other.account == entry.account)
        {
            return TransactionResult::temBAD_SIGNER;
        }
        weight_sum += entry.signer_weight as u64;
    }

    if (tx.signer_quorum as u64) > weight_sum {
        return TransactionResult::temBAD_QUORUM;
    }

    TransactionResult::tesSUCCESS
}

pub fn preclaim(tx: &SignerListSet<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    if tx.signer_quorum == 0 {
        // Deleting a list that does not exist has nothing to do.
        let exists = ctx
            .view
            .exists(&keylet::signers(&ctx.account))
            .unwrap_or(false);
        if !exists {
            return TransactionResult::tecNO_ENTRY;
        }
    }
    TransactionResult::tesSUCCESS
}

pub fn apply(tx: &SignerListSet<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_steps(tx, ctx))
}

fn apply_steps(tx: &SignerListSet<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let list_key = keylet::signers(&ctx.account);
    let existed = common::internal(ctx.view.exists(&list_key))?;

    let Some(entries) = &tx.signer_entries else {
        // Quorum zero: remove the list.
        common::internal(ctx.view.erase(&list_key))?;
        common::remove_from_owner_dir(ctx.view, &ctx.account, &list_key)?;
        common::internal(ctx.view.adjust_owner_count(&ctx.account, -1))?;
        return Ok(());
    };

    let root = common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;
    if !existed && root.balance < ctx.view.reserve(root.owner_count + 1) {
        return Err(TransactionResult::tecINSUFFICIENT_RESERVE);
    }

    let mut signer_entries = Vec::with_capacity(entries.len());
    for entry in entries {
        signer_entries.push(SignerEntryWrapper {
            signer_entry: SignerEntryObj {
                account: common::parse_account(&entry.account)?,
                signer_weight: entry.signer_weight,
            },
        });
    }

    let list = SignerList {
        ledger_entry_type: LedgerEntryType::SignerList,
        flags: 0,
        signer_list_id: 0,
        signer_quorum: tx.signer_quorum,
        signer_entries,
        owner_node: 0,
        previous_txn_id: None,
        previous_txn_lgr_seq: None,
    };

    if existed {
        common::internal(ctx.view.update(list_key, LedgerEntry::SignerList(list)))?;
    } else {
        common::internal(ctx.view.insert(list_key, LedgerEntry::SignerList(list)))?;
        common::add_to_owner_dir(ctx.view, &ctx.account, &list_key)?;
        common::internal(ctx.view.adjust_owner_count(&ctx.account, 1))?;
    }
    Ok(())
}
