//! LedgerStateFix: targeted repairs for known state-corruption
//! classes.

use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::objects::LedgerEntry;
use crate::models::transactions::ledger_state_fix::{
    LedgerStateFix, LEDGER_FIX_NFTOKEN_PAGE_LINK,
};

pub fn preflight(tx: &LedgerStateFix<'_>) -> TransactionResult {
    if tx.ledger_fix_type == LEDGER_FIX_NFTOKEN_PAGE_LINK {
        match &tx.owner {
            Some(owner) if common::parse_account(owner).is_ok() => {}
            _ => return TransactionResult::temMALFORMED,
        }
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim(tx: &LedgerStateFix<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    if tx.ledger_fix_type != LEDGER_FIX_NFTOKEN_PAGE_LINK {
        return TransactionResult::tefINVALID_LEDGER_FIX_TYPE;
    }

    let Some(owner) = tx
        .owner
        .as_deref()
        .and_then(|owner| common::parse_account(owner).ok())
    else {
        return TransactionResult::temMALFORMED;
    };
    match ctx.view.account_root(&owner) {
        Ok(Some(_)) => TransactionResult::tesSUCCESS,
        Ok(None) => TransactionResult::tecOBJECT_NOT_FOUND,
        Err(_) => TransactionResult::tefINTERNAL,
    }
}

pub fn apply(tx: &LedgerStateFix<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_steps(tx, ctx))
}

fn apply_steps(tx: &LedgerStateFix<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let owner = tx
        .owner
        .as_deref()
        .map(common::parse_account)
        .transpose()?
        .ok_or(TransactionResult::temMALFORMED)?;

    // Repair the owner's token page chain. With a single page per
    // account the repair is clearing stale neighbor links.
    let page_key = keylet::nftoken_page(&owner);
    if let Some(LedgerEntry::NfTokenPage(mut page)) = common::internal(ctx.view.peek(&page_key))? {
        if page.previous_page_min.is_some() || page.next_page_min.is_some() {
            page.previous_page_min = None;
            page.next_page_min = None;
            common::internal(ctx.view.update(page_key, LedgerEntry::NfTokenPage(page)))?;
        }
    }
    Ok(())
}
