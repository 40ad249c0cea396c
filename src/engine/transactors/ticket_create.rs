//! TicketCreate: sets sequence numbers aside as Tickets.

use crate::constants::MAX_TICKETS_PER_ACCOUNT;
use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::objects::{LedgerEntry, LedgerEntryType, Ticket};
use crate::models::transactions::ticket_create::TicketCreate;

pub fn preflight(tx: &TicketCreate<'_>) -> TransactionResult {
    if tx.ticket_count == 0 || tx.ticket_count > MAX_TICKETS_PER_ACCOUNT {
        return TransactionResult::temINVALID_COUNT;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim(tx: &TicketCreate<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let outstanding = ctx.root.ticket_count.unwrap_or(0);
    if outstanding + tx.ticket_count > MAX_TICKETS_PER_ACCOUNT {
        return TransactionResult::tecDIR_FULL;
    }
    TransactionResult::tesSUCCESS
}

pub fn apply(tx: &TicketCreate<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_steps(tx, ctx))
}

fn apply_steps(tx: &TicketCreate<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let mut root = common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;

    let count = tx.ticket_count;
    if root.balance < ctx.view.reserve(root.owner_count + count) {
        return Err(TransactionResult::tecINSUFFICIENT_RESERVE);
    }

    // The sequence was already consumed for the transaction itself;
    // tickets claim the numbers that follow it.
    let first_ticket_sequence = root.sequence;
    root.sequence += count;
    root.ticket_count = Some(root.ticket_count.unwrap_or(0) + count);
    common::internal(ctx.view.put_account_root(root))?;

    for offset in 0..count {
        let ticket_sequence = first_ticket_sequence + offset;
        let ticket_key = keylet::ticket(&ctx.account, ticket_sequence);
        let ticket = Ticket {
            ledger_entry_type: LedgerEntryType::Ticket,
            flags: 0,
            account: ctx.account,
            ticket_sequence,
            owner_node: 0,
            previous_txn_id: None,
            previous_txn_lgr_seq: None,
        };
        common::internal(ctx.view.insert(ticket_key, LedgerEntry::Ticket(ticket)))?;
        common::add_to_owner_dir(ctx.view, &ctx.account, &ticket_key)?;
        common::internal(ctx.view.adjust_owner_count(&ctx.account, 1))?;
    }
    Ok(())
}
