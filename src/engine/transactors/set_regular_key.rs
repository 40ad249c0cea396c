//! SetRegularKey: assigns or removes the account's regular key pair.

use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::objects::LSF_DISABLE_MASTER;
use crate::models::transactions::set_regular_key::SetRegularKey;

pub fn preflight(tx: &SetRegularKey<'_>) -> TransactionResult {
    if let Some(regular_key) = &tx.regular_key {
        if common::parse_account(regular_key).is_err() {
            return TransactionResult::temBAD_REGKEY;
        }
        if *regular_key == tx.common_fields.account {
            return TransactionResult::temBAD_REGKEY;
        }
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim(tx: &SetRegularKey<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    // Removing the key must not leave the account unable to sign.
    if tx.regular_key.is_none() && ctx.root.has_flag(LSF_DISABLE_MASTER) {
        let has_signer_list = ctx
            .view
            .exists(&keylet::signers(&ctx.account))
            .unwrap_or(false);
        if !has_signer_list {
            return TransactionResult::tecNO_ALTERNATIVE_KEY;
        }
    }
    TransactionResult::tesSUCCESS
}

pub fn apply(tx: &SetRegularKey<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_steps(tx, ctx))
}

fn apply_steps(tx: &SetRegularKey<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let mut root = common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;

    root.regular_key = match &tx.regular_key {
        Some(regular_key) => Some(common::parse_account(regular_key)?),
        None => None,
    };

    common::internal(ctx.view.put_account_root(root))?;
    Ok(())
}
