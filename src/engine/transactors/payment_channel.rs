//! The PaymentChannel family: unidirectional XRP channels paid out
//! against signed claims.

use core::str::FromStr;

use crate::core::binarycodec::types::Hash256;
use crate::core::keylet;
use crate::core::keypairs;
use crate::core::keypairs::utils::is_valid_public_key;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::objects::{
    LedgerEntry, LedgerEntryType, PayChannel, LSF_DISALLOW_INCOMING_PAYCHAN,
};
use crate::models::transactions::payment_channel_claim::{
    PaymentChannelClaim, PaymentChannelClaimFlag,
};
use crate::models::transactions::payment_channel_create::PaymentChannelCreate;
use crate::models::transactions::payment_channel_fund::PaymentChannelFund;
use crate::models::transactions::Transaction;

/// Prefix over channel claim signing payloads.
const HASH_PREFIX_CLAIM: [u8; 4] = *b"CLM\0";

fn claim_payload(channel: &Hash256, drops: i64) -> Vec<u8> {
    let mut payload = HASH_PREFIX_CLAIM.to_vec();
    payload.extend_from_slice(channel.as_bytes());
    payload.extend_from_slice(&(drops as u64).to_be_bytes());
    payload
}

pub fn preflight_create(tx: &PaymentChannelCreate<'_>) -> TransactionResult {
    match tx.amount.as_drops() {
        Ok(drops) if drops > 0 => {}
        _ => return TransactionResult::temBAD_AMOUNT,
    }
    if common::parse_account(&tx.destination).is_err() {
        return TransactionResult::temDST_NEEDED;
    }
    match hex::decode(tx.public_key.as_bytes()) {
        Ok(raw) if is_valid_public_key(&raw) => {}
        _ => return TransactionResult::temMALFORMED,
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_create(
    tx: &PaymentChannelCreate<'_>,
    ctx: &PreclaimContext<'_>,
) -> TransactionResult {
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
    if destination_root.has_flag(LSF_DISALLOW_INCOMING_PAYCHAN) {
        return TransactionResult::tecNO_PERMISSION;
    }
    TransactionResult::tesSUCCESS
}

pub fn apply_create(
    tx: &PaymentChannelCreate<'_>,
    ctx: &mut ApplyContext<'_>,
) -> TransactionResult {
    complete(apply_create_steps(tx, ctx))
}

fn apply_create_steps(tx: &PaymentChannelCreate<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
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
    let key = keylet::payment_channel(&ctx.account, &destination, sequence);

    let channel = PayChannel {
        ledger_entry_type: LedgerEntryType::PayChannel,
        flags: 0,
        account: ctx.account,
        destination,
        amount: drops,
        balance: 0,
        public_key: tx.public_key.to_string(),
        settle_delay: tx.settle_delay,
        expiration: None,
        cancel_after: tx.cancel_after,
        source_tag: tx.common_fields.source_tag,
        destination_tag: tx.destination_tag,
        owner_node: 0,
        previous_txn_id: None,
        previous_txn_lgr_seq: None,
    };

    common::internal(ctx.view.insert(key, LedgerEntry::PayChannel(channel)))?;
    common::add_to_owner_dir(ctx.view, &ctx.account, &key)?;
    common::internal(ctx.view.adjust_owner_count(&ctx.account, 1))?;
    Ok(())
}

fn load_channel(
    view: &crate::ledger::view::LedgerView,
    channel_id: &str,
) -> TxStep<(Hash256, PayChannel)> {
    let key = Hash256::from_str(channel_id).map_err(|_| TransactionResult::temMALFORMED)?;
    match common::internal(view.peek(&key))? {
        Some(LedgerEntry::PayChannel(channel)) => Ok((key, channel)),
        _ => Err(TransactionResult::tecNO_ENTRY),
    }
}

pub fn preflight_fund(tx: &PaymentChannelFund<'_>) -> TransactionResult {
    match tx.amount.as_drops() {
        Ok(drops) if drops > 0 => {}
        _ => return TransactionResult::temBAD_AMOUNT,
    }
    if Hash256::from_str(&tx.channel).is_err() {
        return TransactionResult::temMALFORMED;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_fund(tx: &PaymentChannelFund<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let (_, channel) = match load_channel(ctx.view, &tx.channel) {
        Ok(found) => found,
        Err(code) => return code,
    };
    if channel.account != ctx.account {
        return TransactionResult::tecNO_PERMISSION;
    }
    TransactionResult::tesSUCCESS
}

pub fn apply_fund(tx: &PaymentChannelFund<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_fund_steps(tx, ctx))
}

fn apply_fund_steps(tx: &PaymentChannelFund<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let (key, mut channel) = load_channel(ctx.view, &tx.channel)?;
    let drops = tx
        .amount
        .as_drops()
        .map_err(|_| TransactionResult::temBAD_AMOUNT)?;

    let mut root = common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;
    if root.balance - drops < ctx.view.reserve(root.owner_count) {
        return Err(TransactionResult::tecUNFUNDED);
    }
    root.balance -= drops;
    common::internal(ctx.view.put_account_root(root))?;

    channel.amount += drops;
    if let Some(expiration) = tx.expiration {
        channel.expiration = Some(expiration);
    }
    common::internal(ctx.view.update(key, LedgerEntry::PayChannel(channel)))?;
    Ok(())
}

pub fn preflight_claim(tx: &PaymentChannelClaim<'_>) -> TransactionResult {
    if Hash256::from_str(&tx.channel).is_err() {
        return TransactionResult::temMALFORMED;
    }
    if tx.signature.is_some() && tx.public_key.is_none() {
        return TransactionResult::temMALFORMED;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_claim(
    tx: &PaymentChannelClaim<'_>,
    ctx: &PreclaimContext<'_>,
) -> TransactionResult {
    let (key, channel) = match load_channel(ctx.view, &tx.channel) {
        Ok(found) => found,
        Err(code) => return code,
    };

    let is_source = channel.account == ctx.account;
    let is_destination = channel.destination == ctx.account;
    if !is_source && !is_destination {
        return TransactionResult::tecNO_PERMISSION;
    }

    // A balance claim needs either the source itself or a claim
    // signed with the channel's key.
    if let Some(balance) = &tx.balance {
        let Ok(claimed) = balance.as_drops() else {
            return TransactionResult::temBAD_AMOUNT;
        };
        if claimed <= channel.balance || claimed > channel.amount {
            return TransactionResult::tecUNFUNDED_PAYMENT;
        }

        if !is_source {
            let Some(signature) = &tx.signature else {
                return TransactionResult::temBAD_SIGNATURE;
            };
            let authorized = tx
                .amount
                .as_ref()
                .and_then(|amount| amount.as_drops().ok())
                .unwrap_or(claimed);
            if claimed > authorized {
                return TransactionResult::tecUNFUNDED_PAYMENT;
            }

            let payload = claim_payload(&key, authorized);
            let Ok(signature) = hex::decode(signature.as_bytes()) else {
                return TransactionResult::temBAD_SIGNATURE;
            };
            if !keypairs::is_valid_message(&payload, &signature, &channel.public_key) {
                return TransactionResult::temBAD_SIGNATURE;
            }
        }
    }

    TransactionResult::tesSUCCESS
}

pub fn apply_claim(tx: &PaymentChannelClaim<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_claim_steps(tx, ctx))
}

fn apply_claim_steps(tx: &PaymentChannelClaim<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let (key, mut channel) = load_channel(ctx.view, &tx.channel)?;
    let is_source = channel.account == ctx.account;

    if let Some(balance) = &tx.balance {
        let claimed = balance
            .as_drops()
            .map_err(|_| TransactionResult::temBAD_AMOUNT)?;
        let payout = claimed - channel.balance;

        let destination_root = common::load_account(
            ctx.view,
            &channel.destination,
            TransactionResult::tecNO_DST,
        )?;
        common::check_deposit_auth(
            ctx.view,
            &ctx.account,
            &channel.destination,
            &destination_root,
        )?;

        let mut destination_root = destination_root;
        destination_root.balance += payout;
        common::internal(ctx.view.put_account_root(destination_root))?;

        channel.balance = claimed;
        ctx.delivered_amount = Some(serde_json::json!(payout.to_string()));
    }

    if tx.has_flag(&PaymentChannelClaimFlag::TfRenew) {
        if !is_source {
            return Err(TransactionResult::tecNO_PERMISSION);
        }
        channel.expiration = None;
    }

    let close_requested = tx.has_flag(&PaymentChannelClaimFlag::TfClose);
    let expired = channel
        .expiration
        .map(|expiration| expiration <= ctx.parent_close_time)
        .unwrap_or(false);

    if close_requested || expired {
        let close_now = !is_source || expired;
        if close_now {
            // Return the unclaimed remainder and retire the channel.
            let remainder = channel.amount - channel.balance;
            let mut source_root = common::load_account(
                ctx.view,
                &channel.account,
                TransactionResult::tefINTERNAL,
            )?;
            source_root.balance += remainder;
            common::internal(ctx.view.put_account_root(source_root))?;

            common::internal(ctx.view.erase(&key))?;
            common::remove_from_owner_dir(ctx.view, &channel.account, &key)?;
            common::internal(ctx.view.adjust_owner_count(&channel.account, -1))?;
            return Ok(());
        }

        // The source closing a live channel starts the settle delay.
        channel.expiration = Some(ctx.parent_close_time + channel.settle_delay);
    }

    common::internal(ctx.view.update(key, LedgerEntry::PayChannel(channel)))?;
    Ok(())
}
