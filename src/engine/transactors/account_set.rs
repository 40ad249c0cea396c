//! AccountSet: flag mutations, domain/email/message-key fields,
//! transfer rate and tick size, per the account flag table.

use core::str::FromStr;

use crate::constants::{
    DISABLE_TICK_SIZE, MAX_TICK_SIZE, MAX_TRANSFER_RATE, MIN_TICK_SIZE, MIN_TRANSFER_RATE,
    SPECIAL_CASE_TRANSFER_RATE,
};
use crate::core::binarycodec::types::{Hash128, Hash256};
use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::objects::{
    LSF_ALLOW_TRUSTLINE_CLAWBACK, LSF_DEFAULT_RIPPLE, LSF_DEPOSIT_AUTH,
    LSF_DISALLOW_INCOMING_CHECK, LSF_DISALLOW_INCOMING_NFTOKEN_OFFER,
    LSF_DISALLOW_INCOMING_PAYCHAN, LSF_DISALLOW_INCOMING_TRUSTLINE, LSF_DISALLOW_XRP,
    LSF_DISABLE_MASTER, LSF_GLOBAL_FREEZE, LSF_NO_FREEZE, LSF_REQUIRE_AUTH,
    LSF_REQUIRE_DEST_TAG,
};
use crate::models::transactions::account_set::{AccountSet, AccountSetFlag};

fn flag_bit(flag: AccountSetFlag) -> Option<u32> {
    match flag {
        AccountSetFlag::AsfRequireDest => Some(LSF_REQUIRE_DEST_TAG),
        AccountSetFlag::AsfRequireAuth => Some(LSF_REQUIRE_AUTH),
        AccountSetFlag::AsfDisallowXRP => Some(LSF_DISALLOW_XRP),
        AccountSetFlag::AsfDisableMaster => Some(LSF_DISABLE_MASTER),
        AccountSetFlag::AsfNoFreeze => Some(LSF_NO_FREEZE),
        AccountSetFlag::AsfGlobalFreeze => Some(LSF_GLOBAL_FREEZE),
        AccountSetFlag::AsfDefaultRipple => Some(LSF_DEFAULT_RIPPLE),
        AccountSetFlag::AsfDepositAuth => Some(LSF_DEPOSIT_AUTH),
        AccountSetFlag::AsfDisallowIncomingCheck => Some(LSF_DISALLOW_INCOMING_CHECK),
        AccountSetFlag::AsfDisallowIncomingPayChan => Some(LSF_DISALLOW_INCOMING_PAYCHAN),
        AccountSetFlag::AsfDisallowIncomingTrustline => Some(LSF_DISALLOW_INCOMING_TRUSTLINE),
        AccountSetFlag::AsfDisallowIncomingNFTokenOffer => {
            Some(LSF_DISALLOW_INCOMING_NFTOKEN_OFFER)
        }
        AccountSetFlag::AsfAllowTrustLineClawback => Some(LSF_ALLOW_TRUSTLINE_CLAWBACK),
        // AccountTxnID tracking and the NFToken minter live in fields,
        // not flag bits.
        AccountSetFlag::AsfAccountTxnID | AccountSetFlag::AsfAuthorizedNFTokenMinter => None,
    }
}

pub fn preflight(tx: &AccountSet<'_>) -> TransactionResult {
    if tx.set_flag.is_some() && tx.set_flag == tx.clear_flag {
        return TransactionResult::temINVALID_FLAG;
    }
    if let Some(transfer_rate) = tx.transfer_rate {
        if transfer_rate != SPECIAL_CASE_TRANSFER_RATE
            && !(MIN_TRANSFER_RATE..=MAX_TRANSFER_RATE).contains(&transfer_rate)
        {
            return TransactionResult::temBAD_TRANSFER_RATE;
        }
    }
    if let Some(tick_size) = tx.tick_size {
        if tick_size != DISABLE_TICK_SIZE
            && !(MIN_TICK_SIZE..=MAX_TICK_SIZE).contains(&tick_size)
        {
            return TransactionResult::temBAD_TICK_SIZE;
        }
    }
    if let Some(minter) = &tx.nftoken_minter {
        if common::parse_account(minter).is_err() {
            return TransactionResult::temINVALID_ACCOUNT_ID;
        }
    }

    TransactionResult::tesSUCCESS
}

pub fn preclaim(tx: &AccountSet<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let root = &ctx.root;

    match tx.set_flag {
        Some(AccountSetFlag::AsfDisableMaster) => {
            // Another signing path must exist first.
            let has_signer_list = ctx
                .view
                .exists(&keylet::signers(&ctx.account))
                .unwrap_or(false);
            if root.regular_key.is_none() && !has_signer_list {
                return TransactionResult::tecNO_ALTERNATIVE_KEY;
            }
        }
        Some(AccountSetFlag::AsfNoFreeze) => {
            if root.has_flag(LSF_ALLOW_TRUSTLINE_CLAWBACK) {
                return TransactionResult::tecNO_PERMISSION;
            }
        }
        Some(AccountSetFlag::AsfAllowTrustLineClawback) => {
            if root.has_flag(LSF_NO_FREEZE) {
                return TransactionResult::tecNO_PERMISSION;
            }
            // Only an account with no outstanding objects may opt in.
            match common::owner_dir_is_empty(ctx.view, &ctx.account) {
                Ok(true) => {}
                Ok(false) => return TransactionResult::tecOWNERS,
                Err(code) => return code,
            }
        }
        Some(AccountSetFlag::AsfRequireAuth) => {
            // Authorization can only be demanded before any trust
            // lines exist.
            match common::owner_dir_is_empty(ctx.view, &ctx.account) {
                Ok(true) => {}
                Ok(false) => return TransactionResult::tecOWNERS,
                Err(code) => return code,
            }
        }
        _ => {}
    }

    TransactionResult::tesSUCCESS
}

pub fn apply(tx: &AccountSet<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_steps(tx, ctx))
}

fn apply_steps(tx: &AccountSet<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let mut root = common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;

    if let Some(set_flag) = tx.set_flag {
        match set_flag {
            AccountSetFlag::AsfAccountTxnID => {
                if root.account_txn_id.is_none() {
                    root.account_txn_id = Some(Hash256::ZERO);
                }
            }
            AccountSetFlag::AsfAuthorizedNFTokenMinter => {
                let minter = tx
                    .nftoken_minter
                    .as_deref()
                    .ok_or(TransactionResult::temMALFORMED)?;
                root.nftoken_minter = Some(common::parse_account(minter)?);
            }
            other => {
                if let Some(bit) = flag_bit(other) {
                    root.flags |= bit;
                }
            }
        }
    }

    if let Some(clear_flag) = tx.clear_flag {
        match clear_flag {
            AccountSetFlag::AsfAccountTxnID => root.account_txn_id = None,
            AccountSetFlag::AsfAuthorizedNFTokenMinter => root.nftoken_minter = None,
            AccountSetFlag::AsfNoFreeze => {
                // NoFreeze can never be cleared once set.
            }
            other => {
                if let Some(bit) = flag_bit(other) {
                    root.flags &= !bit;
                }
            }
        }
    }

    // Empty means clear for the free-form fields.
    if let Some(domain) = &tx.domain {
        root.domain = (!domain.is_empty()).then(|| domain.to_string());
    }
    if let Some(email_hash) = &tx.email_hash {
        let parsed =
            Hash128::from_str(email_hash).map_err(|_| TransactionResult::temMALFORMED)?;
        root.email_hash = (!parsed.is_zero()).then_some(parsed);
    }
    if let Some(wallet_locator) = &tx.wallet_locator {
        let parsed =
            Hash256::from_str(wallet_locator).map_err(|_| TransactionResult::temMALFORMED)?;
        root.wallet_locator = (!parsed.is_zero()).then_some(parsed);
    }
    if let Some(message_key) = &tx.message_key {
        if message_key.is_empty() {
            root.message_key = None;
        } else {
            let raw = hex::decode(message_key.as_bytes())
                .map_err(|_| TransactionResult::temMALFORMED)?;
            if !crate::core::keypairs::utils::is_valid_public_key(&raw) {
                return Err(TransactionResult::temMALFORMED);
            }
            root.message_key = Some(message_key.to_string());
        }
    }
    if let Some(transfer_rate) = tx.transfer_rate {
        root.transfer_rate =
            (transfer_rate != SPECIAL_CASE_TRANSFER_RATE).then_some(transfer_rate);
    }
    if let Some(tick_size) = tx.tick_size {
        // Fifteen digits is full precision, the same as clear.
        root.tick_size = (tick_size != DISABLE_TICK_SIZE && tick_size != MAX_TICK_SIZE)
            .then_some(tick_size as u8);
    }

    common::internal(ctx.view.put_account_root(root))?;
    Ok(())
}
