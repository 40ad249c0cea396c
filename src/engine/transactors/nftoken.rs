//! The NFToken family over a single token page per account.

use core::str::FromStr;

use crate::core::binarycodec::types::{AccountId, Hash256};
use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::amount::LedgerAmount;
use crate::ledger::objects::{
    LedgerEntry, LedgerEntryType, NfToken, NfTokenOffer, NfTokenPage, NfTokenWrapper,
    LSF_DISALLOW_INCOMING_NFTOKEN_OFFER, LSF_SELL_NFTOKEN,
};
use crate::models::transactions::nftoken_accept_offer::NFTokenAcceptOffer;
use crate::models::transactions::nftoken_burn::NFTokenBurn;
use crate::models::transactions::nftoken_cancel_offer::NFTokenCancelOffer;
use crate::models::transactions::nftoken_create_offer::{
    NFTokenCreateOffer, NFTokenCreateOfferFlag,
};
use crate::models::transactions::nftoken_mint::{NFTokenMint, NFTokenMintFlag};
use crate::models::transactions::nftoken_modify::NFTokenModify;
use crate::models::transactions::Transaction;

/// Token-id flag bits, mirroring the mint flags.
const ID_FLAG_BURNABLE: u16 = 0x0001;
const ID_FLAG_TRANSFERABLE: u16 = 0x0008;
const ID_FLAG_MUTABLE: u16 = 0x0010;

/// 2 flag bytes, 2 fee bytes, 20 issuer bytes, 4 taxon bytes and a
/// 4-byte mint counter make the 32-byte token id.
fn compose_token_id(flags: u16, transfer_fee: u16, issuer: &AccountId, taxon: u32, mint_sequence: u32) -> Hash256 {
    let mut bytes = [0u8; 32];
    bytes[0..2].copy_from_slice(&flags.to_be_bytes());
    bytes[2..4].copy_from_slice(&transfer_fee.to_be_bytes());
    bytes[4..24].copy_from_slice(issuer.as_bytes());
    bytes[24..28].copy_from_slice(&taxon.to_be_bytes());
    bytes[28..32].copy_from_slice(&mint_sequence.to_be_bytes());
    Hash256(bytes)
}

fn token_id_flags(token_id: &Hash256) -> u16 {
    u16::from_be_bytes([token_id.0[0], token_id.0[1]])
}

fn token_id_issuer(token_id: &Hash256) -> AccountId {
    let mut issuer = [0u8; 20];
    issuer.copy_from_slice(&token_id.0[4..24]);
    AccountId(issuer)
}

fn load_page(
    view: &crate::ledger::view::LedgerView,
    owner: &AccountId,
) -> TxStep<Option<NfTokenPage>> {
    match common::internal(view.peek(&keylet::nftoken_page(owner)))? {
        Some(LedgerEntry::NfTokenPage(page)) => Ok(Some(page)),
        Some(_) => Err(TransactionResult::tefINTERNAL),
        None => Ok(None),
    }
}

fn page_holds(page: &NfTokenPage, token_id: &Hash256) -> bool {
    page.nftokens
        .iter()
        .any(|wrapper| wrapper.nftoken.nftoken_id == *token_id)
}

/// Inserts a token into the owner's page, creating the page (and
/// charging its reserve) on first use.
fn add_token_to_page(
    ctx: &mut ApplyContext<'_>,
    owner: &AccountId,
    token: NfToken,
) -> TxStep {
    let page_key = keylet::nftoken_page(owner);
    match load_page(ctx.view, owner)? {
        Some(mut page) => {
            page.nftokens.push(NfTokenWrapper { nftoken: token });
            page.nftokens
                .sort_by(|a, b| a.nftoken.nftoken_id.cmp(&b.nftoken.nftoken_id));
            common::internal(ctx.view.update(page_key, LedgerEntry::NfTokenPage(page)))?;
        }
        None => {
            let owner_root =
                common::load_account(ctx.view, owner, TransactionResult::tefINTERNAL)?;
            if owner_root.balance < ctx.view.reserve(owner_root.owner_count + 1) {
                return Err(TransactionResult::tecINSUFFICIENT_RESERVE);
            }

            let page = NfTokenPage {
                ledger_entry_type: LedgerEntryType::NFTokenPage,
                flags: 0,
                nftokens: vec![NfTokenWrapper { nftoken: token }],
                previous_page_min: None,
                next_page_min: None,
                previous_txn_id: None,
                previous_txn_lgr_seq: None,
            };
            common::internal(ctx.view.insert(page_key, LedgerEntry::NfTokenPage(page)))?;
            common::add_to_owner_dir(ctx.view, owner, &page_key)?;
            common::internal(ctx.view.adjust_owner_count(owner, 1))?;
        }
    }
    Ok(())
}

/// Removes a token, retiring the page when it empties.
fn remove_token_from_page(
    ctx: &mut ApplyContext<'_>,
    owner: &AccountId,
    token_id: &Hash256,
) -> TxStep<NfToken> {
    let page_key = keylet::nftoken_page(owner);
    let mut page = load_page(ctx.view, owner)?.ok_or(TransactionResult::tecNO_ENTRY)?;

    let position = page
        .nftokens
        .iter()
        .position(|wrapper| wrapper.nftoken.nftoken_id == *token_id)
        .ok_or(TransactionResult::tecNO_ENTRY)?;
    let token = page.nftokens.remove(position).nftoken;

    if page.nftokens.is_empty() {
        common::internal(ctx.view.erase(&page_key))?;
        common::remove_from_owner_dir(ctx.view, owner, &page_key)?;
        common::internal(ctx.view.adjust_owner_count(owner, -1))?;
    } else {
        common::internal(ctx.view.update(page_key, LedgerEntry::NfTokenPage(page)))?;
    }
    Ok(token)
}

pub fn preflight_mint(tx: &NFTokenMint<'_>) -> TransactionResult {
    if let Some(transfer_fee) = tx.transfer_fee {
        if transfer_fee > crate::models::transactions::nftoken_mint::MAX_NFTOKEN_TRANSFER_FEE {
            return TransactionResult::temBAD_NFTOKEN_TRANSFER_FEE;
        }
        if !tx.has_flag(&NFTokenMintFlag::TfTransferable) {
            return TransactionResult::temMALFORMED;
        }
    }
    if let Some(issuer) = &tx.issuer {
        if common::parse_account(issuer).is_err() {
            return TransactionResult::temINVALID_ACCOUNT_ID;
        }
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_mint(tx: &NFTokenMint<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    // Minting on another account's behalf requires its authorization.
    if let Some(issuer) = &tx.issuer {
        let Ok(issuer) = common::parse_account(issuer) else {
            return TransactionResult::temINVALID_ACCOUNT_ID;
        };
        match ctx.view.account_root(&issuer) {
            Ok(Some(issuer_root)) => {
                if issuer_root.nftoken_minter != Some(ctx.account) {
                    return TransactionResult::tecNO_PERMISSION;
                }
            }
            Ok(None) => return TransactionResult::tecNO_ISSUER,
            Err(_) => return TransactionResult::tefINTERNAL,
        }
    }
    TransactionResult::tesSUCCESS
}

pub fn apply_mint(tx: &NFTokenMint<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_mint_steps(tx, ctx))
}

fn apply_mint_steps(tx: &NFTokenMint<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let issuer = match &tx.issuer {
        Some(issuer) => common::parse_account(issuer)?,
        None => ctx.account,
    };

    let mut issuer_root =
        common::load_account(ctx.view, &issuer, TransactionResult::tecNO_ISSUER)?;
    let mint_sequence = issuer_root.minted_nftokens.unwrap_or(0);
    issuer_root.minted_nftokens = Some(mint_sequence + 1);
    common::internal(ctx.view.put_account_root(issuer_root))?;

    let mut id_flags = 0u16;
    if tx.has_flag(&NFTokenMintFlag::TfBurnable) {
        id_flags |= ID_FLAG_BURNABLE;
    }
    if tx.has_flag(&NFTokenMintFlag::TfTransferable) {
        id_flags |= ID_FLAG_TRANSFERABLE;
    }
    if tx.has_flag(&NFTokenMintFlag::TfMutable) {
        id_flags |= ID_FLAG_MUTABLE;
    }

    let token_id = compose_token_id(
        id_flags,
        tx.transfer_fee.unwrap_or(0),
        &issuer,
        tx.nftoken_taxon,
        mint_sequence,
    );
    let token = NfToken {
        nftoken_id: token_id,
        uri: tx.uri.as_ref().map(|uri| uri.to_string()),
    };

    add_token_to_page(ctx, &ctx.account.clone(), token)
}

pub fn preflight_burn(tx: &NFTokenBurn<'_>) -> TransactionResult {
    if Hash256::from_str(&tx.nftoken_id).is_err() {
        return TransactionResult::temMALFORMED;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_burn(tx: &NFTokenBurn<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let Ok(token_id) = Hash256::from_str(&tx.nftoken_id) else {
        return TransactionResult::temMALFORMED;
    };

    let owner = match &tx.owner {
        Some(owner) => match common::parse_account(owner) {
            Ok(owner) => owner,
            Err(code) => return code,
        },
        None => ctx.account,
    };

    // Burning someone else's token takes the burnable bit and issuer
    // (or minter) authority.
    if owner != ctx.account {
        if token_id_flags(&token_id) & ID_FLAG_BURNABLE == 0 {
            return TransactionResult::tecNO_PERMISSION;
        }
        let issuer = token_id_issuer(&token_id);
        let authorized = issuer == ctx.account
            || matches!(
                ctx.view.account_root(&issuer),
                Ok(Some(root)) if root.nftoken_minter == Some(ctx.account)
            );
        if !authorized {
            return TransactionResult::tecNO_PERMISSION;
        }
    }

    match load_page(ctx.view, &owner) {
        Ok(Some(page)) if page_holds(&page, &token_id) => TransactionResult::tesSUCCESS,
        Ok(_) => TransactionResult::tecNO_ENTRY,
        Err(code) => code,
    }
}

pub fn apply_burn(tx: &NFTokenBurn<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_burn_steps(tx, ctx))
}

fn apply_burn_steps(tx: &NFTokenBurn<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let token_id = Hash256::from_str(&tx.nftoken_id).map_err(|_| TransactionResult::temMALFORMED)?;
    let owner = match &tx.owner {
        Some(owner) => common::parse_account(owner)?,
        None => ctx.account,
    };

    remove_token_from_page(ctx, &owner, &token_id)?;

    let issuer = token_id_issuer(&token_id);
    if let Some(mut issuer_root) = common::internal(ctx.view.account_root(&issuer))? {
        issuer_root.burned_nftokens = Some(issuer_root.burned_nftokens.unwrap_or(0) + 1);
        common::internal(ctx.view.put_account_root(issuer_root))?;
    }
    Ok(())
}

pub fn preflight_create_offer(tx: &NFTokenCreateOffer<'_>) -> TransactionResult {
    if Hash256::from_str(&tx.nftoken_id).is_err() {
        return TransactionResult::temMALFORMED;
    }
    let amount = match common::parse_amount(&tx.amount) {
        Ok(amount) => amount,
        Err(code) => return code,
    };
    let is_sell = tx.has_flag(&NFTokenCreateOfferFlag::TfSellOffer);
    if !is_sell && !amount.is_positive() {
        return TransactionResult::temBAD_AMOUNT;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_create_offer(
    tx: &NFTokenCreateOffer<'_>,
    ctx: &PreclaimContext<'_>,
) -> TransactionResult {
    let Ok(token_id) = Hash256::from_str(&tx.nftoken_id) else {
        return TransactionResult::temMALFORMED;
    };
    let is_sell = tx.has_flag(&NFTokenCreateOfferFlag::TfSellOffer);

    // Secondary trade needs the transferable bit, unless the issuer
    // is a party.
    if token_id_flags(&token_id) & ID_FLAG_TRANSFERABLE == 0
        && token_id_issuer(&token_id) != ctx.account
    {
        return TransactionResult::tefNFTOKEN_IS_NOT_TRANSFERABLE;
    }

    let holder = if is_sell {
        ctx.account
    } else {
        match tx.owner.as_deref().map(common::parse_account) {
            Some(Ok(owner)) => owner,
            _ => return TransactionResult::temMALFORMED,
        }
    };
    match load_page(ctx.view, &holder) {
        Ok(Some(page)) if page_holds(&page, &token_id) => {}
        Ok(_) => return TransactionResult::tecNO_ENTRY,
        Err(code) => return code,
    }

    if !is_sell {
        // The token owner can refuse unsolicited buy offers.
        if let Ok(Some(owner_root)) = ctx.view.account_root(&holder) {
            if owner_root.has_flag(LSF_DISALLOW_INCOMING_NFTOKEN_OFFER) {
                return TransactionResult::tecNO_PERMISSION;
            }
        }
    }

    TransactionResult::tesSUCCESS
}

pub fn apply_create_offer(
    tx: &NFTokenCreateOffer<'_>,
    ctx: &mut ApplyContext<'_>,
) -> TransactionResult {
    complete(apply_create_offer_steps(tx, ctx))
}

fn apply_create_offer_steps(
    tx: &NFTokenCreateOffer<'_>,
    ctx: &mut ApplyContext<'_>,
) -> TxStep {
    let token_id = Hash256::from_str(&tx.nftoken_id).map_err(|_| TransactionResult::temMALFORMED)?;

    let root = common::load_account(ctx.view, &ctx.account, TransactionResult::tefINTERNAL)?;
    if root.balance < ctx.view.reserve(root.owner_count + 1) {
        return Err(TransactionResult::tecINSUFFICIENT_RESERVE);
    }

    let sequence = tx
        .common_fields
        .sequence
        .or(tx.common_fields.ticket_sequence)
        .ok_or(TransactionResult::tefINTERNAL)?;
    let key = keylet::nftoken_offer(&ctx.account, sequence);

    let mut flags = 0;
    if tx.has_flag(&NFTokenCreateOfferFlag::TfSellOffer) {
        flags |= LSF_SELL_NFTOKEN;
    }

    let offer = NfTokenOffer {
        ledger_entry_type: LedgerEntryType::NFTokenOffer,
        flags,
        owner: ctx.account,
        nftoken_id: token_id,
        amount: crate::models::amount::Amount::XRPAmount(
            match common::parse_amount(&tx.amount)? {
                LedgerAmount::Xrp(drops) => drops.0.to_string().into(),
                LedgerAmount::Issued(_) => {
                    return Err(TransactionResult::temBAD_AMOUNT);
                }
            },
        ),
        destination: match &tx.destination {
            Some(destination) => Some(common::parse_account(destination)?),
            None => None,
        },
        expiration: tx.expiration,
        owner_node: 0,
        previous_txn_id: None,
        previous_txn_lgr_seq: None,
    };

    common::internal(ctx.view.insert(key, LedgerEntry::NfTokenOffer(offer)))?;
    common::add_to_owner_dir(ctx.view, &ctx.account, &key)?;
    common::internal(ctx.view.adjust_owner_count(&ctx.account, 1))?;
    Ok(())
}

pub fn preflight_cancel_offer(tx: &NFTokenCancelOffer<'_>) -> TransactionResult {
    if tx.nftoken_offers.is_empty() {
        return TransactionResult::temARRAY_EMPTY;
    }
    for offer in &tx.nftoken_offers {
        if Hash256::from_str(offer).is_err() {
            return TransactionResult::temMALFORMED;
        }
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_cancel_offer(
    tx: &NFTokenCancelOffer<'_>,
    ctx: &PreclaimContext<'_>,
) -> TransactionResult {
    for offer_id in &tx.nftoken_offers {
        let Ok(key) = Hash256::from_str(offer_id) else {
            return TransactionResult::temMALFORMED;
        };
        match ctx.view.peek(&key) {
            Ok(Some(LedgerEntry::NfTokenOffer(offer))) => {
                let expired = offer
                    .expiration
                    .map(|expiration| expiration <= ctx.parent_close_time)
                    .unwrap_or(false);
                let is_party = offer.owner == ctx.account
                    || offer.destination == Some(ctx.account);
                if !is_party && !expired {
                    return TransactionResult::tecNO_PERMISSION;
                }
            }
            Ok(_) => {}
            Err(_) => return TransactionResult::tefINTERNAL,
        }
    }
    TransactionResult::tesSUCCESS
}

pub fn apply_cancel_offer(
    tx: &NFTokenCancelOffer<'_>,
    ctx: &mut ApplyContext<'_>,
) -> TransactionResult {
    complete(apply_cancel_offer_steps(tx, ctx))
}

fn apply_cancel_offer_steps(
    tx: &NFTokenCancelOffer<'_>,
    ctx: &mut ApplyContext<'_>,
) -> TxStep {
    for offer_id in &tx.nftoken_offers {
        let key = Hash256::from_str(offer_id).map_err(|_| TransactionResult::temMALFORMED)?;
        if let Some(LedgerEntry::NfTokenOffer(offer)) = common::internal(ctx.view.peek(&key))? {
            common::internal(ctx.view.erase(&key))?;
            common::remove_from_owner_dir(ctx.view, &offer.owner, &key)?;
            common::internal(ctx.view.adjust_owner_count(&offer.owner, -1))?;
        }
    }
    Ok(())
}

pub fn preflight_accept_offer(tx: &NFTokenAcceptOffer<'_>) -> TransactionResult {
    if tx.nftoken_sell_offer.is_none() && tx.nftoken_buy_offer.is_none() {
        return TransactionResult::temMALFORMED;
    }
    TransactionResult::tesSUCCESS
}

fn load_nftoken_offer(
    view: &crate::ledger::view::LedgerView,
    offer_id: &str,
) -> TxStep<(Hash256, NfTokenOffer)> {
    let key = Hash256::from_str(offer_id).map_err(|_| TransactionResult::temMALFORMED)?;
    match common::internal(view.peek(&key))? {
        Some(LedgerEntry::NfTokenOffer(offer)) => Ok((key, offer)),
        _ => Err(TransactionResult::tecOBJECT_NOT_FOUND),
    }
}

pub fn preclaim_accept_offer(
    tx: &NFTokenAcceptOffer<'_>,
    ctx: &PreclaimContext<'_>,
) -> TransactionResult {
    let sell = tx
        .nftoken_sell_offer
        .as_deref()
        .map(|id| load_nftoken_offer(ctx.view, id));
    let buy = tx
        .nftoken_buy_offer
        .as_deref()
        .map(|id| load_nftoken_offer(ctx.view, id));

    if let Some(result) = &sell {
        match result {
            Ok((_, offer)) => {
                if offer.flags & LSF_SELL_NFTOKEN == 0 {
                    return TransactionResult::tecNFTOKEN_OFFER_TYPE_MISMATCH;
                }
                if offer.owner == ctx.account {
                    return TransactionResult::tecCANT_ACCEPT_OWN_NFTOKEN_OFFER;
                }
                if let Some(expiration) = offer.expiration {
                    if expiration <= ctx.parent_close_time {
                        return TransactionResult::tecEXPIRED;
                    }
                }
                if let Some(destination) = offer.destination {
                    if destination != ctx.account {
                        return TransactionResult::tecNO_PERMISSION;
                    }
                }
            }
            Err(code) => return *code,
        }
    }

    if let Some(result) = &buy {
        match result {
            Ok((_, offer)) => {
                if offer.flags & LSF_SELL_NFTOKEN != 0 {
                    return TransactionResult::tecNFTOKEN_OFFER_TYPE_MISMATCH;
                }
                if offer.owner == ctx.account {
                    return TransactionResult::tecCANT_ACCEPT_OWN_NFTOKEN_OFFER;
                }
            }
            Err(code) => return *code,
        }
    }

    // Brokered mode needs the two offers to concern the same token.
    if let (Some(Ok((_, sell))), Some(Ok((_, buy)))) = (&sell, &buy) {
        if sell.nftoken_id != buy.nftoken_id {
            return TransactionResult::tecNFTOKEN_BUY_SELL_MISMATCH;
        }
    }

    TransactionResult::tesSUCCESS
}

pub fn apply_accept_offer(
    tx: &NFTokenAcceptOffer<'_>,
    ctx: &mut ApplyContext<'_>,
) -> TransactionResult {
    complete(apply_accept_offer_steps(tx, ctx))
}

fn settle_sale(
    ctx: &mut ApplyContext<'_>,
    seller: &AccountId,
    buyer: &AccountId,
    token_id: &Hash256,
    price_drops: i64,
) -> TxStep {
    if price_drops > 0 {
        common::transfer_xrp(ctx.view, buyer, seller, price_drops, true)?;
    }
    let token = remove_token_from_page(ctx, seller, token_id)?;
    add_token_to_page(ctx, buyer, token)
}

fn apply_accept_offer_steps(
    tx: &NFTokenAcceptOffer<'_>,
    ctx: &mut ApplyContext<'_>,
) -> TxStep {
    let sell = match tx.nftoken_sell_offer.as_deref() {
        Some(id) => Some(load_nftoken_offer(ctx.view, id)?),
        None => None,
    };
    let buy = match tx.nftoken_buy_offer.as_deref() {
        Some(id) => Some(load_nftoken_offer(ctx.view, id)?),
        None => None,
    };

    let offer_price = |offer: &NfTokenOffer| -> TxStep<i64> {
        match common::parse_amount(&offer.amount)? {
            LedgerAmount::Xrp(drops) => Ok(drops.0),
            LedgerAmount::Issued(_) => Err(TransactionResult::temBAD_AMOUNT),
        }
    };

    match (sell, buy) {
        (Some((sell_key, sell_offer)), None) => {
            // The acceptor buys.
            let price = offer_price(&sell_offer)?;
            settle_sale(
                ctx,
                &sell_offer.owner,
                &ctx.account.clone(),
                &sell_offer.nftoken_id,
                price,
            )?;
            remove_offer_entry(ctx, &sell_key, &sell_offer.owner)?;
        }
        (None, Some((buy_key, buy_offer))) => {
            // The acceptor sells.
            let price = offer_price(&buy_offer)?;
            settle_sale(
                ctx,
                &ctx.account.clone(),
                &buy_offer.owner,
                &buy_offer.nftoken_id,
                price,
            )?;
            remove_offer_entry(ctx, &buy_key, &buy_offer.owner)?;
        }
        (Some((sell_key, sell_offer)), Some((buy_key, buy_offer))) => {
            // Brokered: funds flow buyer → seller, the broker keeps
            // the difference less its declared fee.
            let sell_price = offer_price(&sell_offer)?;
            let buy_price = offer_price(&buy_offer)?;
            if buy_price < sell_price {
                return Err(TransactionResult::tecNFTOKEN_BUY_SELL_MISMATCH);
            }

            let broker_fee = match &tx.nftoken_broker_fee {
                Some(fee) => match common::parse_amount(fee)? {
                    LedgerAmount::Xrp(drops) => drops.0,
                    LedgerAmount::Issued(_) => {
                        return Err(TransactionResult::temBAD_AMOUNT)
                    }
                },
                None => 0,
            };
            if sell_price + broker_fee > buy_price {
                return Err(TransactionResult::tecINSUFFICIENT_PAYMENT);
            }

            common::transfer_xrp(
                ctx.view,
                &buy_offer.owner,
                &sell_offer.owner,
                sell_price,
                true,
            )?;
            if broker_fee > 0 {
                common::transfer_xrp(
                    ctx.view,
                    &buy_offer.owner,
                    &ctx.account.clone(),
                    broker_fee,
                    true,
                )?;
            }
            let token = remove_token_from_page(ctx, &sell_offer.owner, &sell_offer.nftoken_id)?;
            add_token_to_page(ctx, &buy_offer.owner, token)?;

            remove_offer_entry(ctx, &sell_key, &sell_offer.owner)?;
            remove_offer_entry(ctx, &buy_key, &buy_offer.owner)?;
        }
        (None, None) => return Err(TransactionResult::temMALFORMED),
    }
    Ok(())
}

fn remove_offer_entry(
    ctx: &mut ApplyContext<'_>,
    key: &Hash256,
    owner: &AccountId,
) -> TxStep {
    common::internal(ctx.view.erase(key))?;
    common::remove_from_owner_dir(ctx.view, owner, key)?;
    common::internal(ctx.view.adjust_owner_count(owner, -1))?;
    Ok(())
}

pub fn preflight_modify(tx: &NFTokenModify<'_>) -> TransactionResult {
    if Hash256::from_str(&tx.nftoken_id).is_err() {
        return TransactionResult::temMALFORMED;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_modify(tx: &NFTokenModify<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let Ok(token_id) = Hash256::from_str(&tx.nftoken_id) else {
        return TransactionResult::temMALFORMED;
    };

    if token_id_flags(&token_id) & ID_FLAG_MUTABLE == 0 {
        return TransactionResult::tecNO_PERMISSION;
    }

    // Only the issuer (or its authorized minter) rewrites URIs.
    let issuer = token_id_issuer(&token_id);
    let authorized = issuer == ctx.account
        || matches!(
            ctx.view.account_root(&issuer),
            Ok(Some(root)) if root.nftoken_minter == Some(ctx.account)
        );
    if !authorized {
        return TransactionResult::tecNO_PERMISSION;
    }

    TransactionResult::tesSUCCESS
}

pub fn apply_modify(tx: &NFTokenModify<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_modify_steps(tx, ctx))
}

fn apply_modify_steps(tx: &NFTokenModify<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let token_id = Hash256::from_str(&tx.nftoken_id).map_err(|_| TransactionResult::temMALFORMED)?;
    let owner = match &tx.owner {
        Some(owner) => common::parse_account(owner)?,
        None => ctx.account,
    };

    let page_key = keylet::nftoken_page(&owner);
    let mut page = load_page(ctx.view, &owner)?.ok_or(TransactionResult::tecNO_ENTRY)?;
    let token = page
        .nftokens
        .iter_mut()
        .find(|wrapper| wrapper.nftoken.nftoken_id == token_id)
        .ok_or(TransactionResult::tecNO_ENTRY)?;

    token.nftoken.uri = tx
        .uri
        .as_ref()
        .filter(|uri| !uri.is_empty())
        .map(|uri| uri.to_string());

    common::internal(ctx.view.update(page_key, LedgerEntry::NfTokenPage(page)))?;
    Ok(())
}
