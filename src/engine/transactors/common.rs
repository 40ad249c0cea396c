//! Ledger-manipulation helpers shared by the transactors: XRP and
//! issued-currency movement, trust lines, owner directories and
//! destination gates.

use core::str::FromStr;

use crate::core::binarycodec::types::{AccountId, Currency, Hash256, IssuedValue};
use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::ledger::amount::{add_values, LedgerAmount};
use crate::ledger::objects::{
    AccountRoot, DirectoryNode, LedgerEntry, LedgerEntryType, RippleState,
    LSF_DEPOSIT_AUTH, LSF_GLOBAL_FREEZE, LSF_HIGH_AUTH, LSF_HIGH_FREEZE, LSF_HIGH_RESERVE,
    LSF_LOW_AUTH, LSF_LOW_FREEZE, LSF_LOW_RESERVE, LSF_REQUIRE_AUTH, LSF_REQUIRE_DEST_TAG,
};
use crate::ledger::view::LedgerView;
use crate::models::amount::{Amount, IssuedCurrencyAmount};

/// Helpers return the failing code through `Err` so `?` threads the
/// pipeline.
pub type TxStep<T = ()> = Result<T, TransactionResult>;

/// The neutral issuer written into trust-line balance fields.
pub fn neutral_issuer() -> String {
    AccountId::ZERO.to_address()
}

pub fn parse_account(address: &str) -> TxStep<AccountId> {
    AccountId::from_str(address).map_err(|_| TransactionResult::temINVALID_ACCOUNT_ID)
}

pub fn parse_amount(amount: &Amount<'_>) -> TxStep<LedgerAmount> {
    match amount {
        Amount::XRPAmount(drops) => {
            let drops = drops
                .as_drops()
                .map_err(|_| TransactionResult::temBAD_AMOUNT)?;
            Ok(LedgerAmount::Xrp(crate::ledger::amount::Drops(drops)))
        }
        Amount::IssuedCurrencyAmount(issued) => parse_issued(issued).map(LedgerAmount::Issued),
    }
}

pub fn parse_issued(
    issued: &IssuedCurrencyAmount<'_>,
) -> TxStep<crate::ledger::amount::IssuedAmount> {
    let currency =
        Currency::from_str(&issued.currency).map_err(|_| TransactionResult::temBAD_CURRENCY)?;
    let issuer = parse_account(&issued.issuer)?;
    let value =
        IssuedValue::from_str(&issued.value).map_err(|_| TransactionResult::temBAD_AMOUNT)?;
    crate::ledger::amount::IssuedAmount::new(value, currency, issuer)
        .map_err(|_| TransactionResult::temBAD_AMOUNT)
}

/// Any view error below a transactor is an internal invariant break.
pub fn internal<T, E>(result: Result<T, E>) -> TxStep<T> {
    result.map_err(|_| TransactionResult::tefINTERNAL)
}

pub fn load_account(
    view: &LedgerView,
    account: &AccountId,
    missing: TransactionResult,
) -> TxStep<AccountRoot> {
    internal(view.account_root(account))?.ok_or(missing)
}

/// Moves drops between two existing accounts. When asked, the debit
/// is refused if it would take the source below its reserve.
pub fn transfer_xrp(
    view: &mut LedgerView,
    from: &AccountId,
    to: &AccountId,
    drops: i64,
    respect_source_reserve: bool,
) -> TxStep {
    debug_assert!(drops >= 0);

    let mut source = load_account(view, from, TransactionResult::tefINTERNAL)?;
    let floor = if respect_source_reserve {
        view.reserve(source.owner_count)
    } else {
        0
    };
    if source.balance - drops < floor {
        return Err(TransactionResult::tecUNFUNDED_PAYMENT);
    }
    source.balance -= drops;
    internal(view.put_account_root(source))?;

    let mut destination = load_account(view, to, TransactionResult::tecNO_DST)?;
    destination.balance += drops;
    internal(view.put_account_root(destination))?;
    Ok(())
}

/// The funds an account can spend in XRP above its reserve.
pub fn spendable_xrp(view: &LedgerView, root: &AccountRoot) -> i64 {
    (root.balance - view.reserve(root.owner_count)).max(0)
}

/// Destination gates shared by payments, checks and channels.
pub fn check_destination_tag(root: &AccountRoot, destination_tag: Option<u32>) -> TxStep {
    if root.has_flag(LSF_REQUIRE_DEST_TAG) && destination_tag.is_none() {
        return Err(TransactionResult::tecDST_TAG_NEEDED);
    }
    Ok(())
}

/// Deposit Authorization: payments into a guarded account need a
/// preauth entry (or to come from the account itself).
pub fn check_deposit_auth(
    view: &LedgerView,
    source: &AccountId,
    destination: &AccountId,
    destination_root: &AccountRoot,
) -> TxStep {
    if !destination_root.has_flag(LSF_DEPOSIT_AUTH) || source == destination {
        return Ok(());
    }

    let preauth_key = keylet::deposit_preauth(destination, source);
    if internal(view.exists(&preauth_key))? {
        Ok(())
    } else {
        Err(TransactionResult::tecNO_PERMISSION)
    }
}

/// Orders the two ends of a trust line; state is stored from the low
/// account's perspective.
pub fn line_sides(a: &AccountId, b: &AccountId) -> (AccountId, AccountId) {
    if a < b {
        (*a, *b)
    } else {
        (*b, *a)
    }
}

pub fn get_line(
    view: &LedgerView,
    a: &AccountId,
    b: &AccountId,
    currency: &Currency,
) -> TxStep<Option<RippleState>> {
    match internal(view.peek(&keylet::line(a, b, currency)))? {
        Some(LedgerEntry::RippleState(state)) => Ok(Some(state)),
        Some(_) => Err(TransactionResult::tefINTERNAL),
        None => Ok(None),
    }
}

/// The line's balance as seen by `owner`: positive means `owner`
/// holds the other side's issue.
pub fn line_balance(state: &RippleState, owner: &AccountId, low: &AccountId) -> TxStep<IssuedValue> {
    let stored =
        IssuedValue::from_str(&state.balance.value).map_err(|_| TransactionResult::tefINTERNAL)?;
    Ok(if owner == low { stored } else { stored.negate() })
}

/// The holder's limit on the line.
pub fn line_limit(state: &RippleState, owner_is_low: bool) -> TxStep<IssuedValue> {
    let limit = if owner_is_low {
        &state.low_limit
    } else {
        &state.high_limit
    };
    IssuedValue::from_str(&limit.value).map_err(|_| TransactionResult::tefINTERNAL)
}

/// Whether the issuer has frozen all of its issues.
pub fn is_globally_frozen(view: &LedgerView, issuer: &AccountId) -> TxStep<bool> {
    Ok(load_account(view, issuer, TransactionResult::tecNO_ISSUER)?
        .has_flag(LSF_GLOBAL_FREEZE))
}

/// Whether the holder's side of the line is frozen, globally or
/// individually.
pub fn is_frozen(
    view: &LedgerView,
    holder: &AccountId,
    currency: &Currency,
    issuer: &AccountId,
) -> TxStep<bool> {
    if is_globally_frozen(view, issuer)? {
        return Ok(true);
    }
    let Some(state) = get_line(view, holder, issuer, currency)? else {
        return Ok(false);
    };

    let (low, _) = line_sides(holder, issuer);
    // The freeze that matters is the one the issuer set against the
    // holder's side.
    let issuer_is_low = low == *issuer;
    Ok(if issuer_is_low {
        state.has_flag(LSF_LOW_FREEZE)
    } else {
        state.has_flag(LSF_HIGH_FREEZE)
    })
}

/// Whether the issuer demands authorization and the holder's side is
/// not yet authorized.
pub fn lacks_auth(
    view: &LedgerView,
    holder: &AccountId,
    currency: &Currency,
    issuer: &AccountId,
) -> TxStep<bool> {
    let issuer_root = load_account(view, issuer, TransactionResult::tecNO_ISSUER)?;
    if !issuer_root.has_flag(LSF_REQUIRE_AUTH) {
        return Ok(false);
    }

    let Some(state) = get_line(view, holder, issuer, currency)? else {
        return Ok(true);
    };
    let (low, _) = line_sides(holder, issuer);
    let issuer_is_low = low == *issuer;
    // The auth bit lives on the issuer's side of the line.
    Ok(!if issuer_is_low {
        state.has_flag(LSF_LOW_AUTH)
    } else {
        state.has_flag(LSF_HIGH_AUTH)
    })
}

/// Creates a fresh trust line carrying only a balance, charging the
/// reserve side's owner count to `reserve_holder`.
pub fn create_line_with_balance(
    view: &mut LedgerView,
    holder: &AccountId,
    issuer: &AccountId,
    currency: &Currency,
    balance_for_holder: IssuedValue,
    limit_for_holder: IssuedValue,
    reserve_holder: bool,
) -> TxStep {
    let (low, high) = line_sides(holder, issuer);
    let holder_is_low = low == *holder;

    let stored_balance = if holder_is_low {
        balance_for_holder
    } else {
        balance_for_holder.negate()
    };

    let zero = IssuedCurrencyAmount::new(
        currency.to_string().into(),
        neutral_issuer().into(),
        "0".into(),
    );
    let mut low_limit = IssuedCurrencyAmount::new(
        currency.to_string().into(),
        low.to_address().into(),
        "0".into(),
    );
    let mut high_limit = IssuedCurrencyAmount::new(
        currency.to_string().into(),
        high.to_address().into(),
        "0".into(),
    );
    if holder_is_low {
        low_limit.value = limit_for_holder.to_string().into();
    } else {
        high_limit.value = limit_for_holder.to_string().into();
    }

    let mut flags = 0u32;
    if reserve_holder {
        flags |= if holder_is_low {
            LSF_LOW_RESERVE
        } else {
            LSF_HIGH_RESERVE
        };
    }

    let state = RippleState {
        ledger_entry_type: LedgerEntryType::RippleState,
        flags,
        balance: IssuedCurrencyAmount::new(
            zero.currency.clone(),
            zero.issuer.clone(),
            stored_balance.to_string().into(),
        ),
        low_limit,
        high_limit,
        low_quality_in: None,
        low_quality_out: None,
        high_quality_in: None,
        high_quality_out: None,
        low_node: 0,
        high_node: 0,
        previous_txn_id: None,
        previous_txn_lgr_seq: None,
    };

    let key = keylet::line(holder, issuer, currency);
    internal(view.insert(key, LedgerEntry::RippleState(state)))?;
    add_to_owner_dir(view, holder, &key)?;
    if reserve_holder {
        internal(view.adjust_owner_count(holder, 1))?;
    }
    Ok(())
}

/// Writes a new balance onto an existing line, from the holder's
/// perspective, deleting the line if it returns to its default state.
pub fn set_line_balance(
    view: &mut LedgerView,
    holder: &AccountId,
    issuer: &AccountId,
    currency: &Currency,
    new_balance_for_holder: IssuedValue,
) -> TxStep {
    let key = keylet::line(holder, issuer, currency);
    let mut state = get_line(view, holder, issuer, currency)?
        .ok_or(TransactionResult::tecNO_LINE)?;

    let (low, high) = line_sides(holder, issuer);
    let stored = if *holder == low {
        new_balance_for_holder
    } else {
        new_balance_for_holder.negate()
    };
    state.balance.value = stored.to_string().into();

    if line_is_default(&state)? {
        // Return the reserve to whichever side was carrying it.
        if state.has_flag(LSF_LOW_RESERVE) {
            remove_from_owner_dir(view, &low, &key)?;
            internal(view.adjust_owner_count(&low, -1))?;
        }
        if state.has_flag(LSF_HIGH_RESERVE) {
            remove_from_owner_dir(view, &high, &key)?;
            internal(view.adjust_owner_count(&high, -1))?;
        }
        internal(view.erase(&key))?;
    } else {
        internal(view.update(key, LedgerEntry::RippleState(state)))?;
    }
    Ok(())
}

/// A line with zero balance, zero limits and no quality settings no
/// longer needs to exist.
pub fn line_is_default(state: &RippleState) -> TxStep<bool> {
    let balance =
        IssuedValue::from_str(&state.balance.value).map_err(|_| TransactionResult::tefINTERNAL)?;
    let low_limit =
        IssuedValue::from_str(&state.low_limit.value).map_err(|_| TransactionResult::tefINTERNAL)?;
    let high_limit = IssuedValue::from_str(&state.high_limit.value)
        .map_err(|_| TransactionResult::tefINTERNAL)?;

    Ok(balance.is_zero()
        && low_limit.is_zero()
        && high_limit.is_zero()
        && state.low_quality_in.unwrap_or(0) == 0
        && state.low_quality_out.unwrap_or(0) == 0
        && state.high_quality_in.unwrap_or(0) == 0
        && state.high_quality_out.unwrap_or(0) == 0)
}

/// Moves issued currency from `sender` to `receiver` along their
/// lines with the issuer. Freezes and authorization gate the credit
/// side; insufficient balance fails the debit side.
pub fn transfer_issued(
    view: &mut LedgerView,
    sender: &AccountId,
    receiver: &AccountId,
    currency: &Currency,
    issuer: &AccountId,
    value: IssuedValue,
    transfer_rate: u32,
) -> TxStep {
    debug_assert!(!value.is_negative());

    if sender == issuer {
        credit_holder(view, receiver, currency, issuer, value)
    } else if receiver == issuer {
        debit_holder(view, sender, currency, issuer, value)
    } else {
        // Through the issuer: the sender's side pays the transfer
        // rate.
        let debited = crate::ledger::amount::with_transfer_rate(&value, transfer_rate)
            .map_err(|_| TransactionResult::temBAD_AMOUNT)?;
        debit_holder(view, sender, currency, issuer, debited)?;
        credit_holder(view, receiver, currency, issuer, value)
    }
}

/// Adds to a holder's balance, respecting freezes, authorization and
/// the holder's limit.
pub fn credit_holder(
    view: &mut LedgerView,
    holder: &AccountId,
    currency: &Currency,
    issuer: &AccountId,
    value: IssuedValue,
) -> TxStep {
    if is_frozen(view, holder, currency, issuer)? {
        return Err(TransactionResult::tecFROZEN);
    }
    if lacks_auth(view, holder, currency, issuer)? {
        return Err(TransactionResult::tecNO_AUTH);
    }

    let Some(state) = get_line(view, holder, issuer, currency)? else {
        return Err(TransactionResult::tecNO_LINE);
    };
    let (low, _) = line_sides(holder, issuer);
    let balance = line_balance(&state, holder, &low)?;
    let limit = line_limit(&state, *holder == low)?;

    let new_balance =
        add_values(&balance, &value).map_err(|_| TransactionResult::temBAD_AMOUNT)?;
    if new_balance > limit && new_balance > balance {
        return Err(TransactionResult::tecPATH_DRY);
    }

    set_line_balance(view, holder, issuer, currency, new_balance)
}

/// Subtracts from a holder's balance; a frozen or underfunded side
/// cannot pay.
pub fn debit_holder(
    view: &mut LedgerView,
    holder: &AccountId,
    currency: &Currency,
    issuer: &AccountId,
    value: IssuedValue,
) -> TxStep {
    if is_frozen(view, holder, currency, issuer)? {
        return Err(TransactionResult::tecFROZEN);
    }

    let Some(state) = get_line(view, holder, issuer, currency)? else {
        return Err(TransactionResult::tecUNFUNDED_PAYMENT);
    };
    let (low, _) = line_sides(holder, issuer);
    let balance = line_balance(&state, holder, &low)?;

    if balance < value {
        return Err(TransactionResult::tecUNFUNDED_PAYMENT);
    }
    let new_balance =
        add_values(&balance, &value.negate()).map_err(|_| TransactionResult::temBAD_AMOUNT)?;

    set_line_balance(view, holder, issuer, currency, new_balance)
}

/// The holder's spendable balance of an issued currency.
pub fn issued_balance(
    view: &LedgerView,
    holder: &AccountId,
    currency: &Currency,
    issuer: &AccountId,
) -> TxStep<IssuedValue> {
    let Some(state) = get_line(view, holder, issuer, currency)? else {
        return Ok(IssuedValue::ZERO);
    };
    let (low, _) = line_sides(holder, issuer);
    line_balance(&state, holder, &low)
}

/// Tracks an owned object in the account's directory. The directory
/// itself is bookkeeping and carries no reserve.
pub fn add_to_owner_dir(view: &mut LedgerView, owner: &AccountId, entry: &Hash256) -> TxStep {
    let dir_key = keylet::owner_dir(owner);
    match internal(view.peek(&dir_key))? {
        Some(LedgerEntry::DirectoryNode(mut dir)) => {
            if !dir.indexes.contains(entry) {
                dir.indexes.push(*entry);
                dir.indexes.sort();
                internal(view.update(dir_key, LedgerEntry::DirectoryNode(dir)))?;
            }
        }
        Some(_) => return Err(TransactionResult::tefINTERNAL),
        None => {
            let dir = DirectoryNode {
                ledger_entry_type: LedgerEntryType::DirectoryNode,
                flags: 0,
                owner: Some(*owner),
                root_index: dir_key,
                indexes: vec![*entry],
                previous_txn_id: None,
                previous_txn_lgr_seq: None,
            };
            internal(view.insert(dir_key, LedgerEntry::DirectoryNode(dir)))?;
        }
    }
    Ok(())
}

pub fn remove_from_owner_dir(
    view: &mut LedgerView,
    owner: &AccountId,
    entry: &Hash256,
) -> TxStep {
    let dir_key = keylet::owner_dir(owner);
    if let Some(LedgerEntry::DirectoryNode(mut dir)) = internal(view.peek(&dir_key))? {
        dir.indexes.retain(|index| index != entry);
        if dir.indexes.is_empty() {
            internal(view.erase(&dir_key))?;
        } else {
            internal(view.update(dir_key, LedgerEntry::DirectoryNode(dir)))?;
        }
    }
    Ok(())
}

pub fn owner_dir_is_empty(view: &LedgerView, owner: &AccountId) -> TxStep<bool> {
    match internal(view.peek(&keylet::owner_dir(owner)))? {
        Some(LedgerEntry::DirectoryNode(dir)) => Ok(dir.indexes.is_empty()),
        _ => Ok(true),
    }
}

/// Converts a helper pipeline into the flat result the engine wants.
pub fn complete(step: TxStep) -> TransactionResult {
    match step {
        Ok(()) => TransactionResult::tesSUCCESS,
        Err(code) => code,
    }
}
