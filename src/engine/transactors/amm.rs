//! The AMM family: constant-product pools held by a deterministic
//! pseudo-account that issues LP tokens.

use core::str::FromStr;

use crate::constants::MAX_TRADING_FEE;
use crate::core::binarycodec::types::{AccountId, Currency, Hash256, Issue, IssuedValue};
use crate::core::keylet;
use crate::engine::results::TransactionResult;
use crate::engine::transactors::common::{self, complete, TxStep};
use crate::engine::{ApplyContext, PreclaimContext};
use crate::ledger::amount::{
    add_values, divide_values, multiply_values, sqrt_value, LedgerAmount,
};
use crate::ledger::objects::{
    AccountRoot, Amm, AuctionSlot, LedgerEntry, LedgerEntryType, VoteEntry, VoteEntryWrapper,
    LSF_AMM, LSF_DEFAULT_RIPPLE, LSF_DEPOSIT_AUTH, LSF_DISABLE_MASTER,
};
use crate::models::amount::{Amount, IssuedCurrencyAmount};
use crate::models::transactions::amm_bid::AMMBid;
use crate::models::transactions::amm_clawback::{AMMClawback, AMMClawbackFlag};
use crate::models::transactions::amm_create::AMMCreate;
use crate::models::transactions::amm_delete::AMMDelete;
use crate::models::transactions::amm_deposit::{AMMDeposit, AMMDepositFlag};
use crate::models::transactions::amm_vote::AMMVote;
use crate::models::transactions::amm_withdraw::{AMMWithdraw, AMMWithdrawFlag};
use crate::models::transactions::Transaction;

/// An auction slot lasts a day of ripple time.
const AUCTION_SLOT_INTERVAL: u32 = 86_400;
/// The widest trust-line limit an AMM account extends.
const POOL_LINE_LIMIT: &str = "9999999999999999e64";
/// Trading fees are hundred-thousandths.
const TRADING_FEE_PARTS: u32 = 100_000;

fn one() -> IssuedValue {
    IssuedValue::from_str("1").expect("one parses")
}

fn value_to_drops(value: &IssuedValue) -> TxStep<i64> {
    let mut mantissa = value.mantissa() as i128;
    let mut exponent = value.exponent();
    while exponent > 0 {
        mantissa = mantissa
            .checked_mul(10)
            .ok_or(TransactionResult::temBAD_AMOUNT)?;
        exponent -= 1;
    }
    while exponent < 0 {
        mantissa /= 10;
        exponent += 1;
    }
    i64::try_from(mantissa).map_err(|_| TransactionResult::temBAD_AMOUNT)
}

fn drops_to_value(drops: i64) -> IssuedValue {
    IssuedValue::new(drops as i128, 0).expect("drops fit the mantissa range")
}

/// The pool's loaded state.
struct Pool {
    key: Hash256,
    amm: Amm,
    account: AccountId,
    lp_currency: Currency,
    lpt: IssuedValue,
    holdings: IssuedValue,
    holdings2: IssuedValue,
}

fn load_pool(view: &crate::ledger::view::LedgerView, asset: &Issue, asset2: &Issue) -> TxStep<Pool> {
    let key = keylet::amm(asset, asset2);
    let amm = match common::internal(view.peek(&key))? {
        Some(LedgerEntry::Amm(amm)) => amm,
        _ => return Err(TransactionResult::terNO_AMM),
    };

    let account = amm.account;
    let lp_currency = keylet::amm_lp_token_currency(asset, asset2);
    let lpt = IssuedValue::from_str(&amm.lp_token_balance.value)
        .map_err(|_| TransactionResult::tefINTERNAL)?;
    let holdings = holding(view, &account, &amm.asset.clone())?;
    let holdings2 = holding(view, &account, &amm.asset2.clone())?;

    Ok(Pool {
        key,
        amm,
        account,
        lp_currency,
        lpt,
        holdings,
        holdings2,
    })
}

/// The pool's reserve of one asset, as a unitless value (drops for
/// XRP).
fn holding(
    view: &crate::ledger::view::LedgerView,
    amm_account: &AccountId,
    issue: &Issue,
) -> TxStep<IssuedValue> {
    if issue.is_xrp() {
        let root = common::load_account(view, amm_account, TransactionResult::tecAMM_ACCOUNT)?;
        Ok(drops_to_value(root.balance))
    } else {
        let issuer = issue.issuer.ok_or(TransactionResult::temBAD_ISSUER)?;
        common::issued_balance(view, amm_account, &issue.currency, &issuer)
    }
}

/// Moves one asset into or out of the pool without rate or limit
/// gates; the pool's lines are internal bookkeeping.
fn move_asset(
    view: &mut crate::ledger::view::LedgerView,
    from: &AccountId,
    to: &AccountId,
    issue: &Issue,
    value: &IssuedValue,
) -> TxStep {
    if value.is_zero() {
        return Ok(());
    }
    debug_assert!(!value.is_negative());

    if issue.is_xrp() {
        let drops = value_to_drops(value)?;
        let mut source = common::load_account(view, from, TransactionResult::tecAMM_ACCOUNT)?;
        if source.balance < drops {
            return Err(TransactionResult::tecUNFUNDED_AMM);
        }
        source.balance -= drops;
        common::internal(view.put_account_root(source))?;

        let mut destination = common::load_account(view, to, TransactionResult::tecAMM_ACCOUNT)?;
        destination.balance += drops;
        common::internal(view.put_account_root(destination))?;
        return Ok(());
    }

    let issuer = issue.issuer.ok_or(TransactionResult::temBAD_ISSUER)?;
    take_issued(view, from, &issue.currency, &issuer, value)?;
    give_issued(view, to, &issue.currency, &issuer, value)
}

/// Debits issued currency without freeze or limit checks; the caller
/// gates those.
fn take_issued(
    view: &mut crate::ledger::view::LedgerView,
    holder: &AccountId,
    currency: &Currency,
    issuer: &AccountId,
    value: &IssuedValue,
) -> TxStep {
    if holder == issuer {
        return Ok(());
    }
    let balance = common::issued_balance(view, holder, currency, issuer)?;
    if balance < *value {
        return Err(TransactionResult::tecUNFUNDED_AMM);
    }
    let remaining =
        add_values(&balance, &value.negate()).map_err(|_| TransactionResult::tefINTERNAL)?;
    common::set_line_balance(view, holder, issuer, currency, remaining)
}

/// Credits issued currency, creating a wide-limit line on demand.
fn give_issued(
    view: &mut crate::ledger::view::LedgerView,
    holder: &AccountId,
    currency: &Currency,
    issuer: &AccountId,
    value: &IssuedValue,
) -> TxStep {
    if holder == issuer {
        return Ok(());
    }
    if common::get_line(view, holder, issuer, currency)?.is_none() {
        let limit = IssuedValue::from_str(POOL_LINE_LIMIT).expect("pool limit parses");
        return common::create_line_with_balance(
            view, holder, issuer, currency, *value, limit, false,
        );
    }
    let balance = common::issued_balance(view, holder, currency, issuer)?;
    let updated = add_values(&balance, value).map_err(|_| TransactionResult::tefINTERNAL)?;
    common::set_line_balance(view, holder, issuer, currency, updated)
}

fn holder_lp_tokens(
    view: &crate::ledger::view::LedgerView,
    pool: &Pool,
    holder: &AccountId,
) -> TxStep<IssuedValue> {
    common::issued_balance(view, holder, &pool.lp_currency, &pool.account)
}

fn mint_lp_tokens(
    view: &mut crate::ledger::view::LedgerView,
    pool: &mut Pool,
    holder: &AccountId,
    tokens: &IssuedValue,
) -> TxStep {
    give_issued(view, holder, &pool.lp_currency.clone(), &pool.account.clone(), tokens)?;
    pool.lpt = add_values(&pool.lpt, tokens).map_err(|_| TransactionResult::tefINTERNAL)?;
    pool.amm.lp_token_balance.value = pool.lpt.to_string().into();
    Ok(())
}

fn burn_lp_tokens(
    view: &mut crate::ledger::view::LedgerView,
    pool: &mut Pool,
    holder: &AccountId,
    tokens: &IssuedValue,
) -> TxStep {
    take_issued(view, holder, &pool.lp_currency.clone(), &pool.account.clone(), tokens)
        .map_err(|_| TransactionResult::tecAMM_INVALID_TOKENS)?;
    pool.lpt = add_values(&pool.lpt, &tokens.negate())
        .map_err(|_| TransactionResult::tefINTERNAL)?;
    pool.amm.lp_token_balance.value = pool.lpt.to_string().into();
    Ok(())
}

fn store_pool(view: &mut crate::ledger::view::LedgerView, pool: Pool) -> TxStep {
    common::internal(view.update(pool.key, LedgerEntry::Amm(pool.amm)))
}

/// The amount a transaction offers for one side of the pool, checked
/// against that side's asset definition.
fn side_value(amount: &Amount<'_>, issue: &Issue) -> TxStep<IssuedValue> {
    match (common::parse_amount(amount)?, issue.is_xrp()) {
        (LedgerAmount::Xrp(drops), true) => Ok(drops_to_value(drops.0)),
        (LedgerAmount::Issued(issued), false)
            if issued.currency == issue.currency && Some(issued.issuer) == issue.issuer =>
        {
            Ok(issued.value)
        }
        _ => Err(TransactionResult::tecAMM_FAILED),
    }
}

pub fn preflight_create(tx: &AMMCreate<'_>) -> TransactionResult {
    if tx.trading_fee > MAX_TRADING_FEE {
        return TransactionResult::temBAD_FEE;
    }
    let amount = match common::parse_amount(&tx.amount) {
        Ok(amount) => amount,
        Err(code) => return code,
    };
    let amount2 = match common::parse_amount(&tx.amount2) {
        Ok(amount) => amount,
        Err(code) => return code,
    };
    if !amount.is_positive() || !amount2.is_positive() {
        return TransactionResult::temBAD_AMOUNT;
    }
    if amount.currency() == amount2.currency() && amount.issuer() == amount2.issuer() {
        return TransactionResult::temBAD_AMOUNT;
    }
    TransactionResult::tesSUCCESS
}

fn issue_of(amount: &LedgerAmount) -> Issue {
    match amount {
        LedgerAmount::Xrp(_) => Issue::xrp(),
        LedgerAmount::Issued(issued) => Issue::issued(issued.currency, issued.issuer),
    }
}

pub fn preclaim_create(tx: &AMMCreate<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let (Ok(amount), Ok(amount2)) = (
        common::parse_amount(&tx.amount),
        common::parse_amount(&tx.amount2),
    ) else {
        return TransactionResult::temBAD_AMOUNT;
    };

    let key = keylet::amm(&issue_of(&amount), &issue_of(&amount2));
    if ctx.view.exists(&key).unwrap_or(false) {
        return TransactionResult::tecDUPLICATE;
    }

    for amount in [&amount, &amount2] {
        if let LedgerAmount::Issued(issued) = amount {
            match common::is_globally_frozen(ctx.view, &issued.issuer) {
                Ok(true) => return TransactionResult::tecFROZEN,
                Ok(false) => {}
                Err(code) => return code,
            }
            if ctx.account != issued.issuer {
                let held = common::issued_balance(
                    ctx.view,
                    &ctx.account,
                    &issued.currency,
                    &issued.issuer,
                )
                .unwrap_or(IssuedValue::ZERO);
                if held < issued.value {
                    return TransactionResult::tecUNFUNDED_AMM;
                }
            }
        }
    }

    TransactionResult::tesSUCCESS
}

pub fn apply_create(tx: &AMMCreate<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_create_steps(tx, ctx))
}

fn apply_create_steps(tx: &AMMCreate<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let amount = common::parse_amount(&tx.amount)?;
    let amount2 = common::parse_amount(&tx.amount2)?;
    let (asset, asset2) = (issue_of(&amount), issue_of(&amount2));

    let amm_key = keylet::amm(&asset, &asset2);
    let amm_account = keylet::amm_account_id(&asset, &asset2);
    let lp_currency = keylet::amm_lp_token_currency(&asset, &asset2);

    if common::internal(ctx.view.exists(&keylet::account(&amm_account)))? {
        return Err(TransactionResult::tecDUPLICATE);
    }

    // The pseudo-account: unkeyed and unfunded, purely a holder.
    let mut pseudo = AccountRoot::new(amm_account, 0, ctx.ledger_seq);
    pseudo.flags = LSF_AMM | LSF_DISABLE_MASTER | LSF_DEFAULT_RIPPLE | LSF_DEPOSIT_AUTH;
    common::internal(ctx.view.put_account_root(pseudo))?;

    let value = side_value(&tx.amount, &asset)?;
    let value2 = side_value(&tx.amount2, &asset2)?;
    move_asset(ctx.view, &ctx.account, &amm_account, &asset, &value)?;
    move_asset(ctx.view, &ctx.account, &amm_account, &asset2, &value2)?;

    // Initial LP issuance is the geometric mean of the deposits.
    let tokens = sqrt_value(
        &multiply_values(&value, &value2).map_err(|_| TransactionResult::temBAD_AMOUNT)?,
    )
    .map_err(|_| TransactionResult::temBAD_AMOUNT)?;
    if tokens.is_zero() {
        return Err(TransactionResult::tecUNFUNDED_AMM);
    }
    give_issued(ctx.view, &ctx.account, &lp_currency, &amm_account, &tokens)?;

    let amm = Amm {
        ledger_entry_type: LedgerEntryType::Amm,
        flags: 0,
        account: amm_account,
        asset,
        asset2,
        lp_token_balance: IssuedCurrencyAmount::new(
            lp_currency.to_string().into(),
            amm_account.to_address().into(),
            tokens.to_string().into(),
        ),
        trading_fee: tx.trading_fee,
        vote_slots: Some(vec![VoteEntryWrapper {
            vote_entry: VoteEntry {
                account: ctx.account,
                trading_fee: tx.trading_fee,
                vote_weight: TRADING_FEE_PARTS,
            },
        }]),
        auction_slot: Some(AuctionSlot {
            account: ctx.account,
            discounted_fee: Some(tx.trading_fee / 10),
            price: IssuedCurrencyAmount::new(
                lp_currency.to_string().into(),
                amm_account.to_address().into(),
                "0".into(),
            ),
            expiration: ctx.parent_close_time + AUCTION_SLOT_INTERVAL,
            auth_accounts: None,
        }),
        owner_node: 0,
        previous_txn_id: None,
        previous_txn_lgr_seq: None,
    };
    common::internal(ctx.view.insert(amm_key, LedgerEntry::Amm(amm)))?;
    Ok(())
}

pub fn preflight_deposit(tx: &AMMDeposit<'_>) -> TransactionResult {
    // Mode-flag exclusivity is the model's concern; re-run it here so
    // wire submissions get the precise code.
    if crate::models::Model::get_errors(tx).is_err() {
        return TransactionResult::temINVALID_FLAG;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_deposit(tx: &AMMDeposit<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let pool = match load_pool(ctx.view, &tx.asset, &tx.asset2) {
        Ok(pool) => pool,
        Err(code) => return code,
    };

    for issue in [&tx.asset, &tx.asset2] {
        if let Some(issuer) = issue.issuer {
            match common::is_globally_frozen(ctx.view, &issuer) {
                Ok(true) => return TransactionResult::tecFROZEN,
                Ok(false) => {}
                Err(code) => return code,
            }
        }
    }

    let empty_mode = tx.has_flag(&AMMDepositFlag::TfTwoAssetIfEmpty);
    if pool.lpt.is_zero() != empty_mode {
        return if empty_mode {
            TransactionResult::tecAMM_NOT_EMPTY
        } else {
            TransactionResult::tecAMM_EMPTY
        };
    }

    TransactionResult::tesSUCCESS
}

pub fn apply_deposit(tx: &AMMDeposit<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_deposit_steps(tx, ctx))
}

fn apply_deposit_steps(tx: &AMMDeposit<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let mut pool = load_pool(ctx.view, &tx.asset, &tx.asset2)?;
    let account = ctx.account;

    let (pay, pay2, tokens) = if tx.has_flag(&AMMDepositFlag::TfTwoAsset)
        || tx.has_flag(&AMMDepositFlag::TfTwoAssetIfEmpty)
    {
        let max = side_value(
            tx.amount.as_ref().ok_or(TransactionResult::temMALFORMED)?,
            &tx.asset,
        )?;
        let max2 = side_value(
            tx.amount2.as_ref().ok_or(TransactionResult::temMALFORMED)?,
            &tx.asset2,
        )?;

        if pool.lpt.is_zero() {
            // Refilling an empty pool works like creation.
            let tokens = sqrt_value(
                &multiply_values(&max, &max2).map_err(|_| TransactionResult::temBAD_AMOUNT)?,
            )
            .map_err(|_| TransactionResult::temBAD_AMOUNT)?;
            (max, max2, tokens)
        } else {
            // Pro-rata on the tighter side.
            let frac = divide_values(&max, &pool.holdings)
                .map_err(|_| TransactionResult::tecAMM_FAILED)?;
            let frac2 = divide_values(&max2, &pool.holdings2)
                .map_err(|_| TransactionResult::tecAMM_FAILED)?;
            let frac = if frac2 < frac { frac2 } else { frac };

            let pay = multiply_values(&pool.holdings, &frac)
                .map_err(|_| TransactionResult::tecAMM_FAILED)?;
            let pay2 = multiply_values(&pool.holdings2, &frac)
                .map_err(|_| TransactionResult::tecAMM_FAILED)?;
            let tokens = multiply_values(&pool.lpt, &frac)
                .map_err(|_| TransactionResult::tecAMM_FAILED)?;
            (pay, pay2, tokens)
        }
    } else if tx.has_flag(&AMMDepositFlag::TfLpToken) {
        let wanted = tx
            .lp_token_out
            .as_ref()
            .ok_or(TransactionResult::temMALFORMED)?;
        let tokens =
            IssuedValue::from_str(&wanted.value).map_err(|_| TransactionResult::temBAD_AMOUNT)?;
        let frac = divide_values(&tokens, &pool.lpt)
            .map_err(|_| TransactionResult::tecAMM_FAILED)?;

        let pay = multiply_values(&pool.holdings, &frac)
            .map_err(|_| TransactionResult::tecAMM_FAILED)?;
        let pay2 = multiply_values(&pool.holdings2, &frac)
            .map_err(|_| TransactionResult::tecAMM_FAILED)?;
        (pay, pay2, tokens)
    } else {
        // Single-asset modes.
        let max = side_value(
            tx.amount.as_ref().ok_or(TransactionResult::temMALFORMED)?,
            &tx.asset,
        )?;

        // Half the spread pays the pool's trading fee.
        let effective = crate::ledger::amount::scale_value(
            &max,
            2 * TRADING_FEE_PARTS - pool.amm.trading_fee as u32,
            2 * TRADING_FEE_PARTS,
        )
        .map_err(|_| TransactionResult::tecAMM_FAILED)?;

        let growth = add_values(
            &one(),
            &divide_values(&effective, &pool.holdings)
                .map_err(|_| TransactionResult::tecAMM_FAILED)?,
        )
        .map_err(|_| TransactionResult::tecAMM_FAILED)?;
        let tokens = multiply_values(
            &pool.lpt,
            &add_values(
                &sqrt_value(&growth).map_err(|_| TransactionResult::tecAMM_FAILED)?,
                &one().negate(),
            )
            .map_err(|_| TransactionResult::tecAMM_FAILED)?,
        )
        .map_err(|_| TransactionResult::tecAMM_FAILED)?;

        if tokens.is_zero() {
            return Err(TransactionResult::tecAMM_FAILED);
        }
        if let Some(floor) = &tx.lp_token_out {
            let floor = IssuedValue::from_str(&floor.value)
                .map_err(|_| TransactionResult::temBAD_AMOUNT)?;
            if tokens < floor {
                return Err(TransactionResult::tecAMM_FAILED);
            }
        }
        (max, IssuedValue::ZERO, tokens)
    };

    move_asset(ctx.view, &account, &pool.account.clone(), &tx.asset, &pay)?;
    move_asset(ctx.view, &account, &pool.account.clone(), &tx.asset2, &pay2)?;
    mint_lp_tokens(ctx.view, &mut pool, &account, &tokens)?;
    store_pool(ctx.view, pool)
}

pub fn preflight_withdraw(tx: &AMMWithdraw<'_>) -> TransactionResult {
    if crate::models::Model::get_errors(tx).is_err() {
        return TransactionResult::temINVALID_FLAG;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_withdraw(tx: &AMMWithdraw<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let pool = match load_pool(ctx.view, &tx.asset, &tx.asset2) {
        Ok(pool) => pool,
        Err(code) => return code,
    };
    if pool.lpt.is_zero() {
        return TransactionResult::tecAMM_EMPTY;
    }

    let holder_tokens = match holder_lp_tokens(ctx.view, &pool, &ctx.account) {
        Ok(tokens) => tokens,
        Err(code) => return code,
    };
    if holder_tokens.is_zero() || holder_tokens.is_negative() {
        return TransactionResult::tecAMM_INVALID_TOKENS;
    }

    TransactionResult::tesSUCCESS
}

pub fn apply_withdraw(tx: &AMMWithdraw<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_withdraw_steps(tx, ctx))
}

fn apply_withdraw_steps(tx: &AMMWithdraw<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let mut pool = load_pool(ctx.view, &tx.asset, &tx.asset2)?;
    let account = ctx.account;
    let held = holder_lp_tokens(ctx.view, &pool, &account)?;

    let (out, out2, tokens) = if tx.has_flag(&AMMWithdrawFlag::TfWithdrawAll)
        || tx.has_flag(&AMMWithdrawFlag::TfLpToken)
    {
        let tokens = if tx.has_flag(&AMMWithdrawFlag::TfWithdrawAll) {
            held
        } else {
            let wanted = tx
                .lp_token_in
                .as_ref()
                .ok_or(TransactionResult::temMALFORMED)?;
            IssuedValue::from_str(&wanted.value).map_err(|_| TransactionResult::temBAD_AMOUNT)?
        };
        if held < tokens {
            return Err(TransactionResult::tecAMM_INVALID_TOKENS);
        }

        let frac = divide_values(&tokens, &pool.lpt)
            .map_err(|_| TransactionResult::tecAMM_FAILED)?;
        let out = multiply_values(&pool.holdings, &frac)
            .map_err(|_| TransactionResult::tecAMM_FAILED)?;
        let out2 = multiply_values(&pool.holdings2, &frac)
            .map_err(|_| TransactionResult::tecAMM_FAILED)?;
        (out, out2, tokens)
    } else if tx.has_flag(&AMMWithdrawFlag::TfTwoAsset) {
        let wanted = side_value(
            tx.amount.as_ref().ok_or(TransactionResult::temMALFORMED)?,
            &tx.asset,
        )?;
        let frac = divide_values(&wanted, &pool.holdings)
            .map_err(|_| TransactionResult::tecAMM_FAILED)?;
        let out2 = multiply_values(&pool.holdings2, &frac)
            .map_err(|_| TransactionResult::tecAMM_FAILED)?;
        let tokens = multiply_values(&pool.lpt, &frac)
            .map_err(|_| TransactionResult::tecAMM_FAILED)?;
        if held < tokens {
            return Err(TransactionResult::tecAMM_INVALID_TOKENS);
        }
        (wanted, out2, tokens)
    } else {
        // Single-asset modes.
        let wanted = if tx.has_flag(&AMMWithdrawFlag::TfOneAssetWithdrawAll) {
            // As much of the asset as the holder's tokens buy.
            let frac = divide_values(&held, &pool.lpt)
                .map_err(|_| TransactionResult::tecAMM_FAILED)?;
            multiply_values(&pool.holdings, &frac)
                .map_err(|_| TransactionResult::tecAMM_FAILED)?
        } else {
            side_value(
                tx.amount.as_ref().ok_or(TransactionResult::temMALFORMED)?,
                &tx.asset,
            )?
        };

        // Emptying one side through a single-asset withdraw would
        // break the invariant product.
        if pool.holdings <= wanted {
            return Err(TransactionResult::tecAMM_BALANCE);
        }

        let share = divide_values(&wanted, &pool.holdings)
            .map_err(|_| TransactionResult::tecAMM_FAILED)?;
        let remainder = add_values(&one(), &share.negate())
            .map_err(|_| TransactionResult::tecAMM_FAILED)?;
        let tokens = multiply_values(
            &pool.lpt,
            &add_values(
                &one(),
                &sqrt_value(&remainder)
                    .map_err(|_| TransactionResult::tecAMM_FAILED)?
                    .negate(),
            )
            .map_err(|_| TransactionResult::tecAMM_FAILED)?,
        )
        .map_err(|_| TransactionResult::tecAMM_FAILED)?;

        if held < tokens {
            return Err(TransactionResult::tecAMM_INVALID_TOKENS);
        }
        (wanted, IssuedValue::ZERO, tokens)
    };

    burn_lp_tokens(ctx.view, &mut pool, &account, &tokens)?;
    move_asset(ctx.view, &pool.account.clone(), &account, &tx.asset, &out)?;
    move_asset(ctx.view, &pool.account.clone(), &account, &tx.asset2, &out2)?;

    // The last LP out retires the pool.
    if pool.lpt.is_zero() {
        return retire_pool(ctx, pool);
    }
    store_pool(ctx.view, pool)
}

fn retire_pool(ctx: &mut ApplyContext<'_>, pool: Pool) -> TxStep {
    common::internal(ctx.view.erase(&pool.key))?;

    // The pseudo-account's directory still tracks its (now empty)
    // trust lines; sweep them out with it.
    let dir_key = keylet::owner_dir(&pool.account);
    if let Some(LedgerEntry::DirectoryNode(dir)) = common::internal(ctx.view.peek(&dir_key))? {
        for index in dir.indexes {
            if common::internal(ctx.view.exists(&index))? {
                common::internal(ctx.view.erase(&index))?;
            }
        }
        common::internal(ctx.view.erase(&dir_key))?;
    }

    let account_key = keylet::account(&pool.account);
    if common::internal(ctx.view.exists(&account_key))? {
        common::internal(ctx.view.erase(&account_key))?;
    }
    Ok(())
}

pub fn preflight_vote(tx: &AMMVote<'_>) -> TransactionResult {
    if tx.trading_fee > MAX_TRADING_FEE {
        return TransactionResult::temBAD_FEE;
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_vote(tx: &AMMVote<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let pool = match load_pool(ctx.view, &tx.asset, &tx.asset2) {
        Ok(pool) => pool,
        Err(code) => return code,
    };
    match holder_lp_tokens(ctx.view, &pool, &ctx.account) {
        Ok(tokens) if !tokens.is_zero() && !tokens.is_negative() => {
            TransactionResult::tesSUCCESS
        }
        Ok(_) => TransactionResult::tecAMM_INVALID_TOKENS,
        Err(code) => code,
    }
}

pub fn apply_vote(tx: &AMMVote<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_vote_steps(tx, ctx))
}

fn apply_vote_steps(tx: &AMMVote<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let mut pool = load_pool(ctx.view, &tx.asset, &tx.asset2)?;
    let account = ctx.account;

    let mut slots = pool.amm.vote_slots.take().unwrap_or_default();
    slots.retain(|slot| slot.vote_entry.account != account);
    slots.push(VoteEntryWrapper {
        vote_entry: VoteEntry {
            account,
            trading_fee: tx.trading_fee,
            vote_weight: 0,
        },
    });

    // Recompute weights and the weighted-mean fee from current LP
    // holdings.
    let mut weighted_sum = IssuedValue::ZERO;
    let mut weight_total = IssuedValue::ZERO;
    for slot in &mut slots {
        let tokens = holder_lp_tokens(ctx.view, &pool, &slot.vote_entry.account)?;
        let fee_value = IssuedValue::new(slot.vote_entry.trading_fee as i128, 0)
            .map_err(|_| TransactionResult::tefINTERNAL)?;
        weighted_sum = add_values(
            &weighted_sum,
            &multiply_values(&tokens, &fee_value)
                .map_err(|_| TransactionResult::tefINTERNAL)?,
        )
        .map_err(|_| TransactionResult::tefINTERNAL)?;
        weight_total = add_values(&weight_total, &tokens)
            .map_err(|_| TransactionResult::tefINTERNAL)?;

        let share = divide_values(&tokens, &pool.lpt).unwrap_or(IssuedValue::ZERO);
        let parts = multiply_values(
            &share,
            &IssuedValue::new(TRADING_FEE_PARTS as i128, 0)
                .map_err(|_| TransactionResult::tefINTERNAL)?,
        )
        .unwrap_or(IssuedValue::ZERO);
        slot.vote_entry.vote_weight = value_to_drops(&parts).unwrap_or(0) as u32;
    }

    if !weight_total.is_zero() {
        let mean = divide_values(&weighted_sum, &weight_total)
            .map_err(|_| TransactionResult::tefINTERNAL)?;
        pool.amm.trading_fee = value_to_drops(&mean).unwrap_or(0) as u16;
    }

    pool.amm.vote_slots = Some(slots);
    store_pool(ctx.view, pool)
}

pub fn preflight_bid(tx: &AMMBid<'_>) -> TransactionResult {
    if let (Some(bid_min), Some(bid_max)) = (&tx.bid_min, &tx.bid_max) {
        let (Ok(low), Ok(high)) = (
            IssuedValue::from_str(&bid_min.value),
            IssuedValue::from_str(&bid_max.value),
        ) else {
            return TransactionResult::temBAD_AMOUNT;
        };
        if low > high {
            return TransactionResult::tecAMM_INVALID_TOKENS;
        }
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_bid(tx: &AMMBid<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    let pool = match load_pool(ctx.view, &tx.asset, &tx.asset2) {
        Ok(pool) => pool,
        Err(code) => return code,
    };
    match holder_lp_tokens(ctx.view, &pool, &ctx.account) {
        Ok(tokens) if !tokens.is_zero() && !tokens.is_negative() => {
            TransactionResult::tesSUCCESS
        }
        Ok(_) => TransactionResult::tecAMM_INVALID_TOKENS,
        Err(code) => code,
    }
}

pub fn apply_bid(tx: &AMMBid<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_bid_steps(tx, ctx))
}

fn apply_bid_steps(tx: &AMMBid<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let mut pool = load_pool(ctx.view, &tx.asset, &tx.asset2)?;
    let account = ctx.account;
    let held = holder_lp_tokens(ctx.view, &pool, &account)?;

    // The floor price is a fixed slice of the outstanding LP supply.
    let minimum = divide_values(
        &pool.lpt,
        &IssuedValue::new(25, 0).map_err(|_| TransactionResult::tefINTERNAL)?,
    )
    .map_err(|_| TransactionResult::tefINTERNAL)?;

    let mut price = minimum;
    if let Some(bid_min) = &tx.bid_min {
        let floor = IssuedValue::from_str(&bid_min.value)
            .map_err(|_| TransactionResult::temBAD_AMOUNT)?;
        if floor > price {
            price = floor;
        }
    }
    if let Some(bid_max) = &tx.bid_max {
        let ceiling = IssuedValue::from_str(&bid_max.value)
            .map_err(|_| TransactionResult::temBAD_AMOUNT)?;
        if price > ceiling {
            return Err(TransactionResult::tecAMM_FAILED);
        }
    }
    if held < price {
        return Err(TransactionResult::tecAMM_INVALID_TOKENS);
    }

    // The bid burns the LP tokens paid for the slot.
    burn_lp_tokens(ctx.view, &mut pool, &account, &price)?;

    let lp_currency = pool.lp_currency;
    let amm_account = pool.account;
    pool.amm.auction_slot = Some(AuctionSlot {
        account,
        discounted_fee: Some(pool.amm.trading_fee / 10),
        price: IssuedCurrencyAmount::new(
            lp_currency.to_string().into(),
            amm_account.to_address().into(),
            price.to_string().into(),
        ),
        expiration: ctx.parent_close_time + AUCTION_SLOT_INTERVAL,
        auth_accounts: tx.auth_accounts.as_ref().map(|accounts| {
            accounts
                .iter()
                .filter_map(|auth| {
                    common::parse_account(&auth.account).ok().map(|account| {
                        crate::ledger::objects::AuthAccountWrapper {
                            auth_account: crate::ledger::objects::AuthAccountEntry { account },
                        }
                    })
                })
                .collect()
        }),
    });

    store_pool(ctx.view, pool)
}

pub fn preflight_delete(_tx: &AMMDelete<'_>) -> TransactionResult {
    TransactionResult::tesSUCCESS
}

pub fn preclaim_delete(tx: &AMMDelete<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    match load_pool(ctx.view, &tx.asset, &tx.asset2) {
        Ok(pool) if pool.lpt.is_zero() => TransactionResult::tesSUCCESS,
        Ok(_) => TransactionResult::tecAMM_NOT_EMPTY,
        Err(code) => code,
    }
}

pub fn apply_delete(tx: &AMMDelete<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_delete_steps(tx, ctx))
}

fn apply_delete_steps(tx: &AMMDelete<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let pool = load_pool(ctx.view, &tx.asset, &tx.asset2)?;
    retire_pool(ctx, pool)
}

pub fn preflight_clawback(tx: &AMMClawback<'_>) -> TransactionResult {
    if let Some(amount) = &tx.amount {
        match IssuedValue::from_str(&amount.value) {
            Ok(value) if !value.is_negative() && !value.is_zero() => {}
            _ => return TransactionResult::temBAD_AMOUNT,
        }
    }
    TransactionResult::tesSUCCESS
}

pub fn preclaim_clawback(tx: &AMMClawback<'_>, ctx: &PreclaimContext<'_>) -> TransactionResult {
    if !ctx
        .root
        .has_flag(crate::ledger::objects::LSF_ALLOW_TRUSTLINE_CLAWBACK)
    {
        return TransactionResult::tecNO_PERMISSION;
    }

    let Ok(holder) = common::parse_account(&tx.holder) else {
        return TransactionResult::temINVALID_ACCOUNT_ID;
    };
    let pool = match load_pool(ctx.view, &tx.asset, &tx.asset2) {
        Ok(pool) => pool,
        Err(code) => return code,
    };
    match holder_lp_tokens(ctx.view, &pool, &holder) {
        Ok(tokens) if !tokens.is_zero() && !tokens.is_negative() => {
            TransactionResult::tesSUCCESS
        }
        Ok(_) => TransactionResult::tecAMM_BALANCE,
        Err(code) => code,
    }
}

pub fn apply_clawback(tx: &AMMClawback<'_>, ctx: &mut ApplyContext<'_>) -> TransactionResult {
    complete(apply_clawback_steps(tx, ctx))
}

fn apply_clawback_steps(tx: &AMMClawback<'_>, ctx: &mut ApplyContext<'_>) -> TxStep {
    let holder = common::parse_account(&tx.holder)?;
    let mut pool = load_pool(ctx.view, &tx.asset, &tx.asset2)?;
    let held = holder_lp_tokens(ctx.view, &pool, &holder)?;

    // Burn the holder's position (or the slice the cap buys).
    let tokens = match &tx.amount {
        Some(cap) => {
            let cap_value = IssuedValue::from_str(&cap.value)
                .map_err(|_| TransactionResult::temBAD_AMOUNT)?;
            let frac = divide_values(&cap_value, &pool.holdings)
                .map_err(|_| TransactionResult::tecAMM_FAILED)?;
            let tokens = multiply_values(&pool.lpt, &frac)
                .map_err(|_| TransactionResult::tecAMM_FAILED)?;
            if held < tokens {
                held
            } else {
                tokens
            }
        }
        None => held,
    };

    let frac = divide_values(&tokens, &pool.lpt)
        .map_err(|_| TransactionResult::tecAMM_FAILED)?;
    let out = multiply_values(&pool.holdings, &frac)
        .map_err(|_| TransactionResult::tecAMM_FAILED)?;
    let out2 = multiply_values(&pool.holdings2, &frac)
        .map_err(|_| TransactionResult::tecAMM_FAILED)?;

    burn_lp_tokens(ctx.view, &mut pool, &holder, &tokens)?;

    // The clawed asset returns to its issuer and vanishes; the other
    // side goes to the holder unless it too is being clawed.
    move_asset(ctx.view, &pool.account.clone(), &ctx.account.clone(), &tx.asset, &out)?;
    let claw_both = tx.has_flag(&AMMClawbackFlag::TfClawTwoAssets);
    let second_recipient = if claw_both { ctx.account } else { holder };
    move_asset(
        ctx.view,
        &pool.account.clone(),
        &second_recipient,
        &tx.asset2,
        &out2,
    )?;

    if pool.lpt.is_zero() {
        return retire_pool(ctx, pool);
    }
    store_pool(ctx.view, pool)
}
