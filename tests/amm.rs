//! AMM lifecycle scenarios: create, duplicate rejection, deposits,
//! withdrawals and fee votes.

use xrpld::core::binarycodec::types::Issue;
use xrpld::core::keylet;
use xrpld::engine::results::TransactionResult;
use xrpld::models::amount::{Amount, IssuedCurrencyAmount, XRPAmount};
use xrpld::models::transactions::amm_create::AMMCreate;
use xrpld::models::transactions::amm_deposit::{AMMDeposit, AMMDepositFlag};
use xrpld::models::transactions::amm_vote::AMMVote;
use xrpld::models::transactions::amm_withdraw::{AMMWithdraw, AMMWithdrawFlag};
use xrpld::testenv::{TestAccount, TestEnv};

const XRP: i64 = 1_000_000;

fn usd(issuer: &TestAccount, value: &str) -> Amount<'static> {
    Amount::IssuedCurrencyAmount(IssuedCurrencyAmount::new(
        "USD".into(),
        issuer.address.clone().into(),
        value.to_string().into(),
    ))
}

fn xrp_usd_pool(env: &mut TestEnv, alice: &TestAccount) -> (Issue, Issue) {
    let asset = Issue::xrp();
    let asset2 = Issue::issued("USD".parse().unwrap(), alice.address.parse().unwrap());

    let outcome = env.sign_and_submit(
        AMMCreate::new(
            alice.address.clone().into(),
            XRPAmount::from(10_000 * XRP).into(),
            usd(alice, "10000"),
            500,
        )
        .into(),
        alice,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);
    (asset, asset2)
}

#[test]
fn create_then_duplicate_is_rejected() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 20_000 * XRP);
    let carol = env.fund("carol", 20_000 * XRP);

    let (asset, asset2) = xrp_usd_pool(&mut env, &alice);
    assert!(env.view().exists(&keylet::amm(&asset, &asset2)).unwrap());

    // The pool account now holds the XRP side.
    let pool_account = keylet::amm_account_id(&asset, &asset2);
    assert_eq!(env.balance(&pool_account), 10_000 * XRP);

    // The creator holds LP tokens denominated in the derived
    // currency.
    let lp_currency = keylet::amm_lp_token_currency(&asset, &asset2);
    let lp_held = env.iou_balance(&alice.id, &lp_currency.to_string(), &pool_account);
    assert!(!lp_held.is_zero());

    let outcome = env.sign_and_submit(
        AMMCreate::new(
            carol.address.clone().into(),
            XRPAmount::from(10_000 * XRP).into(),
            usd(&alice, "10000"),
            500,
        )
        .into(),
        &carol,
    );
    assert_eq!(outcome.result, TransactionResult::tecDUPLICATE);
}

#[test]
fn two_asset_deposit_and_withdraw_all() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 30_000 * XRP);
    let bob = env.fund("bob", 20_000 * XRP);
    let (asset, asset2) = xrp_usd_pool(&mut env, &alice);

    // Bob needs USD before he can join the pool.
    let outcome = env.sign_and_submit(
        xrpld::models::transactions::trust_set::TrustSet::new(
            bob.address.clone().into(),
            IssuedCurrencyAmount::new("USD".into(), alice.address.clone().into(), "5000".into()),
        )
        .into(),
        &bob,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);
    let outcome = env.sign_and_submit(
        xrpld::models::transactions::payment::Payment::new(
            alice.address.clone().into(),
            usd(&alice, "2000"),
            bob.address.clone().into(),
        )
        .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);

    let pool_account = keylet::amm_account_id(&asset, &asset2);
    let lp_currency = keylet::amm_lp_token_currency(&asset, &asset2).to_string();

    let outcome = env.sign_and_submit(
        AMMDeposit::new(bob.address.clone().into(), asset.clone(), asset2.clone())
            .with_amount(XRPAmount::from(1_000 * XRP).into())
            .with_amount2(usd(&alice, "1000"))
            .with_flag(AMMDepositFlag::TfTwoAsset)
            .into(),
        &bob,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);

    let bob_lp = env.iou_balance(&bob.id, &lp_currency, &pool_account);
    assert!(!bob_lp.is_zero(), "deposit must mint LP tokens");

    // Bob leaves entirely; his tokens burn and assets return.
    let bob_xrp_before = env.balance(&bob.id);
    let outcome = env.sign_and_submit(
        AMMWithdraw::new(bob.address.clone().into(), asset.clone(), asset2.clone())
            .with_flag(AMMWithdrawFlag::TfWithdrawAll)
            .into(),
        &bob,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);
    assert!(env
        .iou_balance(&bob.id, &lp_currency, &pool_account)
        .is_zero());
    assert!(env.balance(&bob.id) > bob_xrp_before);
}

#[test]
fn vote_requires_lp_tokens() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 30_000 * XRP);
    let carol = env.fund("carol", 1_000 * XRP);
    let (asset, asset2) = xrp_usd_pool(&mut env, &alice);

    // Carol holds no LP tokens.
    let outcome = env.sign_and_submit(
        AMMVote::new(carol.address.clone().into(), asset.clone(), asset2.clone(), 30).into(),
        &carol,
    );
    assert_eq!(outcome.result, TransactionResult::tecAMM_INVALID_TOKENS);

    // The sole LP moves the fee outright.
    let outcome = env.sign_and_submit(
        AMMVote::new(alice.address.clone().into(), asset, asset2, 30).into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);
}

#[test]
fn deposit_into_missing_pool_retries() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 1_000 * XRP);

    let asset = Issue::xrp();
    let asset2 = Issue::issued("EUR".parse().unwrap(), alice.address.parse().unwrap());

    let outcome = env.sign_and_submit(
        AMMDeposit::new(alice.address.clone().into(), asset, asset2)
            .with_amount(XRPAmount::from(10 * XRP).into())
            .with_flag(AMMDepositFlag::TfSingleAsset)
            .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::terNO_AMM);
}
