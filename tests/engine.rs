//! Engine scenarios driven end to end through the test environment.

use xrpld::engine::results::TransactionResult;
use xrpld::models::amount::{Amount, IssuedCurrencyAmount};
use xrpld::models::transactions::account_delete::AccountDelete;
use xrpld::models::transactions::account_set::{AccountSet, AccountSetFlag};
use xrpld::models::transactions::check_cash::CheckCash;
use xrpld::models::transactions::check_create::CheckCreate;
use xrpld::models::transactions::clawback::Clawback;
use xrpld::models::transactions::payment::Payment;
use xrpld::models::transactions::ticket_create::TicketCreate;
use xrpld::models::transactions::trust_set::TrustSet;
use xrpld::testenv::TestEnv;

const XRP: i64 = 1_000_000;

#[test]
fn payment_debits_credits_and_consumes_sequence() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 100 * XRP);
    let bob = env.fund("bob", 50 * XRP);

    let alice_before = env.balance(&alice.id);
    let bob_before = env.balance(&bob.id);
    let sequence_before = env.sequence(&alice.id);

    let outcome = env.sign_and_submit(
        Payment::new(
            alice.address.clone().into(),
            (10 * XRP).to_string().into(),
            bob.address.clone().into(),
        )
        .into(),
        &alice,
    );

    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);
    assert_eq!(env.sequence(&alice.id), sequence_before + 1);
    assert_eq!(
        env.balance(&alice.id),
        alice_before - 10 * XRP - env.base_fee()
    );
    assert_eq!(env.balance(&bob.id), bob_before + 10 * XRP);

    let metadata = outcome.metadata.expect("applied transactions carry metadata");
    assert_eq!(
        metadata.delivered_amount,
        Some(serde_json::json!((10 * XRP).to_string()))
    );
}

#[test]
fn underfunded_payment_claims_only_the_fee() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 20 * XRP);
    let bob = env.fund("bob", 20 * XRP);

    let alice_before = env.balance(&alice.id);
    let bob_before = env.balance(&bob.id);

    // The reserve makes 15 XRP unsendable from a 20 XRP account.
    let outcome = env.sign_and_submit(
        Payment::new(
            alice.address.clone().into(),
            (15 * XRP).to_string().into(),
            bob.address.clone().into(),
        )
        .into(),
        &alice,
    );

    assert_eq!(outcome.result, TransactionResult::tecUNFUNDED_PAYMENT);
    assert_eq!(env.balance(&alice.id), alice_before - env.base_fee());
    assert_eq!(env.balance(&bob.id), bob_before);
}

#[test]
fn account_set_flag_validation() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 100 * XRP);
    let sequence_before = env.sequence(&alice.id);

    // Setting and clearing the same flag is malformed.
    let outcome = env.sign_and_submit(
        AccountSet::new(alice.address.clone().into())
            .with_set_flag(AccountSetFlag::AsfDisallowXRP)
            .with_clear_flag(AccountSetFlag::AsfDisallowXRP)
            .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::temINVALID_FLAG);

    // Transfer rate bounds.
    let outcome = env.sign_and_submit(
        AccountSet::new(alice.address.clone().into())
            .with_transfer_rate(900_000_000)
            .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::temBAD_TRANSFER_RATE);

    let outcome = env.sign_and_submit(
        AccountSet::new(alice.address.clone().into())
            .with_transfer_rate(2_100_000_000)
            .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::temBAD_TRANSFER_RATE);

    // Tick size bounds.
    let outcome = env.sign_and_submit(
        AccountSet::new(alice.address.clone().into())
            .with_tick_size(2)
            .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::temBAD_TICK_SIZE);

    // Malformed results never touch the account.
    assert_eq!(env.sequence(&alice.id), sequence_before);
}

#[test]
fn account_delete_blockers() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 100 * XRP);
    let bob = env.fund("bob", 100 * XRP);

    // Three tickets give alice three obligations.
    let outcome = env.sign_and_submit(
        TicketCreate::new(alice.address.clone().into(), 3).into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);
    assert_eq!(env.owner_count(&alice.id), 3);

    let outcome = env.sign_and_submit(
        AccountDelete::new(alice.address.clone().into(), bob.address.clone().into()).into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::tecHAS_OBLIGATIONS);

    // Outside standalone mode the sequence gap also blocks deletion.
    let carol = env.fund("carol", 100 * XRP);
    env.set_standalone(false);
    let outcome = env.sign_and_submit(
        AccountDelete::new(carol.address.clone().into(), bob.address.clone().into()).into(),
        &carol,
    );
    assert_eq!(outcome.result, TransactionResult::tefTOO_BIG);
    env.set_standalone(true);
}

#[test]
fn check_create_and_cash_xrp() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 100 * XRP);
    let bob = env.fund("bob", 50 * XRP);

    let create_sequence = env.sequence(&alice.id);
    let outcome = env.sign_and_submit(
        CheckCreate::new(
            alice.address.clone().into(),
            bob.address.clone().into(),
            (10 * XRP).to_string().into(),
        )
        .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);
    assert_eq!(env.owner_count(&alice.id), 1);

    let check_id = xrpld::core::keylet::check(&alice.id, create_sequence);

    let alice_before = env.balance(&alice.id);
    let bob_before = env.balance(&bob.id);

    let outcome = env.sign_and_submit(
        CheckCash::new(bob.address.clone().into(), check_id.to_string().into())
            .with_amount((10 * XRP).to_string().into())
            .into(),
        &bob,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);

    assert_eq!(env.balance(&bob.id), bob_before + 10 * XRP - env.base_fee());
    assert_eq!(env.balance(&alice.id), alice_before - 10 * XRP);
    assert_eq!(env.owner_count(&alice.id), 0);
}

#[test]
fn check_cash_deliver_min_partial() {
    let mut env = TestEnv::new();
    // Alice cannot cover the full promise once her reserve is held
    // back.
    let alice = env.fund("alice", 30 * XRP);
    let bob = env.fund("bob", 50 * XRP);

    let create_sequence = env.sequence(&alice.id);
    let outcome = env.sign_and_submit(
        CheckCreate::new(
            alice.address.clone().into(),
            bob.address.clone().into(),
            (100 * XRP).to_string().into(),
        )
        .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);

    let check_id = xrpld::core::keylet::check(&alice.id, create_sequence);

    // What alice can actually spend above her (now one-object)
    // reserve.
    let spendable = env.balance(&alice.id) - env.reserve(1);
    assert!(spendable > 0 && spendable < 100 * XRP);

    // Asking for one drop more than she can fund is a partial path.
    let outcome = env.sign_and_submit(
        CheckCash::new(bob.address.clone().into(), check_id.to_string().into())
            .with_deliver_min((spendable + 1).to_string().into())
            .into(),
        &bob,
    );
    assert_eq!(outcome.result, TransactionResult::tecPATH_PARTIAL);

    // The check survived the claimed failure; the floor she can fund
    // succeeds.
    let outcome = env.sign_and_submit(
        CheckCash::new(bob.address.clone().into(), check_id.to_string().into())
            .with_deliver_min(spendable.to_string().into())
            .into(),
        &bob,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);
}

#[test]
fn clawback_requires_opt_in_and_supports_partial() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 100 * XRP);
    let bob = env.fund("bob", 100 * XRP);

    // Bob trusts alice's USD and receives 1000.
    let outcome = env.sign_and_submit(
        TrustSet::new(
            bob.address.clone().into(),
            IssuedCurrencyAmount::new("USD".into(), alice.address.clone().into(), "1000".into()),
        )
        .into(),
        &bob,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);

    let outcome = env.sign_and_submit(
        Payment::new(
            alice.address.clone().into(),
            Amount::IssuedCurrencyAmount(IssuedCurrencyAmount::new(
                "USD".into(),
                alice.address.clone().into(),
                "1000".into(),
            )),
            bob.address.clone().into(),
        )
        .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);

    // Without the opt-in flag the issuer cannot claw back.
    let outcome = env.sign_and_submit(
        Clawback::new(
            alice.address.clone().into(),
            IssuedCurrencyAmount::new("USD".into(), bob.address.clone().into(), "5".into()),
        )
        .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::tecNO_PERMISSION);

    let outcome = env.sign_and_submit(
        AccountSet::new(alice.address.clone().into())
            .with_set_flag(AccountSetFlag::AsfAllowTrustLineClawback)
            .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);

    let outcome = env.sign_and_submit(
        Clawback::new(
            alice.address.clone().into(),
            IssuedCurrencyAmount::new("USD".into(), bob.address.clone().into(), "200".into()),
        )
        .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);

    assert_eq!(
        env.iou_balance(&bob.id, "USD", &alice.id).to_string(),
        "800"
    );
}

#[test]
fn ledger_close_produces_stable_headers() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 100 * XRP);
    let bob = env.fund("bob", 100 * XRP);

    env.sign_and_submit(
        Payment::new(
            alice.address.clone().into(),
            (5 * XRP).to_string().into(),
            bob.address.clone().into(),
        )
        .into(),
        &alice,
    );

    let header = env.close();
    assert!(!header.hash().is_zero());
    assert!(!header.account_hash.is_zero());
    assert!(!header.transaction_hash.is_zero());

    // The state carried into the next ledger.
    assert_eq!(env.balance(&bob.id), 105 * XRP);

    // An empty close still produces a parent-linked header.
    let next = env.close();
    assert_eq!(next.parent_hash, header.hash());
    assert_eq!(next.sequence, header.sequence + 1);
}
