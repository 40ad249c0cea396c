//! Amendment gating, tickets as sequence substitutes, and the escrow
//! time gates.

use xrpld::engine::results::TransactionResult;
use xrpld::ledger::rules::{FEATURE_BATCH, FEATURE_CHECKS, FEATURE_TICKET_BATCH};
use xrpld::models::transactions::batch::{Batch, BatchFlag, RawTransaction};
use xrpld::models::transactions::check_create::CheckCreate;
use xrpld::models::transactions::escrow_cancel::EscrowCancel;
use xrpld::models::transactions::escrow_create::EscrowCreate;
use xrpld::models::transactions::escrow_finish::EscrowFinish;
use xrpld::models::transactions::payment::Payment;
use xrpld::models::transactions::ticket_create::TicketCreate;
use xrpld::models::transactions::CommonTransactionBuilder;
use xrpld::testenv::TestEnv;

const XRP: i64 = 1_000_000;

#[test]
fn disabled_amendment_rejects_at_preflight() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 100 * XRP);
    let bob = env.fund("bob", 100 * XRP);

    env.disable_feature(FEATURE_CHECKS);
    let outcome = env.sign_and_submit(
        CheckCreate::new(
            alice.address.clone().into(),
            bob.address.clone().into(),
            (10 * XRP).to_string().into(),
        )
        .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::temDISABLED);

    env.enable_feature(FEATURE_CHECKS);
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
}

#[test]
fn batch_ships_disabled() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 100 * XRP);

    let batch = Batch::new(
        alice.address.clone().into(),
        vec![RawTransaction {
            raw_transaction: serde_json::json!({
                "Account": alice.address,
                "TransactionType": "AccountSet",
                "Fee": "0",
            }),
        }],
    )
    .with_flag(BatchFlag::TfAllOrNothing);

    let sequence_before = env.sequence(&alice.id);
    let outcome = env.sign_and_submit(batch.into(), &alice);
    assert_eq!(outcome.result, TransactionResult::temDISABLED);
    assert_eq!(env.sequence(&alice.id), sequence_before);

    // The feature registry does not carry Batch by default; enabling
    // it unblocks preflight.
    env.enable_feature(FEATURE_BATCH);
    let batch = Batch::new(
        alice.address.clone().into(),
        vec![RawTransaction {
            raw_transaction: serde_json::json!({
                "Account": alice.address,
                "TransactionType": "AccountSet",
                "Fee": "0",
                "Sequence": env.sequence(&alice.id) + 1,
            }),
        }],
    )
    .with_flag(BatchFlag::TfAllOrNothing);
    let outcome = env.sign_and_submit(batch.into(), &alice);
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);
}

#[test]
fn tickets_substitute_for_sequences() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 100 * XRP);
    let bob = env.fund("bob", 100 * XRP);

    let first_ticket = env.sequence(&alice.id) + 1;
    let outcome = env.sign_and_submit(
        TicketCreate::new(alice.address.clone().into(), 2).into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);
    assert_eq!(env.owner_count(&alice.id), 2);

    // A ticketed payment consumes the ticket, not the sequence.
    let sequence_before = env.sequence(&alice.id);
    let payment = Payment::new(
        alice.address.clone().into(),
        (5 * XRP).to_string().into(),
        bob.address.clone().into(),
    )
    .with_ticket_sequence(first_ticket);
    let outcome = env.sign_and_submit(payment.into(), &alice);

    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);
    assert_eq!(env.sequence(&alice.id), sequence_before);
    assert_eq!(env.owner_count(&alice.id), 1);

    // Replaying the consumed ticket can never succeed.
    let payment = Payment::new(
        alice.address.clone().into(),
        (5 * XRP).to_string().into(),
        bob.address.clone().into(),
    )
    .with_ticket_sequence(first_ticket);
    let outcome = env.sign_and_submit(payment.into(), &alice);
    assert_eq!(outcome.result, TransactionResult::tefNO_TICKET);
}

#[test]
fn ticket_feature_gate() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 100 * XRP);

    env.disable_feature(FEATURE_TICKET_BATCH);
    let outcome = env.sign_and_submit(
        TicketCreate::new(alice.address.clone().into(), 1).into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::temDISABLED);
}

#[test]
fn escrow_time_gates() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 100 * XRP);
    let bob = env.fund("bob", 100 * XRP);

    // Close once so the ledger has a real parent close time.
    env.close();
    let now = env.clock.now();

    let create_sequence = env.sequence(&alice.id);
    let outcome = env.sign_and_submit(
        EscrowCreate::new(
            alice.address.clone().into(),
            (20 * XRP).to_string().into(),
            bob.address.clone().into(),
        )
        .with_finish_after(now + 100)
        .with_cancel_after(now + 200)
        .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);
    assert_eq!(env.owner_count(&alice.id), 1);

    // Too early to finish.
    let outcome = env.sign_and_submit(
        EscrowFinish::new(
            bob.address.clone().into(),
            alice.address.clone().into(),
            create_sequence,
        )
        .into(),
        &bob,
    );
    assert_eq!(outcome.result, TransactionResult::tecNO_PERMISSION);

    // Advance past finish_after (but short of cancel_after).
    env.clock.advance(140);
    env.close();

    let bob_before = env.balance(&bob.id);
    let outcome = env.sign_and_submit(
        EscrowFinish::new(
            bob.address.clone().into(),
            alice.address.clone().into(),
            create_sequence,
        )
        .into(),
        &bob,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);
    assert_eq!(env.balance(&bob.id), bob_before + 20 * XRP - env.base_fee());
    assert_eq!(env.owner_count(&alice.id), 0);
}

#[test]
fn expired_escrow_only_cancels() {
    let mut env = TestEnv::new();
    let alice = env.fund("alice", 100 * XRP);
    let bob = env.fund("bob", 100 * XRP);

    env.close();
    let now = env.clock.now();

    let create_sequence = env.sequence(&alice.id);
    let outcome = env.sign_and_submit(
        EscrowCreate::new(
            alice.address.clone().into(),
            (20 * XRP).to_string().into(),
            bob.address.clone().into(),
        )
        .with_finish_after(now + 10)
        .with_cancel_after(now + 20)
        .into(),
        &alice,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);

    // Cancelling early is refused.
    let outcome = env.sign_and_submit(
        EscrowCancel::new(
            bob.address.clone().into(),
            alice.address.clone().into(),
            create_sequence,
        )
        .into(),
        &bob,
    );
    assert_eq!(outcome.result, TransactionResult::tecNO_PERMISSION);

    // After expiry the funds return to alice.
    env.clock.advance(60);
    env.close();

    let alice_before = env.balance(&alice.id);
    let outcome = env.sign_and_submit(
        EscrowCancel::new(
            bob.address.clone().into(),
            alice.address.clone().into(),
            create_sequence,
        )
        .into(),
        &bob,
    );
    assert_eq!(outcome.result, TransactionResult::tesSUCCESS);
    assert_eq!(env.balance(&alice.id), alice_before + 20 * XRP);
}
