//! An in-memory environment for exercising the engine: a manual
//! clock, a genesis ledger, deterministic accounts and a submit/close
//! loop.

use core::str::FromStr;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::constants::CryptoAlgorithm;
use crate::core::binarycodec::types::{AccountId, Currency, Hash256, IssuedValue};
use crate::core::keypairs;
use crate::engine::results::TransactionResult;
use crate::engine::{ApplyOutcome, Engine, OpenLedger};
use crate::ledger::header::LedgerHeader;
use crate::ledger::rules::Rules;
use crate::ledger::view::LedgerView;
use crate::models::transactions::TransactionEnvelope;
use crate::nodestore::MemoryNodeStore;
use crate::shamap::{SHAMap, SHAMapType};

/// Seconds between closed test ledgers.
const CLOSE_INTERVAL: u32 = 10;
/// Close times round to ten seconds.
const CLOSE_RESOLUTION: u8 = 10;
/// The whole XRP supply, held by the genesis account at first.
const GENESIS_SUPPLY: i64 = 100_000_000_000_000_000;

const DEFAULT_BASE_FEE: i64 = 10;
const DEFAULT_RESERVE_BASE: i64 = 10_000_000;
const DEFAULT_RESERVE_INCREMENT: i64 = 2_000_000;

/// A settable, advanceable clock in ripple seconds.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: u32,
}

impl ManualClock {
    pub fn new(now: u32) -> Self {
        ManualClock { now }
    }

    pub fn now(&self) -> u32 {
        self.now
    }

    pub fn set(&mut self, now: u32) {
        self.now = now;
    }

    pub fn advance(&mut self, seconds: u32) {
        self.now += seconds;
    }
}

/// A deterministic test identity.
#[derive(Debug, Clone)]
pub struct TestAccount {
    pub name: String,
    pub id: AccountId,
    pub address: String,
    pub public_key: String,
    pub private_key: String,
}

pub struct TestEnv {
    pub clock: ManualClock,
    pub store: Arc<MemoryNodeStore>,
    engine: Engine,
    open: OpenLedger,
    genesis: TestAccount,
    ledger_sequence: u32,
    parent_hash: Hash256,
    total_coins: i64,
    base_fee: i64,
    reserve_base: i64,
    reserve_increment: i64,
    last_header: Option<LedgerHeader>,
}

impl TestEnv {
    pub fn new() -> Self {
        TestEnv::with_rules(Rules::default_features())
    }

    pub fn with_rules(rules: Rules) -> Self {
        let store = Arc::new(MemoryNodeStore::new());
        let clock = ManualClock::new(0);
        let genesis = derive_account("genesis");

        // The genesis state: one account holding the whole supply.
        let mut genesis_map = SHAMap::with_store(SHAMapType::State, store.clone());
        genesis_map.set_immutable().expect("fresh map seals");
        let mut view = LedgerView::new(genesis_map, DEFAULT_RESERVE_BASE, DEFAULT_RESERVE_INCREMENT)
            .expect("sealed state parent");
        view.put_account_root(crate::ledger::objects::AccountRoot::new(
            genesis.id,
            GENESIS_SUPPLY,
            1,
        ))
        .expect("genesis insert");
        let state = view.commit().expect("genesis commit");

        let open_view = LedgerView::new(state, DEFAULT_RESERVE_BASE, DEFAULT_RESERVE_INCREMENT)
            .expect("sealed state parent");
        let txn_map = SHAMap::with_store(SHAMapType::Transaction, store.clone());
        let open = OpenLedger::new(open_view, txn_map, 2, Hash256::ZERO, 0, GENESIS_SUPPLY);

        TestEnv {
            clock,
            store,
            engine: Engine::standalone(rules),
            open,
            genesis,
            ledger_sequence: 2,
            parent_hash: Hash256::ZERO,
            total_coins: GENESIS_SUPPLY,
            base_fee: DEFAULT_BASE_FEE,
            reserve_base: DEFAULT_RESERVE_BASE,
            reserve_increment: DEFAULT_RESERVE_INCREMENT,
            last_header: None,
        }
    }

    /// The open ledger's fee settings, for builders.
    pub fn base_fee(&self) -> i64 {
        self.base_fee
    }

    pub fn reserve(&self, owner_count: u32) -> i64 {
        self.reserve_base + owner_count as i64 * self.reserve_increment
    }

    pub fn enable_feature(&mut self, feature: &str) {
        self.engine.rules = self.engine.rules.clone().with_feature(feature);
    }

    pub fn disable_feature(&mut self, feature: &str) {
        self.engine.rules = self.engine.rules.clone().without_feature(feature);
    }

    /// Turns off standalone relaxations, restoring network-grade
    /// checks.
    pub fn set_standalone(&mut self, standalone: bool) {
        self.engine.standalone = standalone;
    }

    pub fn genesis_account(&self) -> TestAccount {
        self.genesis.clone()
    }

    /// A deterministic account identity; the same name always yields
    /// the same keys.
    pub fn account(&self, name: &str) -> TestAccount {
        derive_account(name)
    }

    /// A funded account: derived, then paid from genesis.
    pub fn fund(&mut self, name: &str, drops: i64) -> TestAccount {
        let account = self.account(name);
        let payment = crate::models::transactions::payment::Payment::new(
            self.genesis.address.clone().into(),
            crate::models::amount::XRPAmount::from(drops).into(),
            account.address.clone().into(),
        );
        let outcome = self.sign_and_submit(payment.into(), &self.genesis.clone());
        assert_eq!(
            outcome.result,
            TransactionResult::tesSUCCESS,
            "funding {name} failed: {}",
            outcome.result
        );
        account
    }

    /// Fills fee, sequence and signing fields from the environment,
    /// signs with the account's key, and applies.
    pub fn sign_and_submit(
        &mut self,
        mut tx: TransactionEnvelope,
        signer: &TestAccount,
    ) -> ApplyOutcome {
        if tx.fee_drops().is_none() {
            tx.set_fee(self.base_fee);
        }
        if tx.sequence().is_none() && tx.ticket_sequence().is_none() {
            tx.set_sequence(self.sequence(&signer.id));
        }
        self.sign(&mut tx, signer);
        self.submit(tx)
    }

    /// Signs in place with the account's key pair. The payload
    /// filter already omits signature fields, so signing before or
    /// after setting them is equivalent.
    pub fn sign(&self, tx: &mut TransactionEnvelope, signer: &TestAccount) {
        tx.set_signing_pub_key(signer.public_key.clone());

        let payload_hex = crate::core::binarycodec::encode_for_signing(&tx.flatten())
            .expect("signing payload encodes");
        let payload = hex::decode(payload_hex).expect("valid hex");
        let signature =
            keypairs::sign(&payload, &signer.private_key).expect("test keys always sign");
        tx.set_txn_signature(hex::encode_upper(signature));
    }

    /// Drives preflight, preclaim and apply against the open ledger.
    pub fn submit(&mut self, tx: TransactionEnvelope) -> ApplyOutcome {
        let outcome = self.engine.apply(&mut self.open, &tx);
        if outcome.result.applied() {
            self.total_coins -= outcome.fee_charged;
        }
        outcome
    }

    /// Seals the open ledger and starts the next one; the clock moves
    /// one close interval.
    pub fn close(&mut self) -> LedgerHeader {
        self.clock.advance(CLOSE_INTERVAL);

        let open = std::mem::replace(
            &mut self.open,
            // Placeholder; replaced below once the close completes.
            OpenLedger::new(
                LedgerView::new(
                    {
                        let mut empty = SHAMap::new(SHAMapType::State);
                        empty.set_immutable().expect("fresh map seals");
                        empty
                    },
                    self.reserve_base,
                    self.reserve_increment,
                )
                .expect("sealed parent"),
                SHAMap::new(SHAMapType::Transaction),
                0,
                Hash256::ZERO,
                0,
                0,
            ),
        );

        let (header, mut state_map, mut txn_map) = open
            .close(self.clock.now(), CLOSE_RESOLUTION)
            .expect("close folds the view");
        state_map.flush_to_store(self.ledger_sequence);
        txn_map.flush_to_store(self.ledger_sequence);

        self.parent_hash = header.hash();
        self.ledger_sequence += 1;

        let view = LedgerView::new(state_map, self.reserve_base, self.reserve_increment)
            .expect("sealed state parent");
        let txn_map = SHAMap::with_store(SHAMapType::Transaction, self.store.clone());
        self.open = OpenLedger::new(
            view,
            txn_map,
            self.ledger_sequence,
            self.parent_hash,
            header.close_time,
            self.total_coins,
        );
        self.last_header = Some(header.clone());
        header
    }

    pub fn last_header(&self) -> Option<&LedgerHeader> {
        self.last_header.as_ref()
    }

    pub fn open_ledger_sequence(&self) -> u32 {
        self.ledger_sequence
    }

    /// Read-side helpers over the open ledger.
    pub fn view(&self) -> &LedgerView {
        &self.open.view
    }

    pub fn balance(&self, account: &AccountId) -> i64 {
        self.open
            .view
            .account_root(account)
            .expect("view reads")
            .map(|root| root.balance)
            .unwrap_or(0)
    }

    pub fn sequence(&self, account: &AccountId) -> u32 {
        self.open
            .view
            .account_root(account)
            .expect("view reads")
            .map(|root| root.sequence)
            .unwrap_or(0)
    }

    pub fn owner_count(&self, account: &AccountId) -> u32 {
        self.open
            .view
            .account_root(account)
            .expect("view reads")
            .map(|root| root.owner_count)
            .unwrap_or(0)
    }

    /// The account's balance on its trust line, zero when no line
    /// exists.
    pub fn iou_balance(
        &self,
        account: &AccountId,
        currency: &str,
        issuer: &AccountId,
    ) -> IssuedValue {
        let currency = Currency::from_str(currency).expect("test currency parses");
        crate::engine::transactors::common::issued_balance(
            &self.open.view,
            account,
            &currency,
            issuer,
        )
        .unwrap_or(IssuedValue::ZERO)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        TestEnv::new()
    }
}

/// Entropy and keys from the account's name; Ed25519 throughout.
fn derive_account(name: &str) -> TestAccount {
    let digest = Sha256::digest(name.as_bytes());
    let entropy: [u8; 16] = digest[..16].try_into().expect("digest is long enough");

    let seed = keypairs::generate_seed(Some(entropy), Some(CryptoAlgorithm::ED25519))
        .expect("seed encodes");
    let (public_key, private_key) =
        keypairs::derive_keypair(&seed, false).expect("test keys derive");
    let address =
        keypairs::derive_classic_address(&public_key).expect("addresses derive");
    let id = AccountId::from_str(&address).expect("addresses parse");

    TestAccount {
        name: name.to_string(),
        id,
        address,
        public_key,
        private_key,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_accounts_are_deterministic() {
        let env = TestEnv::new();
        assert_eq!(env.account("alice").address, env.account("alice").address);
        assert_ne!(env.account("alice").address, env.account("bob").address);
    }

    #[test]
    fn test_fund_and_close() {
        let mut env = TestEnv::new();
        let alice = env.fund("alice", 50_000_000);
        assert_eq!(env.balance(&alice.id), 50_000_000);

        let header = env.close();
        assert_eq!(header.sequence, 2);
        assert!(env.store.len() > 0);
        // The next open ledger still sees alice.
        assert_eq!(env.balance(&alice.id), 50_000_000);
    }

    #[test]
    fn test_clock_advances_on_close() {
        let mut env = TestEnv::new();
        let before = env.clock.now();
        env.close();
        assert_eq!(env.clock.now(), before + CLOSE_INTERVAL);
    }
}
