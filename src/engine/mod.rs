//! The transaction execution engine: the preflight → preclaim →
//! apply pipeline over an open ledger.
//!
//! Malformed (`tem`) and local (`tel`) results never mutate state.
//! Retries (`ter`) and failures (`tef`) roll everything back. Claimed
//! failures (`tec`) keep the fee debit and sequence bump; success
//! commits everything. Either way an applied transaction lands in the
//! ledger's transaction tree beside its metadata record.

pub mod metadata;
pub mod results;
pub mod transactors;

use core::str::FromStr;

use log::debug;

use crate::core::binarycodec::types::{AccountId, Hash256};
use crate::core::binarycodec::{self, Serialization};
use crate::core::keylet;
use crate::core::keypairs;
use crate::core::keypairs::utils::get_account_id;
use crate::ledger::header::{round_close_time, LedgerHeader};
use crate::ledger::objects::{AccountRoot, LedgerEntry, LSF_DISABLE_MASTER};
use crate::ledger::rules::Rules;
use crate::ledger::view::{EntryState, LedgerView, ViewCheckpoint};
use crate::models::transactions::TransactionEnvelope;
use crate::shamap::{SHAMap, SHAMapItem, SHAMapType};

use self::metadata::{AffectedNode, NodeSummary, TransactionMetadata};
use self::results::TransactionResult;

/// Ledger state while transactions are being applied to it.
pub struct OpenLedger {
    pub view: LedgerView,
    pub txn_map: SHAMap,
    pub sequence: u32,
    pub parent_hash: Hash256,
    pub parent_close_time: u32,
    pub total_coins: i64,
    tx_index: u32,
}

impl OpenLedger {
    pub fn new(
        view: LedgerView,
        txn_map: SHAMap,
        sequence: u32,
        parent_hash: Hash256,
        parent_close_time: u32,
        total_coins: i64,
    ) -> Self {
        debug_assert_eq!(txn_map.map_type(), SHAMapType::Transaction);
        OpenLedger {
            view,
            txn_map,
            sequence,
            parent_hash,
            parent_close_time,
            total_coins,
            tx_index: 0,
        }
    }

    /// Seals the open ledger: folds the view into a new state tree
    /// and assembles the header over both root hashes.
    pub fn close(
        mut self,
        close_time: u32,
        close_time_resolution: u8,
    ) -> Result<(LedgerHeader, SHAMap, SHAMap), crate::ledger::view::LedgerViewException> {
        let state_map = self.view.commit()?;
        self.txn_map.set_immutable()?;

        let header = LedgerHeader {
            sequence: self.sequence,
            total_coins: self.total_coins,
            parent_hash: self.parent_hash,
            transaction_hash: self.txn_map.root_hash(),
            account_hash: state_map.root_hash(),
            parent_close_time: self.parent_close_time,
            close_time: round_close_time(close_time, close_time_resolution),
            close_time_resolution,
            close_flags: 0,
        };

        Ok((header, state_map, self.txn_map))
    }
}

/// What one apply produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    pub result: TransactionResult,
    pub tx_hash: Hash256,
    pub fee_charged: i64,
    pub metadata: Option<TransactionMetadata>,
}

impl ApplyOutcome {
    fn rejected(result: TransactionResult, tx_hash: Hash256) -> Self {
        ApplyOutcome {
            result,
            tx_hash,
            fee_charged: 0,
            metadata: None,
        }
    }
}

/// Read-only context for ledger-dependent checks.
pub struct PreclaimContext<'a> {
    pub view: &'a LedgerView,
    pub rules: &'a Rules,
    pub account: AccountId,
    pub root: AccountRoot,
    pub ledger_seq: u32,
    pub parent_close_time: u32,
    pub standalone: bool,
}

/// Mutable context for the effect phase.
pub struct ApplyContext<'a> {
    pub view: &'a mut LedgerView,
    pub rules: &'a Rules,
    pub account: AccountId,
    pub tx_hash: Hash256,
    pub ledger_seq: u32,
    pub parent_close_time: u32,
    pub standalone: bool,
    /// Set by payment-like transactors when delivery differs from the
    /// requested amount.
    pub delivered_amount: Option<serde_json::Value>,
}

/// The synchronous core applying transactions sequentially within a
/// ledger, behind a single-writer boundary.
pub struct Engine {
    pub rules: Rules,
    /// Standalone mode relaxes network-facing checks (sequence-gap
    /// protection on AccountDelete, mandatory signatures) for closed
    /// test ledgers.
    pub standalone: bool,
    pub network_id: Option<u32>,
}

impl Engine {
    pub fn new(rules: Rules) -> Self {
        Engine {
            rules,
            standalone: false,
            network_id: None,
        }
    }

    pub fn standalone(rules: Rules) -> Self {
        Engine {
            rules,
            standalone: true,
            network_id: None,
        }
    }

    /// Runs the three-phase pipeline for one transaction.
    pub fn apply(&self, open: &mut OpenLedger, tx: &TransactionEnvelope) -> ApplyOutcome {
        let flattened = tx.flatten();
        let tx_hash = match binarycodec::transaction_hash(&flattened) {
            Ok(hash) => hash,
            Err(_) => return ApplyOutcome::rejected(TransactionResult::temMALFORMED, Hash256::ZERO),
        };

        // Phase 1: static checks requiring no ledger state.
        let account = match AccountId::from_str(&tx.account()) {
            Ok(account) if !account.is_zero() => account,
            _ => return ApplyOutcome::rejected(TransactionResult::temBAD_SRC_ACCOUNT, tx_hash),
        };

        let preflight = self.preflight(tx, &flattened);
        if preflight != TransactionResult::tesSUCCESS {
            return ApplyOutcome::rejected(preflight, tx_hash);
        }

        // Phase 2: checks requiring the ledger view.
        let root = match open.view.account_root(&account) {
            Ok(Some(root)) => root,
            Ok(None) => return ApplyOutcome::rejected(TransactionResult::terNO_ACCOUNT, tx_hash),
            Err(_) => return ApplyOutcome::rejected(TransactionResult::tefINTERNAL, tx_hash),
        };

        let preclaim_ctx = PreclaimContext {
            view: &open.view,
            rules: &self.rules,
            account,
            root: root.clone(),
            ledger_seq: open.sequence,
            parent_close_time: open.parent_close_time,
            standalone: self.standalone,
        };

        let common_preclaim = self.preclaim_common(tx, &preclaim_ctx);
        if common_preclaim != TransactionResult::tesSUCCESS {
            return ApplyOutcome::rejected(common_preclaim, tx_hash);
        }

        let mut result = transactors::preclaim(tx, &preclaim_ctx);
        let fee = tx.fee_drops().unwrap_or(0);

        // Phase 3: effects. A tec from preclaim still claims the fee.
        let before_fee = open.view.checkpoint();
        if let Err(charge_failure) = self.charge_fee_and_sequence(open, tx, &account, fee) {
            open.view.rollback(before_fee);
            return ApplyOutcome::rejected(charge_failure, tx_hash);
        }

        if result == TransactionResult::tesSUCCESS {
            let after_fee = open.view.checkpoint();
            let mut apply_ctx = ApplyContext {
                view: &mut open.view,
                rules: &self.rules,
                account,
                tx_hash,
                ledger_seq: open.sequence,
                parent_close_time: open.parent_close_time,
                standalone: self.standalone,
                delivered_amount: None,
            };

            result = transactors::apply(tx, &mut apply_ctx);
            let delivered = apply_ctx.delivered_amount.take();

            match result.tier() {
                results::ResultTier::Success => {
                    return self.finish(open, tx, tx_hash, result, fee, before_fee, delivered);
                }
                results::ResultTier::Claimed => {
                    open.view.rollback(after_fee);
                    return self.finish(open, tx, tx_hash, result, fee, before_fee, None);
                }
                _ => {
                    open.view.rollback(before_fee);
                    return ApplyOutcome::rejected(result, tx_hash);
                }
            }
        }

        if result.is_claimed() {
            // Ledger-dependent rejection with the fee still owed.
            return self.finish(open, tx, tx_hash, result, fee, before_fee, None);
        }

        open.view.rollback(before_fee);
        ApplyOutcome::rejected(result, tx_hash)
    }

    fn preflight(
        &self,
        tx: &TransactionEnvelope,
        flattened: &serde_json::Value,
    ) -> TransactionResult {
        // Fee must be a non-negative quantity of drops.
        match tx.fee_drops() {
            Some(fee) if fee >= 0 => {}
            _ => return TransactionResult::temBAD_FEE,
        }

        // Exactly one of Sequence and TicketSequence.
        match (tx.sequence(), tx.ticket_sequence()) {
            (Some(_), Some(_)) | (None, None) => return TransactionResult::temSEQ_AND_TICKET,
            _ => {}
        }

        // NetworkID rules: required above 1024, forbidden below.
        match (self.network_id, tx.network_id()) {
            (Some(net), tx_net) if net > 1024 => {
                if tx_net != Some(net) {
                    return TransactionResult::telWRONG_NETWORK;
                }
            }
            (_, Some(_)) => {
                return TransactionResult::telNETWORK_ID_MAKES_TX_NON_CANONICAL;
            }
            _ => {}
        }

        // The amendment gate.
        for feature in transactors::required_features(&tx.tx_type()) {
            if !self.rules.enabled(feature) {
                return TransactionResult::temDISABLED;
            }
        }

        // Signature shape and cryptographic validity; authority is a
        // preclaim concern.
        let signature_check = self.check_signature(tx, flattened);
        if signature_check != TransactionResult::tesSUCCESS {
            return signature_check;
        }

        // Type-specific syntax, then the model's own validation as a
        // backstop.
        let type_preflight = transactors::preflight(tx, &self.rules);
        if type_preflight != TransactionResult::tesSUCCESS {
            return type_preflight;
        }

        if tx.validate().is_err() {
            return TransactionResult::temMALFORMED;
        }

        TransactionResult::tesSUCCESS
    }

    fn check_signature(
        &self,
        tx: &TransactionEnvelope,
        flattened: &serde_json::Value,
    ) -> TransactionResult {
        if let Some(signers) = tx.signers() {
            if signers.is_empty() {
                return TransactionResult::temBAD_SIGNER;
            }
            for signer in &signers {
                let Ok(payload_hex) = binarycodec::encode_for_multisigning(
                    flattened,
                    &match AccountId::from_str(&signer.account) {
                        Ok(account) => account,
                        Err(_) => return TransactionResult::temBAD_SIGNER,
                    },
                ) else {
                    return TransactionResult::temMALFORMED;
                };
                let payload = hex::decode(&payload_hex).expect("encode emits valid hex");
                let Ok(signature) = hex::decode(&signer.txn_signature) else {
                    return TransactionResult::temBAD_SIGNATURE;
                };
                if !keypairs::is_valid_message(&payload, &signature, &signer.signing_pub_key) {
                    return TransactionResult::temBAD_SIGNATURE;
                }
            }
            return TransactionResult::tesSUCCESS;
        }

        let signing_pub_key = tx.signing_pub_key().unwrap_or_default();
        match tx.txn_signature() {
            Some(signature_hex) => {
                if signing_pub_key.is_empty() {
                    return TransactionResult::temBAD_SIGNATURE;
                }
                let Ok(payload_hex) = binarycodec::encode_for_signing(flattened) else {
                    return TransactionResult::temMALFORMED;
                };
                let payload = hex::decode(&payload_hex).expect("encode emits valid hex");
                let Ok(signature) = hex::decode(&signature_hex) else {
                    return TransactionResult::temBAD_SIGNATURE;
                };
                if !keypairs::is_valid_message(&payload, &signature, &signing_pub_key) {
                    return TransactionResult::temBAD_SIGNATURE;
                }
                TransactionResult::tesSUCCESS
            }
            None if self.standalone => TransactionResult::tesSUCCESS,
            None => TransactionResult::temBAD_SIGNATURE,
        }
    }

    fn preclaim_common(
        &self,
        tx: &TransactionEnvelope,
        ctx: &PreclaimContext<'_>,
    ) -> TransactionResult {
        let root = &ctx.root;

        // Slot checks.
        if let Some(sequence) = tx.sequence() {
            if sequence < root.sequence {
                return TransactionResult::tefPAST_SEQ;
            }
            if sequence > root.sequence {
                return TransactionResult::terPRE_SEQ;
            }
        } else if let Some(ticket_sequence) = tx.ticket_sequence() {
            let ticket_key = keylet::ticket(&ctx.account, ticket_sequence);
            match ctx.view.exists(&ticket_key) {
                Ok(true) => {}
                Ok(false) => {
                    // A ticket that could still be created retries;
                    // one the sequence has passed can never exist.
                    return if ticket_sequence > root.sequence {
                        TransactionResult::terPRE_TICKET
                    } else {
                        TransactionResult::tefNO_TICKET
                    };
                }
                Err(_) => return TransactionResult::tefINTERNAL,
            }
        }

        // Prior-transaction binding.
        if let Some(required_prior) = tx.account_txn_id() {
            let matches = root
                .account_txn_id
                .map(|prior| prior.to_string() == required_prior)
                .unwrap_or(false);
            if !matches {
                return TransactionResult::tefWRONG_PRIOR;
            }
        }

        // Expiry.
        if let Some(last_ledger_sequence) = tx.last_ledger_sequence() {
            if ctx.ledger_seq > last_ledger_sequence {
                return TransactionResult::tefMAX_LEDGER;
            }
        }

        // Fee affordability.
        let fee = tx.fee_drops().unwrap_or(0);
        if root.balance < fee {
            return TransactionResult::terINSUF_FEE_B;
        }

        // Signing authority.
        self.check_authority(tx, ctx)
    }

    fn check_authority(
        &self,
        tx: &TransactionEnvelope,
        ctx: &PreclaimContext<'_>,
    ) -> TransactionResult {
        if let Some(signers) = tx.signers() {
            if !self.rules.enabled(crate::ledger::rules::FEATURE_MULTI_SIGN) {
                return TransactionResult::temDISABLED;
            }

            let list_key = keylet::signers(&ctx.account);
            let list = match ctx.view.peek(&list_key) {
                Ok(Some(LedgerEntry::SignerList(list))) => list,
                Ok(_) => return TransactionResult::tefNOT_MULTI_SIGNING,
                Err(_) => return TransactionResult::tefINTERNAL,
            };

            let mut weight_sum: u64 = 0;
            for signer in &signers {
                let Ok(signer_account) = AccountId::from_str(&signer.account) else {
                    return TransactionResult::tefBAD_SIGNATURE;
                };
                let Some(entry) = list.signer_entries.iter().find(|entry| {
                    entry.signer_entry.account == signer_account
                }) else {
                    return TransactionResult::tefBAD_SIGNATURE;
                };

                let Ok(raw_key) = hex::decode(&signer.signing_pub_key) else {
                    return TransactionResult::tefBAD_SIGNATURE;
                };
                let derived = AccountId(get_account_id(&raw_key));
                if derived != signer_account {
                    // The key may instead be the signer's regular key.
                    let authorized = match ctx.view.account_root(&signer_account) {
                        Ok(Some(signer_root)) => {
                            signer_root.regular_key == Some(derived)
                        }
                        _ => false,
                    };
                    if !authorized {
                        return TransactionResult::tefBAD_AUTH;
                    }
                }
                weight_sum += entry.signer_entry.signer_weight as u64;
            }

            if weight_sum < list.signer_quorum as u64 {
                return TransactionResult::tefBAD_QUORUM;
            }
            return TransactionResult::tesSUCCESS;
        }

        let signing_pub_key = tx.signing_pub_key().unwrap_or_default();
        if signing_pub_key.is_empty() {
            // Only standalone submissions may omit signing data.
            return if self.standalone {
                TransactionResult::tesSUCCESS
            } else {
                TransactionResult::tefBAD_AUTH
            };
        }

        let Ok(raw_key) = hex::decode(&signing_pub_key) else {
            return TransactionResult::temBAD_SIGNATURE;
        };
        let signing_account = AccountId(get_account_id(&raw_key));

        if signing_account == ctx.account {
            if ctx.root.has_flag(LSF_DISABLE_MASTER) {
                return TransactionResult::tefMASTER_DISABLED;
            }
            return TransactionResult::tesSUCCESS;
        }
        if ctx.root.regular_key == Some(signing_account) {
            return TransactionResult::tesSUCCESS;
        }
        TransactionResult::tefBAD_AUTH
    }

    /// Debit the fee and consume the slot; survives claimed failures.
    fn charge_fee_and_sequence(
        &self,
        open: &mut OpenLedger,
        tx: &TransactionEnvelope,
        account: &AccountId,
        fee: i64,
    ) -> Result<(), TransactionResult> {
        let mut root = open
            .view
            .account_root(account)
            .map_err(|_| TransactionResult::tefINTERNAL)?
            .ok_or(TransactionResult::tefINTERNAL)?;

        root.balance -= fee.min(root.balance);

        if tx.sequence().is_some() {
            root.sequence += 1;
        } else if let Some(ticket_sequence) = tx.ticket_sequence() {
            root.ticket_count = root.ticket_count.map(|count| count.saturating_sub(1));
            open.view
                .put_account_root(root.clone())
                .map_err(|_| TransactionResult::tefINTERNAL)?;
            open.view
                .erase(&keylet::ticket(account, ticket_sequence))
                .map_err(|_| TransactionResult::tefINTERNAL)?;
            open.view
                .adjust_owner_count(account, -1)
                .map_err(|_| TransactionResult::tefINTERNAL)?;
            return Ok(());
        }

        open.view
            .put_account_root(root)
            .map_err(|_| TransactionResult::tefINTERNAL)?;
        Ok(())
    }

    /// Seals an applied transaction: stamps touched entries, records
    /// the prior-transaction binding, composes metadata, and inserts
    /// the transaction with its metadata into the transaction tree.
    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        open: &mut OpenLedger,
        tx: &TransactionEnvelope,
        tx_hash: Hash256,
        result: TransactionResult,
        fee: i64,
        before: ViewCheckpoint,
        delivered_amount: Option<serde_json::Value>,
    ) -> ApplyOutcome {
        // Accounts that track their last transaction get the new id.
        if let Ok(Some(mut root)) = open.view.account_root(&AccountId::from_str(&tx.account()).expect("validated in preflight")) {
            if root.account_txn_id.is_some() {
                root.account_txn_id = Some(tx_hash);
                let _ = open.view.put_account_root(root);
            }
        }

        let changed = open.view.changed_since(&before);
        open.view
            .stamp_previous_txn(&changed, tx_hash, open.sequence);

        let mut affected_nodes = Vec::with_capacity(changed.len());
        for key in &changed {
            let existed_before = match before.entry_state(key) {
                Some(EntryState::Erased) => false,
                Some(_) => true,
                None => open.view.in_parent(key).unwrap_or(false),
            };

            let summary_of = |entry: &LedgerEntry| NodeSummary {
                ledger_entry_type: entry.entry_type(),
                ledger_index: *key,
            };

            match open.view.entry_state(key) {
                Some(EntryState::Inserted(entry)) | Some(EntryState::Modified(entry)) => {
                    if existed_before {
                        affected_nodes.push(AffectedNode::ModifiedNode(summary_of(entry)));
                    } else {
                        affected_nodes.push(AffectedNode::CreatedNode(summary_of(entry)));
                    }
                }
                Some(EntryState::Erased) => {
                    let prior = before
                        .entry_state(key)
                        .and_then(|state| match state {
                            EntryState::Inserted(entry) | EntryState::Modified(entry) => {
                                Some(entry.clone())
                            }
                            EntryState::Erased => None,
                        })
                        .or_else(|| open.view.parent_entry(key).ok().flatten());
                    if let Some(entry) = prior {
                        affected_nodes.push(AffectedNode::DeletedNode(summary_of(&entry)));
                    }
                }
                None => {}
            }
        }

        let metadata = TransactionMetadata {
            transaction_index: open.tx_index,
            transaction_result: result,
            affected_nodes,
            delivered_amount,
        };

        // The raw transaction and its metadata, each VL-prefixed.
        let tx_bytes = binarycodec::encode(&tx.flatten())
            .map(|encoded| hex::decode(encoded).expect("encode emits valid hex"))
            .unwrap_or_default();
        let mut item_data = Vec::new();
        item_data
            .write_length_encoded(&tx_bytes)
            .expect("transactions fit the length prefix");
        item_data
            .write_length_encoded(&metadata.to_bytes())
            .expect("metadata fits the length prefix");

        let _ = open
            .txn_map
            .add_item(SHAMapItem::new(tx_hash, item_data));

        open.tx_index += 1;
        open.total_coins -= fee;

        debug!("applied {} as {result}", tx_hash);

        ApplyOutcome {
            result,
            tx_hash,
            fee_charged: fee,
            metadata: Some(metadata),
        }
    }
}
