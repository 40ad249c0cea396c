//! A mutable, buffered overlay of state entries above a parent
//! ledger. Reads consult the buffer first, then the parent; commit
//! atomically folds the buffer into a new state tree.

use hashbrown::HashMap;
use indexmap::IndexMap;
use log::{debug, warn};
use thiserror::Error;

use crate::core::binarycodec::types::{AccountId, Hash256};
use crate::core::exceptions::XRPLCoreException;
use crate::core::keylet;
use crate::ledger::objects::{AccountRoot, LedgerEntry};
use crate::shamap::exceptions::SHAMapException;
use crate::shamap::{
    AddItemResult, DeleteItemResult, SHAMap, SHAMapItem, SHAMapState, SHAMapType,
    UpdateItemResult,
};

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum LedgerViewException {
    #[error("The parent of a view must be a sealed state map")]
    InvalidParent,
    #[error("Entry `{0}` does not exist")]
    EntryNotFound(Hash256),
    #[error("Entry `{0}` already exists")]
    EntryExists(Hash256),
    #[error("Tree error: {0}")]
    SHAMapError(#[from] SHAMapException),
    #[error("Codec error: {0}")]
    CodecError(String),
}

impl From<XRPLCoreException> for LedgerViewException {
    fn from(error: XRPLCoreException) -> Self {
        LedgerViewException::CodecError(error.to_string())
    }
}

impl From<serde_json::Error> for LedgerViewException {
    fn from(error: serde_json::Error) -> Self {
        LedgerViewException::CodecError(error.to_string())
    }
}

/// One buffered write.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryState {
    Inserted(LedgerEntry),
    Modified(LedgerEntry),
    Erased,
}

/// A snapshot of the buffer, restorable for claimed-failure rollback.
#[derive(Debug, Clone)]
pub struct ViewCheckpoint {
    buffer: IndexMap<Hash256, EntryState>,
    owner_deltas: HashMap<AccountId, i64>,
}

impl ViewCheckpoint {
    /// The buffered state a key had when the checkpoint was taken.
    pub fn entry_state(&self, key: &Hash256) -> Option<&EntryState> {
        self.buffer.get(key)
    }
}

/// The canonical binary form an entry takes inside the state tree.
pub fn serialize_entry(entry: &LedgerEntry) -> Result<Vec<u8>, LedgerViewException> {
    let encoded = crate::core::binarycodec::encode(&entry.to_value())?;
    Ok(hex::decode(encoded).expect("encode emits valid hex"))
}

/// Parses an entry back out of its canonical binary form.
pub fn parse_entry(bytes: &[u8]) -> Result<LedgerEntry, LedgerViewException> {
    let value = crate::core::binarycodec::decode(&hex::encode_upper(bytes))?;
    Ok(LedgerEntry::from_value(&value)?)
}

pub struct LedgerView {
    parent: SHAMap,
    buffer: IndexMap<Hash256, EntryState>,
    owner_deltas: HashMap<AccountId, i64>,
    reserve_base: i64,
    reserve_increment: i64,
}

impl LedgerView {
    pub fn new(
        parent: SHAMap,
        reserve_base: i64,
        reserve_increment: i64,
    ) -> Result<Self, LedgerViewException> {
        if parent.state() != SHAMapState::Immutable || parent.map_type() != SHAMapType::State {
            return Err(LedgerViewException::InvalidParent);
        }

        Ok(LedgerView {
            parent,
            buffer: IndexMap::new(),
            owner_deltas: HashMap::new(),
            reserve_base,
            reserve_increment,
        })
    }

    /// The XRP reserve an account with this owner count must hold.
    pub fn reserve(&self, owner_count: u32) -> i64 {
        self.reserve_base + owner_count as i64 * self.reserve_increment
    }

    pub fn exists(&self, key: &Hash256) -> Result<bool, LedgerViewException> {
        match self.buffer.get(key) {
            Some(EntryState::Erased) => Ok(false),
            Some(_) => Ok(true),
            None => Ok(self.parent.has_item(key)?),
        }
    }

    /// The entry's canonical bytes, buffer first.
    pub fn read(&self, key: &Hash256) -> Result<Option<Vec<u8>>, LedgerViewException> {
        match self.buffer.get(key) {
            Some(EntryState::Erased) => Ok(None),
            Some(EntryState::Inserted(entry)) | Some(EntryState::Modified(entry)) => {
                Ok(Some(serialize_entry(entry)?))
            }
            None => Ok(self.parent.peek_item(key)?.map(|item| item.data)),
        }
    }

    /// The typed entry, buffer first.
    pub fn peek(&self, key: &Hash256) -> Result<Option<LedgerEntry>, LedgerViewException> {
        match self.buffer.get(key) {
            Some(EntryState::Erased) => Ok(None),
            Some(EntryState::Inserted(entry)) | Some(EntryState::Modified(entry)) => {
                Ok(Some(entry.clone()))
            }
            None => match self.parent.peek_item(key)? {
                Some(item) => Ok(Some(parse_entry(&item.data)?)),
                None => Ok(None),
            },
        }
    }

    pub fn insert(
        &mut self,
        key: Hash256,
        entry: LedgerEntry,
    ) -> Result<(), LedgerViewException> {
        if self.exists(&key)? {
            return Err(LedgerViewException::EntryExists(key));
        }

        // Re-creating an entry erased earlier in the same view is a
        // modification of the parent's copy.
        let state = if self.parent.has_item(&key)? {
            EntryState::Modified(entry)
        } else {
            EntryState::Inserted(entry)
        };
        self.buffer.insert(key, state);
        Ok(())
    }

    pub fn update(
        &mut self,
        key: Hash256,
        entry: LedgerEntry,
    ) -> Result<(), LedgerViewException> {
        let state = match self.buffer.get(&key) {
            Some(EntryState::Erased) | None if !self.parent.has_item(&key)? => {
                return Err(LedgerViewException::EntryNotFound(key));
            }
            Some(EntryState::Erased) => {
                return Err(LedgerViewException::EntryNotFound(key));
            }
            Some(EntryState::Inserted(_)) => EntryState::Inserted(entry),
            Some(EntryState::Modified(_)) | None => EntryState::Modified(entry),
        };
        self.buffer.insert(key, state);
        Ok(())
    }

    pub fn erase(&mut self, key: &Hash256) -> Result<(), LedgerViewException> {
        match self.buffer.get(key) {
            Some(EntryState::Erased) => Err(LedgerViewException::EntryNotFound(*key)),
            Some(EntryState::Inserted(_)) => {
                // Never reached the parent; forget it entirely.
                self.buffer.shift_remove(key);
                Ok(())
            }
            Some(EntryState::Modified(_)) => {
                self.buffer.insert(*key, EntryState::Erased);
                Ok(())
            }
            None if self.parent.has_item(key)? => {
                self.buffer.insert(*key, EntryState::Erased);
                Ok(())
            }
            None => Err(LedgerViewException::EntryNotFound(*key)),
        }
    }

    /// The account's root entry, if it exists.
    pub fn account_root(
        &self,
        account: &AccountId,
    ) -> Result<Option<AccountRoot>, LedgerViewException> {
        match self.peek(&keylet::account(account))? {
            Some(LedgerEntry::AccountRoot(root)) => Ok(Some(root)),
            Some(_) => Err(LedgerViewException::CodecError(
                "account keylet holds a non-account entry".to_string(),
            )),
            None => Ok(None),
        }
    }

    pub fn put_account_root(&mut self, root: AccountRoot) -> Result<(), LedgerViewException> {
        let key = keylet::account(&root.account);
        let entry = LedgerEntry::AccountRoot(root);
        if self.exists(&key)? {
            self.update(key, entry)
        } else {
            self.insert(key, entry)
        }
    }

    /// Moves an account's owner count and records the delta for the
    /// commit-time reserve audit.
    pub fn adjust_owner_count(
        &mut self,
        account: &AccountId,
        delta: i32,
    ) -> Result<(), LedgerViewException> {
        let mut root = self
            .account_root(account)?
            .ok_or_else(|| LedgerViewException::EntryNotFound(keylet::account(account)))?;
        root.owner_count = root.owner_count.saturating_add_signed(delta);
        self.put_account_root(root)?;

        *self.owner_deltas.entry(*account).or_insert(0) += delta as i64;
        Ok(())
    }

    pub fn owner_delta(&self, account: &AccountId) -> i64 {
        self.owner_deltas.get(account).copied().unwrap_or(0)
    }

    pub fn checkpoint(&self) -> ViewCheckpoint {
        ViewCheckpoint {
            buffer: self.buffer.clone(),
            owner_deltas: self.owner_deltas.clone(),
        }
    }

    pub fn rollback(&mut self, checkpoint: ViewCheckpoint) {
        self.buffer = checkpoint.buffer;
        self.owner_deltas = checkpoint.owner_deltas;
    }

    /// Discards every buffered operation.
    pub fn abort(&mut self) {
        self.buffer.clear();
        self.owner_deltas.clear();
    }

    /// Keys whose buffered state differs from the checkpoint.
    pub fn changed_since(&self, checkpoint: &ViewCheckpoint) -> Vec<Hash256> {
        let mut changed: Vec<Hash256> = self
            .buffer
            .iter()
            .filter(|(key, state)| checkpoint.buffer.get(*key) != Some(*state))
            .map(|(key, _)| *key)
            .collect();

        // Entries dropped from the buffer (insert-then-erase) count.
        for key in checkpoint.buffer.keys() {
            if !self.buffer.contains_key(key) {
                changed.push(*key);
            }
        }
        changed
    }

    pub fn entry_state(&self, key: &Hash256) -> Option<&EntryState> {
        self.buffer.get(key)
    }

    /// Stamps the last-modifying transaction on every touched entry.
    pub fn stamp_previous_txn(&mut self, keys: &[Hash256], txn_id: Hash256, ledger_seq: u32) {
        for key in keys {
            if let Some(EntryState::Inserted(entry) | EntryState::Modified(entry)) =
                self.buffer.get_mut(key)
            {
                entry.set_previous_txn(txn_id, ledger_seq);
            }
        }
    }

    /// Whether the parent ledger itself holds the key, ignoring the
    /// buffer.
    pub fn in_parent(&self, key: &Hash256) -> Result<bool, LedgerViewException> {
        Ok(self.parent.has_item(key)?)
    }

    pub fn parent_entry(
        &self,
        key: &Hash256,
    ) -> Result<Option<LedgerEntry>, LedgerViewException> {
        match self.parent.peek_item(key)? {
            Some(item) => Ok(Some(parse_entry(&item.data)?)),
            None => Ok(None),
        }
    }

    /// Applies the buffer into a mutable snapshot of the parent and
    /// seals it. The view is consumed; abort by dropping instead.
    pub fn commit(mut self) -> Result<SHAMap, LedgerViewException> {
        for (account, delta) in &self.owner_deltas {
            if *delta > 0 {
                if let Some(root) = self.account_root(account)? {
                    let required = self.reserve(root.owner_count);
                    if root.balance < required {
                        // The transactors enforce this with tec codes;
                        // reaching commit below reserve is a logic bug.
                        warn!(
                            "account {account} committed below reserve: {} < {required}",
                            root.balance
                        );
                        debug_assert!(false, "reserve invariant violated at commit");
                    }
                }
            }
        }

        let mut next = self.parent.snapshot(true);
        for (key, state) in &self.buffer {
            match state {
                EntryState::Inserted(entry) => {
                    let item = SHAMapItem::new(*key, serialize_entry(entry)?);
                    if next.add_item(item)? != AddItemResult::Added {
                        return Err(LedgerViewException::EntryExists(*key));
                    }
                }
                EntryState::Modified(entry) => {
                    let item = SHAMapItem::new(*key, serialize_entry(entry)?);
                    if next.update_item(item)? != UpdateItemResult::Updated {
                        return Err(LedgerViewException::EntryNotFound(*key));
                    }
                }
                EntryState::Erased => {
                    if next.delete_item(key)? != DeleteItemResult::Deleted {
                        return Err(LedgerViewException::EntryNotFound(*key));
                    }
                }
            }
        }

        debug!("committing {} buffered entries", self.buffer.len());
        next.set_immutable()?;
        Ok(next)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn empty_parent() -> SHAMap {
        let mut map = SHAMap::new(SHAMapType::State);
        map.set_immutable().unwrap();
        map
    }

    fn account(byte: u8) -> AccountId {
        AccountId([byte; 20])
    }

    fn root_entry(byte: u8, balance: i64) -> LedgerEntry {
        LedgerEntry::AccountRoot(AccountRoot::new(account(byte), balance, 1))
    }

    fn view() -> LedgerView {
        LedgerView::new(empty_parent(), 10_000_000, 2_000_000).unwrap()
    }

    #[test]
    fn test_parent_must_be_sealed_state() {
        let modifying = SHAMap::new(SHAMapType::State);
        assert!(LedgerView::new(modifying, 0, 0).is_err());
    }

    #[test]
    fn test_buffer_shadows_parent() {
        let mut view = view();
        let key = keylet::account(&account(1));

        assert!(!view.exists(&key).unwrap());
        view.insert(key, root_entry(1, 50_000_000)).unwrap();
        assert!(view.exists(&key).unwrap());
        assert!(view.peek(&key).unwrap().is_some());

        view.erase(&key).unwrap();
        assert!(!view.exists(&key).unwrap());
        // Insert-then-erase left nothing behind.
        assert!(view.entry_state(&key).is_none());
    }

    #[test]
    fn test_update_requires_existence(){
        let mut view = view();
        let key = keylet::account(&account(1));
        assert!(view.update(key, root_entry(1, 1)).is_err());
    }

    #[test]
    fn test_checkpoint_rollback() {
        let mut view = view();
        view.insert(keylet::account(&account(1)), root_entry(1, 50_000_000))
            .unwrap();

        let checkpoint = view.checkpoint();
        view.insert(keylet::account(&account(2)), root_entry(2, 60_000_000))
            .unwrap();
        view.adjust_owner_count(&account(1), 1).unwrap();

        assert_eq!(view.changed_since(&checkpoint).len(), 2);

        view.rollback(checkpoint);
        assert!(!view.exists(&keylet::account(&account(2))).unwrap());
        assert_eq!(view.owner_delta(&account(1)), 0);
    }

    #[test]
    fn test_commit_round_trips_entries() {
        let mut view = view();
        for byte in 1..=5u8 {
            view.insert(
                keylet::account(&account(byte)),
                root_entry(byte, 40_000_000),
            )
            .unwrap();
        }

        let sealed = view.commit().unwrap();
        assert_eq!(sealed.state(), SHAMapState::Immutable);

        let reopened = LedgerView::new(sealed, 10_000_000, 2_000_000).unwrap();
        let fetched = reopened.account_root(&account(3)).unwrap().unwrap();
        assert_eq!(fetched.balance, 40_000_000);
    }

    #[test]
    fn test_commit_folds_erases() {
        let mut view = view();
        let key = keylet::account(&account(1));
        view.insert(key, root_entry(1, 40_000_000)).unwrap();
        let sealed = view.commit().unwrap();
        let root_with_entry = sealed.root_hash();

        let mut second = LedgerView::new(sealed, 10_000_000, 2_000_000).unwrap();
        second.erase(&key).unwrap();
        let resealed = second.commit().unwrap();

        assert_ne!(resealed.root_hash(), root_with_entry);
        assert_eq!(resealed.root_hash(), Hash256::ZERO);
    }
}
