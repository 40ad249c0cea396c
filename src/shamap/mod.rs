//! The SHAMap: an authenticated 16-ary radix tree keyed by 256-bit
//! hashes, with copy-on-write snapshots.
//!
//! One nibble of the key selects the branch at each level. Nodes are
//! jointly owned by every snapshot whose `cow_id` transitively reaches
//! them; a map mutates a node in place only when the node's `cow_id`
//! matches its own, and deep-copies it onto the write path otherwise.
//! Taking a snapshot re-ids both maps, so every surviving node is
//! unowned and the first write on either side copies.

pub mod exceptions;
mod node;

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use log::debug;

use crate::core::binarycodec::types::Hash256;
use crate::nodestore::NodeStore;

use self::exceptions::SHAMapException;
use self::node::{Child, SHAMapInnerNode, SHAMapLeafNode, SHAMapNode, BRANCH_COUNT};

pub use self::node::SHAMapItem;

static NEXT_COW_ID: AtomicU32 = AtomicU32::new(1);

fn next_cow_id() -> u32 {
    NEXT_COW_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SHAMapState {
    /// In-place mutation permitted for exclusively-owned nodes.
    Modifying,
    /// The root hash is fixed; mutations are rejected.
    Immutable,
    /// Under construction from a node store that may lack nodes.
    Synching,
    /// Terminal.
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SHAMapType {
    Transaction,
    State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddItemResult {
    Added,
    AlreadyPresent,
    /// The map is not Modifying; nothing happened.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateItemResult {
    Updated,
    NotFound,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteItemResult {
    Deleted,
    NotFound,
    Rejected,
}

pub struct SHAMap {
    root: Arc<SHAMapNode>,
    state: SHAMapState,
    map_type: SHAMapType,
    ledger_seq: u32,
    cow_id: u32,
    node_store: Option<Arc<dyn NodeStore>>,
}

impl fmt::Debug for SHAMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SHAMap")
            .field("root", &self.root)
            .field("state", &self.state)
            .field("map_type", &self.map_type)
            .field("ledger_seq", &self.ledger_seq)
            .field("cow_id", &self.cow_id)
            .field("node_store", &self.node_store.is_some())
            .finish()
    }
}

impl SHAMap {
    /// An empty, mutable, storeless map.
    pub fn new(map_type: SHAMapType) -> Self {
        SHAMap {
            root: Arc::new(SHAMapNode::Inner(SHAMapInnerNode::new(0))),
            state: SHAMapState::Modifying,
            map_type,
            ledger_seq: 0,
            cow_id: next_cow_id(),
            node_store: None,
        }
    }

    /// An empty, mutable map backed by a node store.
    pub fn with_store(map_type: SHAMapType, node_store: Arc<dyn NodeStore>) -> Self {
        let mut map = SHAMap::new(map_type);
        map.node_store = Some(node_store);
        map
    }

    /// Reconstructs a map from a stored root hash. Descents resolve
    /// children from the store on demand.
    pub fn from_root_hash(
        map_type: SHAMapType,
        root_hash: Hash256,
        node_store: Arc<dyn NodeStore>,
        state: SHAMapState,
    ) -> Result<Self, SHAMapException> {
        let mut map = SHAMap::with_store(map_type, node_store);
        map.state = state;

        if !root_hash.is_zero() {
            map.root = map.fetch_node(&root_hash)?;
        }
        Ok(map)
    }

    pub fn state(&self) -> SHAMapState {
        self.state
    }

    pub fn map_type(&self) -> SHAMapType {
        self.map_type
    }

    pub fn ledger_seq(&self) -> u32 {
        self.ledger_seq
    }

    pub fn set_ledger_seq(&mut self, ledger_seq: u32) {
        self.ledger_seq = ledger_seq;
    }

    /// Applies the state machine: Modifying may seal or invalidate,
    /// Synching may open, seal or invalidate, Immutable may only
    /// invalidate, Invalid is terminal.
    pub fn transition_state(&mut self, to: SHAMapState) -> Result<(), SHAMapException> {
        use SHAMapState::*;

        let permitted = match (self.state, to) {
            (from, to) if from == to => from != Invalid,
            (Modifying, Immutable) | (Modifying, Invalid) => true,
            (Immutable, Invalid) => true,
            (Synching, Modifying) | (Synching, Immutable) | (Synching, Invalid) => true,
            _ => false,
        };

        if !permitted {
            return Err(SHAMapException::InvalidStateTransition {
                from: self.state,
                to,
            });
        }

        if to == SHAMapState::Immutable {
            self.get_hash();
        }
        self.state = to;
        Ok(())
    }

    /// Seals the map. Idempotent from Immutable; forbidden from
    /// Invalid.
    pub fn set_immutable(&mut self) -> Result<(), SHAMapException> {
        self.transition_state(SHAMapState::Immutable)
    }

    pub fn invalidate(&mut self) {
        self.state = SHAMapState::Invalid;
    }

    /// A new map sharing the current root. Both maps take fresh cow
    /// ids so neither owns the shared nodes; the writer unshares on
    /// its first touch of any path.
    pub fn snapshot(&mut self, mutable: bool) -> SHAMap {
        self.get_hash();

        if self.state == SHAMapState::Modifying {
            self.cow_id = next_cow_id();
        }

        SHAMap {
            root: self.root.clone(),
            state: if mutable {
                SHAMapState::Modifying
            } else {
                SHAMapState::Immutable
            },
            map_type: self.map_type,
            ledger_seq: self.ledger_seq,
            cow_id: next_cow_id(),
            node_store: self.node_store.clone(),
        }
    }

    pub fn has_item(&self, key: &Hash256) -> Result<bool, SHAMapException> {
        Ok(self.peek_item(key)?.is_some())
    }

    /// Reads an item by key, resolving stored nodes as needed.
    pub fn peek_item(&self, key: &Hash256) -> Result<Option<SHAMapItem>, SHAMapException> {
        let mut current = self.root.clone();
        let mut depth = 0usize;

        loop {
            let next = match &*current {
                SHAMapNode::Leaf(leaf) => {
                    return Ok((leaf.item.key == *key).then(|| leaf.item.clone()));
                }
                SHAMapNode::Inner(inner) => match &inner.children[key.nibble(depth)] {
                    Child::Empty => return Ok(None),
                    Child::Node(child) => child.clone(),
                    Child::Hash(hash) => self.fetch_node(hash)?,
                },
            };

            current = next;
            depth += 1;
        }
    }

    /// Inserts a new item. Rejected unless the map is Modifying.
    pub fn add_item(&mut self, item: SHAMapItem) -> Result<AddItemResult, SHAMapException> {
        if self.state != SHAMapState::Modifying {
            return Ok(AddItemResult::Rejected);
        }

        let (map_type, cow_id, store) = (self.map_type, self.cow_id, self.node_store.clone());
        let synching = false;
        let root = self.unshared_root();
        let result = match root {
            SHAMapNode::Inner(inner) => {
                Self::insert_into(inner, 0, item, map_type, cow_id, &store, synching)?
            }
            SHAMapNode::Leaf(_) => unreachable!("the root is always an inner node"),
        };

        Ok(result)
    }

    /// Replaces an existing item's data. Rejected unless Modifying.
    pub fn update_item(&mut self, item: SHAMapItem) -> Result<UpdateItemResult, SHAMapException> {
        if self.state != SHAMapState::Modifying {
            return Ok(UpdateItemResult::Rejected);
        }

        let (map_type, cow_id, store) = (self.map_type, self.cow_id, self.node_store.clone());
        let root = self.unshared_root();
        match root {
            SHAMapNode::Inner(inner) => {
                Self::replace_in(inner, 0, item, map_type, cow_id, &store)
            }
            SHAMapNode::Leaf(_) => unreachable!("the root is always an inner node"),
        }
    }

    /// Removes an item by key, collapsing child-less inner nodes into
    /// their parent's empty slot. Rejected unless Modifying.
    pub fn delete_item(&mut self, key: &Hash256) -> Result<DeleteItemResult, SHAMapException> {
        if self.state != SHAMapState::Modifying {
            return Ok(DeleteItemResult::Rejected);
        }

        let (map_type, cow_id, store) = (self.map_type, self.cow_id, self.node_store.clone());
        let root = self.unshared_root();
        match root {
            SHAMapNode::Inner(inner) => {
                Self::remove_from(inner, 0, key, map_type, cow_id, &store)
            }
            SHAMapNode::Leaf(_) => unreachable!("the root is always an inner node"),
        }
    }

    /// The Merkle root, recomputing only subtrees marked dirty and
    /// memoizing the results. Safe in any state; sealed maps are
    /// always clean.
    pub fn get_hash(&mut self) -> Hash256 {
        Self::update_hashes(&mut self.root)
    }

    /// The Merkle root without memoization; usable on shared maps.
    pub fn root_hash(&self) -> Hash256 {
        Self::compute_subtree_hash(&self.root)
    }

    /// Leaves in ascending key order. The iterator captures the
    /// current root, so a concurrent writer's copy-on-write mutations
    /// never move nodes under it.
    pub fn leaves(&self) -> SHAMapLeafIterator<'_> {
        let stack = match &*self.root {
            SHAMapNode::Inner(inner) if inner.branch_count() == 0 => Vec::new(),
            _ => vec![(self.root.clone(), 0usize)],
        };

        SHAMapLeafIterator { map: self, stack }
    }

    /// Writes every node of the tree into the node store, keyed by
    /// content hash, stamped with the ledger sequence. Returns the
    /// number of newly stored nodes.
    pub fn flush_to_store(&mut self, ledger_seq: u32) -> usize {
        self.get_hash();
        self.ledger_seq = ledger_seq;

        let Some(store) = self.node_store.clone() else {
            return 0;
        };

        let stored = Self::store_subtree(&self.root, store.as_ref(), ledger_seq);
        debug!(
            "flushed {stored} nodes for ledger {ledger_seq}, root {}",
            self.root.hash()
        );
        stored
    }

    fn store_subtree(node: &Arc<SHAMapNode>, store: &dyn NodeStore, ledger_seq: u32) -> usize {
        let hash = node.hash();
        if hash.is_zero() || store.exists(&hash) {
            return 0;
        }

        let mut stored = 1;
        store.store(hash, node.serialize(), ledger_seq);

        if let SHAMapNode::Inner(inner) = &**node {
            for child in &inner.children {
                if let Child::Node(child) = child {
                    stored += Self::store_subtree(child, store, ledger_seq);
                }
            }
        }
        stored
    }

    fn fetch_node(&self, hash: &Hash256) -> Result<Arc<SHAMapNode>, SHAMapException> {
        let Some(store) = &self.node_store else {
            return Err(self.miss_error(hash));
        };
        let Some(bytes) = store.fetch(hash) else {
            return Err(self.miss_error(hash));
        };

        Ok(Arc::new(SHAMapNode::deserialize(
            &bytes,
            *hash,
            self.map_type,
            0,
        )?))
    }

    /// A fetch miss is recoverable while synching and corruption
    /// afterwards.
    fn miss_error(&self, hash: &Hash256) -> SHAMapException {
        if self.state == SHAMapState::Synching {
            SHAMapException::MissingNode(*hash)
        } else {
            SHAMapException::DataCorruption(*hash)
        }
    }

    fn unshared_root(&mut self) -> &mut SHAMapNode {
        if self.root.cow_id() != self.cow_id {
            let mut copy = (*self.root).clone();
            copy.set_cow_id(self.cow_id);
            self.root = Arc::new(copy);
        }
        Arc::make_mut(&mut self.root)
    }

    /// Resolves a stored child reference into an in-memory node owned
    /// by this map.
    fn materialize_slot(
        slot: &mut Child,
        map_type: SHAMapType,
        cow_id: u32,
        store: &Option<Arc<dyn NodeStore>>,
        synching: bool,
    ) -> Result<(), SHAMapException> {
        if let Child::Hash(hash) = slot {
            let miss = |hash: &Hash256| {
                if synching {
                    SHAMapException::MissingNode(*hash)
                } else {
                    SHAMapException::DataCorruption(*hash)
                }
            };

            let Some(store) = store else {
                return Err(miss(hash));
            };
            let Some(bytes) = store.fetch(hash) else {
                return Err(miss(hash));
            };

            let node = SHAMapNode::deserialize(&bytes, *hash, map_type, cow_id)?;
            *slot = Child::Node(Arc::new(node));
        }
        Ok(())
    }

    /// Copy-on-write guard: nodes from other snapshots are deep-copied
    /// onto the write path before mutation.
    fn unshare_slot(slot: &mut Child, cow_id: u32) -> &mut SHAMapNode {
        let Child::Node(arc) = slot else {
            unreachable!("unshare_slot requires a materialized child");
        };

        if arc.cow_id() != cow_id {
            let mut copy = (**arc).clone();
            copy.set_cow_id(cow_id);
            *arc = Arc::new(copy);
        }
        Arc::make_mut(arc)
    }

    #[allow(clippy::too_many_arguments)]
    fn insert_into(
        node: &mut SHAMapInnerNode,
        depth: usize,
        item: SHAMapItem,
        map_type: SHAMapType,
        cow_id: u32,
        store: &Option<Arc<dyn NodeStore>>,
        synching: bool,
    ) -> Result<AddItemResult, SHAMapException> {
        let branch = item.key.nibble(depth);

        if node.children[branch].is_empty() {
            node.children[branch] = Child::Node(Arc::new(SHAMapNode::Leaf(
                SHAMapLeafNode::new(item, map_type, cow_id),
            )));
            node.dirty = true;
            return Ok(AddItemResult::Added);
        }

        Self::materialize_slot(&mut node.children[branch], map_type, cow_id, store, synching)?;

        let child = Self::unshare_slot(&mut node.children[branch], cow_id);
        let result = match child {
            SHAMapNode::Leaf(leaf) if leaf.item.key == item.key => AddItemResult::AlreadyPresent,
            SHAMapNode::Leaf(leaf) => {
                // Split: push the existing leaf one level down, then
                // descend with the new item; shared prefixes chain
                // further inner nodes automatically.
                let existing = leaf.item.clone();
                let mut split = SHAMapInnerNode::new(cow_id);
                split.children[existing.key.nibble(depth + 1)] = Child::Node(Arc::new(
                    SHAMapNode::Leaf(SHAMapLeafNode::new(existing.clone(), map_type, cow_id)),
                ));
                let result =
                    Self::insert_into(&mut split, depth + 1, item, map_type, cow_id, store, synching)?;
                node.children[branch] = Child::Node(Arc::new(SHAMapNode::Inner(split)));
                result
            }
            SHAMapNode::Inner(inner) => {
                Self::insert_into(inner, depth + 1, item, map_type, cow_id, store, synching)?
            }
        };

        if result == AddItemResult::Added {
            node.dirty = true;
        }
        Ok(result)
    }

    fn replace_in(
        node: &mut SHAMapInnerNode,
        depth: usize,
        item: SHAMapItem,
        map_type: SHAMapType,
        cow_id: u32,
        store: &Option<Arc<dyn NodeStore>>,
    ) -> Result<UpdateItemResult, SHAMapException> {
        let branch = item.key.nibble(depth);

        if node.children[branch].is_empty() {
            return Ok(UpdateItemResult::NotFound);
        }

        Self::materialize_slot(&mut node.children[branch], map_type, cow_id, store, false)?;

        let child = Self::unshare_slot(&mut node.children[branch], cow_id);
        let result = match child {
            SHAMapNode::Leaf(leaf) if leaf.item.key == item.key => {
                *leaf = SHAMapLeafNode::new(item, map_type, cow_id);
                UpdateItemResult::Updated
            }
            SHAMapNode::Leaf(_) => UpdateItemResult::NotFound,
            SHAMapNode::Inner(inner) => {
                Self::replace_in(inner, depth + 1, item, map_type, cow_id, store)?
            }
        };

        if result == UpdateItemResult::Updated {
            node.dirty = true;
        }
        Ok(result)
    }

    fn remove_from(
        node: &mut SHAMapInnerNode,
        depth: usize,
        key: &Hash256,
        map_type: SHAMapType,
        cow_id: u32,
        store: &Option<Arc<dyn NodeStore>>,
    ) -> Result<DeleteItemResult, SHAMapException> {
        let branch = key.nibble(depth);

        if node.children[branch].is_empty() {
            return Ok(DeleteItemResult::NotFound);
        }

        Self::materialize_slot(&mut node.children[branch], map_type, cow_id, store, false)?;

        // Check leaf keys without unsharing; a miss must not copy.
        let Child::Node(child) = &node.children[branch] else {
            unreachable!("slot was just materialized");
        };
        if let SHAMapNode::Leaf(leaf) = &**child {
            if leaf.item.key != *key {
                return Ok(DeleteItemResult::NotFound);
            }
            node.children[branch] = Child::Empty;
            node.dirty = true;
            return Ok(DeleteItemResult::Deleted);
        }

        let child = Self::unshare_slot(&mut node.children[branch], cow_id);
        let SHAMapNode::Inner(inner) = child else {
            unreachable!("leaf case handled above");
        };
        let result = Self::remove_from(inner, depth + 1, key, map_type, cow_id, store)?;

        if result == DeleteItemResult::Deleted {
            if inner.branch_count() == 0 {
                node.children[branch] = Child::Empty;
            }
            node.dirty = true;
        }
        Ok(result)
    }

    fn update_hashes(arc: &mut Arc<SHAMapNode>) -> Hash256 {
        match &**arc {
            SHAMapNode::Leaf(leaf) => leaf.hash,
            SHAMapNode::Inner(inner) if !inner.dirty => inner.hash,
            SHAMapNode::Inner(_) => {
                // A dirty node was unshared by the mutation that
                // dirtied it, so this never copies a shared subtree.
                let SHAMapNode::Inner(inner) = Arc::make_mut(arc) else {
                    unreachable!();
                };
                for child in inner.children.iter_mut() {
                    if let Child::Node(child) = child {
                        Self::update_hashes(child);
                    }
                }
                inner.hash = inner.compute_hash();
                inner.dirty = false;
                inner.hash
            }
        }
    }

    fn compute_subtree_hash(arc: &Arc<SHAMapNode>) -> Hash256 {
        match &**arc {
            SHAMapNode::Leaf(leaf) => leaf.hash,
            SHAMapNode::Inner(inner) if !inner.dirty => inner.hash,
            SHAMapNode::Inner(inner) => {
                if inner.branch_count() == 0 {
                    return Hash256::ZERO;
                }
                let mut shadow = inner.clone();
                for (branch, child) in inner.children.iter().enumerate() {
                    if let Child::Node(child) = child {
                        shadow.children[branch] = Child::Hash(Self::compute_subtree_hash(child));
                    }
                }
                shadow.compute_hash()
            }
        }
    }
}

/// Visits leaves in ascending key order; `next` is amortized
/// O(log n).
pub struct SHAMapLeafIterator<'a> {
    map: &'a SHAMap,
    stack: Vec<(Arc<SHAMapNode>, usize)>,
}

impl Iterator for SHAMapLeafIterator<'_> {
    type Item = Result<SHAMapItem, SHAMapException>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.stack.is_empty() {
            let top = self.stack.len() - 1;
            let branch = self.stack[top].1;

            if branch >= BRANCH_COUNT {
                self.stack.pop();
                continue;
            }
            self.stack[top].1 += 1;

            let node = self.stack[top].0.clone();
            let SHAMapNode::Inner(inner) = &*node else {
                unreachable!("only inner nodes are stacked");
            };

            let child = match &inner.children[branch] {
                Child::Empty => continue,
                Child::Node(child) => child.clone(),
                Child::Hash(hash) => match self.map.fetch_node(hash) {
                    Ok(child) => child,
                    Err(error) => {
                        self.stack.clear();
                        return Some(Err(error));
                    }
                },
            };

            match &*child {
                SHAMapNode::Leaf(leaf) => return Some(Ok(leaf.item.clone())),
                SHAMapNode::Inner(_) => self.stack.push((child, 0)),
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::nodestore::MemoryNodeStore;

    fn key(high_nibbles: &[u8]) -> Hash256 {
        let mut bytes = [0u8; 32];
        for (i, n) in high_nibbles.iter().enumerate() {
            bytes[i / 2] |= if i % 2 == 0 { n << 4 } else { *n };
        }
        Hash256(bytes)
    }

    fn item(high_nibbles: &[u8], data: &[u8]) -> SHAMapItem {
        SHAMapItem::new(key(high_nibbles), data.to_vec())
    }

    #[test]
    fn test_empty_map_hash_is_zero() {
        let mut map = SHAMap::new(SHAMapType::State);
        assert_eq!(map.get_hash(), Hash256::ZERO);
    }

    #[test]
    fn test_add_update_delete() {
        let mut map = SHAMap::new(SHAMapType::State);
        let a = item(&[1], b"a");

        assert_eq!(map.add_item(a.clone()).unwrap(), AddItemResult::Added);
        assert_eq!(
            map.add_item(a.clone()).unwrap(),
            AddItemResult::AlreadyPresent
        );
        assert!(map.has_item(&a.key).unwrap());

        let updated = SHAMapItem::new(a.key, b"a2".to_vec());
        assert_eq!(
            map.update_item(updated.clone()).unwrap(),
            UpdateItemResult::Updated
        );
        assert_eq!(map.peek_item(&a.key).unwrap().unwrap().data, b"a2");

        assert_eq!(map.delete_item(&a.key).unwrap(), DeleteItemResult::Deleted);
        assert_eq!(map.delete_item(&a.key).unwrap(), DeleteItemResult::NotFound);
        assert_eq!(map.get_hash(), Hash256::ZERO);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut map = SHAMap::new(SHAMapType::State);
        assert_eq!(
            map.update_item(item(&[1], b"x")).unwrap(),
            UpdateItemResult::NotFound
        );
    }

    #[test]
    fn test_split_on_shared_prefix() {
        let mut map = SHAMap::new(SHAMapType::State);
        // Both keys start with nibbles 1,2,3 and diverge at depth 3.
        map.add_item(item(&[1, 2, 3, 4], b"a")).unwrap();
        map.add_item(item(&[1, 2, 3, 5], b"b")).unwrap();

        assert!(map.has_item(&key(&[1, 2, 3, 4])).unwrap());
        assert!(map.has_item(&key(&[1, 2, 3, 5])).unwrap());
        assert!(!map.has_item(&key(&[1, 2, 3, 6])).unwrap());
    }

    #[test]
    fn test_leaf_change_alters_root_and_noop_preserves_it() {
        let mut map = SHAMap::new(SHAMapType::State);
        map.add_item(item(&[1], b"a")).unwrap();
        map.add_item(item(&[2], b"b")).unwrap();
        let before = map.get_hash();

        // No-op sequence.
        assert_eq!(
            map.add_item(item(&[1], b"a")).unwrap(),
            AddItemResult::AlreadyPresent
        );
        assert_eq!(map.get_hash(), before);

        // A single leaf change alters the root.
        map.update_item(item(&[1], b"a'")).unwrap();
        assert_ne!(map.get_hash(), before);
    }

    #[test]
    fn test_immutable_mutations_are_rejected() {
        let mut map = SHAMap::new(SHAMapType::State);
        map.add_item(item(&[1], b"a")).unwrap();
        map.set_immutable().unwrap();
        let sealed = map.get_hash();

        assert_eq!(
            map.add_item(item(&[2], b"b")).unwrap(),
            AddItemResult::Rejected
        );
        assert_eq!(
            map.update_item(item(&[1], b"z")).unwrap(),
            UpdateItemResult::Rejected
        );
        assert_eq!(
            map.delete_item(&key(&[1])).unwrap(),
            DeleteItemResult::Rejected
        );
        assert_eq!(map.get_hash(), sealed);

        // Idempotent from Immutable.
        assert!(map.set_immutable().is_ok());
    }

    #[test]
    fn test_state_machine() {
        let mut map = SHAMap::new(SHAMapType::State);
        map.invalidate();
        assert!(map.set_immutable().is_err());
        assert!(map.transition_state(SHAMapState::Modifying).is_err());
    }

    #[test]
    fn test_cow_isolation() {
        let mut map = SHAMap::new(SHAMapType::State);
        map.add_item(item(&[1], b"a")).unwrap();
        map.add_item(item(&[2], b"b")).unwrap();
        let original_hash = map.get_hash();

        let mut snap = map.snapshot(true);
        snap.update_item(item(&[1], b"mutated")).unwrap();
        snap.add_item(item(&[3], b"c")).unwrap();
        snap.delete_item(&key(&[2])).unwrap();

        assert_eq!(map.get_hash(), original_hash);
        assert_ne!(snap.get_hash(), original_hash);
        assert_eq!(map.peek_item(&key(&[1])).unwrap().unwrap().data, b"a");
        assert_eq!(
            snap.peek_item(&key(&[1])).unwrap().unwrap().data,
            b"mutated"
        );
    }

    #[test]
    fn test_iterator_ascending_order() {
        let mut map = SHAMap::new(SHAMapType::State);
        map.add_item(item(&[0xF], b"last")).unwrap();
        map.add_item(item(&[1, 2], b"ab")).unwrap();
        map.add_item(item(&[1, 1], b"aa")).unwrap();
        map.add_item(item(&[0], b"first")).unwrap();

        let keys: Vec<Hash256> = map
            .leaves()
            .map(|leaf| leaf.unwrap().key)
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();

        assert_eq!(keys.len(), 4);
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_iterator_survives_concurrent_writer() {
        let mut map = SHAMap::new(SHAMapType::State);
        for n in 0..8u8 {
            map.add_item(item(&[n], &[n])).unwrap();
        }
        map.get_hash();

        let reader = map.snapshot(false);
        let mut writer = map.snapshot(true);

        let mut iterator = reader.leaves();
        let first = iterator.next().unwrap().unwrap();
        assert_eq!(first.data, vec![0]);

        // The writer unshares rather than editing shared nodes.
        writer.delete_item(&key(&[3])).unwrap();
        writer.update_item(item(&[5], b"changed")).unwrap();

        let rest: Vec<SHAMapItem> = iterator.map(Result::unwrap).collect();
        assert_eq!(rest.len(), 7);
        assert_eq!(rest[2].data, vec![3]);
        assert_eq!(rest[4].data, vec![5]);
    }

    #[test]
    fn test_flush_and_reload_through_store() {
        let store = Arc::new(MemoryNodeStore::new());
        let mut map = SHAMap::with_store(SHAMapType::State, store.clone());
        for n in 0..16u8 {
            map.add_item(item(&[n, n], &[n])).unwrap();
        }
        let root = map.get_hash();
        let stored = map.flush_to_store(1);
        assert!(stored > 0);

        let reloaded = SHAMap::from_root_hash(
            SHAMapType::State,
            root,
            store,
            SHAMapState::Immutable,
        )
        .unwrap();
        assert_eq!(reloaded.root_hash(), root);
        for n in 0..16u8 {
            assert_eq!(
                reloaded.peek_item(&key(&[n, n])).unwrap().unwrap().data,
                vec![n]
            );
        }
        assert_eq!(reloaded.leaves().count(), 16);
    }

    #[test]
    fn test_missing_node_classification() {
        let store = Arc::new(MemoryNodeStore::new());
        let phantom = Hash256([9u8; 32]);

        let synching = SHAMap::from_root_hash(
            SHAMapType::State,
            phantom,
            store.clone(),
            SHAMapState::Synching,
        );
        assert!(matches!(
            synching.unwrap_err(),
            SHAMapException::MissingNode(_)
        ));

        let sealed =
            SHAMap::from_root_hash(SHAMapType::State, phantom, store, SHAMapState::Immutable);
        assert!(matches!(
            sealed.unwrap_err(),
            SHAMapException::DataCorruption(_)
        ));
    }
}
