//! The content-addressed node store the tree consumes.
//!
//! The core never assumes durability ordering; it writes every node
//! for a ledger before publishing the ledger's root hash. Entries are
//! keyed by hash and never invalidated.

use std::sync::RwLock;

use hashbrown::HashMap;

use crate::core::binarycodec::types::Hash256;

/// Backing storage for tree nodes. `fetch` is the only blocking I/O
/// point in the core.
pub trait NodeStore: Send + Sync {
    fn fetch(&self, hash: &Hash256) -> Option<Vec<u8>>;
    fn store(&self, hash: Hash256, bytes: Vec<u8>, ledger_seq: u32);
    fn exists(&self, hash: &Hash256) -> bool;
}

/// An in-memory store: many readers, one writer.
#[derive(Debug, Default)]
pub struct MemoryNodeStore {
    entries: RwLock<HashMap<Hash256, Vec<u8>>>,
}

impl MemoryNodeStore {
    pub fn new() -> Self {
        MemoryNodeStore::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("node store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NodeStore for MemoryNodeStore {
    fn fetch(&self, hash: &Hash256) -> Option<Vec<u8>> {
        self.entries
            .read()
            .expect("node store poisoned")
            .get(hash)
            .cloned()
    }

    fn store(&self, hash: Hash256, bytes: Vec<u8>, _ledger_seq: u32) {
        self.entries
            .write()
            .expect("node store poisoned")
            .insert(hash, bytes);
    }

    fn exists(&self, hash: &Hash256) -> bool {
        self.entries
            .read()
            .expect("node store poisoned")
            .contains_key(hash)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_store_and_fetch() {
        let store = MemoryNodeStore::new();
        let hash = Hash256([1u8; 32]);

        assert!(!store.exists(&hash));
        assert_eq!(store.fetch(&hash), None);

        store.store(hash, vec![1, 2, 3], 7);
        assert!(store.exists(&hash));
        assert_eq!(store.fetch(&hash), Some(vec![1, 2, 3]));
        assert_eq!(store.len(), 1);
    }
}
