//! Tree-level properties: Merkle sensitivity, copy-on-write
//! isolation and store round trips through the public API.

use std::sync::Arc;

use xrpld::core::binarycodec::types::Hash256;
use xrpld::nodestore::{MemoryNodeStore, NodeStore};
use xrpld::shamap::{AddItemResult, SHAMap, SHAMapItem, SHAMapState, SHAMapType};

fn item(seed: u8, data: &[u8]) -> SHAMapItem {
    SHAMapItem::new(Hash256([seed; 32]), data.to_vec())
}

#[test]
fn single_leaf_change_alters_root() {
    let mut map = SHAMap::new(SHAMapType::State);
    for seed in 0..32u8 {
        map.add_item(item(seed, &[seed])).unwrap();
    }
    let before = map.get_hash();

    map.update_item(item(7, b"changed")).unwrap();
    let after = map.get_hash();
    assert_ne!(before, after);

    // Reverting restores the exact root.
    map.update_item(item(7, &[7])).unwrap();
    assert_eq!(map.get_hash(), before);
}

#[test]
fn noop_sequences_preserve_root() {
    let mut map = SHAMap::new(SHAMapType::State);
    map.add_item(item(1, b"one")).unwrap();
    map.add_item(item(2, b"two")).unwrap();
    let root = map.get_hash();

    assert_eq!(
        map.add_item(item(1, b"one")).unwrap(),
        AddItemResult::AlreadyPresent
    );
    assert!(map.delete_item(&Hash256([9; 32])).unwrap() == xrpld::shamap::DeleteItemResult::NotFound);
    assert_eq!(map.get_hash(), root);
}

#[test]
fn snapshot_isolation_under_mutation() {
    let mut map = SHAMap::new(SHAMapType::State);
    for seed in 0..16u8 {
        map.add_item(item(seed, &[seed])).unwrap();
    }
    let original = map.get_hash();

    let mut snap = map.snapshot(true);
    for seed in 0..8u8 {
        snap.delete_item(&Hash256([seed; 32])).unwrap();
    }
    snap.add_item(item(200, b"new")).unwrap();

    assert_eq!(map.get_hash(), original, "the source map must be untouched");
    assert_ne!(snap.get_hash(), original);
}

#[test]
fn sealed_maps_reject_mutation() {
    let mut map = SHAMap::new(SHAMapType::State);
    map.add_item(item(1, b"one")).unwrap();
    map.set_immutable().unwrap();

    assert_eq!(map.add_item(item(2, b"two")).unwrap(), AddItemResult::Rejected);
    assert_eq!(map.state(), SHAMapState::Immutable);
}

#[test]
fn leaves_iterate_in_key_order() {
    let mut map = SHAMap::new(SHAMapType::State);
    for seed in [9u8, 3, 12, 1, 15, 7] {
        map.add_item(item(seed, &[seed])).unwrap();
    }

    let keys: Vec<Hash256> = map.leaves().map(|leaf| leaf.unwrap().key).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(keys.len(), 6);
}

#[test]
fn flush_then_reload_by_root_hash() {
    let store = Arc::new(MemoryNodeStore::new());
    let mut map = SHAMap::with_store(SHAMapType::State, store.clone());
    for seed in 0..64u8 {
        map.add_item(item(seed, &[seed, seed])).unwrap();
    }
    let root = map.get_hash();

    let stored = map.flush_to_store(9);
    assert!(stored > 0);
    assert!(store.exists(&root));

    let reloaded =
        SHAMap::from_root_hash(SHAMapType::State, root, store, SHAMapState::Immutable).unwrap();
    assert_eq!(reloaded.root_hash(), root);
    assert_eq!(reloaded.leaves().count(), 64);
    assert_eq!(
        reloaded
            .peek_item(&Hash256([42; 32]))
            .unwrap()
            .unwrap()
            .data,
        vec![42, 42]
    );
}

#[test]
fn transaction_and_state_maps_hash_differently() {
    let mut state = SHAMap::new(SHAMapType::State);
    let mut txns = SHAMap::new(SHAMapType::Transaction);
    state.add_item(item(5, b"same-bytes")).unwrap();
    txns.add_item(item(5, b"same-bytes")).unwrap();

    assert_ne!(state.get_hash(), txns.get_hash());
}
