//! Tree nodes: 16-slot inner nodes and item-bearing leaves, plus
//! their content hashing and storage codec.

use std::sync::Arc;

use crate::core::binarycodec::types::hash256::HASH256_LENGTH;
use crate::core::binarycodec::types::Hash256;
use crate::core::keypairs::utils::sha512_first_half;

use super::exceptions::SHAMapException;
use super::SHAMapType;

/// Hash prefix of inner nodes.
const HASH_PREFIX_INNER: [u8; 4] = *b"MIN\0";
/// Hash prefix of state-map leaves.
const HASH_PREFIX_LEAF_STATE: [u8; 4] = *b"MLN\0";
/// Hash prefix of transaction-map leaves.
const HASH_PREFIX_LEAF_TRANSACTION: [u8; 4] = *b"SND\0";

/// Storage discriminants.
const NODE_KIND_INNER: u8 = b'I';
const NODE_KIND_LEAF: u8 = b'L';

pub const BRANCH_COUNT: usize = 16;

/// A keyed blob. Keys are unique within a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SHAMapItem {
    pub key: Hash256,
    pub data: Vec<u8>,
}

impl SHAMapItem {
    pub fn new(key: Hash256, data: Vec<u8>) -> Self {
        SHAMapItem { key, data }
    }
}

/// One child slot of an inner node. `Hash` is a node that lives in
/// the backing store but has not been fetched.
#[derive(Debug, Clone)]
pub(crate) enum Child {
    Empty,
    Node(Arc<SHAMapNode>),
    Hash(Hash256),
}

impl Child {
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Child::Empty)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum SHAMapNode {
    Inner(SHAMapInnerNode),
    Leaf(SHAMapLeafNode),
}

impl SHAMapNode {
    pub(crate) fn cow_id(&self) -> u32 {
        match self {
            SHAMapNode::Inner(inner) => inner.cow_id,
            SHAMapNode::Leaf(leaf) => leaf.cow_id,
        }
    }

    pub(crate) fn set_cow_id(&mut self, cow_id: u32) {
        match self {
            SHAMapNode::Inner(inner) => inner.cow_id = cow_id,
            SHAMapNode::Leaf(leaf) => leaf.cow_id = cow_id,
        }
    }

    /// The cached hash; inner nodes must be clean.
    pub(crate) fn hash(&self) -> Hash256 {
        match self {
            SHAMapNode::Inner(inner) => {
                debug_assert!(!inner.dirty, "hash of a dirty inner node");
                inner.hash
            }
            SHAMapNode::Leaf(leaf) => leaf.hash,
        }
    }

    /// Storage form of the node.
    pub(crate) fn serialize(&self) -> Vec<u8> {
        match self {
            SHAMapNode::Inner(inner) => {
                let mut bytes = Vec::with_capacity(1 + BRANCH_COUNT * HASH256_LENGTH);
                bytes.push(NODE_KIND_INNER);
                for branch in 0..BRANCH_COUNT {
                    bytes.extend_from_slice(inner.child_hash(branch).as_bytes());
                }
                bytes
            }
            SHAMapNode::Leaf(leaf) => {
                let mut bytes = Vec::with_capacity(1 + HASH256_LENGTH + leaf.item.data.len());
                bytes.push(NODE_KIND_LEAF);
                bytes.extend_from_slice(leaf.item.key.as_bytes());
                bytes.extend_from_slice(&leaf.item.data);
                bytes
            }
        }
    }

    /// Reads a node back from its storage form, reinstating its known
    /// content hash. Inner children come back as unfetched hash
    /// references.
    pub(crate) fn deserialize(
        bytes: &[u8],
        content_hash: Hash256,
        map_type: SHAMapType,
        cow_id: u32,
    ) -> Result<Self, SHAMapException> {
        match bytes.first() {
            Some(&NODE_KIND_INNER) => {
                if bytes.len() != 1 + BRANCH_COUNT * HASH256_LENGTH {
                    return Err(SHAMapException::MalformedNode(
                        "inner node length".to_string(),
                    ));
                }

                let mut inner = SHAMapInnerNode::new(cow_id);
                for branch in 0..BRANCH_COUNT {
                    let offset = 1 + branch * HASH256_LENGTH;
                    let hash = Hash256::from_bytes(&bytes[offset..offset + HASH256_LENGTH])
                        .expect("fixed-width slice");
                    if !hash.is_zero() {
                        inner.children[branch] = Child::Hash(hash);
                    }
                }
                inner.hash = content_hash;
                inner.dirty = false;
                Ok(SHAMapNode::Inner(inner))
            }
            Some(&NODE_KIND_LEAF) => {
                if bytes.len() < 1 + HASH256_LENGTH {
                    return Err(SHAMapException::MalformedNode("leaf too short".to_string()));
                }

                let key = Hash256::from_bytes(&bytes[1..1 + HASH256_LENGTH])
                    .expect("fixed-width slice");
                let data = bytes[1 + HASH256_LENGTH..].to_vec();
                Ok(SHAMapNode::Leaf(SHAMapLeafNode::new(
                    SHAMapItem::new(key, data),
                    map_type,
                    cow_id,
                )))
            }
            _ => Err(SHAMapException::MalformedNode(
                "unknown node kind".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SHAMapInnerNode {
    pub(crate) children: [Child; BRANCH_COUNT],
    /// Cached Merkle hash, valid while `dirty` is unset.
    pub(crate) hash: Hash256,
    pub(crate) dirty: bool,
    pub(crate) cow_id: u32,
}

impl SHAMapInnerNode {
    pub(crate) fn new(cow_id: u32) -> Self {
        SHAMapInnerNode {
            children: core::array::from_fn(|_| Child::Empty),
            hash: Hash256::ZERO,
            dirty: true,
            cow_id,
        }
    }

    pub(crate) fn branch_count(&self) -> usize {
        self.children
            .iter()
            .filter(|child| !child.is_empty())
            .count()
    }

    /// The hash a child contributes to this node's digest; empty
    /// slots contribute the zero hash.
    pub(crate) fn child_hash(&self, branch: usize) -> Hash256 {
        match &self.children[branch] {
            Child::Empty => Hash256::ZERO,
            Child::Hash(hash) => *hash,
            Child::Node(node) => node.hash(),
        }
    }

    /// Digest over all sixteen child hashes. An inner node with no
    /// children hashes to zero (the empty-map root).
    pub(crate) fn compute_hash(&self) -> Hash256 {
        if self.branch_count() == 0 {
            return Hash256::ZERO;
        }

        let mut message = HASH_PREFIX_INNER.to_vec();
        for branch in 0..BRANCH_COUNT {
            message.extend_from_slice(self.child_hash(branch).as_bytes());
        }
        Hash256(sha512_first_half(&message))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SHAMapLeafNode {
    pub(crate) item: SHAMapItem,
    pub(crate) hash: Hash256,
    pub(crate) cow_id: u32,
}

impl SHAMapLeafNode {
    pub(crate) fn new(item: SHAMapItem, map_type: SHAMapType, cow_id: u32) -> Self {
        let prefix = match map_type {
            SHAMapType::State => HASH_PREFIX_LEAF_STATE,
            SHAMapType::Transaction => HASH_PREFIX_LEAF_TRANSACTION,
        };

        let mut message = prefix.to_vec();
        message.extend_from_slice(&item.data);
        message.extend_from_slice(item.key.as_bytes());

        SHAMapLeafNode {
            hash: Hash256(sha512_first_half(&message)),
            item,
            cow_id,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn key(byte: u8) -> Hash256 {
        Hash256([byte; 32])
    }

    #[test]
    fn test_leaf_hash_depends_on_key_and_data() {
        let a = SHAMapLeafNode::new(
            SHAMapItem::new(key(1), vec![1, 2, 3]),
            SHAMapType::State,
            0,
        );
        let b = SHAMapLeafNode::new(
            SHAMapItem::new(key(2), vec![1, 2, 3]),
            SHAMapType::State,
            0,
        );
        let c = SHAMapLeafNode::new(
            SHAMapItem::new(key(1), vec![9]),
            SHAMapType::State,
            0,
        );

        assert_ne!(a.hash, b.hash);
        assert_ne!(a.hash, c.hash);
    }

    #[test]
    fn test_leaf_hash_differs_by_map_type() {
        let item = SHAMapItem::new(key(1), vec![1, 2, 3]);
        let state = SHAMapLeafNode::new(item.clone(), SHAMapType::State, 0);
        let transaction = SHAMapLeafNode::new(item, SHAMapType::Transaction, 0);

        assert_ne!(state.hash, transaction.hash);
    }

    #[test]
    fn test_empty_inner_hashes_to_zero() {
        assert_eq!(SHAMapInnerNode::new(0).compute_hash(), Hash256::ZERO);
    }

    #[test]
    fn test_node_storage_round_trip() {
        let leaf = SHAMapNode::Leaf(SHAMapLeafNode::new(
            SHAMapItem::new(key(7), vec![4, 5, 6]),
            SHAMapType::State,
            0,
        ));
        let restored =
            SHAMapNode::deserialize(&leaf.serialize(), leaf.hash(), SHAMapType::State, 0)
                .unwrap();
        assert_eq!(leaf.hash(), restored.hash());

        let mut inner = SHAMapInnerNode::new(0);
        inner.children[3] = Child::Hash(key(9));
        inner.hash = inner.compute_hash();
        inner.dirty = false;
        let inner = SHAMapNode::Inner(inner);
        let restored =
            SHAMapNode::deserialize(&inner.serialize(), inner.hash(), SHAMapType::State, 0)
                .unwrap();
        match restored {
            SHAMapNode::Inner(restored) => {
                assert_eq!(restored.hash, inner.hash());
                assert_eq!(restored.compute_hash(), inner.hash());
                assert!(matches!(restored.children[3], Child::Hash(h) if h == key(9)));
            }
            SHAMapNode::Leaf(_) => panic!("expected inner node"),
        }
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        let zero = Hash256::ZERO;
        assert!(SHAMapNode::deserialize(&[], zero, SHAMapType::State, 0).is_err());
        assert!(SHAMapNode::deserialize(&[0xFF, 1, 2], zero, SHAMapType::State, 0).is_err());
    }
}
