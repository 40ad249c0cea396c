//! The metadata record the engine emits for every applied
//! transaction: balance-affecting summaries, created and deleted
//! entries, and delivered amounts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::binarycodec::types::Hash256;
use crate::engine::results::TransactionResult;
use crate::ledger::objects::LedgerEntryType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeSummary {
    pub ledger_entry_type: LedgerEntryType,
    pub ledger_index: Hash256,
}

/// One state-tree change, externally tagged by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AffectedNode {
    CreatedNode(NodeSummary),
    ModifiedNode(NodeSummary),
    DeletedNode(NodeSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionMetadata {
    pub transaction_index: u32,
    pub transaction_result: TransactionResult,
    pub affected_nodes: Vec<AffectedNode>,
    /// The amount actually delivered by a payment-like transaction;
    /// differs from `Amount` on partial delivery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_amount: Option<Value>,
}

impl TransactionMetadata {
    /// The deterministic blob stored beside the transaction in the
    /// transaction tree. serde_json orders keys, so equal metadata
    /// yields equal bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("metadata always serializes")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_round_trip_and_determinism() {
        let metadata = TransactionMetadata {
            transaction_index: 2,
            transaction_result: TransactionResult::tesSUCCESS,
            affected_nodes: vec![AffectedNode::CreatedNode(NodeSummary {
                ledger_entry_type: LedgerEntryType::Check,
                ledger_index: Hash256([5u8; 32]),
            })],
            delivered_amount: Some(serde_json::json!("1000000")),
        };

        let bytes = metadata.to_bytes();
        assert_eq!(bytes, metadata.to_bytes());
        assert_eq!(TransactionMetadata::from_bytes(&bytes).unwrap(), metadata);
    }

    #[test]
    fn test_external_tagging() {
        let node = AffectedNode::DeletedNode(NodeSummary {
            ledger_entry_type: LedgerEntryType::Offer,
            ledger_index: Hash256::ZERO,
        });
        let value = serde_json::to_value(&node).unwrap();
        assert!(value.get("DeletedNode").is_some());
    }
}
