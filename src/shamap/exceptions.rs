//! SHAMap exceptions.

use thiserror::Error;

use crate::core::binarycodec::types::Hash256;

use super::SHAMapState;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SHAMapException {
    #[error("Node `{0}` is not present in the node store")]
    MissingNode(Hash256),
    #[error("Node `{0}` is referenced but unreadable; the map is corrupt")]
    DataCorruption(Hash256),
    #[error("Invalid state transition from {from:?} to {to:?}")]
    InvalidStateTransition { from: SHAMapState, to: SHAMapState },
    #[error("Malformed stored node: {0}")]
    MalformedNode(String),
}
