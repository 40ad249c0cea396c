//! Transaction-processing core of an XRP Ledger node.
//!
//! Three subsystems define wire-, storage- and semantic-level
//! interoperability with the network: the canonical binary codec
//! ([`core::binarycodec`]), the SHAMap authenticated radix tree
//! ([`shamap`]) and the transaction execution engine ([`engine`]) that
//! mutates a buffered [`ledger::view::LedgerView`]. Surrounding services
//! (RPC front ends, node-store backends, history indexers) live outside
//! this crate and reach the core through [`nodestore::NodeStore`],
//! [`ledger::rules::Rules`] and the engine's apply surface.

pub mod constants;
pub mod core;
pub mod engine;
pub mod ledger;
pub mod macros;
pub mod models;
pub mod nodestore;
pub mod shamap;
pub mod testenv;
pub mod utils;

pub use crate::core::exceptions::{XRPLCoreException, XRPLCoreResult};
