//! Core codecs: canonical binary serialization, addresses, key pairs
//! and ledger-entry index derivation.

pub mod addresscodec;
pub mod binarycodec;
pub mod definitions;
pub mod exceptions;
pub mod keylet;
pub mod keypairs;
