//! Traits for the cryptographic algorithms the ledger accepts.

use crate::core::keypairs::exceptions::XRPLKeypairsException;

/// The classes for all cryptographic algorithms are derived from this
/// trait.
pub trait CryptoImplementation {
    /// Derive a (public, private) key pair, hex-encoded with the
    /// algorithm's prefix, from decoded seed entropy.
    fn derive_keypair(
        &self,
        decoded_seed: &[u8],
        is_validator: bool,
    ) -> Result<(String, String), XRPLKeypairsException>;

    /// Sign a message; the signature's wire form is algorithm
    /// specific (DER for secp256k1, 64 raw bytes for Ed25519).
    fn sign(&self, message: &[u8], private_key: &str) -> Result<Vec<u8>, XRPLKeypairsException>;

    /// Verify a signature over message.
    fn is_valid_message(&self, message: &[u8], signature: &[u8], public_key: &str) -> bool;
}
