//! Constants for the ledger's base58 encodings.

use bs58::Alphabet;

/// The dictionary used for XRPL base58 encodings.
/// Sourced from the [`bs58`] crate.
///
/// [`bs58`]: bs58::Alphabet
pub const XRPL_ALPHABET: Alphabet = *bs58::Alphabet::RIPPLE;

/// Length of a seed's entropy in bytes.
pub const SEED_LENGTH: usize = 16;
/// Length of an account id payload in bytes.
pub const CLASSIC_ADDRESS_ID_LENGTH: usize = 20;

/// Account address (20 bytes), base58 leader 'r'.
pub const CLASSIC_ADDRESS_PREFIX: [u8; 1] = [0x0];
/// Account public key (33 bytes).
pub const ACCOUNT_PUBLIC_KEY_PREFIX: [u8; 1] = [0x23];
/// Seed value for secp256k1 secret keys (16 bytes).
pub const FAMILY_SEED_PREFIX: [u8; 1] = [0x21];
/// Seed value for Ed25519 secret keys (16 bytes).
pub const ED25519_SEED_PREFIX: [u8; 3] = [0x01, 0xE1, 0x4B];
