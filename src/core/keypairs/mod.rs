//! Interface for cryptographic key pairs for use with the ledger.

pub mod crypto_implementation;
pub mod ed25519;
pub mod exceptions;
pub mod secp256k1;
pub mod utils;

use rand::Rng;
use rand::SeedableRng;

use crate::constants::CryptoAlgorithm;
use crate::core::addresscodec::utils::SEED_LENGTH;
use crate::core::addresscodec::{decode_seed, encode_classic_address, encode_seed};
use crate::core::keypairs::crypto_implementation::CryptoImplementation;
use crate::core::keypairs::ed25519::{Ed25519, ED_PREFIX};
use crate::core::keypairs::exceptions::XRPLKeypairsException;
use crate::core::keypairs::secp256k1::Secp256k1;
use crate::core::keypairs::utils::get_account_id;

/// Test message for signature verification.
const VERIFICATION_MESSAGE: &[u8] = b"This test message should verify.";

enum AlgorithmEngine {
    Ed25519(Ed25519),
    Secp256k1(Secp256k1),
}

impl CryptoImplementation for AlgorithmEngine {
    fn derive_keypair(
        &self,
        decoded_seed: &[u8],
        is_validator: bool,
    ) -> Result<(String, String), XRPLKeypairsException> {
        match self {
            AlgorithmEngine::Ed25519(e) => e.derive_keypair(decoded_seed, is_validator),
            AlgorithmEngine::Secp256k1(e) => e.derive_keypair(decoded_seed, is_validator),
        }
    }

    fn sign(&self, message: &[u8], private_key: &str) -> Result<Vec<u8>, XRPLKeypairsException> {
        match self {
            AlgorithmEngine::Ed25519(e) => e.sign(message, private_key),
            AlgorithmEngine::Secp256k1(e) => e.sign(message, private_key),
        }
    }

    fn is_valid_message(&self, message: &[u8], signature: &[u8], public_key: &str) -> bool {
        match self {
            AlgorithmEngine::Ed25519(e) => e.is_valid_message(message, signature, public_key),
            AlgorithmEngine::Secp256k1(e) => e.is_valid_message(message, signature, public_key),
        }
    }
}

/// Return the engine for the provided algorithm enum.
fn get_algorithm_engine(algo: CryptoAlgorithm) -> AlgorithmEngine {
    match algo {
        CryptoAlgorithm::ED25519 => AlgorithmEngine::Ed25519(Ed25519),
        CryptoAlgorithm::SECP256K1 => AlgorithmEngine::Secp256k1(Secp256k1),
    }
}

/// Return the engine based on the provided hex key's prefix.
fn get_algorithm_engine_from_key(key: &str) -> AlgorithmEngine {
    match &key[..2] {
        ED_PREFIX => get_algorithm_engine(CryptoAlgorithm::ED25519),
        _ => get_algorithm_engine(CryptoAlgorithm::SECP256K1),
    }
}

/// Generate a seed value that cryptographic keys can be derived from.
pub fn generate_seed(
    entropy: Option<[u8; SEED_LENGTH]>,
    algorithm: Option<CryptoAlgorithm>,
) -> Result<String, XRPLKeypairsException> {
    let algo = algorithm.unwrap_or(CryptoAlgorithm::ED25519);
    let random_bytes = match entropy {
        Some(value) => value,
        None => {
            let mut rng = rand_hc::Hc128Rng::from_entropy();
            let mut bytes = [0u8; SEED_LENGTH];
            rng.fill(&mut bytes);
            bytes
        }
    };

    Ok(encode_seed(random_bytes, algo)?)
}

/// Derive the public and private keys from a given seed value.
pub fn derive_keypair(
    seed: &str,
    validator: bool,
) -> Result<(String, String), XRPLKeypairsException> {
    let (decoded_seed, algorithm) = decode_seed(seed)?;
    let module = get_algorithm_engine(algorithm);
    let (public, private) = module.derive_keypair(&decoded_seed, validator)?;
    let signature = module.sign(VERIFICATION_MESSAGE, &private)?;

    if module.is_valid_message(VERIFICATION_MESSAGE, &signature, &public) {
        Ok((public, private))
    } else {
        Err(XRPLKeypairsException::InvalidSignature)
    }
}

/// Derive the classic address for a given hex public key.
///
/// See Address Derivation:
/// `<https://xrpl.org/cryptographic-keys.html#account-id-and-address>`
pub fn derive_classic_address(public_key: &str) -> Result<String, XRPLKeypairsException> {
    let account_id = get_account_id(&hex::decode(public_key)?);
    Ok(encode_classic_address(&account_id)?)
}

/// Sign a message using a given private key.
pub fn sign(message: &[u8], private_key: &str) -> Result<Vec<u8>, XRPLKeypairsException> {
    let module = get_algorithm_engine_from_key(private_key);
    module.sign(message, private_key)
}

/// Verifies the signature on a given message.
pub fn is_valid_message(message: &[u8], signature: &[u8], public_key: &str) -> bool {
    let module = get_algorithm_engine_from_key(public_key);
    module.is_valid_message(message, signature, public_key)
}

#[cfg(test)]
mod test {
    use super::*;

    const TEST_ENTROPY: [u8; SEED_LENGTH] = [
        207, 45, 227, 120, 251, 221, 126, 46, 232, 125, 72, 109, 251, 90, 123, 255,
    ];

    #[test]
    fn test_generate_seed() {
        assert!(generate_seed(None, None).is_ok());

        let seed = generate_seed(Some(TEST_ENTROPY), Some(CryptoAlgorithm::ED25519)).unwrap();
        let (decoded, algo) = decode_seed(&seed).unwrap();
        assert_eq!(decoded, TEST_ENTROPY);
        assert_eq!(algo, CryptoAlgorithm::ED25519);
    }

    #[test]
    fn test_derive_keypair_both_algorithms() {
        for algo in [CryptoAlgorithm::ED25519, CryptoAlgorithm::SECP256K1] {
            let seed = generate_seed(Some(TEST_ENTROPY), Some(algo)).unwrap();
            let (public, private) = derive_keypair(&seed, false).unwrap();

            let signature = sign(b"hello", &private).unwrap();
            assert!(is_valid_message(b"hello", &signature, &public));
        }
    }

    #[test]
    fn test_derive_classic_address() {
        let seed = generate_seed(Some(TEST_ENTROPY), Some(CryptoAlgorithm::ED25519)).unwrap();
        let (public, _) = derive_keypair(&seed, false).unwrap();
        let address = derive_classic_address(&public).unwrap();
        assert!(address.starts_with('r'));
    }
}
