//! Ed25519 elliptic curve cryptography interface.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroize;

use crate::constants::CryptoAlgorithm;
use crate::core::keypairs::crypto_implementation::CryptoImplementation;
use crate::core::keypairs::exceptions::XRPLKeypairsException;
use crate::core::keypairs::utils::sha512_first_half;

/// Prefix on hex-encoded Ed25519 keys.
pub const ED_PREFIX: &str = "ED";

/// Methods for using the Ed25519 cryptographic system.
pub struct Ed25519;

impl Ed25519 {
    fn format_key(keystr: &str) -> String {
        format!("{}{}", ED_PREFIX, keystr.to_uppercase())
    }

    fn signing_key(private_key: &str) -> Result<SigningKey, XRPLKeypairsException> {
        let mut raw_private = hex::decode(&private_key[ED_PREFIX.len()..])?;
        let secret: [u8; 32] = raw_private
            .as_slice()
            .try_into()
            .map_err(|_| XRPLKeypairsException::ED25519Error("bad key length".to_string()))?;
        raw_private.zeroize();

        Ok(SigningKey::from_bytes(&secret))
    }
}

impl CryptoImplementation for Ed25519 {
    fn derive_keypair(
        &self,
        decoded_seed: &[u8],
        is_validator: bool,
    ) -> Result<(String, String), XRPLKeypairsException> {
        if is_validator {
            Err(XRPLKeypairsException::UnsupportedValidatorAlgorithm {
                expected: CryptoAlgorithm::ED25519,
            })
        } else {
            let raw_private = sha512_first_half(decoded_seed);
            let private = SigningKey::from_bytes(&raw_private);
            let public = private.verifying_key();

            Ok((
                Ed25519::format_key(&hex::encode(public.as_bytes())),
                Ed25519::format_key(&hex::encode(raw_private)),
            ))
        }
    }

    fn sign(&self, message: &[u8], private_key: &str) -> Result<Vec<u8>, XRPLKeypairsException> {
        let private = Ed25519::signing_key(private_key)?;
        let signature: Signature = private.sign(message);

        Ok(signature.to_bytes().to_vec())
    }

    fn is_valid_message(&self, message: &[u8], signature: &[u8], public_key: &str) -> bool {
        let Ok(raw_public) = hex::decode(&public_key[ED_PREFIX.len()..]) else {
            return false;
        };
        let Ok(raw_public): Result<[u8; 32], _> = raw_public.as_slice().try_into() else {
            return false;
        };
        let Ok(public) = VerifyingKey::from_bytes(&raw_public) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };

        public.verify(message, &signature).is_ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SEED_ENTROPY: [u8; 16] = *b"\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0A\x0B\x0C\x0D\x0E\x0F\x10";

    #[test]
    fn test_ed25519_derive_keypair() {
        let (public, private) = Ed25519.derive_keypair(&SEED_ENTROPY, false).unwrap();

        assert!(public.starts_with(ED_PREFIX));
        assert!(private.starts_with(ED_PREFIX));
        assert_eq!(public.len(), 66);
        assert_eq!(private.len(), 66);
        // Deterministic.
        assert_eq!(
            (public, private),
            Ed25519.derive_keypair(&SEED_ENTROPY, false).unwrap()
        );
    }

    #[test]
    fn test_ed25519_validator_unsupported() {
        assert!(Ed25519.derive_keypair(&SEED_ENTROPY, true).is_err());
    }

    #[test]
    fn test_ed25519_sign_and_verify() {
        let (public, private) = Ed25519.derive_keypair(&SEED_ENTROPY, false).unwrap();
        let signature = Ed25519.sign(b"test message", &private).unwrap();

        assert_eq!(signature.len(), 64);
        assert!(Ed25519.is_valid_message(b"test message", &signature, &public));
        assert!(!Ed25519.is_valid_message(b"other message", &signature, &public));
    }
}
