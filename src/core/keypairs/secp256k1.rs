//! SECP256K1 elliptic curve cryptography interface.
//!
//! The derivation is more involved than Ed25519: a root key pair is
//! derived from the seed, then an intermediate pair, and the account
//! key is their sum on the curve.
//!
//! See: `<https://xrpl.org/cryptographic-keys.html#secp256k1-key-derivation>`

use secp256k1::{ecdsa, Message, PublicKey, Scalar, Secp256k1 as Context, SecretKey};

use crate::core::keypairs::crypto_implementation::CryptoImplementation;
use crate::core::keypairs::exceptions::XRPLKeypairsException;
use crate::core::keypairs::utils::sha512_first_half;

/// String keys must be KEY_LENGTH long.
const KEY_LENGTH: usize = 66;

/// Generated sequence values are 4 bytes unsigned big-endian.
const SEQUENCE_SIZE: usize = 4;

/// Intermediate private keys are always padded with 4 bytes of zeros.
const INTERMEDIATE_KEYPAIR_PADDING: [u8; 4] = [0, 0, 0, 0];

/// Methods for using the ECDSA cryptographic system with the
/// secp256k1 elliptic curve.
pub struct Secp256k1;

impl Secp256k1 {
    fn format_key(keystr: &str) -> String {
        format!("{:0>width$}", keystr.to_uppercase(), width = KEY_LENGTH)
    }

    fn format_keys(public: PublicKey, private: SecretKey) -> (String, String) {
        (
            Secp256k1::format_key(&hex::encode(public.serialize())),
            Secp256k1::format_key(&hex::encode(private.secret_bytes())),
        )
    }

    /// Hash candidates until one lands inside the curve order.
    fn derive_part(seed_material: &[u8]) -> Result<SecretKey, XRPLKeypairsException> {
        for sequence in 0..u32::MAX {
            let mut candidate_material = seed_material.to_vec();
            candidate_material.extend_from_slice(&sequence.to_be_bytes());

            let candidate = sha512_first_half(&candidate_material);
            if let Ok(key) = SecretKey::from_slice(&candidate) {
                return Ok(key);
            }
        }

        Err(XRPLKeypairsException::UnderivableKey)
    }

    fn derive_root(decoded_seed: &[u8]) -> Result<SecretKey, XRPLKeypairsException> {
        Secp256k1::derive_part(decoded_seed)
    }

    fn derive_intermediate(root_public: &PublicKey) -> Result<SecretKey, XRPLKeypairsException> {
        let mut material = root_public.serialize().to_vec();
        material.extend_from_slice(&INTERMEDIATE_KEYPAIR_PADDING);

        debug_assert_eq!(INTERMEDIATE_KEYPAIR_PADDING.len(), SEQUENCE_SIZE);
        Secp256k1::derive_part(&material)
    }

    fn secret_key(private_key: &str) -> Result<SecretKey, XRPLKeypairsException> {
        // Strip the 0x00 padding prefix.
        let raw = hex::decode(private_key)?;
        let raw = if raw.len() == 33 { &raw[1..] } else { &raw[..] };

        Ok(SecretKey::from_slice(raw)?)
    }
}

impl CryptoImplementation for Secp256k1 {
    fn derive_keypair(
        &self,
        decoded_seed: &[u8],
        is_validator: bool,
    ) -> Result<(String, String), XRPLKeypairsException> {
        let secp = Context::new();
        let root_private = Secp256k1::derive_root(decoded_seed)?;
        let root_public = PublicKey::from_secret_key(&secp, &root_private);

        if is_validator {
            return Ok(Secp256k1::format_keys(root_public, root_private));
        }

        let intermediate = Secp256k1::derive_intermediate(&root_public)?;
        let account_private = root_private
            .add_tweak(&Scalar::from(intermediate))
            .map_err(XRPLKeypairsException::from)?;
        let account_public = PublicKey::from_secret_key(&secp, &account_private);

        Ok(Secp256k1::format_keys(account_public, account_private))
    }

    fn sign(&self, message: &[u8], private_key: &str) -> Result<Vec<u8>, XRPLKeypairsException> {
        let secp = Context::signing_only();
        let digest = sha512_first_half(message);
        let message = Message::from_digest_slice(&digest)?;
        let private = Secp256k1::secret_key(private_key)?;
        let signature = secp.sign_ecdsa(&message, &private);

        Ok(signature.serialize_der().to_vec())
    }

    fn is_valid_message(&self, message: &[u8], signature: &[u8], public_key: &str) -> bool {
        let secp = Context::verification_only();
        let digest = sha512_first_half(message);

        let Ok(message) = Message::from_digest_slice(&digest) else {
            return false;
        };
        let Ok(signature) = ecdsa::Signature::from_der(signature) else {
            return false;
        };
        let Ok(raw_public) = hex::decode(public_key) else {
            return false;
        };
        let Ok(public) = PublicKey::from_slice(&raw_public) else {
            return false;
        };

        secp.verify_ecdsa(&message, &signature, &public).is_ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SEED_ENTROPY: [u8; 16] = [
        207, 45, 227, 120, 251, 221, 126, 46, 232, 125, 72, 109, 251, 90, 123, 255,
    ];

    #[test]
    fn test_secp256k1_derive_keypair() {
        let (public, private) = Secp256k1.derive_keypair(&SEED_ENTROPY, false).unwrap();

        assert_eq!(public.len(), KEY_LENGTH);
        assert_eq!(private.len(), KEY_LENGTH);
        assert!(private.starts_with("00"));
        assert_eq!(
            (public, private),
            Secp256k1.derive_keypair(&SEED_ENTROPY, false).unwrap()
        );
    }

    #[test]
    fn test_secp256k1_sign_and_verify() {
        let (public, private) = Secp256k1.derive_keypair(&SEED_ENTROPY, false).unwrap();
        let signature = Secp256k1.sign(b"test message", &private).unwrap();

        assert!(Secp256k1.is_valid_message(b"test message", &signature, &public));
        assert!(!Secp256k1.is_valid_message(b"other message", &signature, &public));
    }

    #[test]
    fn test_root_differs_from_account_key() {
        let root = Secp256k1.derive_keypair(&SEED_ENTROPY, true).unwrap();
        let account = Secp256k1.derive_keypair(&SEED_ENTROPY, false).unwrap();
        assert_ne!(root, account);
    }
}
