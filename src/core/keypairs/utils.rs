//! Miscellaneous hashing and key helpers.

use ripemd::Ripemd160;
use sha2::{Digest, Sha512};

/// Returns the first 32 bytes of the SHA-512 hash of message.
pub fn sha512_first_half(message: &[u8]) -> [u8; 32] {
    let mut sha512 = Sha512::new();

    sha512.update(message);
    sha512.finalize()[..32]
        .try_into()
        .expect("Invalid slice length")
}

/// Returns the account ID for a given public key. The ID is the
/// RIPEMD-160 of the SHA-256 of the serialized key.
pub fn get_account_id(public_key: &[u8]) -> [u8; 20] {
    let mut sha256 = sha2::Sha256::new();
    let mut ripemd160 = Ripemd160::new();

    sha256.update(public_key);
    ripemd160.update(sha256.finalize());

    ripemd160.finalize()[..]
        .try_into()
        .expect("Invalid slice length")
}

/// Accepts the three serialized public key forms the protocol allows:
/// 33 bytes leading 0x02/0x03 (secp256k1 compressed), 33 bytes leading
/// 0xED (Ed25519), 65 bytes leading 0x04 (secp256k1 uncompressed).
pub fn is_valid_public_key(key: &[u8]) -> bool {
    match (key.len(), key.first()) {
        (33, Some(0x02)) | (33, Some(0x03)) => {
            secp256k1::PublicKey::from_slice(key).is_ok()
        }
        (33, Some(0xED)) => {
            let raw: [u8; 32] = key[1..].try_into().expect("is_valid_public_key");
            ed25519_dalek::VerifyingKey::from_bytes(&raw).is_ok()
        }
        (65, Some(0x04)) => secp256k1::PublicKey::from_slice(key).is_ok(),
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sha512_first_half() {
        let expect: [u8; 32] = [
            134, 24, 68, 214, 112, 78, 133, 115, 254, 195, 77, 150, 126, 32, 188, 254, 243, 212,
            36, 207, 72, 190, 4, 230, 220, 8, 242, 189, 88, 199, 41, 116,
        ];
        assert_eq!(expect, sha512_first_half(b"Hello World!"));
    }

    #[test]
    fn test_is_valid_public_key_forms() {
        // A generated secp256k1 key round-trips through the validator.
        let secp = secp256k1::Secp256k1::new();
        let secret = secp256k1::SecretKey::from_slice(&[0x17; 32]).unwrap();
        let public = secp256k1::PublicKey::from_secret_key(&secp, &secret);

        assert!(is_valid_public_key(&public.serialize()));
        assert!(is_valid_public_key(&public.serialize_uncompressed()));
        assert!(!is_valid_public_key(&[0u8; 33]));
        assert!(!is_valid_public_key(b"too short"));
    }
}
