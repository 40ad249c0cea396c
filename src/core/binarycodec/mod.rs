//! Functions for encoding field trees into the ledger's canonical
//! binary format and decoding them.

pub mod binary_parser;
pub mod binary_serializer;
pub mod exceptions;
pub mod field_id_codec;
pub mod types;
pub mod utils;

use hex::ToHex;
use serde::Serialize;
use serde_json::Value;

pub use binary_parser::BinaryParser;
pub use binary_serializer::{BinarySerializer, Serialization};

use crate::core::exceptions::XRPLCoreResult;
use crate::core::keypairs::utils::sha512_first_half;

use self::types::st_object::{decode_object, encode_object};
use self::types::{AccountId, Hash256};

/// Single-signature signing payloads.
const TRANSACTION_SIGNATURE_PREFIX: u32 = 0x53545800;
/// Multi-signature signing payloads.
const TRANSACTION_MULTISIG_PREFIX: u32 = 0x534D5400;
/// Transaction identifying hashes.
const TRANSACTION_HASH_PREFIX: u32 = 0x54584E00;

/// Encode a signed transaction (or any field tree) into its canonical
/// hex form.
pub fn encode<T>(signed_transaction: &T) -> XRPLCoreResult<String>
where
    T: Serialize,
{
    serialize_json(signed_transaction, None, None, false)
}

/// Encode the signing payload: the signature prefix, signing fields
/// only.
pub fn encode_for_signing<T>(prepared_transaction: &T) -> XRPLCoreResult<String>
where
    T: Serialize,
{
    serialize_json(
        prepared_transaction,
        Some(&TRANSACTION_SIGNATURE_PREFIX.to_be_bytes()),
        None,
        true,
    )
}

/// Encode the multisigning payload for one signer: the multisig
/// prefix, signing fields, the signer's account id suffix.
pub fn encode_for_multisigning<T>(
    prepared_transaction: &T,
    signing_account: &AccountId,
) -> XRPLCoreResult<String>
where
    T: Serialize,
{
    serialize_json(
        prepared_transaction,
        Some(&TRANSACTION_MULTISIG_PREFIX.to_be_bytes()),
        Some(signing_account.as_bytes()),
        true,
    )
}

/// Decode canonical hex back into its JSON field tree.
pub fn decode(buffer: &str) -> XRPLCoreResult<Value> {
    let mut parser = BinaryParser::from_hex(buffer)?;
    Ok(decode_object(&mut parser, false)?)
}

/// The identifying hash of a signed transaction: SHA-512-half over the
/// hash prefix and the canonical encoding.
pub fn transaction_hash<T>(signed_transaction: &T) -> XRPLCoreResult<Hash256>
where
    T: Serialize,
{
    let encoded = serialize_json(
        signed_transaction,
        Some(&TRANSACTION_HASH_PREFIX.to_be_bytes()),
        None,
        false,
    )?;
    let raw = hex::decode(&encoded).expect("serialize_json emits valid hex");

    Ok(Hash256(sha512_first_half(&raw)))
}

fn serialize_json<T>(
    transaction: &T,
    prefix: Option<&[u8]>,
    suffix: Option<&[u8]>,
    signing_only: bool,
) -> XRPLCoreResult<String>
where
    T: Serialize,
{
    let mut buffer = Vec::new();
    if let Some(p) = prefix {
        buffer.extend_from_slice(p);
    }

    let json_value = serde_json::to_value(transaction)?;
    buffer.extend(encode_object(&json_value, signing_only)?);

    if let Some(s) = suffix {
        buffer.extend_from_slice(s);
    }

    Ok(buffer.encode_hex_upper::<String>())
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_transaction() -> Value {
        serde_json::json!({
            "Account": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
            "Amount": "1000000",
            "Destination": "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn",
            "Fee": "10",
            "Flags": 0u32,
            "Sequence": 1u32,
            "SigningPubKey": "03AB40A0490F9B7ED8DF29D246BF2D6269820A0EE7742ACDD457BEA7C7D0931EDB",
            "TransactionType": "Payment",
            "TxnSignature": "DEADBEEF",
        })
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let tx = sample_transaction();
        let encoded = encode(&tx).unwrap();
        assert_eq!(decode(&encoded).unwrap(), tx);
    }

    #[test]
    fn test_signing_payload_omits_signature() {
        let tx = sample_transaction();
        let signing = encode_for_signing(&tx).unwrap();

        assert!(signing.starts_with("53545800"));
        // The signature bytes must not appear in the payload.
        assert!(!signing.contains("DEADBEEF"));
    }

    #[test]
    fn test_multisigning_payload_has_suffix() {
        let tx = sample_transaction();
        let signer: AccountId = "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".parse().unwrap();
        let payload = encode_for_multisigning(&tx, &signer).unwrap();

        assert!(payload.starts_with("534D5400"));
        assert!(payload.ends_with(&hex::encode_upper(signer.as_bytes())));
    }

    #[test]
    fn test_transaction_hash_is_stable() {
        let tx = sample_transaction();
        assert_eq!(
            transaction_hash(&tx).unwrap(),
            transaction_hash(&tx).unwrap()
        );
        // Signature fields are part of the identifying hash.
        let mut unsigned = tx.clone();
        unsigned.as_object_mut().unwrap().remove("TxnSignature");
        assert_ne!(
            transaction_hash(&tx).unwrap(),
            transaction_hash(&unsigned).unwrap()
        );
    }
}
