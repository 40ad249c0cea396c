//! Codec for arrays of 256-bit hashes (directory indexes, amendment
//! lists).

use core::str::FromStr;

use serde_json::Value;

use crate::core::binarycodec::exceptions::XRPLBinaryCodecException;

use super::exceptions::XRPLTypeException;
use super::hash256::{Hash256, HASH256_LENGTH};

/// Serializes a JSON array of hex hashes into concatenated raw bytes.
pub fn encode_vector256(field: &str, value: &Value) -> Result<Vec<u8>, XRPLBinaryCodecException> {
    let items = value
        .as_array()
        .ok_or_else(|| XRPLTypeException::UnexpectedJsonType {
            field: field.to_string(),
            expected: "array of hex strings",
        })?;

    let mut bytes = Vec::with_capacity(items.len() * HASH256_LENGTH);
    for item in items {
        let hex_string =
            item.as_str()
                .ok_or_else(|| XRPLTypeException::UnexpectedJsonType {
                    field: field.to_string(),
                    expected: "array of hex strings",
                })?;
        bytes.extend_from_slice(Hash256::from_str(hex_string)?.as_bytes());
    }

    Ok(bytes)
}

/// The JSON form of concatenated 32-byte hashes.
pub fn decode_vector256(bytes: &[u8]) -> Result<Value, XRPLBinaryCodecException> {
    if bytes.len() % HASH256_LENGTH != 0 {
        return Err(XRPLTypeException::InvalidHashLength {
            expected: HASH256_LENGTH,
            found: bytes.len() % HASH256_LENGTH,
        }
        .into());
    }

    let hashes = bytes
        .chunks(HASH256_LENGTH)
        .map(|chunk| Value::String(hex::encode_upper(chunk)))
        .collect();
    Ok(Value::Array(hashes))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_vector256_round_trip() {
        let value = serde_json::json!([
            "73734B611DDA23D3F5F62E20A173B78AB8406AC5015094DA53F53D39B9EDB06C",
            "0000000000000000000000000000000000000000000000000000000000000001",
        ]);
        let encoded = encode_vector256("Indexes", &value).unwrap();
        assert_eq!(encoded.len(), 64);
        assert_eq!(decode_vector256(&encoded).unwrap(), value);
    }

    #[test]
    fn test_vector256_rejects_ragged_bytes() {
        assert!(decode_vector256(&[0u8; 33]).is_err());
    }
}
