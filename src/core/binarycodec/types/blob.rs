//! Codec for variable-length binary fields.

use serde_json::Value;

use crate::core::binarycodec::exceptions::XRPLBinaryCodecException;

use super::exceptions::XRPLTypeException;

/// Serializes a hex-string JSON value into raw bytes. The VL prefix
/// is the serializer's concern.
pub fn encode_blob(field: &str, value: &Value) -> Result<Vec<u8>, XRPLBinaryCodecException> {
    let hex_string = value
        .as_str()
        .ok_or_else(|| XRPLTypeException::UnexpectedJsonType {
            field: field.to_string(),
            expected: "hex string",
        })?;

    Ok(hex::decode(hex_string)?)
}

/// The JSON form of blob bytes.
pub fn decode_blob(bytes: &[u8]) -> Value {
    Value::String(hex::encode_upper(bytes))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_blob_round_trip() {
        let value = Value::String("DEADBEEF".to_string());
        let encoded = encode_blob("Domain", &value).unwrap();
        assert_eq!(encoded, vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(decode_blob(&encoded), value);
    }

    #[test]
    fn test_blob_rejects_non_string() {
        assert!(encode_blob("Domain", &Value::Bool(true)).is_err());
    }
}
