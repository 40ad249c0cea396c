//! Canonical serialization of field trees (STObject) and field arrays
//! (STArray).
//!
//! Objects serialize their fields in ascending ordinal order and omit
//! absent optionals; any reordering changes the transaction hash and
//! invalidates signatures, so fields are sorted before writing rather
//! than trusting insertion order.

use core::str::FromStr;

use serde_json::{Map, Value};

use crate::core::binarycodec::binary_parser::BinaryParser;
use crate::core::binarycodec::binary_serializer::{BinarySerializer, Serialization};
use crate::core::binarycodec::exceptions::XRPLBinaryCodecException;
use crate::core::definitions::{
    get_field_instance, get_ledger_entry_type_code, get_ledger_entry_type_name,
    get_transaction_type_code, get_transaction_type_name, FieldInstance,
};
use crate::utils::ToBytes;

use super::account_id::AccountId;
use super::amount::{decode_amount, encode_amount};
use super::blob::{decode_blob, encode_blob};
use super::currency::Currency;
use super::exceptions::XRPLTypeException;
use super::hash128::Hash128;
use super::hash160::Hash160;
use super::hash256::Hash256;
use super::issue::Issue;
use super::vector256::{decode_vector256, encode_vector256};

const OBJECT_END_MARKER: &str = "ObjectEndMarker";
const ARRAY_END_MARKER: &str = "ArrayEndMarker";

/// Serializes a JSON object's fields in canonical order. The top
/// level carries no end marker.
pub fn encode_object(
    value: &Value,
    signing_only: bool,
) -> Result<Vec<u8>, XRPLBinaryCodecException> {
    let object = value
        .as_object()
        .ok_or_else(|| XRPLTypeException::UnexpectedJsonType {
            field: "STObject".to_string(),
            expected: "object",
        })?;

    let mut serializer = BinarySerializer::new();
    encode_object_fields(object, signing_only, &mut serializer)?;
    Ok(serializer)
}

fn encode_object_fields(
    object: &Map<String, Value>,
    signing_only: bool,
    serializer: &mut BinarySerializer,
) -> Result<(), XRPLBinaryCodecException> {
    let mut sorted_fields: Vec<FieldInstance> = Vec::new();
    for field_name in object.keys() {
        if object
            .get(field_name)
            .map(Value::is_null)
            .unwrap_or(true)
        {
            continue;
        }

        let instance = get_field_instance(field_name).ok_or_else(|| {
            XRPLBinaryCodecException::UnknownFieldName(field_name.to_string())
        })?;
        if instance.is_serialized {
            sorted_fields.push(instance);
        }
    }
    sorted_fields.sort_by_key(|field| field.ordinal);

    if signing_only {
        sorted_fields.retain(|field| field.is_signing);
    }

    for instance in sorted_fields {
        let associated_value = &object[&instance.name];
        let value_bytes = encode_field_value(&instance, associated_value, signing_only)?;
        serializer.write_field_and_value(&instance, &value_bytes)?;
    }

    Ok(())
}

/// Serializes one field's value bytes according to its associated
/// type. VL prefixing is left to the serializer.
fn encode_field_value(
    instance: &FieldInstance,
    value: &Value,
    signing_only: bool,
) -> Result<Vec<u8>, XRPLBinaryCodecException> {
    let type_mismatch = |expected: &'static str| {
        XRPLBinaryCodecException::from(XRPLTypeException::UnexpectedJsonType {
            field: instance.name.clone(),
            expected,
        })
    };

    match instance.associated_type.as_str() {
        "UInt8" => {
            let number = value.as_u64().ok_or_else(|| type_mismatch("number"))?;
            Ok(vec![u8::try_from(number).map_err(|_| type_mismatch("u8"))?])
        }
        "UInt16" => {
            let number = match (value.as_u64(), value.as_str()) {
                (Some(number), _) => number,
                (None, Some(name)) if instance.name == "TransactionType" => {
                    get_transaction_type_code(name)
                        .ok_or_else(|| type_mismatch("transaction type"))?
                        as u64
                }
                (None, Some(name)) if instance.name == "LedgerEntryType" => {
                    get_ledger_entry_type_code(name)
                        .ok_or_else(|| type_mismatch("ledger entry type"))?
                        as u64
                }
                _ => return Err(type_mismatch("number")),
            };
            Ok((u16::try_from(number).map_err(|_| type_mismatch("u16"))?)
                .to_be_bytes()
                .to_vec())
        }
        "UInt32" => {
            let number = value.as_u64().ok_or_else(|| type_mismatch("number"))?;
            Ok((u32::try_from(number).map_err(|_| type_mismatch("u32"))?)
                .to_be_bytes()
                .to_vec())
        }
        "UInt64" => {
            let number = match (value.as_u64(), value.as_str()) {
                (Some(number), _) => number,
                (None, Some(hex_string)) => u64::from_str_radix(hex_string, 16)
                    .map_err(|_| type_mismatch("hex string"))?,
                _ => return Err(type_mismatch("hex string")),
            };
            Ok(number.to_be_bytes().to_vec())
        }
        "Hash128" => {
            let hash = value.as_str().ok_or_else(|| type_mismatch("hex string"))?;
            Ok(Hash128::from_str(hash)?.0.to_vec())
        }
        "Hash160" => {
            let hash = value.as_str().ok_or_else(|| type_mismatch("hex string"))?;
            Ok(Hash160::from_str(hash)?.0.to_vec())
        }
        "Hash256" => {
            let hash = value.as_str().ok_or_else(|| type_mismatch("hex string"))?;
            Ok(Hash256::from_str(hash)?.0.to_vec())
        }
        "AccountID" => {
            let address = value.as_str().ok_or_else(|| type_mismatch("address"))?;
            Ok(AccountId::from_str(address)?.0.to_vec())
        }
        "Amount" => encode_amount(value),
        "Blob" => encode_blob(&instance.name, value),
        "Vector256" => encode_vector256(&instance.name, value),
        "Issue" => {
            let issue: Issue = serde_json::from_value(value.clone())
                .map_err(|_| type_mismatch("issue object"))?;
            issue.validate()?;

            let mut bytes = issue.currency.as_bytes().to_vec();
            if let Some(issuer) = issue.issuer {
                bytes.extend_from_slice(issuer.as_bytes());
            }
            Ok(bytes)
        }
        "STObject" => {
            let object = value.as_object().ok_or_else(|| type_mismatch("object"))?;
            let mut serializer = BinarySerializer::new();
            encode_object_fields(object, signing_only, &mut serializer)?;
            let end_marker = get_field_instance(OBJECT_END_MARKER)
                .expect("catalogue always carries the object end marker");
            serializer.extend_from_slice(&end_marker.header.to_bytes());
            Ok(serializer)
        }
        "STArray" => {
            let items = value.as_array().ok_or_else(|| type_mismatch("array"))?;
            let mut serializer = BinarySerializer::new();

            for item in items {
                let wrapper = item
                    .as_object()
                    .filter(|map| map.len() == 1)
                    .ok_or_else(|| type_mismatch("array of single-key objects"))?;
                let (inner_name, inner_value) =
                    wrapper.iter().next().expect("len checked above");
                let inner_instance = get_field_instance(inner_name).ok_or_else(|| {
                    XRPLBinaryCodecException::UnknownFieldName(inner_name.to_string())
                })?;
                let inner_bytes =
                    encode_field_value(&inner_instance, inner_value, signing_only)?;
                serializer.write_field_and_value(&inner_instance, &inner_bytes)?;
            }

            let end_marker = get_field_instance(ARRAY_END_MARKER)
                .expect("catalogue always carries the array end marker");
            serializer.extend_from_slice(&end_marker.header.to_bytes());
            Ok(serializer)
        }
        other => Err(XRPLBinaryCodecException::UnsupportedValue {
            field: instance.name.clone(),
            found: other.to_string(),
        }),
    }
}

/// Deserializes fields into a JSON object. Nested objects run to
/// their end marker; the top level runs to the end of input.
pub fn decode_object(
    parser: &mut BinaryParser,
    nested: bool,
) -> Result<Value, XRPLBinaryCodecException> {
    let mut object = Map::new();

    loop {
        if parser.is_end() {
            if nested {
                return Err(XRPLBinaryCodecException::UnexpectedEndOfBytes);
            }
            break;
        }

        let instance = parser.read_field()?;
        if instance.name == OBJECT_END_MARKER {
            if nested {
                break;
            }
            return Err(XRPLBinaryCodecException::UnknownFieldHeader(
                "unexpected object end marker".to_string(),
            ));
        }

        let value = decode_field_value(parser, &instance)?;
        object.insert(instance.name, value);
    }

    Ok(Value::Object(object))
}

fn decode_field_value(
    parser: &mut BinaryParser,
    instance: &FieldInstance,
) -> Result<Value, XRPLBinaryCodecException> {
    if instance.is_vl_encoded {
        let bytes = parser.read_length_encoded()?;
        return match instance.associated_type.as_str() {
            "Blob" => Ok(decode_blob(&bytes)),
            "AccountID" => Ok(Value::String(AccountId::from_bytes(&bytes)?.to_address())),
            "Vector256" => decode_vector256(&bytes),
            other => Err(XRPLBinaryCodecException::UnsupportedValue {
                field: instance.name.clone(),
                found: other.to_string(),
            }),
        };
    }

    match instance.associated_type.as_str() {
        "UInt8" => Ok(Value::from(parser.read_uint8()?)),
        "UInt16" => {
            let number = parser.read_uint16()?;
            let named = match instance.name.as_str() {
                "TransactionType" => get_transaction_type_name(number as i16),
                "LedgerEntryType" => get_ledger_entry_type_name(number as i16),
                _ => None,
            };
            Ok(match named {
                Some(name) => Value::String(name.to_string()),
                None => Value::from(number),
            })
        }
        "UInt32" => Ok(Value::from(parser.read_uint32()?)),
        "UInt64" => Ok(Value::String(format!("{:016X}", parser.read_uint64()?))),
        "Hash128" => Ok(Value::String(hex::encode_upper(parser.read(16)?))),
        "Hash160" => Ok(Value::String(hex::encode_upper(parser.read(20)?))),
        "Hash256" => Ok(Value::String(hex::encode_upper(parser.read(32)?))),
        "Amount" => decode_amount(parser),
        "Issue" => {
            let currency = Currency::from_bytes(&parser.read(20)?)?;
            let issue = if currency.is_xrp() {
                Issue::xrp()
            } else {
                Issue::issued(currency, AccountId::from_bytes(&parser.read(20)?)?)
            };
            Ok(serde_json::to_value(issue)
                .expect("issue serialization is infallible"))
        }
        "STObject" => decode_object(parser, true),
        "STArray" => {
            let mut items = Vec::new();
            loop {
                let inner = parser.read_field()?;
                if inner.name == ARRAY_END_MARKER {
                    break;
                }
                let inner_value = decode_object(parser, true)?;
                let mut wrapper = Map::new();
                wrapper.insert(inner.name, inner_value);
                items.push(Value::Object(wrapper));
            }
            Ok(Value::Array(items))
        }
        other => Err(XRPLBinaryCodecException::UnsupportedValue {
            field: instance.name.clone(),
            found: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn round_trip(json: Value) {
        let encoded = encode_object(&json, false).unwrap();
        let mut parser = BinaryParser::new(encoded);
        assert_eq!(decode_object(&mut parser, false).unwrap(), json);
    }

    #[test]
    fn test_flat_object_round_trip() {
        round_trip(serde_json::json!({
            "Account": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
            "Fee": "10",
            "Flags": 0u32,
            "Sequence": 5u32,
            "TransactionType": "AccountSet",
        }));
    }

    #[test]
    fn test_nested_array_round_trip() {
        round_trip(serde_json::json!({
            "Account": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
            "Memos": [
                {"Memo": {"MemoData": "0102", "MemoType": "74657374"}},
            ],
            "TransactionType": "Payment",
        }));
    }

    #[test]
    fn test_canonical_ordering_is_insertion_independent() {
        let a = serde_json::json!({
            "Account": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
            "Fee": "10",
            "Sequence": 5u32,
        });
        // serde_json's map is ordered; build the same object the
        // other way around.
        let mut reversed = Map::new();
        reversed.insert("Sequence".to_string(), Value::from(5u32));
        reversed.insert("Fee".to_string(), Value::String("10".to_string()));
        reversed.insert(
            "Account".to_string(),
            Value::String("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".to_string()),
        );

        assert_eq!(
            encode_object(&a, false).unwrap(),
            encode_object(&Value::Object(reversed), false).unwrap()
        );
    }

    #[test]
    fn test_signing_only_strips_signature_fields() {
        let signed = serde_json::json!({
            "Account": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
            "SigningPubKey": "03AB40A0490F9B7ED8DF29D246BF2D6269820A0EE7742ACDD457BEA7C7D0931EDB",
            "TxnSignature": "DEADBEEF",
        });
        let unsigned = serde_json::json!({
            "Account": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
            "SigningPubKey": "03AB40A0490F9B7ED8DF29D246BF2D6269820A0EE7742ACDD457BEA7C7D0931EDB",
        });

        assert_eq!(
            encode_object(&signed, true).unwrap(),
            encode_object(&unsigned, false).unwrap()
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let json = serde_json::json!({"TotallyMadeUp": 1});
        assert!(encode_object(&json, false).is_err());
    }
}
