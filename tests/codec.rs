//! Wire-level vectors: length prefixes, field ids and canonical
//! transaction encoding.

use serde_json::json;

use xrpld::core::binarycodec::binary_parser::BinaryParser;
use xrpld::core::binarycodec::binary_serializer::encode_variable_length_prefix;
use xrpld::core::binarycodec::field_id_codec;
use xrpld::core::binarycodec::{decode, encode, encode_for_signing, transaction_hash};

#[test]
fn variable_length_prefix_vectors() {
    let cases: &[(usize, &str)] = &[
        (0, "00"),
        (192, "C0"),
        (193, "C100"),
        (12479, "F0FE"),
        (12480, "F0FF"),
        (12481, "F10000"),
        (918744, "FED417"),
    ];
    for (length, expected) in cases {
        assert_eq!(
            hex::encode_upper(encode_variable_length_prefix(*length).unwrap()),
            *expected,
            "length {length}"
        );
    }

    assert!(encode_variable_length_prefix(918745).is_err());
}

#[test]
fn variable_length_round_trip() {
    for length in [0usize, 1, 191, 192, 193, 5000, 12480, 12481, 600000, 918744] {
        let encoded = encode_variable_length_prefix(length).unwrap();
        let mut parser = BinaryParser::new(encoded);
        assert_eq!(parser.read_length_prefix().unwrap(), length);
    }
}

#[test]
fn field_id_vectors() {
    assert_eq!(hex::encode_upper(field_id_codec::encode("Account").unwrap()), "81");
    assert_eq!(hex::encode_upper(field_id_codec::encode("Fee").unwrap()), "68");
    assert_eq!(
        hex::encode_upper(field_id_codec::encode("Sequence").unwrap()),
        "24"
    );
}

#[test]
fn field_id_round_trip() {
    use xrpld::core::definitions::FieldHeader;

    for (type_code, field_code) in [(1, 1), (2, 4), (8, 1), (15, 9), (16, 16), (17, 3)] {
        let header = FieldHeader {
            type_code,
            field_code,
        };
        let encoded = field_id_codec::encode_field_id(&header).unwrap();
        assert_eq!(field_id_codec::decode(&encoded).unwrap(), header);
    }
}

fn sample_payment() -> serde_json::Value {
    json!({
        "Account": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
        "Amount": "25000000",
        "Destination": "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn",
        "Fee": "10",
        "Flags": 0u32,
        "Sequence": 4u32,
        "SigningPubKey": "03AB40A0490F9B7ED8DF29D246BF2D6269820A0EE7742ACDD457BEA7C7D0931EDB",
        "TransactionType": "Payment",
        "TxnSignature": "0123ABCD",
    })
}

#[test]
fn transaction_encode_decode_round_trip() {
    let tx = sample_payment();
    let encoded = encode(&tx).unwrap();
    assert_eq!(decode(&encoded).unwrap(), tx);
}

#[test]
fn canonical_encoding_is_field_order_independent() {
    // The same fields assembled in a different textual order encode
    // identically: the serializer sorts by ordinal before writing.
    let scrambled: serde_json::Value = serde_json::from_str(
        r#"{
            "TxnSignature": "0123ABCD",
            "TransactionType": "Payment",
            "SigningPubKey": "03AB40A0490F9B7ED8DF29D246BF2D6269820A0EE7742ACDD457BEA7C7D0931EDB",
            "Sequence": 4,
            "Flags": 0,
            "Fee": "10",
            "Destination": "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn",
            "Amount": "25000000",
            "Account": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb"
        }"#,
    )
    .unwrap();

    assert_eq!(encode(&sample_payment()).unwrap(), encode(&scrambled).unwrap());
}

#[test]
fn signing_payload_excludes_signature_fields() {
    let tx = sample_payment();
    let mut unsigned = tx.clone();
    unsigned.as_object_mut().unwrap().remove("TxnSignature");

    assert_eq!(
        encode_for_signing(&tx).unwrap(),
        encode_for_signing(&unsigned).unwrap()
    );
}

#[test]
fn transaction_hash_changes_with_any_field() {
    let tx = sample_payment();
    let base = transaction_hash(&tx).unwrap();

    let mut changed = tx.clone();
    changed["Sequence"] = json!(5u32);
    assert_ne!(transaction_hash(&changed).unwrap(), base);

    assert_eq!(transaction_hash(&tx).unwrap(), base);
}

#[test]
fn issued_amount_and_memos_round_trip() {
    let tx = json!({
        "Account": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
        "Amount": {
            "currency": "USD",
            "issuer": "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn",
            "value": "123.456",
        },
        "Destination": "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn",
        "Memos": [
            {"Memo": {"MemoData": "DEADBEEF", "MemoType": "746573"}},
        ],
        "TransactionType": "Payment",
    });

    let encoded = encode(&tx).unwrap();
    assert_eq!(decode(&encoded).unwrap(), tx);
}
