//! Encodes and decodes field IDs.
//!
//! A field id is 1 byte when both codes are below 16, 2 bytes when
//! exactly one is, and 3 bytes when neither is.

use crate::core::binarycodec::binary_parser::BinaryParser;
use crate::core::binarycodec::exceptions::XRPLBinaryCodecException;
use crate::core::definitions::{
    get_field_header_from_name, FieldHeader, CODE_MAX_VALUE, CODE_MIN_VALUE,
};
use crate::utils::ToBytes;

/// Returns the unique field ID for a given field header.
pub fn encode_field_id(field_header: &FieldHeader) -> Result<Vec<u8>, XRPLBinaryCodecException> {
    let range = CODE_MIN_VALUE..=CODE_MAX_VALUE;

    if !range.contains(&field_header.field_code) {
        Err(XRPLBinaryCodecException::UnexpectedFieldCodeRange {
            min: CODE_MIN_VALUE as usize,
            max: CODE_MAX_VALUE as usize,
        })
    } else if !range.contains(&field_header.type_code) {
        Err(XRPLBinaryCodecException::UnexpectedTypeCodeRange {
            min: CODE_MIN_VALUE as usize,
            max: CODE_MAX_VALUE as usize,
        })
    } else {
        Ok(field_header.to_bytes())
    }
}

/// Returns the unique field ID for a given field name.
pub fn encode(field_name: &str) -> Result<Vec<u8>, XRPLBinaryCodecException> {
    let field_header = get_field_header_from_name(field_name)
        .ok_or_else(|| XRPLBinaryCodecException::UnknownFieldName(field_name.to_string()))?;

    encode_field_id(&field_header)
}

/// Returns the field header for a serialized field ID.
pub fn decode(field_id: &[u8]) -> Result<FieldHeader, XRPLBinaryCodecException> {
    if !(1..=3).contains(&field_id.len()) {
        return Err(XRPLBinaryCodecException::UnexpectedFieldIdByteRange { min: 1, max: 3 });
    }

    let mut parser = BinaryParser::from(field_id);
    parser.read_field_header()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_encode_known_ids() {
        assert_eq!(encode("Account").unwrap(), vec![0x81]);
        assert_eq!(encode("Fee").unwrap(), vec![0x68]);
        assert_eq!(encode("Sequence").unwrap(), vec![0x24]);
        assert!(encode("NoSuchField").is_err());
    }

    #[test]
    fn test_field_id_round_trip() {
        for (type_code, field_code) in [(1, 1), (2, 25), (8, 1), (16, 1), (16, 16), (5, 17)] {
            let header = FieldHeader {
                type_code,
                field_code,
            };
            let encoded = encode_field_id(&header).unwrap();
            assert_eq!(decode(&encoded).unwrap(), header);
        }
    }
}
