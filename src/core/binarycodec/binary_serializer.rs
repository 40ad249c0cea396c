//! Serializes field trees into the ledger's canonical binary format.

use crate::core::binarycodec::exceptions::XRPLBinaryCodecException;
use crate::core::binarycodec::utils::{
    MAX_DOUBLE_BYTE_LENGTH, MAX_LENGTH_VALUE, MAX_SECOND_BYTE_VALUE, MAX_SINGLE_BYTE_LENGTH,
};
use crate::core::definitions::FieldInstance;
use crate::utils::ToBytes;

/// Accumulates canonical bytes.
pub type BinarySerializer = Vec<u8>;

/// Helper for length-prefixed fields including Blob types and some
/// AccountID types. Calculates the prefix of variable length bytes.
///
/// The length of the prefix is 1-3 bytes depending on the length of
/// the contents:
/// Content length <= 192 bytes: prefix is 1 byte
/// 192 bytes < Content length <= 12480 bytes: prefix is 2 bytes
/// 12480 bytes < Content length <= 918744 bytes: prefix is 3 bytes
pub fn encode_variable_length_prefix(length: usize) -> Result<Vec<u8>, XRPLBinaryCodecException> {
    if length <= MAX_SINGLE_BYTE_LENGTH {
        Ok(vec![length as u8])
    } else if length <= MAX_DOUBLE_BYTE_LENGTH {
        let b_length = length - (MAX_SINGLE_BYTE_LENGTH + 1);
        Ok(vec![
            ((b_length >> 8) + MAX_SINGLE_BYTE_LENGTH + 1) as u8,
            (b_length & 0xFF) as u8,
        ])
    } else if length <= MAX_LENGTH_VALUE {
        let b_length = length - (MAX_DOUBLE_BYTE_LENGTH + 1);
        Ok(vec![
            ((b_length >> 16) + MAX_SECOND_BYTE_VALUE + 1) as u8,
            ((b_length >> 8) & 0xFF) as u8,
            (b_length & 0xFF) as u8,
        ])
    } else {
        Err(XRPLBinaryCodecException::InvalidVariableLengthTooLarge {
            max: MAX_LENGTH_VALUE,
        })
    }
}

pub trait Serialization {
    /// Write a variable length encoded value to the serializer.
    fn write_length_encoded(&mut self, value: &[u8]) -> Result<(), XRPLBinaryCodecException>;

    /// Write the field id followed by the value bytes, VL-prefixed
    /// when the field calls for it.
    fn write_field_and_value(
        &mut self,
        field: &FieldInstance,
        value: &[u8],
    ) -> Result<(), XRPLBinaryCodecException>;
}

impl Serialization for BinarySerializer {
    fn write_length_encoded(&mut self, value: &[u8]) -> Result<(), XRPLBinaryCodecException> {
        let length_prefix = encode_variable_length_prefix(value.len())?;

        self.extend_from_slice(&length_prefix);
        self.extend_from_slice(value);

        Ok(())
    }

    fn write_field_and_value(
        &mut self,
        field: &FieldInstance,
        value: &[u8],
    ) -> Result<(), XRPLBinaryCodecException> {
        self.extend_from_slice(&field.header.to_bytes());

        if field.is_vl_encoded {
            self.write_length_encoded(value)?;
        } else {
            self.extend_from_slice(value);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_encode_variable_length_prefix() {
        assert_eq!(encode_variable_length_prefix(0).unwrap(), vec![0x00]);
        assert_eq!(encode_variable_length_prefix(192).unwrap(), vec![0xC0]);
        assert_eq!(encode_variable_length_prefix(193).unwrap(), vec![0xC1, 0x00]);
        assert_eq!(
            encode_variable_length_prefix(12479).unwrap(),
            vec![0xF0, 0xFE]
        );
        assert_eq!(
            encode_variable_length_prefix(12480).unwrap(),
            vec![0xF0, 0xFF]
        );
        assert_eq!(
            encode_variable_length_prefix(12481).unwrap(),
            vec![0xF1, 0x00, 0x00]
        );
        assert_eq!(
            encode_variable_length_prefix(918744).unwrap(),
            vec![0xFE, 0xD4, 0x17]
        );
        assert!(encode_variable_length_prefix(918745).is_err());
    }
}
