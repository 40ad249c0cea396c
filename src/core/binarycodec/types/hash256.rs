//! Codec for a 256-bit hash: ledger indices, tree keys, transaction
//! ids and parent links.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::exceptions::XRPLTypeException;

pub const HASH256_LENGTH: usize = 32;

/// A 32-byte opaque identifier. Equality is bitwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash256(pub [u8; HASH256_LENGTH]);

impl Hash256 {
    pub const ZERO: Hash256 = Hash256([0u8; HASH256_LENGTH]);

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, XRPLTypeException> {
        let buffer: [u8; HASH256_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| XRPLTypeException::InvalidHashLength {
                    expected: HASH256_LENGTH,
                    found: bytes.len(),
                })?;
        Ok(Hash256(buffer))
    }

    pub fn as_bytes(&self) -> &[u8; HASH256_LENGTH] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Hash256::ZERO
    }

    /// The key nibble selecting the branch at a given tree depth.
    pub fn nibble(&self, depth: usize) -> usize {
        let byte = self.0[depth / 2];
        if depth % 2 == 0 {
            (byte >> 4) as usize
        } else {
            (byte & 0x0F) as usize
        }
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

impl FromStr for Hash256 {
    type Err = XRPLTypeException;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Hash256::from_bytes(&hex::decode(value)?)
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Hash256::from_str(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_round_trip() {
        let hex_str = "73734B611DDA23D3F5F62E20A173B78AB8406AC5015094DA53F53D39B9EDB06C";
        let hash: Hash256 = hex_str.parse().unwrap();
        assert_eq!(hash.to_string(), hex_str);
    }

    #[test]
    fn test_length_check() {
        assert!(Hash256::from_bytes(&[0u8; 31]).is_err());
        assert!("AB".parse::<Hash256>().is_err());
    }

    #[test]
    fn test_nibbles() {
        let hash: Hash256 = "F0A5000000000000000000000000000000000000000000000000000000000000"
            .parse()
            .unwrap();
        assert_eq!(hash.nibble(0), 0xF);
        assert_eq!(hash.nibble(1), 0x0);
        assert_eq!(hash.nibble(2), 0xA);
        assert_eq!(hash.nibble(3), 0x5);
    }
}
