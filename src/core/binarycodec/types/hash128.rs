//! Codec for a 128-bit hash (the EmailHash field).

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::exceptions::XRPLTypeException;

pub const HASH128_LENGTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash128(pub [u8; HASH128_LENGTH]);

impl Hash128 {
    pub const ZERO: Hash128 = Hash128([0u8; HASH128_LENGTH]);

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, XRPLTypeException> {
        let buffer: [u8; HASH128_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| XRPLTypeException::InvalidHashLength {
                    expected: HASH128_LENGTH,
                    found: bytes.len(),
                })?;
        Ok(Hash128(buffer))
    }

    pub fn is_zero(&self) -> bool {
        *self == Hash128::ZERO
    }
}

impl fmt::Display for Hash128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

impl FromStr for Hash128 {
    type Err = XRPLTypeException;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Hash128::from_bytes(&hex::decode(value)?)
    }
}

impl Serialize for Hash128 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Hash128 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Hash128::from_str(&value).map_err(serde::de::Error::custom)
    }
}
