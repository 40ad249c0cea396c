//! Codec for a 160-bit hash (order book currency and issuer slots).

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::exceptions::XRPLTypeException;

pub const HASH160_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash160(pub [u8; HASH160_LENGTH]);

impl Hash160 {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, XRPLTypeException> {
        let buffer: [u8; HASH160_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| XRPLTypeException::InvalidHashLength {
                    expected: HASH160_LENGTH,
                    found: bytes.len(),
                })?;
        Ok(Hash160(buffer))
    }
}

impl fmt::Display for Hash160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

impl FromStr for Hash160 {
    type Err = XRPLTypeException;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Hash160::from_bytes(&hex::decode(value)?)
    }
}

impl Serialize for Hash160 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Hash160 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Hash160::from_str(&value).map_err(serde::de::Error::custom)
    }
}
