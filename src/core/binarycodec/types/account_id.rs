//! Codec for the 20-byte account identifier.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::ACCOUNT_ID_LENGTH;
use crate::core::addresscodec::{decode_classic_address, encode_classic_address};
use crate::utils::is_iso_hex;

use super::exceptions::XRPLTypeException;

/// A 20-byte opaque account identifier derived from a public key.
/// The zero value is invalid as a transaction party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AccountId(pub [u8; ACCOUNT_ID_LENGTH]);

impl AccountId {
    pub const ZERO: AccountId = AccountId([0u8; ACCOUNT_ID_LENGTH]);

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, XRPLTypeException> {
        let buffer: [u8; ACCOUNT_ID_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| XRPLTypeException::InvalidAccount(format!(
                    "expected {ACCOUNT_ID_LENGTH} bytes, found {}",
                    bytes.len()
                )))?;
        Ok(AccountId(buffer))
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LENGTH] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == AccountId::ZERO
    }

    /// The classic address form.
    pub fn to_address(&self) -> String {
        encode_classic_address(&self.0).expect("20-byte account ids always encode")
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_address())
    }
}

impl FromStr for AccountId {
    type Err = XRPLTypeException;

    /// Accepts the classic address form or the raw 40-character hex
    /// form.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if is_iso_hex(value) {
            AccountId::from_bytes(&hex::decode(value)?)
        } else {
            let decoded = decode_classic_address(value)
                .map_err(|err| XRPLTypeException::InvalidAccount(err.to_string()))?;
            AccountId::from_bytes(&decoded)
        }
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_address())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        AccountId::from_str(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ADDRESS: &str = "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb";

    #[test]
    fn test_address_round_trip() {
        let account: AccountId = ADDRESS.parse().unwrap();
        assert_eq!(account.to_address(), ADDRESS);
    }

    #[test]
    fn test_hex_form() {
        let account: AccountId = ADDRESS.parse().unwrap();
        let hex_form = hex::encode_upper(account.as_bytes());
        assert_eq!(hex_form.parse::<AccountId>().unwrap(), account);
    }

    #[test]
    fn test_invalid_input() {
        assert!("not-an-address".parse::<AccountId>().is_err());
        assert!(AccountId::from_bytes(&[1u8; 19]).is_err());
    }
}
