//! Codec for the 160-bit currency code.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::CURRENCY_CODE_LENGTH;
use crate::utils::{is_iso_code, is_iso_hex};

use super::exceptions::XRPLTypeException;

/// ISO codes occupy bytes 12..15 of the 160-bit form.
const ISO_OFFSET: usize = 12;
/// LP-token currency codes always carry this leading byte.
pub const LP_TOKEN_LEADING_BYTE: u8 = 0x03;

/// A 160-bit currency code. The all-zero value is XRP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Currency(pub [u8; CURRENCY_CODE_LENGTH]);

impl Currency {
    pub const XRP: Currency = Currency([0u8; CURRENCY_CODE_LENGTH]);

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, XRPLTypeException> {
        let buffer: [u8; CURRENCY_CODE_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| XRPLTypeException::InvalidCurrency(format!(
                    "expected {CURRENCY_CODE_LENGTH} bytes, found {}",
                    bytes.len()
                )))?;
        Ok(Currency(buffer))
    }

    pub fn as_bytes(&self) -> &[u8; CURRENCY_CODE_LENGTH] {
        &self.0
    }

    pub fn is_xrp(&self) -> bool {
        *self == Currency::XRP
    }

    /// Whether the code renders as a 3-character ISO code.
    fn iso_code(&self) -> Option<String> {
        if self.0[..ISO_OFFSET].iter().any(|b| *b != 0)
            || self.0[ISO_OFFSET + 3..].iter().any(|b| *b != 0)
        {
            return None;
        }

        let iso: String = self.0[ISO_OFFSET..ISO_OFFSET + 3]
            .iter()
            .map(|b| *b as char)
            .collect();

        if is_iso_code(&iso) && iso != "XRP" {
            Some(iso)
        } else {
            None
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_xrp() {
            write!(f, "XRP")
        } else if let Some(iso) = self.iso_code() {
            write!(f, "{iso}")
        } else {
            write!(f, "{}", hex::encode_upper(self.0))
        }
    }
}

impl FromStr for Currency {
    type Err = XRPLTypeException;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "XRP" {
            Ok(Currency::XRP)
        } else if is_iso_code(value) {
            let mut buffer = [0u8; CURRENCY_CODE_LENGTH];
            buffer[ISO_OFFSET..ISO_OFFSET + 3].copy_from_slice(value.as_bytes());
            Ok(Currency(buffer))
        } else if is_iso_hex(value) {
            Currency::from_bytes(&hex::decode(value)?)
        } else {
            Err(XRPLTypeException::InvalidCurrency(value.to_string()))
        }
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Currency::from_str(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_iso_round_trip() {
        let usd: Currency = "USD".parse().unwrap();
        assert_eq!(usd.to_string(), "USD");
        assert!(!usd.is_xrp());
    }

    #[test]
    fn test_xrp() {
        let xrp: Currency = "XRP".parse().unwrap();
        assert!(xrp.is_xrp());
        assert_eq!(xrp.to_string(), "XRP");
    }

    #[test]
    fn test_hex_code_round_trip() {
        let hex_code = "0373734B611DDA23D3F5F62E20A173B78AB8406A";
        let currency: Currency = hex_code.parse().unwrap();
        assert_eq!(currency.to_string(), hex_code);
    }

    #[test]
    fn test_nonstandard_iso_bytes_render_as_hex() {
        // "XRP" spelled out in the ISO slot is not a valid 160-bit code.
        let mut buffer = [0u8; CURRENCY_CODE_LENGTH];
        buffer[12..15].copy_from_slice(b"XRP");
        let currency = Currency(buffer);
        assert_eq!(currency.to_string(), hex::encode_upper(buffer));
    }
}
