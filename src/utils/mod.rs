//! Convenience utilities for the ledger core.

pub mod exceptions;
pub mod time_conversion;
pub mod xrpl_conversion;

pub use self::time_conversion::*;
pub use self::xrpl_conversion::*;

use crate::constants::*;
use regex::Regex;

/// Tests if value is a valid 3-char iso code.
///
/// # Examples
///
/// ## Basic usage
///
/// ```
/// use xrpld::utils::is_iso_code;
///
/// assert!(is_iso_code("USD"));
/// ```
pub fn is_iso_code(value: &str) -> bool {
    let regex = Regex::new(ISO_CURRENCY_REGEX).expect("is_iso_code");
    regex.is_match(value)
}

/// Tests if value is a valid 40-char hex currency string.
///
/// # Examples
///
/// ## Basic usage
///
/// ```
/// use xrpld::utils::is_iso_hex;
///
/// assert!(is_iso_hex("0000000000000000000000005553440000000000"));
/// ```
pub fn is_iso_hex(value: &str) -> bool {
    let regex = Regex::new(HEX_CURRENCY_REGEX).expect("is_iso_hex");
    regex.is_match(value)
}

/// Converter to byte array with endianness.
pub trait ToBytes {
    /// Return the byte array of self.
    fn to_bytes(&self) -> Vec<u8>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_is_iso_code() {
        assert!(is_iso_code("ABC"));
        assert!(is_iso_code("123"));
        assert!(!is_iso_code("LONG"));
        assert!(!is_iso_code("NO"));
    }

    #[test]
    fn test_is_iso_hex() {
        assert!(is_iso_hex("0000000000000000000000005553440000000000"));
        assert!(!is_iso_hex("USD0000000000000000000005553440000000000"));
        assert!(!is_iso_hex("1234"));
    }
}
