//! Codec for amount fields: XRP drops or an issued-currency value,
//! and the protocol's normalized decimal representation.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde_json::{Map, Value};

use crate::constants::MAX_DROPS;
use crate::core::binarycodec::binary_parser::BinaryParser;
use crate::core::binarycodec::exceptions::XRPLBinaryCodecException;

use super::account_id::AccountId;
use super::currency::Currency;
use super::exceptions::XRPLTypeException;

/// High bit of the leading byte distinguishes issued amounts from XRP.
const NOT_XRP_BIT_MASK: u64 = 0x8000_0000_0000_0000;
/// Second-highest bit is the sign; set means positive.
const POS_SIGN_BIT_MASK: u64 = 0x4000_0000_0000_0000;
const MANTISSA_MASK: u64 = (1 << 54) - 1;
const DROPS_MASK: u64 = 0x3FFF_FFFF_FFFF_FFFF;

/// Exponent bias on the wire.
const EXPONENT_BIAS: i32 = 97;

pub const MIN_MANTISSA: i64 = 1_000_000_000_000_000;
pub const MAX_MANTISSA: i64 = 9_999_999_999_999_999;
pub const MIN_EXPONENT: i32 = -96;
pub const MAX_EXPONENT: i32 = 80;

/// An issued-currency decimal: a signed 16-digit mantissa and an
/// exponent in [-96, 80]. Zero has the canonical all-zero form.
/// Results are renormalized so the mantissa magnitude lies in
/// [10^15, 10^16) unless zero; overflow fails, underflow collapses
/// to zero. Rounding is directed (toward zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuedValue {
    mantissa: i64,
    exponent: i32,
}

impl IssuedValue {
    pub const ZERO: IssuedValue = IssuedValue {
        mantissa: 0,
        exponent: 0,
    };

    /// Normalize a raw mantissa/exponent pair.
    pub fn new(mantissa: i128, exponent: i32) -> Result<Self, XRPLTypeException> {
        let negative = mantissa < 0;
        let mut mantissa = mantissa.unsigned_abs();
        let mut exponent = exponent;

        if mantissa == 0 {
            return Ok(IssuedValue::ZERO);
        }

        while mantissa < MIN_MANTISSA as u128 {
            if exponent <= MIN_EXPONENT {
                // Underflow collapses to the canonical zero.
                return Ok(IssuedValue::ZERO);
            }
            mantissa *= 10;
            exponent -= 1;
        }

        while mantissa > MAX_MANTISSA as u128 {
            if exponent >= MAX_EXPONENT {
                return Err(XRPLTypeException::InvalidAmount(
                    "issued-currency amount overflow".to_string(),
                ));
            }
            mantissa /= 10;
            exponent += 1;
        }

        if exponent > MAX_EXPONENT {
            return Err(XRPLTypeException::InvalidAmount(
                "issued-currency exponent out of range".to_string(),
            ));
        }

        let mantissa = if negative {
            -(mantissa as i64)
        } else {
            mantissa as i64
        };

        Ok(IssuedValue { mantissa, exponent })
    }

    pub fn mantissa(&self) -> i64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa < 0
    }

    pub fn negate(&self) -> Self {
        IssuedValue {
            mantissa: -self.mantissa,
            exponent: self.exponent,
        }
    }
}

impl FromStr for IssuedValue {
    type Err = XRPLTypeException;

    /// Parses a decimal string, with an optional fraction and
    /// scientific exponent.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let bad =
            |reason: &str| XRPLTypeException::InvalidAmount(format!("`{value}`: {reason}"));

        let (body, explicit_exponent) = match value.find(['e', 'E']) {
            Some(position) => {
                let explicit: i32 = value[position + 1..]
                    .parse()
                    .map_err(|_| bad("malformed exponent"))?;
                (&value[..position], explicit)
            }
            None => (value, 0),
        };

        let (body, negative) = match body.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (body.strip_prefix('+').unwrap_or(body), false),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (body, ""),
        };

        if body.is_empty()
            || (int_part.is_empty() && frac_part.is_empty())
            || int_part.bytes().any(|b| !b.is_ascii_digit())
            || frac_part.bytes().any(|b| !b.is_ascii_digit())
        {
            return Err(bad("not a decimal number"));
        }

        let mut digits: String = format!("{int_part}{frac_part}");
        let mut exponent = explicit_exponent
            .checked_sub(frac_part.len() as i32)
            .ok_or_else(|| bad("exponent overflow"))?;

        // Leading zeros carry no information; trailing digits beyond
        // the 16-digit precision are dropped toward zero.
        let digits_trimmed = digits.trim_start_matches('0');
        digits = digits_trimmed.to_string();
        if digits.len() > 17 {
            let excess = digits.len() - 17;
            exponent += excess as i32;
            digits.truncate(17);
        }

        let mantissa: i128 = if digits.is_empty() {
            0
        } else {
            digits.parse().map_err(|_| bad("not a decimal number"))?
        };

        IssuedValue::new(if negative { -mantissa } else { mantissa }, exponent)
    }
}

impl fmt::Display for IssuedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mantissa == 0 {
            return write!(f, "0");
        }

        if self.mantissa < 0 {
            write!(f, "-")?;
        }

        let mut digits = self.mantissa.unsigned_abs().to_string();
        let mut exponent = self.exponent;

        while digits.len() > 1 && digits.ends_with('0') {
            digits.pop();
            exponent += 1;
        }

        // Decimal point position relative to the digit string.
        let point = digits.len() as i32 + exponent;

        if exponent >= 0 && point <= 17 {
            write!(f, "{}{}", digits, "0".repeat(exponent as usize))
        } else if exponent < 0 && point > 0 {
            let (int_part, frac_part) = digits.split_at(point as usize);
            write!(f, "{int_part}.{frac_part}")
        } else if exponent < 0 && point > -6 {
            write!(f, "0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
        } else if digits.len() == 1 {
            write!(f, "{digits}e{}", point - 1)
        } else {
            let (head, tail) = digits.split_at(1);
            write!(f, "{head}.{tail}e{}", point - 1)
        }
    }
}

impl PartialOrd for IssuedValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IssuedValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.mantissa.signum(), other.mantissa.signum()) {
            (a, b) if a != b => a.cmp(&b),
            (0, 0) => Ordering::Equal,
            (sign, _) => {
                // Same sign, both non-zero: compare magnitudes.
                let magnitude = match self.exponent.cmp(&other.exponent) {
                    Ordering::Equal => self.mantissa.abs().cmp(&other.mantissa.abs()),
                    ordering => ordering,
                };
                if sign < 0 {
                    magnitude.reverse()
                } else {
                    magnitude
                }
            }
        }
    }
}

/// Serializes a JSON amount into its 8- or 48-byte wire form.
pub fn encode_amount(value: &Value) -> Result<Vec<u8>, XRPLBinaryCodecException> {
    match value {
        Value::String(drops) => {
            let drops: i64 = drops.parse().map_err(|_| {
                XRPLTypeException::InvalidAmount(format!("`{drops}` is not drops"))
            })?;
            if drops.abs() > MAX_DROPS {
                return Err(XRPLTypeException::InvalidAmount(
                    "drops magnitude out of range".to_string(),
                )
                .into());
            }

            let mut word = drops.unsigned_abs() & DROPS_MASK;
            if drops >= 0 {
                word |= POS_SIGN_BIT_MASK;
            }
            Ok(word.to_be_bytes().to_vec())
        }
        Value::Object(object) => {
            let currency: Currency = expect_str(object, "currency")?.parse()?;
            if currency.is_xrp() {
                return Err(XRPLTypeException::InvalidAmount(
                    "an issued amount cannot use the currency XRP".to_string(),
                )
                .into());
            }
            let issuer: AccountId = expect_str(object, "issuer")?.parse()?;
            let issued: IssuedValue = expect_str(object, "value")?.parse()?;

            let word = if issued.is_zero() {
                NOT_XRP_BIT_MASK
            } else {
                let mut word = NOT_XRP_BIT_MASK
                    | ((issued.exponent() + EXPONENT_BIAS) as u64) << 54
                    | issued.mantissa().unsigned_abs();
                if !issued.is_negative() {
                    word |= POS_SIGN_BIT_MASK;
                }
                word
            };

            let mut bytes = word.to_be_bytes().to_vec();
            bytes.extend_from_slice(currency.as_bytes());
            bytes.extend_from_slice(issuer.as_bytes());
            Ok(bytes)
        }
        other => Err(XRPLBinaryCodecException::UnsupportedValue {
            field: "Amount".to_string(),
            found: other.to_string(),
        }),
    }
}

/// Deserializes an amount from the wire; the high bit of the leading
/// byte selects the branch.
pub fn decode_amount(parser: &mut BinaryParser) -> Result<Value, XRPLBinaryCodecException> {
    let word = parser.read_uint64()?;

    if word & NOT_XRP_BIT_MASK == 0 {
        let drops = (word & DROPS_MASK) as i64;
        if drops.abs() > MAX_DROPS {
            return Err(
                XRPLTypeException::InvalidAmount("drops out of range".to_string()).into(),
            );
        }
        let negative = word & POS_SIGN_BIT_MASK == 0 && drops != 0;
        return Ok(Value::String(if negative {
            format!("-{drops}")
        } else {
            drops.to_string()
        }));
    }

    let mantissa = (word & MANTISSA_MASK) as i64;
    let currency = Currency::from_bytes(&parser.read(20)?)?;
    let issuer = AccountId::from_bytes(&parser.read(20)?)?;

    if currency.is_xrp() {
        return Err(XRPLTypeException::InvalidAmount(
            "an issued amount cannot use the currency XRP".to_string(),
        )
        .into());
    }

    let value = if mantissa == 0 {
        IssuedValue::ZERO
    } else {
        let exponent = ((word >> 54) & 0xFF) as i32 - EXPONENT_BIAS;
        let signed = if word & POS_SIGN_BIT_MASK == 0 {
            -(mantissa as i128)
        } else {
            mantissa as i128
        };
        IssuedValue::new(signed, exponent)?
    };

    let mut object = Map::new();
    object.insert("currency".to_string(), Value::String(currency.to_string()));
    object.insert("issuer".to_string(), Value::String(issuer.to_string()));
    object.insert("value".to_string(), Value::String(value.to_string()));
    Ok(Value::Object(object))
}

fn expect_str<'a>(
    object: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a str, XRPLBinaryCodecException> {
    object
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| XRPLTypeException::UnexpectedJsonType {
            field: key.to_string(),
            expected: "string",
        }
        .into())
}

#[cfg(test)]
mod test {
    use super::*;

    fn round_trip(json: Value) {
        let encoded = encode_amount(&json).unwrap();
        let mut parser = BinaryParser::new(encoded);
        assert_eq!(decode_amount(&mut parser).unwrap(), json);
        assert!(parser.is_end());
    }

    #[test]
    fn test_xrp_round_trip() {
        round_trip(Value::String("0".to_string()));
        round_trip(Value::String("1".to_string()));
        round_trip(Value::String("10000000".to_string()));
        round_trip(Value::String("100000000000000000".to_string()));
        round_trip(Value::String("-25".to_string()));
    }

    #[test]
    fn test_xrp_zero_is_canonical_positive() {
        let encoded = encode_amount(&Value::String("0".to_string())).unwrap();
        assert_eq!(encoded, 0x4000_0000_0000_0000u64.to_be_bytes());
    }

    #[test]
    fn test_drops_out_of_range() {
        assert!(encode_amount(&Value::String("100000000000000001".to_string())).is_err());
    }

    #[test]
    fn test_issued_round_trip() {
        for value in ["1", "0.5", "-99.123", "1234567891234567e-25", "0"] {
            let json = serde_json::json!({
                "currency": "USD",
                "issuer": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
                "value": value,
            });
            let encoded = encode_amount(&json).unwrap();
            let mut parser = BinaryParser::new(encoded);
            let decoded = decode_amount(&mut parser).unwrap();
            let round_tripped: IssuedValue =
                decoded["value"].as_str().unwrap().parse().unwrap();
            assert_eq!(round_tripped, value.parse().unwrap());
        }
    }

    #[test]
    fn test_issued_zero_is_canonical() {
        let json = serde_json::json!({
            "currency": "USD",
            "issuer": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
            "value": "0",
        });
        let encoded = encode_amount(&json).unwrap();
        assert_eq!(&encoded[..8], &0x8000_0000_0000_0000u64.to_be_bytes());
    }

    #[test]
    fn test_issued_rejects_xrp_currency() {
        let json = serde_json::json!({
            "currency": "XRP",
            "issuer": "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb",
            "value": "1",
        });
        assert!(encode_amount(&json).is_err());
    }

    #[test]
    fn test_value_normalization() {
        let value: IssuedValue = "100".parse().unwrap();
        assert_eq!(value.mantissa(), MIN_MANTISSA);
        assert_eq!(value.exponent(), -13);
        assert_eq!(value.to_string(), "100");

        let value: IssuedValue = "0.011".parse().unwrap();
        assert_eq!(value.to_string(), "0.011");

        // Underflow collapses to zero.
        let value: IssuedValue = "1e-200".parse().unwrap();
        assert!(value.is_zero());

        // Overflow errors.
        assert!("1e100".parse::<IssuedValue>().is_err());
    }

    #[test]
    fn test_value_ordering() {
        let small: IssuedValue = "1".parse().unwrap();
        let large: IssuedValue = "2".parse().unwrap();
        let negative: IssuedValue = "-5".parse().unwrap();

        assert!(small < large);
        assert!(negative < small);
        assert!(negative < IssuedValue::ZERO);
        assert!(IssuedValue::ZERO < small);
        assert!("-10".parse::<IssuedValue>().unwrap() < negative);
    }
}
