//! Ledger-side amount arithmetic: XRP drops and issued-currency
//! values with protocol precision.

use core::cmp::Ordering;
use core::fmt;

use thiserror::Error;

use crate::constants::{MAX_DROPS, TRANSFER_RATE_PARTS};
use crate::core::binarycodec::types::{AccountId, Currency, IssuedValue};

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum AmountException {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Amounts in {0} and {1} are not commensurable")]
    CurrencyMismatch(String, String),
}

impl From<crate::core::binarycodec::types::exceptions::XRPLTypeException> for AmountException {
    fn from(err: crate::core::binarycodec::types::exceptions::XRPLTypeException) -> Self {
        AmountException::InvalidAmount(err.to_string())
    }
}

/// Signed drops of XRP; valid range is ±10^17.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Drops(pub i64);

impl Drops {
    pub const ZERO: Drops = Drops(0);

    pub fn checked_add(self, other: Drops) -> Result<Drops, AmountException> {
        let sum = self
            .0
            .checked_add(other.0)
            .ok_or_else(|| AmountException::InvalidAmount("drops overflow".to_string()))?;
        if sum.abs() > MAX_DROPS {
            return Err(AmountException::InvalidAmount(
                "drops out of range".to_string(),
            ));
        }
        Ok(Drops(sum))
    }

    pub fn checked_sub(self, other: Drops) -> Result<Drops, AmountException> {
        self.checked_add(Drops(-other.0))
    }
}

impl fmt::Display for Drops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An issued-currency holding: a normalized decimal value plus the
/// (currency, issuer) pair that names the asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuedAmount {
    pub value: IssuedValue,
    pub currency: Currency,
    pub issuer: AccountId,
}

impl IssuedAmount {
    pub fn new(
        value: IssuedValue,
        currency: Currency,
        issuer: AccountId,
    ) -> Result<Self, AmountException> {
        if currency.is_xrp() {
            return Err(AmountException::InvalidAmount(
                "issued amounts cannot use the currency XRP".to_string(),
            ));
        }
        Ok(IssuedAmount {
            value,
            currency,
            issuer,
        })
    }

    pub fn zero(currency: Currency, issuer: AccountId) -> Self {
        IssuedAmount {
            value: IssuedValue::ZERO,
            currency,
            issuer,
        }
    }

    fn same_asset(&self, other: &IssuedAmount) -> Result<(), AmountException> {
        if self.currency != other.currency {
            return Err(AmountException::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &IssuedAmount) -> Result<IssuedAmount, AmountException> {
        self.same_asset(other)?;
        Ok(IssuedAmount {
            value: add_values(&self.value, &other.value)?,
            ..*self
        })
    }

    pub fn checked_sub(&self, other: &IssuedAmount) -> Result<IssuedAmount, AmountException> {
        self.same_asset(other)?;
        Ok(IssuedAmount {
            value: add_values(&self.value, &other.value.negate())?,
            ..*self
        })
    }

    pub fn negate(&self) -> IssuedAmount {
        IssuedAmount {
            value: self.value.negate(),
            ..*self
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }
}

/// Sum of two normalized values. The operand with the smaller
/// exponent is scaled down toward zero until the exponents align;
/// a vanishing small operand leaves the large one unchanged.
pub fn add_values(a: &IssuedValue, b: &IssuedValue) -> Result<IssuedValue, AmountException> {
    if a.is_zero() {
        return Ok(*b);
    }
    if b.is_zero() {
        return Ok(*a);
    }

    let (mut ma, mut ea) = (a.mantissa() as i128, a.exponent());
    let (mut mb, mut eb) = (b.mantissa() as i128, b.exponent());

    while ea < eb {
        ma /= 10;
        ea += 1;
        if ma == 0 {
            ea = eb;
        }
    }
    while eb < ea {
        mb /= 10;
        eb += 1;
        if mb == 0 {
            eb = ea;
        }
    }

    Ok(IssuedValue::new(ma + mb, ea)?)
}

/// Product of two normalized values.
pub fn multiply_values(a: &IssuedValue, b: &IssuedValue) -> Result<IssuedValue, AmountException> {
    if a.is_zero() || b.is_zero() {
        return Ok(IssuedValue::ZERO);
    }

    let product = (a.mantissa() as i128) * (b.mantissa() as i128);
    // Scale back toward 16 digits before normalizing; the product of
    // two 16-digit mantissas has up to 32.
    let mut mantissa = product;
    let mut exponent = a.exponent() + b.exponent();
    while mantissa.unsigned_abs() > u64::MAX as u128 {
        mantissa /= 10;
        exponent += 1;
    }

    Ok(IssuedValue::new(mantissa, exponent)?)
}

/// Quotient of two normalized values, rounded toward zero.
pub fn divide_values(a: &IssuedValue, b: &IssuedValue) -> Result<IssuedValue, AmountException> {
    if b.is_zero() {
        return Err(AmountException::InvalidAmount(
            "division by zero".to_string(),
        ));
    }
    if a.is_zero() {
        return Ok(IssuedValue::ZERO);
    }

    // Widen the dividend so the quotient keeps 16+ significant digits.
    let scaled = (a.mantissa() as i128) * 10i128.pow(17);
    let quotient = scaled / (b.mantissa() as i128);
    let exponent = a.exponent() - b.exponent() - 17;

    Ok(IssuedValue::new(quotient, exponent)?)
}

/// A value scaled by `numerator / denominator` in integer parts,
/// rounded toward zero. Used for transfer rates, where 10^9 parts
/// equal 1.0.
pub fn scale_value(
    value: &IssuedValue,
    numerator: u32,
    denominator: u32,
) -> Result<IssuedValue, AmountException> {
    if denominator == 0 {
        return Err(AmountException::InvalidAmount(
            "zero denominator".to_string(),
        ));
    }
    if value.is_zero() || numerator == 0 {
        return Ok(IssuedValue::ZERO);
    }

    let scaled = (value.mantissa() as i128) * numerator as i128 / denominator as i128;
    Ok(IssuedValue::new(scaled, value.exponent())?)
}

/// Applies a transfer rate (10^9 = 1.0) to the amount an issuer must
/// move so the destination receives `value`.
pub fn with_transfer_rate(
    value: &IssuedValue,
    transfer_rate: u32,
) -> Result<IssuedValue, AmountException> {
    if transfer_rate == 0 || transfer_rate == TRANSFER_RATE_PARTS {
        return Ok(*value);
    }
    scale_value(value, transfer_rate, TRANSFER_RATE_PARTS)
}

/// Integer square root by Newton's method, rounded down.
fn isqrt(value: u128) -> u128 {
    if value < 2 {
        return value;
    }

    let mut x = 1u128 << (value.ilog2() / 2 + 1);
    loop {
        let next = (x + value / x) / 2;
        if next >= x {
            return x;
        }
        x = next;
    }
}

/// The square root of a non-negative value: the geometric-mean
/// primitive for LP-token issuance.
pub fn sqrt_value(value: &IssuedValue) -> Result<IssuedValue, AmountException> {
    if value.is_negative() {
        return Err(AmountException::InvalidAmount(
            "square root of a negative value".to_string(),
        ));
    }
    if value.is_zero() {
        return Ok(IssuedValue::ZERO);
    }

    // Widen to 32 digits so the root keeps 16.
    let mut mantissa = (value.mantissa() as u128) * 10u128.pow(16);
    let mut exponent = value.exponent() - 16;
    if exponent % 2 != 0 {
        mantissa *= 10;
        exponent -= 1;
    }

    Ok(IssuedValue::new(isqrt(mantissa) as i128, exponent / 2)?)
}

/// Tagged union over the two kinds of value the ledger moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerAmount {
    Xrp(Drops),
    Issued(IssuedAmount),
}

impl LedgerAmount {
    pub fn is_xrp(&self) -> bool {
        matches!(self, LedgerAmount::Xrp(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            LedgerAmount::Xrp(drops) => drops.0 == 0,
            LedgerAmount::Issued(issued) => issued.is_zero(),
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            LedgerAmount::Xrp(drops) => drops.0 < 0,
            LedgerAmount::Issued(issued) => issued.is_negative(),
        }
    }

    pub fn is_positive(&self) -> bool {
        !self.is_zero() && !self.is_negative()
    }

    pub fn currency(&self) -> Currency {
        match self {
            LedgerAmount::Xrp(_) => Currency::XRP,
            LedgerAmount::Issued(issued) => issued.currency,
        }
    }

    pub fn issuer(&self) -> Option<AccountId> {
        match self {
            LedgerAmount::Xrp(_) => None,
            LedgerAmount::Issued(issued) => Some(issued.issuer),
        }
    }

    pub fn checked_add(&self, other: &LedgerAmount) -> Result<LedgerAmount, AmountException> {
        match (self, other) {
            (LedgerAmount::Xrp(a), LedgerAmount::Xrp(b)) => {
                Ok(LedgerAmount::Xrp(a.checked_add(*b)?))
            }
            (LedgerAmount::Issued(a), LedgerAmount::Issued(b)) => {
                Ok(LedgerAmount::Issued(a.checked_add(b)?))
            }
            _ => Err(AmountException::CurrencyMismatch(
                self.currency().to_string(),
                other.currency().to_string(),
            )),
        }
    }

    pub fn checked_sub(&self, other: &LedgerAmount) -> Result<LedgerAmount, AmountException> {
        match (self, other) {
            (LedgerAmount::Xrp(a), LedgerAmount::Xrp(b)) => {
                Ok(LedgerAmount::Xrp(a.checked_sub(*b)?))
            }
            (LedgerAmount::Issued(a), LedgerAmount::Issued(b)) => {
                Ok(LedgerAmount::Issued(a.checked_sub(b)?))
            }
            _ => Err(AmountException::CurrencyMismatch(
                self.currency().to_string(),
                other.currency().to_string(),
            )),
        }
    }

    /// Ordering of two amounts in the same asset.
    pub fn compare(&self, other: &LedgerAmount) -> Result<Ordering, AmountException> {
        match (self, other) {
            (LedgerAmount::Xrp(a), LedgerAmount::Xrp(b)) => Ok(a.cmp(b)),
            (LedgerAmount::Issued(a), LedgerAmount::Issued(b)) => {
                a.same_asset(b)?;
                Ok(a.value.cmp(&b.value))
            }
            _ => Err(AmountException::CurrencyMismatch(
                self.currency().to_string(),
                other.currency().to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use core::str::FromStr;

    fn value(s: &str) -> IssuedValue {
        IssuedValue::from_str(s).unwrap()
    }

    #[test]
    fn test_drops_bounds() {
        assert!(Drops(MAX_DROPS).checked_add(Drops(1)).is_err());
        assert_eq!(
            Drops(5).checked_sub(Drops(7)).unwrap(),
            Drops(-2)
        );
    }

    #[test]
    fn test_add_values() {
        assert_eq!(add_values(&value("1"), &value("2")).unwrap(), value("3"));
        assert_eq!(
            add_values(&value("1"), &value("-1")).unwrap(),
            IssuedValue::ZERO
        );
        assert_eq!(
            add_values(&value("100"), &value("0.25")).unwrap(),
            value("100.25")
        );
        // A vastly smaller operand vanishes.
        assert_eq!(
            add_values(&value("1e30"), &value("1e-30")).unwrap(),
            value("1e30")
        );
    }

    #[test]
    fn test_multiply_and_divide() {
        assert_eq!(
            multiply_values(&value("3"), &value("4")).unwrap(),
            value("12")
        );
        assert_eq!(
            divide_values(&value("1"), &value("3")).unwrap(),
            value("0.3333333333333333")
        );
        assert_eq!(
            multiply_values(&value("1e40"), &value("1e-40")).unwrap(),
            value("1")
        );
        assert!(divide_values(&value("1"), &IssuedValue::ZERO).is_err());
    }

    #[test]
    fn test_transfer_rate() {
        // 1.5% fee: deliver 200 requires moving 203.
        assert_eq!(
            with_transfer_rate(&value("200"), 1_015_000_000).unwrap(),
            value("203")
        );
        // 1.0 and 0 leave the value alone.
        assert_eq!(with_transfer_rate(&value("7"), 0).unwrap(), value("7"));
        assert_eq!(
            with_transfer_rate(&value("7"), 1_000_000_000).unwrap(),
            value("7")
        );
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(sqrt_value(&value("4")).unwrap(), value("2"));
        assert_eq!(sqrt_value(&value("100")).unwrap(), value("10"));
        assert_eq!(
            sqrt_value(&value("2")).unwrap(),
            value("1.414213562373095")
        );
        assert!(sqrt_value(&value("-1")).is_err());
    }

    #[test]
    fn test_ledger_amount_mismatch() {
        let xrp = LedgerAmount::Xrp(Drops(10));
        let usd = LedgerAmount::Issued(IssuedAmount {
            value: value("1"),
            currency: "USD".parse().unwrap(),
            issuer: AccountId::ZERO,
        });

        assert!(xrp.checked_add(&usd).is_err());
        assert!(xrp.compare(&usd).is_err());
    }
}
