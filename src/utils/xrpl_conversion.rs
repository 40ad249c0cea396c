//! Conversions between XRP drops and native number types.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::constants::{MAX_DROPS, MAX_XRP};

use super::exceptions::XRPRangeException;

/// Indivisible unit of XRP.
pub const ONE_DROP: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// Convert a numeric XRP amount to drops of XRP.
pub fn xrp_to_drops(xrp: Decimal) -> Result<i64, XRPRangeException> {
    if xrp < ONE_DROP && xrp != Decimal::ZERO {
        Err(XRPRangeException::InvalidXRPAmountTooSmall {
            min: ONE_DROP.to_string(),
            found: xrp.to_string(),
        })
    } else if xrp > Decimal::new(MAX_XRP as i64, 0) {
        Err(XRPRangeException::InvalidXRPAmountTooLarge {
            max: MAX_XRP,
            found: xrp.to_string(),
        })
    } else {
        Ok(((xrp / ONE_DROP).trunc()).to_i64().expect("xrp_to_drops"))
    }
}

/// Convert from drops to decimal XRP.
pub fn drops_to_xrp(drops: i64) -> Result<Decimal, XRPRangeException> {
    if drops.abs() > MAX_DROPS {
        Err(XRPRangeException::InvalidDropsAmountTooLarge {
            max: MAX_DROPS.to_string(),
            found: drops.to_string(),
        })
    } else {
        Ok(Decimal::new(drops, 6))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_xrp_to_drops() {
        assert_eq!(xrp_to_drops(Decimal::new(100, 0)).unwrap(), 100_000_000);
        assert_eq!(xrp_to_drops(Decimal::ZERO).unwrap(), 0);
        assert!(xrp_to_drops(Decimal::new(1, 7)).is_err());
    }

    #[test]
    fn test_drops_to_xrp() {
        assert_eq!(drops_to_xrp(1_000_000).unwrap(), Decimal::new(1, 0));
        assert!(drops_to_xrp(i64::MAX).is_err());
    }
}
