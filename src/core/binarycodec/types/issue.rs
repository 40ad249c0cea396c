//! Codec for an asset without a value: a currency and, for issued
//! currencies, its issuer. Used by the AMM fields.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::account_id::AccountId;
use super::currency::Currency;
use super::exceptions::XRPLTypeException;

#[skip_serializing_none]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Issue {
    pub currency: Currency,
    pub issuer: Option<AccountId>,
}

impl Issue {
    pub fn xrp() -> Self {
        Issue {
            currency: Currency::XRP,
            issuer: None,
        }
    }

    pub fn issued(currency: Currency, issuer: AccountId) -> Self {
        Issue {
            currency,
            issuer: Some(issuer),
        }
    }

    pub fn is_xrp(&self) -> bool {
        self.currency.is_xrp()
    }

    /// An XRP issue carries no issuer; an issued currency must.
    pub fn validate(&self) -> Result<(), XRPLTypeException> {
        match (self.currency.is_xrp(), &self.issuer) {
            (true, Some(_)) => Err(XRPLTypeException::InvalidIssue(
                "XRP takes no issuer".to_string(),
            )),
            (false, None) => Err(XRPLTypeException::InvalidIssue(
                "issued currency requires an issuer".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Fixed 40-byte form used for deterministic derivations: the
    /// currency followed by the issuer (the zero account for XRP).
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = self.currency.as_bytes().to_vec();
        bytes.extend_from_slice(self.issuer.unwrap_or(AccountId::ZERO).as_bytes());
        bytes
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issuer {
            Some(issuer) => write!(f, "{}/{}", self.currency, issuer),
            None => write!(f, "{}", self.currency),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Issue::xrp().validate().is_ok());

        let usd = Issue::issued(
            "USD".parse().unwrap(),
            "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".parse().unwrap(),
        );
        assert!(usd.validate().is_ok());

        let bad = Issue {
            currency: Currency::XRP,
            issuer: usd.issuer,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_canonical_bytes() {
        assert_eq!(Issue::xrp().canonical_bytes(), vec![0u8; 40]);
    }
}
