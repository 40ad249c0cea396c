//! The amendment gate: a named-feature set fixed for the duration of
//! a ledger. Unknown features are disabled.

use hashbrown::HashSet;

pub const FEATURE_CHECKS: &str = "Checks";
pub const FEATURE_CHECK_CASH_MAKES_TRUST_LINE: &str = "CheckCashMakesTrustLine";
pub const FEATURE_CLAWBACK: &str = "Clawback";
pub const FEATURE_AMM: &str = "AMM";
pub const FEATURE_AMM_CLAWBACK: &str = "AMMClawback";
pub const FEATURE_DEPOSIT_AUTH: &str = "DepositAuth";
pub const FEATURE_DEPOSIT_PREAUTH: &str = "DepositPreauth";
pub const FEATURE_MULTI_SIGN: &str = "MultiSign";
pub const FEATURE_TICKET_BATCH: &str = "TicketBatch";
pub const FEATURE_NFTOKEN: &str = "NonFungibleTokensV1_1";
pub const FEATURE_DYNAMIC_NFT: &str = "DynamicNFT";
pub const FEATURE_FIX_NFTOKEN_PAGE_LINKS: &str = "fixNFTokenPageLinks";
pub const FEATURE_BATCH: &str = "Batch";
pub const FEATURE_PERMISSION_DELEGATION: &str = "PermissionDelegation";

/// Features enabled on a freshly-opened test network. Batch and
/// PermissionDelegation ship disabled.
pub const DEFAULT_FEATURES: &[&str] = &[
    FEATURE_CHECKS,
    FEATURE_CHECK_CASH_MAKES_TRUST_LINE,
    FEATURE_CLAWBACK,
    FEATURE_AMM,
    FEATURE_AMM_CLAWBACK,
    FEATURE_DEPOSIT_AUTH,
    FEATURE_DEPOSIT_PREAUTH,
    FEATURE_MULTI_SIGN,
    FEATURE_TICKET_BATCH,
    FEATURE_NFTOKEN,
    FEATURE_DYNAMIC_NFT,
    FEATURE_FIX_NFTOKEN_PAGE_LINKS,
];

/// The active amendment set. Immutable for the life of a ledger.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    features: HashSet<String>,
}

impl Rules {
    pub fn new<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rules {
            features: features.into_iter().map(Into::into).collect(),
        }
    }

    pub fn default_features() -> Self {
        Rules::new(DEFAULT_FEATURES.iter().copied())
    }

    pub fn enabled(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }

    pub fn with_feature(mut self, feature: &str) -> Self {
        self.features.insert(feature.to_string());
        self
    }

    pub fn without_feature(mut self, feature: &str) -> Self {
        self.features.remove(feature);
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_unknown_features_are_disabled() {
        let rules = Rules::default_features();
        assert!(rules.enabled(FEATURE_AMM));
        assert!(!rules.enabled("SomeFutureAmendment"));
        assert!(!rules.enabled(FEATURE_BATCH));
    }

    #[test]
    fn test_toggles() {
        let rules = Rules::default_features()
            .without_feature(FEATURE_CLAWBACK)
            .with_feature(FEATURE_BATCH);
        assert!(!rules.enabled(FEATURE_CLAWBACK));
        assert!(rules.enabled(FEATURE_BATCH));
    }
}
