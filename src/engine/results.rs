//! The transaction result taxonomy.
//!
//! Exactly one code comes out of every apply. The numeric ranges
//! classify the tiers: `tel` local, `tem` malformed, `tef` failure,
//! `ter` retry, `tes` success, `tec` claimed failure.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How a result disposes of the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTier {
    /// Applied; all effects commit.
    Success,
    /// Applied; fee and sequence only (claimed failure).
    Claimed,
    /// Invalid for this ledger; rejected without a fee.
    Failure,
    /// Not relayed; local rejection.
    Local,
    /// Never valid; rejected without a fee.
    Malformed,
    /// Might succeed in a later ledger; requeue.
    Retry,
}

#[allow(non_camel_case_types)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
)]
#[repr(i16)]
pub enum TransactionResult {
    // Local errors: not relayed.
    telLOCAL_ERROR = -399,
    telBAD_DOMAIN = -398,
    telBAD_PUBLIC_KEY = -396,
    telFAILED_PROCESSING = -395,
    telINSUF_FEE_P = -394,
    telCAN_NOT_QUEUE = -392,
    telWRONG_NETWORK = -386,
    telNETWORK_ID_MAKES_TX_NON_CANONICAL = -385,

    // Malformed: never valid.
    temMALFORMED = -299,
    temBAD_AMOUNT = -298,
    temBAD_CURRENCY = -297,
    temBAD_EXPIRATION = -296,
    temBAD_FEE = -295,
    temBAD_ISSUER = -294,
    temBAD_LIMIT = -293,
    temBAD_OFFER = -292,
    temBAD_REGKEY = -289,
    temBAD_SEND_XRP_LIMIT = -288,
    temBAD_SEND_XRP_MAX = -287,
    temBAD_SEND_XRP_NO_DIRECT = -286,
    temBAD_SEND_XRP_PARTIAL = -285,
    temBAD_SEQUENCE = -283,
    temBAD_SIGNATURE = -282,
    temBAD_SRC_ACCOUNT = -281,
    temBAD_TRANSFER_RATE = -280,
    temDST_IS_SRC = -279,
    temDST_NEEDED = -278,
    temINVALID = -277,
    temINVALID_FLAG = -276,
    temREDUNDANT = -275,
    temDISABLED = -273,
    temBAD_SIGNER = -272,
    temBAD_QUORUM = -271,
    temBAD_WEIGHT = -270,
    temBAD_TICK_SIZE = -269,
    temINVALID_ACCOUNT_ID = -268,
    temCANNOT_PREAUTH_SELF = -267,
    temINVALID_COUNT = -266,
    temSEQ_AND_TICKET = -263,
    temBAD_NFTOKEN_TRANSFER_FEE = -262,
    temARRAY_EMPTY = -261,
    temARRAY_TOO_LARGE = -260,

    // Failures: invalid for this ledger, no fee claimed.
    tefFAILURE = -199,
    tefALREADY = -198,
    tefBAD_AUTH = -196,
    tefINTERNAL = -192,
    tefNO_AUTH_REQUIRED = -191,
    tefPAST_SEQ = -190,
    tefWRONG_PRIOR = -189,
    tefMASTER_DISABLED = -188,
    tefMAX_LEDGER = -187,
    tefBAD_SIGNATURE = -186,
    tefBAD_QUORUM = -185,
    tefNOT_MULTI_SIGNING = -184,
    tefBAD_AUTH_MASTER = -183,
    tefTOO_BIG = -181,
    tefNO_TICKET = -180,
    tefNFTOKEN_IS_NOT_TRANSFERABLE = -179,
    tefINVALID_LEDGER_FIX_TYPE = -178,

    // Retries: might succeed in a later ledger.
    terRETRY = -99,
    terINSUF_FEE_B = -97,
    terNO_ACCOUNT = -96,
    terNO_AUTH = -95,
    terNO_LINE = -94,
    terOWNERS = -93,
    terPRE_SEQ = -92,
    terNO_RIPPLE = -90,
    terQUEUED = -89,
    terPRE_TICKET = -88,
    terNO_AMM = -87,

    // Success.
    tesSUCCESS = 0,

    // Claimed failures: fee charged, sequence consumed, no other
    // effect.
    tecCLAIM = 100,
    tecPATH_PARTIAL = 101,
    tecUNFUNDED_OFFER = 103,
    tecUNFUNDED_PAYMENT = 104,
    tecDIR_FULL = 121,
    tecINSUF_RESERVE_LINE = 122,
    tecINSUF_RESERVE_OFFER = 123,
    tecNO_DST = 124,
    tecNO_DST_INSUF_XRP = 125,
    tecNO_LINE_INSUF_RESERVE = 126,
    tecNO_LINE_REDUNDANT = 127,
    tecPATH_DRY = 128,
    tecUNFUNDED = 129,
    tecNO_ALTERNATIVE_KEY = 130,
    tecNO_REGULAR_KEY = 131,
    tecOWNERS = 132,
    tecNO_ISSUER = 133,
    tecNO_AUTH = 134,
    tecNO_LINE = 135,
    tecFROZEN = 137,
    tecNO_TARGET = 138,
    tecNO_PERMISSION = 139,
    tecNO_ENTRY = 140,
    tecINSUFFICIENT_RESERVE = 141,
    tecNEED_MASTER_KEY = 142,
    tecDST_TAG_NEEDED = 143,
    tecINTERNAL = 144,
    tecCRYPTOCONDITION_ERROR = 146,
    tecEXPIRED = 148,
    tecDUPLICATE = 149,
    tecKILLED = 150,
    tecHAS_OBLIGATIONS = 151,
    tecTOO_SOON = 152,
    tecNO_SUITABLE_NFTOKEN_PAGE = 155,
    tecNFTOKEN_BUY_SELL_MISMATCH = 156,
    tecNFTOKEN_OFFER_TYPE_MISMATCH = 157,
    tecCANT_ACCEPT_OWN_NFTOKEN_OFFER = 158,
    tecINSUFFICIENT_FUNDS = 159,
    tecOBJECT_NOT_FOUND = 160,
    tecINSUFFICIENT_PAYMENT = 161,
    tecUNFUNDED_AMM = 162,
    tecAMM_BALANCE = 163,
    tecAMM_FAILED = 164,
    tecAMM_INVALID_TOKENS = 165,
    tecAMM_EMPTY = 166,
    tecAMM_NOT_EMPTY = 167,
    tecAMM_ACCOUNT = 168,
    tecINCOMPLETE = 169,
}

impl TransactionResult {
    pub fn code(&self) -> i16 {
        *self as i16
    }

    pub fn tier(&self) -> ResultTier {
        match self.code() {
            0 => ResultTier::Success,
            100.. => ResultTier::Claimed,
            -99..=-1 => ResultTier::Retry,
            -199..=-100 => ResultTier::Failure,
            -299..=-200 => ResultTier::Malformed,
            _ => ResultTier::Local,
        }
    }

    /// Success or claimed failure: the transaction consumed its slot
    /// and fee.
    pub fn applied(&self) -> bool {
        matches!(self.tier(), ResultTier::Success | ResultTier::Claimed)
    }

    pub fn is_success(&self) -> bool {
        *self == TransactionResult::tesSUCCESS
    }

    pub fn is_claimed(&self) -> bool {
        self.tier() == ResultTier::Claimed
    }

    pub fn retriable(&self) -> bool {
        self.tier() == ResultTier::Retry
    }

    /// Whether peers should hear about the transaction.
    pub fn relayable(&self) -> bool {
        !matches!(self.tier(), ResultTier::Local | ResultTier::Malformed)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tier_ranges() {
        assert_eq!(TransactionResult::tesSUCCESS.tier(), ResultTier::Success);
        assert_eq!(TransactionResult::tecPATH_PARTIAL.tier(), ResultTier::Claimed);
        assert_eq!(TransactionResult::tefPAST_SEQ.tier(), ResultTier::Failure);
        assert_eq!(TransactionResult::temBAD_FEE.tier(), ResultTier::Malformed);
        assert_eq!(TransactionResult::telINSUF_FEE_P.tier(), ResultTier::Local);
        assert_eq!(TransactionResult::terPRE_SEQ.tier(), ResultTier::Retry);
    }

    #[test]
    fn test_projections() {
        assert!(TransactionResult::tesSUCCESS.applied());
        assert!(TransactionResult::tecCLAIM.applied());
        assert!(!TransactionResult::terRETRY.applied());
        assert!(TransactionResult::terRETRY.retriable());
        assert!(!TransactionResult::temMALFORMED.relayable());
        assert!(TransactionResult::tecCLAIM.relayable());
    }

    #[test]
    fn test_names_round_trip() {
        use core::str::FromStr;

        assert_eq!(TransactionResult::tecPATH_PARTIAL.to_string(), "tecPATH_PARTIAL");
        assert_eq!(
            TransactionResult::from_str("tefTOO_BIG").unwrap(),
            TransactionResult::tefTOO_BIG
        );
    }
}
