//! Collection of public constants for the ledger core.

use strum_macros::EnumIter;

/// Regular expression for determining ISO currency codes.
pub const ISO_CURRENCY_REGEX: &str = r"^[A-Z0-9]{3}$";
/// Regular expression for determining hex currency codes.
pub const HEX_CURRENCY_REGEX: &str = r"^[A-F0-9]{40}$";

/// Length of an account id.
pub const ACCOUNT_ID_LENGTH: usize = 20;
/// Length of a currency code in its 160-bit form.
pub const CURRENCY_CODE_LENGTH: usize = 20;

/// Drops in one XRP.
pub const XRP_DROPS: u64 = 1_000_000;
/// 100 billion decimal XRP.
pub const MAX_XRP: u64 = u64::pow(10, 11);
/// Maximum possible drops of XRP.
pub const MAX_DROPS: i64 = i64::pow(10, 17);

/// Transfer rates are parts per billion; 1_000_000_000 is a rate of 1.0.
pub const TRANSFER_RATE_PARTS: u32 = 1_000_000_000;
/// Smallest non-zero transfer rate.
pub const MIN_TRANSFER_RATE: u32 = 1_000_000_000;
/// Largest transfer rate (2.0).
pub const MAX_TRANSFER_RATE: u32 = 2_000_000_000;
/// A transfer rate of zero clears the field.
pub const SPECIAL_CASE_TRANSFER_RATE: u32 = 0;

/// Offers round their exchange rate to this many significant digits.
pub const MIN_TICK_SIZE: u32 = 3;
pub const MAX_TICK_SIZE: u32 = 15;
/// A tick size of zero clears the field.
pub const DISABLE_TICK_SIZE: u32 = 0;

/// Longest permitted domain, in bytes of lowercase ASCII.
pub const MAX_DOMAIN_LENGTH: usize = 256;

/// AMM trading fees are basis points of a basis point; 1000 is 1%.
pub const MAX_TRADING_FEE: u16 = 1000;
/// Upper bound on tickets a single account may hold.
pub const MAX_TICKETS_PER_ACCOUNT: u32 = 250;
/// Signer lists accept between one and this many entries.
pub const MAX_SIGNER_ENTRIES: usize = 32;

/// An AccountDelete must leave this many sequence numbers between the
/// account's current sequence and the ledger sequence.
pub const ACCOUNT_DELETE_SEQUENCE_GAP: u32 = 256;

/// Represents the supported cryptography algorithms.
#[derive(Debug, PartialEq, Eq, Clone, Copy, EnumIter)]
pub enum CryptoAlgorithm {
    ED25519,
    SECP256K1,
}

impl core::fmt::Display for CryptoAlgorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            CryptoAlgorithm::ED25519 => write!(f, "ed25519"),
            CryptoAlgorithm::SECP256K1 => write!(f, "secp256k1"),
        }
    }
}
