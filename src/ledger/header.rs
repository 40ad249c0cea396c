//! The ledger header and its identifying hash.

use crate::core::binarycodec::types::Hash256;
use crate::core::keypairs::utils::sha512_first_half;

/// Hash prefix of ledger headers.
const HASH_PREFIX_LEDGER: [u8; 4] = *b"LWR\0";

/// The fixed header layout hashed to identify a sealed ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerHeader {
    pub sequence: u32,
    /// Total drops in existence, shrinking as fees burn.
    pub total_coins: i64,
    pub parent_hash: Hash256,
    pub transaction_hash: Hash256,
    pub account_hash: Hash256,
    pub parent_close_time: u32,
    pub close_time: u32,
    pub close_time_resolution: u8,
    pub close_flags: u8,
}

impl LedgerHeader {
    /// SHA-512-half over the fixed layout.
    pub fn hash(&self) -> Hash256 {
        let mut message = HASH_PREFIX_LEDGER.to_vec();
        message.extend_from_slice(&self.sequence.to_be_bytes());
        message.extend_from_slice(&self.total_coins.to_be_bytes());
        message.extend_from_slice(self.parent_hash.as_bytes());
        message.extend_from_slice(self.transaction_hash.as_bytes());
        message.extend_from_slice(self.account_hash.as_bytes());
        message.extend_from_slice(&self.parent_close_time.to_be_bytes());
        message.extend_from_slice(&self.close_time.to_be_bytes());
        message.push(self.close_time_resolution);
        message.push(self.close_flags);

        Hash256(sha512_first_half(&message))
    }
}

/// Rounds a close time down to the ledger's close-time resolution.
pub fn round_close_time(close_time: u32, resolution: u8) -> u32 {
    if resolution == 0 {
        return close_time;
    }
    close_time - (close_time % resolution as u32)
}

#[cfg(test)]
mod test {
    use super::*;

    fn header() -> LedgerHeader {
        LedgerHeader {
            sequence: 3,
            total_coins: 99_999_999_999_999_000,
            parent_hash: Hash256([1u8; 32]),
            transaction_hash: Hash256([2u8; 32]),
            account_hash: Hash256([3u8; 32]),
            parent_close_time: 1000,
            close_time: 1010,
            close_time_resolution: 10,
            close_flags: 0,
        }
    }

    #[test]
    fn test_hash_covers_every_field() {
        let base = header().hash();

        let mut changed = header();
        changed.total_coins -= 10;
        assert_ne!(changed.hash(), base);

        let mut changed = header();
        changed.account_hash = Hash256([4u8; 32]);
        assert_ne!(changed.hash(), base);

        assert_eq!(header().hash(), base);
    }

    #[test]
    fn test_round_close_time() {
        assert_eq!(round_close_time(1014, 10), 1010);
        assert_eq!(round_close_time(1010, 10), 1010);
        assert_eq!(round_close_time(1014, 0), 1014);
    }
}
