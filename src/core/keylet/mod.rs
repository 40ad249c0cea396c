//! Deterministic derivation of 256-bit ledger-entry indices.
//!
//! Every keylet hashes a two-byte namespace followed by the entry's
//! identifying inputs with SHA-512-half. Two inputs map to the same
//! index iff they are bit-equal.

use crate::core::binarycodec::types::currency::LP_TOKEN_LEADING_BYTE;
use crate::core::binarycodec::types::{AccountId, Currency, Hash256, Issue};
use crate::core::keypairs::utils::sha512_first_half;

/// Ledger namespaces, one ASCII discriminant per entry family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
enum LedgerNameSpace {
    Account = b'a' as u16,
    OwnerDirectory = b'O' as u16,
    TrustLine = b'r' as u16,
    Offer = b'o' as u16,
    Check = b'C' as u16,
    Escrow = b'u' as u16,
    PayChannel = b'x' as u16,
    Ticket = b'T' as u16,
    SignerList = b'S' as u16,
    DepositPreauth = b'p' as u16,
    Amm = b'A' as u16,
    NfTokenPage = b'n' as u16,
    NfTokenOffer = b'q' as u16,
    Delegate = b'D' as u16,
    Amendments = b'f' as u16,
    FeeSettings = b'e' as u16,
}

/// Single byte in front of the asset pair when deriving the AMM
/// pseudo-account id.
const AMM_ACCOUNT_NAMESPACE: u8 = 0x41;

fn index_hash(space: LedgerNameSpace, args: &[&[u8]]) -> Hash256 {
    let mut message = (space as u16).to_be_bytes().to_vec();
    for arg in args {
        message.extend_from_slice(arg);
    }

    Hash256(sha512_first_half(&message))
}

/// The AccountRoot entry of an account.
pub fn account(id: &AccountId) -> Hash256 {
    index_hash(LedgerNameSpace::Account, &[id.as_bytes()])
}

/// The directory of objects an account owns.
pub fn owner_dir(id: &AccountId) -> Hash256 {
    index_hash(LedgerNameSpace::OwnerDirectory, &[id.as_bytes()])
}

/// A trust line between two accounts in one currency. The line is
/// shared: both parties derive the same index.
pub fn line(a: &AccountId, b: &AccountId, currency: &Currency) -> Hash256 {
    let (low, high) = if a < b { (a, b) } else { (b, a) };
    index_hash(
        LedgerNameSpace::TrustLine,
        &[low.as_bytes(), high.as_bytes(), currency.as_bytes()],
    )
}

/// An offer placed by an account at a sequence number.
pub fn offer(id: &AccountId, sequence: u32) -> Hash256 {
    index_hash(
        LedgerNameSpace::Offer,
        &[id.as_bytes(), &sequence.to_be_bytes()],
    )
}

/// A check written by an account at a sequence number.
pub fn check(id: &AccountId, sequence: u32) -> Hash256 {
    index_hash(
        LedgerNameSpace::Check,
        &[id.as_bytes(), &sequence.to_be_bytes()],
    )
}

/// An escrow created by an account at a sequence number.
pub fn escrow(id: &AccountId, sequence: u32) -> Hash256 {
    index_hash(
        LedgerNameSpace::Escrow,
        &[id.as_bytes(), &sequence.to_be_bytes()],
    )
}

/// A payment channel from an account to a destination.
pub fn payment_channel(id: &AccountId, destination: &AccountId, sequence: u32) -> Hash256 {
    index_hash(
        LedgerNameSpace::PayChannel,
        &[id.as_bytes(), destination.as_bytes(), &sequence.to_be_bytes()],
    )
}

/// A ticket issued by an account.
pub fn ticket(id: &AccountId, ticket_sequence: u32) -> Hash256 {
    index_hash(
        LedgerNameSpace::Ticket,
        &[id.as_bytes(), &ticket_sequence.to_be_bytes()],
    )
}

/// An account's signer list.
pub fn signers(id: &AccountId) -> Hash256 {
    index_hash(
        LedgerNameSpace::SignerList,
        &[id.as_bytes(), &0u32.to_be_bytes()],
    )
}

/// A deposit preauthorization from an owner to an authorized sender.
pub fn deposit_preauth(owner: &AccountId, authorized: &AccountId) -> Hash256 {
    index_hash(
        LedgerNameSpace::DepositPreauth,
        &[owner.as_bytes(), authorized.as_bytes()],
    )
}

/// An account's page of NFTokens.
pub fn nftoken_page(id: &AccountId) -> Hash256 {
    index_hash(LedgerNameSpace::NfTokenPage, &[id.as_bytes()])
}

/// An offer to buy or sell an NFToken.
pub fn nftoken_offer(id: &AccountId, sequence: u32) -> Hash256 {
    index_hash(
        LedgerNameSpace::NfTokenOffer,
        &[id.as_bytes(), &sequence.to_be_bytes()],
    )
}

/// A delegation of transaction permissions.
pub fn delegate(id: &AccountId, authorize: &AccountId) -> Hash256 {
    index_hash(
        LedgerNameSpace::Delegate,
        &[id.as_bytes(), authorize.as_bytes()],
    )
}

/// The singleton amendment registry.
pub fn amendments() -> Hash256 {
    index_hash(LedgerNameSpace::Amendments, &[])
}

/// The singleton fee settings.
pub fn fee_settings() -> Hash256 {
    index_hash(LedgerNameSpace::FeeSettings, &[])
}

/// Orders the asset pair lexicographically on canonical bytes; the
/// pair (A, B) and (B, A) name the same AMM.
fn ordered_pair_bytes(asset: &Issue, asset2: &Issue) -> Vec<u8> {
    let (a, b) = (asset.canonical_bytes(), asset2.canonical_bytes());
    let (first, second) = if a <= b { (&a, &b) } else { (&b, &a) };

    let mut bytes = Vec::with_capacity(first.len() + second.len());
    bytes.extend_from_slice(first);
    bytes.extend_from_slice(second);
    bytes
}

/// The AMM entry for an asset pair.
pub fn amm(asset: &Issue, asset2: &Issue) -> Hash256 {
    index_hash(LedgerNameSpace::Amm, &[&ordered_pair_bytes(asset, asset2)])
}

/// The deterministic pseudo-account holding an AMM's reserves.
pub fn amm_account_id(asset: &Issue, asset2: &Issue) -> AccountId {
    let mut message = vec![AMM_ACCOUNT_NAMESPACE];
    message.extend_from_slice(&ordered_pair_bytes(asset, asset2));

    let digest = sha512_first_half(&message);
    AccountId::from_bytes(&digest[..20]).expect("20-byte slice")
}

/// The LP-token currency code for an AMM: the 0x03 leading byte and
/// 19 bytes of the pair digest.
pub fn amm_lp_token_currency(asset: &Issue, asset2: &Issue) -> Currency {
    let mut message = vec![LP_TOKEN_LEADING_BYTE];
    message.extend_from_slice(&ordered_pair_bytes(asset, asset2));

    let digest = sha512_first_half(&message);
    let mut code = [0u8; 20];
    code[0] = LP_TOKEN_LEADING_BYTE;
    code[1..].copy_from_slice(&digest[..19]);
    Currency(code)
}

#[cfg(test)]
mod test {
    use super::*;

    fn alice() -> AccountId {
        "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb".parse().unwrap()
    }

    fn bob() -> AccountId {
        "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".parse().unwrap()
    }

    #[test]
    fn test_distinct_namespaces() {
        let id = alice();
        let indices = [
            account(&id),
            owner_dir(&id),
            signers(&id),
            nftoken_page(&id),
            check(&id, 1),
            offer(&id, 1),
            escrow(&id, 1),
            ticket(&id, 1),
        ];

        for (i, a) in indices.iter().enumerate() {
            for b in indices.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(account(&alice()), account(&alice()));
        assert_ne!(account(&alice()), account(&bob()));
        assert_ne!(check(&alice(), 1), check(&alice(), 2));
    }

    #[test]
    fn test_trust_line_is_symmetric() {
        let usd: Currency = "USD".parse().unwrap();
        assert_eq!(line(&alice(), &bob(), &usd), line(&bob(), &alice(), &usd));
    }

    #[test]
    fn test_amm_pair_is_symmetric() {
        let xrp = Issue::xrp();
        let usd = Issue::issued("USD".parse().unwrap(), alice());

        assert_eq!(amm(&xrp, &usd), amm(&usd, &xrp));
        assert_eq!(amm_account_id(&xrp, &usd), amm_account_id(&usd, &xrp));
        assert_eq!(
            amm_lp_token_currency(&xrp, &usd),
            amm_lp_token_currency(&usd, &xrp)
        );
    }

    #[test]
    fn test_lp_token_currency_leading_byte() {
        let xrp = Issue::xrp();
        let usd = Issue::issued("USD".parse().unwrap(), alice());
        let lp_currency = amm_lp_token_currency(&xrp, &usd);

        assert_eq!(lp_currency.as_bytes()[0], LP_TOKEN_LEADING_BYTE);
        assert!(!lp_currency.is_xrp());
    }
}
