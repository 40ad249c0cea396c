//! This module encodes and decodes the ledger's base58-check
//! encodings: classic account addresses and seeds.

pub mod exceptions;
pub mod utils;

use strum::IntoEnumIterator;

use crate::constants::CryptoAlgorithm;
use crate::core::addresscodec::exceptions::XRPLAddressCodecException;
use crate::core::addresscodec::utils::*;
use crate::skip_err;

/// Map the algorithm to the seed prefix.
fn algorithm_to_prefix<'a>(algo: &CryptoAlgorithm) -> &'a [u8] {
    match algo {
        CryptoAlgorithm::ED25519 => &ED25519_SEED_PREFIX,
        CryptoAlgorithm::SECP256K1 => &FAMILY_SEED_PREFIX,
    }
}

/// Returns the base58 encoding of the bytestring, with the given data
/// prefix (which indicates type) and while ensuring the bytestring is
/// the expected length. The checksum is a double-SHA-256 truncated to
/// 4 bytes, handled by [`bs58`]'s check mode.
fn encode_base58(
    bytestring: &[u8],
    prefix: &[u8],
    expected_length: usize,
) -> Result<String, XRPLAddressCodecException> {
    if expected_length != bytestring.len() {
        Err(XRPLAddressCodecException::UnexpectedPayloadLength {
            expected: expected_length,
            found: bytestring.len(),
        })
    } else {
        let mut payload = vec![];

        payload.extend_from_slice(prefix);
        payload.extend_from_slice(bytestring);

        Ok(bs58::encode(payload)
            .with_alphabet(&XRPL_ALPHABET)
            .with_check()
            .into_string())
    }
}

/// Returns the byte decoding of the base58-check-encoded string,
/// stripped of the expected prefix.
fn decode_base58(
    b58_string: &str,
    prefix: &[u8],
) -> Result<Vec<u8>, XRPLAddressCodecException> {
    let prefix_len = prefix.len();
    let decoded = bs58::decode(b58_string)
        .with_alphabet(&XRPL_ALPHABET)
        .with_check(None)
        .into_vec()?;

    if decoded.len() < prefix_len || &decoded[..prefix_len] != prefix {
        Err(XRPLAddressCodecException::InvalidEncodingPrefix)
    } else {
        Ok(decoded[prefix_len..].to_vec())
    }
}

/// Returns an encoded seed.
pub fn encode_seed(
    entropy: [u8; SEED_LENGTH],
    encoding_type: CryptoAlgorithm,
) -> Result<String, XRPLAddressCodecException> {
    encode_base58(&entropy, algorithm_to_prefix(&encoding_type), SEED_LENGTH)
}

/// Returns the entropy and algorithm of an encoded seed.
pub fn decode_seed(
    seed: &str,
) -> Result<([u8; SEED_LENGTH], CryptoAlgorithm), XRPLAddressCodecException> {
    let mut result: Option<Result<Vec<u8>, XRPLAddressCodecException>> = None;
    let mut algo: Option<CryptoAlgorithm> = None;

    for a in CryptoAlgorithm::iter() {
        let decode = decode_base58(seed, algorithm_to_prefix(&a));
        result = Some(skip_err!(decode));
        algo = Some(a);
    }

    match result {
        Some(Ok(val)) => {
            let decoded: [u8; SEED_LENGTH] = val
                .try_into()
                .map_err(|_| XRPLAddressCodecException::InvalidSeedEntropyLength {
                    length: SEED_LENGTH,
                })?;
            Ok((decoded, algo.expect("decode_seed")))
        }
        Some(Err(_)) | None => Err(XRPLAddressCodecException::UnknownSeedEncoding),
    }
}

/// Returns the classic address encoding of an account id as a base58
/// string.
pub fn encode_classic_address(
    bytestring: &[u8],
) -> Result<String, XRPLAddressCodecException> {
    encode_base58(
        bytestring,
        &CLASSIC_ADDRESS_PREFIX,
        CLASSIC_ADDRESS_ID_LENGTH,
    )
}

/// Returns the decoded 20 bytes of the classic address.
pub fn decode_classic_address(
    classic_address: &str,
) -> Result<Vec<u8>, XRPLAddressCodecException> {
    let decoded = decode_base58(classic_address, &CLASSIC_ADDRESS_PREFIX)?;

    if decoded.len() != CLASSIC_ADDRESS_ID_LENGTH {
        Err(XRPLAddressCodecException::InvalidCAddressIdLength {
            length: decoded.len(),
        })
    } else {
        Ok(decoded)
    }
}

/// Returns whether the string decodes as a classic address.
pub fn is_valid_classic_address(classic_address: &str) -> bool {
    decode_classic_address(classic_address).is_ok()
}

#[cfg(test)]
mod test {
    use super::*;

    const CLASSIC_ADDRESS: &str = "rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyb";

    #[test]
    fn test_classic_address_round_trip() {
        let decoded = decode_classic_address(CLASSIC_ADDRESS).unwrap();
        assert_eq!(decoded.len(), CLASSIC_ADDRESS_ID_LENGTH);
        assert_eq!(encode_classic_address(&decoded).unwrap(), CLASSIC_ADDRESS);
    }

    #[test]
    fn test_is_valid_classic_address() {
        assert!(is_valid_classic_address(CLASSIC_ADDRESS));
        // Flipped character breaks the checksum.
        assert!(!is_valid_classic_address("rU4EE1FskCPJw5QkLx1iGgdWiJa6HeqYyc"));
        assert!(!is_valid_classic_address("not an address"));
    }

    #[test]
    fn test_seed_round_trip() {
        let entropy: [u8; SEED_LENGTH] = [
            207, 45, 227, 120, 251, 221, 126, 46, 232, 125, 72, 109, 251, 90, 123, 255,
        ];

        for algo in [CryptoAlgorithm::ED25519, CryptoAlgorithm::SECP256K1] {
            let seed = encode_seed(entropy, algo).unwrap();
            let (decoded, decoded_algo) = decode_seed(&seed).unwrap();
            assert_eq!(decoded, entropy);
            assert_eq!(decoded_algo, algo);
        }
    }

    #[test]
    fn test_known_secp256k1_seed() {
        let entropy: [u8; SEED_LENGTH] = [
            207, 45, 227, 120, 251, 221, 126, 46, 232, 125, 72, 109, 251, 90, 123, 255,
        ];
        assert_eq!(
            encode_seed(entropy, CryptoAlgorithm::SECP256K1).unwrap(),
            "sn259rEFXrQrWyx3Q7XneWcwV6dfL"
        );
    }
}
