//! SS58 address encoding and account key helpers.

use std::str::FromStr;
use subxt::utils::AccountId32;

const SS58_PREFIX: &[u8] = b"SS58PRE";

/// Generic Substrate prefix, used when a prefix cannot be encoded.
const GENERIC_PREFIX: u8 = 42;

/// Encode raw account bytes with a specific SS58 prefix.
pub fn encode_ss58(account: &[u8; 32], prefix: u16) -> String {
    let mut payload = Vec::with_capacity(36);

    if prefix < 64 {
        payload.push(prefix as u8);
    } else if prefix < 16384 {
        let first = ((prefix & 0x00FC) >> 2) as u8 | 0x40;
        let second = ((prefix >> 8) as u8) | ((prefix & 0x03) << 6) as u8;
        payload.push(first);
        payload.push(second);
    } else {
        payload.push(GENERIC_PREFIX);
    }

    payload.extend_from_slice(account);

    let mut checksum_input = Vec::with_capacity(SS58_PREFIX.len() + payload.len());
    checksum_input.extend_from_slice(SS58_PREFIX);
    checksum_input.extend_from_slice(&payload);
    let hash = sp_crypto_hashing::blake2_512(&checksum_input);

    payload.push(hash[0]);
    payload.push(hash[1]);

    bs58::encode(payload).into_string()
}

/// Parse an SS58 address of any prefix.
pub fn parse_address(address: &str) -> Option<AccountId32> {
    AccountId32::from_str(address.trim()).ok()
}

/// Account id at the tail of a `Blake2_128Concat` storage key.
pub fn account_from_key(key_bytes: &[u8]) -> Option<[u8; 32]> {
    let start = key_bytes.len().checked_sub(32)?;
    key_bytes[start..].try_into().ok()
}
