//! Fabricated identifiers.
//!
//! Vault addresses, transaction hashes, and wallet addresses in the demo
//! are opaque strings built from a millisecond timestamp and random base36
//! characters. They avoid collisions in practice and promise nothing else.

use rand::Rng;

use crate::config::{
    RANDOM_SUFFIX_LEN, TX_HASH_PREFIX, VAULT_ADDRESS_PREFIX, WALLET_ADDRESS_PREFIX,
    WALLET_ADDRESS_RANDOM_LEN,
};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Returns `len` random lowercase base36 characters.
pub fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// `vault_<ms>_<random>`
pub fn vault_address(now_ms: u64) -> String {
    format!(
        "{VAULT_ADDRESS_PREFIX}{now_ms}_{}",
        random_base36(RANDOM_SUFFIX_LEN)
    )
}

/// `tx_<ms>_<random>`
pub fn tx_hash(now_ms: u64) -> String {
    format!("{TX_HASH_PREFIX}{now_ms}_{}", random_base36(RANDOM_SUFFIX_LEN))
}

/// `addr1<random>`
pub fn wallet_address() -> String {
    format!(
        "{WALLET_ADDRESS_PREFIX}{}",
        random_base36(WALLET_ADDRESS_RANDOM_LEN)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_has_requested_length_and_alphabet() {
        let s = random_base36(64);
        assert_eq!(s.len(), 64);
        assert!(s.bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn vault_address_embeds_timestamp() {
        let addr = vault_address(1_700_000_000_123);
        assert!(addr.starts_with("vault_1700000000123_"));
        assert_eq!(addr.len(), "vault_1700000000123_".len() + RANDOM_SUFFIX_LEN);
    }

    #[test]
    fn tx_hashes_differ_within_one_millisecond() {
        let a = tx_hash(5);
        let b = tx_hash(5);
        assert!(a.starts_with("tx_5_"));
        assert_ne!(a, b);
    }

    #[test]
    fn wallet_address_shape() {
        let addr = wallet_address();
        assert!(addr.starts_with("addr1"));
        assert_eq!(addr.len(), 5 + WALLET_ADDRESS_RANDOM_LEN);
    }
}
