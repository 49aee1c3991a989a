//! # Mock Wallet
//!
//! Stand-in for a browser wallet extension. "Connecting" waits out a
//! simulated handshake and then invents an address and a balance. The
//! balance is for display only: deposits do not debit it.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ada::{Lovelace, LOVELACE_PER_ADA};
use crate::config::{MOCK_BALANCE_MAX_ADA, MOCK_BALANCE_MIN_ADA, SHORT_ADDRESS_EDGE};
use crate::ids;
use crate::latency::SharedLatency;

/// A connected wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConnection {
    pub address: String,
    pub balance: Lovelace,
}

impl WalletConnection {
    /// The address abbreviated for display.
    pub fn short_address(&self) -> String {
        short_address(&self.address)
    }
}

/// Abbreviates an address to `first10...last10`. Short addresses are
/// returned whole.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= SHORT_ADDRESS_EDGE * 2 {
        return address.to_string();
    }
    let head: String = chars[..SHORT_ADDRESS_EDGE].iter().collect();
    let tail: String = chars[chars.len() - SHORT_ADDRESS_EDGE..].iter().collect();
    format!("{head}...{tail}")
}

/// Connects mock wallets.
#[derive(Debug, Clone)]
pub struct MockWallet {
    latency: SharedLatency,
    handshake: Duration,
}

impl MockWallet {
    pub fn new(latency: SharedLatency, handshake: Duration) -> Self {
        Self { latency, handshake }
    }

    /// Simulates the wallet handshake and returns a fresh connection with a
    /// random `addr1...` address and a balance in `[100, 1100)` ADA.
    pub async fn connect(&self) -> WalletConnection {
        self.latency.pause(self.handshake).await;

        let balance = Lovelace(rand::thread_rng().gen_range(
            MOCK_BALANCE_MIN_ADA * LOVELACE_PER_ADA..MOCK_BALANCE_MAX_ADA * LOVELACE_PER_ADA,
        ));
        let conn = WalletConnection {
            address: ids::wallet_address(),
            balance,
        };
        tracing::info!(address = %conn.short_address(), %balance, "wallet connected");
        conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::NoLatency;
    use std::sync::Arc;

    #[tokio::test]
    async fn connect_yields_address_and_bounded_balance() {
        let wallet = MockWallet::new(Arc::new(NoLatency), Duration::ZERO);
        for _ in 0..32 {
            let conn = wallet.connect().await;
            assert!(conn.address.starts_with("addr1"));
            assert!(conn.balance >= Lovelace::from_ada(MOCK_BALANCE_MIN_ADA));
            assert!(conn.balance < Lovelace::from_ada(MOCK_BALANCE_MAX_ADA));
        }
    }

    #[test]
    fn short_address_keeps_edges() {
        let addr = "addr1abcdefghijklmnopqrstuvwxyz0123456789";
        assert_eq!(short_address(addr), "addr1abcde...0123456789");
    }

    #[test]
    fn short_address_leaves_short_input_alone() {
        assert_eq!(short_address("addr1xyz"), "addr1xyz");
        assert_eq!(short_address(""), "");
    }
}
