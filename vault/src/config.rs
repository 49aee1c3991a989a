//! # Demo Configuration & Constants
//!
//! Every magic number in the vault demo lives here: simulated delays,
//! identifier prefixes, validation thresholds, default ports. The runtime
//! knobs that the binary exposes (ports, instant mode) start from these
//! defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Time Arithmetic
// ---------------------------------------------------------------------------

/// Milliseconds in one second.
pub const MS_PER_SECOND: u64 = 1_000;

/// Milliseconds in one minute.
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;

/// Milliseconds in one hour.
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Milliseconds in one day.
pub const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// A "month" in an unlock delay is always 30 days. Calendar months are
/// not modelled.
pub const DAYS_PER_MONTH: u64 = 30;

/// Largest minutes or seconds value the unlock-delay form accepts.
pub const MAX_CLOCK_FIELD: u64 = 59;

/// Seconds pre-filled in the unlock-delay form.
pub const DEFAULT_UNLOCK_DELAY_SECONDS: u64 = 10;

/// Rendered by the countdown once the unlock time has passed.
pub const UNLOCKED_LABEL: &str = "Unlocked";

// ---------------------------------------------------------------------------
// Simulated Latency
// ---------------------------------------------------------------------------

/// Nominal delay of a simulated deposit transaction.
pub const DEPOSIT_LATENCY: Duration = Duration::from_millis(2_000);

/// Nominal delay of a simulated withdrawal transaction.
pub const WITHDRAW_LATENCY: Duration = Duration::from_millis(2_000);

/// Nominal delay of the mock wallet handshake.
pub const WALLET_CONNECT_LATENCY: Duration = Duration::from_millis(1_500);

/// Nominal delay of the local sign-in / sign-up check.
pub const AUTH_LATENCY: Duration = Duration::from_millis(800);

/// How often observers refresh the countdown. Display only, never mutates.
pub const STATUS_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Prefix of generated vault addresses: `vault_<ms>_<random>`.
pub const VAULT_ADDRESS_PREFIX: &str = "vault_";

/// Prefix of fabricated transaction hashes: `tx_<ms>_<random>`.
pub const TX_HASH_PREFIX: &str = "tx_";

/// Prefix of mock wallet addresses.
pub const WALLET_ADDRESS_PREFIX: &str = "addr1";

/// Number of random base36 characters after the wallet address prefix.
pub const WALLET_ADDRESS_RANDOM_LEN: usize = 38;

/// Number of random base36 characters in vault addresses and tx hashes.
pub const RANDOM_SUFFIX_LEN: usize = 11;

// ---------------------------------------------------------------------------
// Wallet
// ---------------------------------------------------------------------------

/// Lower bound (inclusive) of a mock wallet balance, in ADA.
pub const MOCK_BALANCE_MIN_ADA: u64 = 100;

/// Upper bound (exclusive) of a mock wallet balance, in ADA.
pub const MOCK_BALANCE_MAX_ADA: u64 = 1_100;

/// Characters kept on each side when abbreviating a wallet address.
pub const SHORT_ADDRESS_EDGE: usize = 10;

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Session key whose presence marks the user as signed in.
pub const AUTH_SESSION_KEY: &str = "auth_email";

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Email shape accepted by the local authenticator. Deliberately loose.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// File name of the file-backed session store inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Default port of the local development server.
pub const DEFAULT_DEV_SERVER_PORT: u16 = 3000;

/// Default port of the Prometheus metrics endpoint.
pub const DEFAULT_METRICS_PORT: u16 = 3001;

/// Network name printed by the deployment script.
pub const DEPLOY_NETWORK_NAME: &str = "Cardano Preprod Testnet";

// ---------------------------------------------------------------------------
// Latency Profile
// ---------------------------------------------------------------------------

/// The set of nominal delays the demo simulates.
///
/// The default profile uses the constants above. `instant()` zeroes every
/// delay, which the binary exposes as `--instant` for scripted runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyProfile {
    /// Delay of a deposit.
    pub deposit: Duration,
    /// Delay of a withdrawal.
    pub withdraw: Duration,
    /// Delay of a wallet connection.
    pub wallet_connect: Duration,
    /// Delay of a sign-in or sign-up.
    pub auth: Duration,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            deposit: DEPOSIT_LATENCY,
            withdraw: WITHDRAW_LATENCY,
            wallet_connect: WALLET_CONNECT_LATENCY,
            auth: AUTH_LATENCY,
        }
    }
}

impl LatencyProfile {
    /// A profile with every delay set to zero.
    pub fn instant() -> Self {
        Self {
            deposit: Duration::ZERO,
            withdraw: Duration::ZERO,
            wallet_connect: Duration::ZERO,
            auth: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_units_chain() {
        assert_eq!(MS_PER_MINUTE, 60_000);
        assert_eq!(MS_PER_HOUR, 3_600_000);
        assert_eq!(MS_PER_DAY, 86_400_000);
    }

    #[test]
    fn test_default_profile_matches_constants() {
        let p = LatencyProfile::default();
        assert_eq!(p.deposit, DEPOSIT_LATENCY);
        assert_eq!(p.withdraw, WITHDRAW_LATENCY);
        assert_eq!(p.wallet_connect, WALLET_CONNECT_LATENCY);
        assert_eq!(p.auth, AUTH_LATENCY);
    }

    #[test]
    fn test_instant_profile_is_zero() {
        let p = LatencyProfile::instant();
        assert!(p.deposit.is_zero());
        assert!(p.withdraw.is_zero());
        assert!(p.wallet_connect.is_zero());
        assert!(p.auth.is_zero());
    }

    #[test]
    fn test_balance_range_is_non_empty() {
        assert!(MOCK_BALANCE_MIN_ADA < MOCK_BALANCE_MAX_ADA);
    }
}
