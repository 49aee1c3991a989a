//! # Time-Locked Vault
//!
//! [`TimeLockedVault`] wraps a [`VaultState`] with the injected clock and
//! latency it needs to behave like a (pretend) on-chain contract:
//!
//! ```text
//!  empty ──generate_address──► addressed ──configure_unlock_delay──► locked
//!                                                                      │
//!                      ◄──────────── withdraw ──── unlocked ◄── now ≥ unlock
//! ```
//!
//! Deposits overwrite whatever is in the vault; the model performs no
//! balance or positivity checks. Policy (one deposit at a time, no
//! reconfiguration while funded, positive amounts) belongs to the caller.
//! Withdrawal is the only operation that can fail.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::VaultError;
use super::lock::{format_remaining, UnlockDelay};
use super::state::{VaultState, VaultStatus};
use crate::ada::Lovelace;
use crate::clock::Clock;
use crate::config::LatencyProfile;
use crate::ids;
use crate::latency::SharedLatency;

/// Result of a successful deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    /// Fabricated transaction hash.
    pub tx_hash: String,
    /// Address of the vault that received the deposit, if one was generated.
    pub vault_address: Option<String>,
    /// The amount that was deposited.
    pub amount: Lovelace,
    /// When the deposit was recorded (ms since epoch).
    pub timestamp_ms: u64,
}

/// Result of a successful withdrawal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    /// Fabricated transaction hash.
    pub tx_hash: String,
    /// The full amount that left the vault.
    pub amount: Lovelace,
    /// Who received it.
    pub recipient: String,
    /// When the withdrawal was recorded (ms since epoch).
    pub timestamp_ms: u64,
}

/// A single time-locked vault owned by one session.
#[derive(Debug)]
pub struct TimeLockedVault {
    state: VaultState,
    clock: Arc<dyn Clock>,
    latency: SharedLatency,
    profile: LatencyProfile,
}

impl TimeLockedVault {
    /// Creates an empty vault: no address, no unlock time, nothing deposited.
    pub fn new(clock: Arc<dyn Clock>, latency: SharedLatency, profile: LatencyProfile) -> Self {
        Self {
            state: VaultState::default(),
            clock,
            latency,
            profile,
        }
    }

    /// Read-only view of the raw fields.
    pub fn state(&self) -> &VaultState {
        &self.state
    }

    /// Generates a fresh `vault_<ms>_<random>` address, replacing any
    /// previous one, and returns it.
    pub fn generate_address(&mut self) -> &str {
        let address = ids::vault_address(self.clock.now_ms());
        tracing::debug!(%address, "vault address generated");
        self.state.address.insert(address)
    }

    /// Sets `unlock_time = now + delay`, overwriting any previous value,
    /// and returns the new unlock time.
    pub fn configure_unlock_delay(&mut self, delay: UnlockDelay) -> u64 {
        let unlock = self.clock.now_ms().saturating_add(delay.total_ms());
        self.state.unlock_time_ms = Some(unlock);
        tracing::info!(%delay, unlock_time_ms = unlock, "unlock time configured");
        unlock
    }

    /// Shorthand for a delay of whole hours.
    pub fn set_unlock_hours(&mut self, hours: u64) -> u64 {
        self.configure_unlock_delay(UnlockDelay::from_hours(hours))
    }

    pub fn is_unlocked(&self) -> bool {
        self.state.is_unlocked_at(self.clock.now_ms())
    }

    /// Milliseconds until unlock; zero once unlocked or when unset.
    pub fn time_remaining(&self) -> u64 {
        self.state.time_remaining_at(self.clock.now_ms())
    }

    /// Countdown text, e.g. `"2h 5m 10s"`, or `"Unlocked"` at zero.
    pub fn format_time_remaining(&self) -> String {
        format_remaining(self.time_remaining())
    }

    /// Records `amount` from `depositor`, then waits out the simulated
    /// transaction latency.
    ///
    /// Overwrites any amount already held.
    pub async fn deposit(&mut self, amount: Lovelace, depositor: &str) -> DepositReceipt {
        if self.state.is_funded() {
            tracing::warn!(
                previous = %self.state.deposited,
                "deposit overwrites a funded vault"
            );
        }
        self.state.deposited = amount;
        self.state.depositor = Some(depositor.to_string());

        self.latency.pause(self.profile.deposit).await;

        let now = self.clock.now_ms();
        let receipt = DepositReceipt {
            tx_hash: ids::tx_hash(now),
            vault_address: self.state.address.clone(),
            amount,
            timestamp_ms: now,
        };
        tracing::info!(tx_hash = %receipt.tx_hash, %amount, depositor, "deposit recorded");
        receipt
    }

    /// Empties the vault to `recipient`, then waits out the simulated
    /// transaction latency.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Locked`] before the unlock time (or when none
    /// is set) and [`VaultError::NoFunds`] when the vault is empty. The
    /// vault is untouched in both cases.
    pub async fn withdraw(&mut self, recipient: &str) -> Result<WithdrawalReceipt, VaultError> {
        if !self.is_unlocked() {
            return Err(VaultError::Locked);
        }
        if !self.state.is_funded() {
            return Err(VaultError::NoFunds);
        }

        let amount = std::mem::take(&mut self.state.deposited);

        self.latency.pause(self.profile.withdraw).await;

        let now = self.clock.now_ms();
        let receipt = WithdrawalReceipt {
            tx_hash: ids::tx_hash(now),
            amount,
            recipient: recipient.to_string(),
            timestamp_ms: now,
        };
        tracing::info!(tx_hash = %receipt.tx_hash, %amount, recipient, "withdrawal recorded");
        Ok(receipt)
    }

    /// Snapshot of every field plus the derived lock status, as of now.
    pub fn status(&self) -> VaultStatus {
        self.state.status_at(self.clock.now_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::latency::NoLatency;

    const T0: u64 = 1_700_000_000_000;

    fn vault() -> (TimeLockedVault, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T0));
        let v = TimeLockedVault::new(
            clock.clone(),
            Arc::new(NoLatency),
            LatencyProfile::default(),
        );
        (v, clock)
    }

    #[test]
    fn new_vault_is_empty() {
        let (v, _) = vault();
        let s = v.state();
        assert!(s.address().is_none());
        assert!(s.unlock_time_ms().is_none());
        assert!(s.deposited().is_zero());
        assert!(s.depositor().is_none());
        assert!(!v.is_unlocked());
        assert_eq!(v.time_remaining(), 0);
    }

    #[test]
    fn generate_address_overwrites() {
        let (mut v, clock) = vault();
        let first = v.generate_address().to_string();
        assert!(first.starts_with(&format!("vault_{T0}_")));

        clock.advance(1);
        let second = v.generate_address().to_string();
        assert_ne!(first, second);
        assert_eq!(v.state().address(), Some(second.as_str()));
    }

    #[test]
    fn configure_computes_absolute_unlock_time() {
        let (mut v, _) = vault();
        let unlock = v.configure_unlock_delay(UnlockDelay::new(1, 2, 3, 4, 5));
        let expected = T0 + ((30 + 2) * 86_400 + 3 * 3_600 + 4 * 60 + 5) * 1_000;
        assert_eq!(unlock, expected);
        assert_eq!(v.state().unlock_time_ms(), Some(expected));
    }

    #[test]
    fn reconfigure_overwrites_previous_unlock_time() {
        let (mut v, clock) = vault();
        v.configure_unlock_delay(UnlockDelay::from_hours(5));
        clock.advance(1_000);
        let unlock = v.configure_unlock_delay(UnlockDelay::from_seconds(1));
        assert_eq!(unlock, T0 + 2_000);
    }

    #[test]
    fn set_unlock_hours_is_hour_delay() {
        let (mut v, _) = vault();
        assert_eq!(v.set_unlock_hours(2), T0 + 7_200_000);
    }

    #[test]
    fn locked_after_positive_delay_until_time_reaches_unlock() {
        let (mut v, clock) = vault();
        v.configure_unlock_delay(UnlockDelay::from_seconds(10));
        assert!(!v.is_unlocked());
        assert_eq!(v.format_time_remaining(), "10s");

        clock.advance(9_999);
        assert!(!v.is_unlocked());

        clock.advance(1);
        assert!(v.is_unlocked());
        assert_eq!(v.format_time_remaining(), "Unlocked");
    }

    #[test]
    fn zero_delay_unlocks_immediately() {
        let (mut v, _) = vault();
        v.configure_unlock_delay(UnlockDelay::default());
        assert!(v.is_unlocked());
    }

    #[tokio::test]
    async fn deposit_overwrites_without_checks() {
        let (mut v, _) = vault();
        v.generate_address();

        let r1 = v.deposit(Lovelace::from_ada(10), "addrA").await;
        assert_eq!(r1.amount, Lovelace::from_ada(10));
        assert!(r1.tx_hash.starts_with("tx_"));
        assert_eq!(r1.vault_address.as_deref(), v.state().address());

        let r2 = v.deposit(Lovelace::ZERO, "addrB").await;
        assert_eq!(r2.amount, Lovelace::ZERO);
        assert_eq!(v.state().deposited(), Lovelace::ZERO);
        assert_eq!(v.state().depositor(), Some("addrB"));
    }

    #[tokio::test]
    async fn withdraw_locked_leaves_vault_untouched() {
        let (mut v, _) = vault();
        v.configure_unlock_delay(UnlockDelay::from_seconds(10));
        v.deposit(Lovelace::from_ada(50), "addrA").await;

        assert_eq!(v.withdraw("addrA").await, Err(VaultError::Locked));
        assert_eq!(v.state().deposited(), Lovelace::from_ada(50));
    }

    #[tokio::test]
    async fn withdraw_without_unlock_time_is_locked() {
        let (mut v, clock) = vault();
        v.deposit(Lovelace::from_ada(1), "addrA").await;
        clock.advance(u64::MAX / 2);
        assert_eq!(v.withdraw("addrA").await, Err(VaultError::Locked));
    }

    #[tokio::test]
    async fn withdraw_empty_unlocked_is_no_funds() {
        let (mut v, _) = vault();
        v.configure_unlock_delay(UnlockDelay::default());
        assert_eq!(v.withdraw("addrA").await, Err(VaultError::NoFunds));
    }

    #[tokio::test]
    async fn withdraw_zeroes_amount_and_keeps_depositor() {
        let (mut v, clock) = vault();
        v.configure_unlock_delay(UnlockDelay::from_seconds(1));
        v.deposit(Lovelace::from_ada(50), "addrA").await;
        clock.advance(1_000);

        let receipt = v.withdraw("addrB").await.expect("unlocked and funded");
        assert_eq!(receipt.amount, Lovelace::from_ada(50));
        assert_eq!(receipt.recipient, "addrB");
        assert!(v.state().deposited().is_zero());
        assert_eq!(v.state().depositor(), Some("addrA"));

        // Second withdrawal finds nothing.
        assert_eq!(v.withdraw("addrB").await, Err(VaultError::NoFunds));
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_latency_applies_to_deposit() {
        use crate::latency::SimulatedLatency;
        use std::time::Duration;

        let clock = Arc::new(ManualClock::new(T0));
        let mut v = TimeLockedVault::new(
            clock,
            Arc::new(SimulatedLatency),
            LatencyProfile::default(),
        );
        let start = tokio::time::Instant::now();
        v.deposit(Lovelace(1), "addrA").await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
