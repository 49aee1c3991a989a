//! # Vault State & Status Snapshots
//!
//! [`VaultState`] is the plain data of a vault: address, unlock time,
//! deposited amount, depositor. It knows nothing about clocks; every
//! derived question takes `now_ms` explicitly, which makes the rules
//! trivially testable and lets the app layer recompute a fresh
//! [`VaultStatus`] from a published state without touching the live vault.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lock::format_remaining;
use crate::ada::Lovelace;

/// The raw fields of a time-locked vault.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultState {
    /// Opaque vault identifier. `None` until generated.
    pub(crate) address: Option<String>,

    /// Absolute unlock instant in ms since the epoch. `None` until
    /// configured; a vault without one never unlocks.
    pub(crate) unlock_time_ms: Option<u64>,

    /// Amount currently held. Zero means empty.
    pub(crate) deposited: Lovelace,

    /// Who made the last deposit. Survives withdrawal.
    pub(crate) depositor: Option<String>,
}

impl VaultState {
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn unlock_time_ms(&self) -> Option<u64> {
        self.unlock_time_ms
    }

    pub fn deposited(&self) -> Lovelace {
        self.deposited
    }

    pub fn depositor(&self) -> Option<&str> {
        self.depositor.as_deref()
    }

    /// `true` while the vault holds a non-zero amount.
    pub fn is_funded(&self) -> bool {
        !self.deposited.is_zero()
    }

    /// `true` iff an unlock time is set and `now_ms` has reached it.
    pub fn is_unlocked_at(&self, now_ms: u64) -> bool {
        match self.unlock_time_ms {
            Some(unlock) => now_ms >= unlock,
            None => false,
        }
    }

    /// Milliseconds until unlock, floored at zero. Zero when unset.
    pub fn time_remaining_at(&self, now_ms: u64) -> u64 {
        self.unlock_time_ms
            .map(|unlock| unlock.saturating_sub(now_ms))
            .unwrap_or(0)
    }

    /// Builds a read-only snapshot as seen at `now_ms`.
    pub fn status_at(&self, now_ms: u64) -> VaultStatus {
        let time_remaining_ms = self.time_remaining_at(now_ms);
        VaultStatus {
            address: self.address.clone(),
            deposited_amount: self.deposited,
            unlock_time: self.unlock_time_ms,
            unlock_at: self
                .unlock_time_ms
                .and_then(|ms| i64::try_from(ms).ok())
                .and_then(DateTime::<Utc>::from_timestamp_millis),
            is_unlocked: self.is_unlocked_at(now_ms),
            time_remaining_ms,
            time_remaining_formatted: format_remaining(time_remaining_ms),
            depositor: self.depositor.clone(),
        }
    }
}

/// Everything a display needs to know about a vault at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultStatus {
    pub address: Option<String>,
    pub deposited_amount: Lovelace,
    /// Unlock instant in ms since the epoch.
    pub unlock_time: Option<u64>,
    /// Same instant as `unlock_time`, as a UTC timestamp.
    pub unlock_at: Option<DateTime<Utc>>,
    pub is_unlocked: bool,
    pub time_remaining_ms: u64,
    pub time_remaining_formatted: String,
    pub depositor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(unlock: u64) -> VaultState {
        VaultState {
            address: Some("vault_1_abc".into()),
            unlock_time_ms: Some(unlock),
            ..VaultState::default()
        }
    }

    #[test]
    fn unset_unlock_time_is_locked_forever() {
        let s = VaultState::default();
        assert!(!s.is_unlocked_at(0));
        assert!(!s.is_unlocked_at(u64::MAX));
        assert_eq!(s.time_remaining_at(123), 0);
    }

    #[test]
    fn unlocks_exactly_at_unlock_time() {
        let s = configured(10_000);
        assert!(!s.is_unlocked_at(9_999));
        assert!(s.is_unlocked_at(10_000));
        assert!(s.is_unlocked_at(10_001));
    }

    #[test]
    fn remaining_is_floored_at_zero() {
        let s = configured(10_000);
        assert_eq!(s.time_remaining_at(4_000), 6_000);
        assert_eq!(s.time_remaining_at(20_000), 0);
    }

    #[test]
    fn status_snapshot_combines_fields() {
        let mut s = configured(1_700_000_090_000);
        s.deposited = Lovelace::from_ada(50);
        s.depositor = Some("addrA".into());

        let status = s.status_at(1_700_000_000_000);
        assert_eq!(status.address.as_deref(), Some("vault_1_abc"));
        assert_eq!(status.deposited_amount, Lovelace::from_ada(50));
        assert!(!status.is_unlocked);
        assert_eq!(status.time_remaining_ms, 90_000);
        assert_eq!(status.time_remaining_formatted, "1m 30s");
        assert_eq!(status.depositor.as_deref(), Some("addrA"));
        assert_eq!(
            status.unlock_at.map(|t| t.timestamp_millis()),
            Some(1_700_000_090_000)
        );
    }

    #[test]
    fn status_of_unlocked_vault() {
        let status = configured(500).status_at(500);
        assert!(status.is_unlocked);
        assert_eq!(status.time_remaining_formatted, "Unlocked");
    }

    #[test]
    fn funded_tracks_amount() {
        let mut s = VaultState::default();
        assert!(!s.is_funded());
        s.deposited = Lovelace(1);
        assert!(s.is_funded());
    }
}
