//! # Clock Abstraction
//!
//! Everything time-dependent in the vault (unlock checks, countdowns,
//! generated identifiers) reads the time through a [`Clock`]. Production
//! code injects [`SystemClock`]; tests inject a [`ManualClock`] and move it
//! forward by hand, so a ten-second lock takes zero seconds to test.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// A source of wall-clock time in milliseconds since the UNIX epoch.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current wall-clock time in milliseconds since the epoch.
    fn now_ms(&self) -> u64;
}

/// The real clock, backed by `chrono::Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // Pre-1970 clocks clamp to zero rather than wrap.
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    /// Creates a clock frozen at `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
        }
    }

    /// Jumps to an absolute time.
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    /// Moves the clock forward by `delta_ms` and returns the new time.
    /// Stops at `u64::MAX`.
    pub fn advance(&self, delta_ms: u64) -> u64 {
        let previous = self
            .now_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_add(delta_ms))
            })
            .unwrap_or_else(|now| now);
        previous.saturating_add(delta_ms)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
