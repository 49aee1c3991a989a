//! # Simulated Latency
//!
//! The demo pretends that deposits, withdrawals, wallet handshakes, and
//! sign-ins take time. That pretence goes through the [`Latency`] trait so
//! the real binary can sleep while tests and `--instant` runs don't.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Something that waits out a nominal delay.
#[async_trait]
pub trait Latency: Send + Sync + std::fmt::Debug {
    /// Suspends the caller for (at most) `nominal`.
    async fn pause(&self, nominal: Duration);
}

/// Sleeps for the full nominal delay on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedLatency;

#[async_trait]
impl Latency for SimulatedLatency {
    async fn pause(&self, nominal: Duration) {
        if !nominal.is_zero() {
            tokio::time::sleep(nominal).await;
        }
    }
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

#[async_trait]
impl Latency for NoLatency {
    async fn pause(&self, _nominal: Duration) {}
}

/// Shared handle used by every component that simulates a delay.
pub type SharedLatency = Arc<dyn Latency>;

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn simulated_latency_waits_nominal_delay() {
        let start = Instant::now();
        SimulatedLatency.pause(Duration::from_secs(2)).await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn no_latency_returns_immediately() {
        let start = Instant::now();
        NoLatency.pause(Duration::from_secs(60)).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
