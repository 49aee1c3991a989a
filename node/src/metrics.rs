//! # Prometheus Metrics
//!
//! Operational counters for the dev server, scraped at `/metrics` on the
//! metrics port. Everything is registered in a dedicated
//! [`prometheus::Registry`] under the `vault` prefix.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::core::Collector;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

/// Metric handles shared by the API handlers.
#[derive(Clone)]
pub struct VaultMetrics {
    registry: Registry,
    /// Successful deposits.
    pub deposits_total: IntCounter,
    /// Successful withdrawals.
    pub withdrawals_total: IntCounter,
    /// Withdrawals refused because the vault was locked or empty.
    pub withdrawals_rejected_total: IntCounter,
    /// Lovelace currently held by the vault.
    pub deposited_lovelace: IntGauge,
    /// Mock wallet connections made.
    pub wallet_connections_total: IntCounter,
    /// Wall-clock duration of vault operations, by operation.
    pub operation_latency_seconds: HistogramVec,
}

impl VaultMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("vault".into()), None)?;

        let deposits_total = register(
            &registry,
            IntCounter::new("deposits_total", "Total number of successful deposits")?,
        )?;
        let withdrawals_total = register(
            &registry,
            IntCounter::new("withdrawals_total", "Total number of successful withdrawals")?,
        )?;
        let withdrawals_rejected_total = register(
            &registry,
            IntCounter::new(
                "withdrawals_rejected_total",
                "Withdrawals refused because the vault was locked or empty",
            )?,
        )?;
        let deposited_lovelace = register(
            &registry,
            IntGauge::new("deposited_lovelace", "Lovelace currently held by the vault")?,
        )?;
        let wallet_connections_total = register(
            &registry,
            IntCounter::new("wallet_connections_total", "Mock wallet connections made")?,
        )?;
        let operation_latency_seconds = register(
            &registry,
            HistogramVec::new(
                HistogramOpts::new(
                    "operation_latency_seconds",
                    "Duration of vault operations including simulated latency",
                )
                .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 1.5, 2.0, 2.5, 5.0]),
                &["operation"],
            )?,
        )?;

        Ok(Self {
            registry,
            deposits_total,
            withdrawals_total,
            withdrawals_rejected_total,
            deposited_lovelace,
            wallet_connections_total,
            operation_latency_seconds,
        })
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

fn register<C>(registry: &Registry, collector: C) -> Result<C, prometheus::Error>
where
    C: Collector + Clone + 'static,
{
    registry.register(Box::new(collector.clone()))?;
    Ok(collector)
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<VaultMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
