//! # Scripted Deployment
//!
//! The `deploy` command does not deploy anything. It walks through four
//! staged steps with fixed delays, prints a progress log and a canned
//! summary, and points the user at the local dev server. A stage can be
//! made to fail on purpose so the failure path is exercisable.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::DEPLOY_NETWORK_NAME;
use crate::latency::Latency;

/// Placeholder contract address shown in the summary.
pub const CONTRACT_ADDRESS: &str = "contract_1234567890abcdef";

/// Placeholder deployment transaction shown in the summary.
pub const DEPLOY_TX_HASH: &str = "tx_abcdef1234567890";

/// Placeholder fee shown in the summary.
pub const GAS_USED: &str = "2.5 ADA";

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// The steps of the deployment log, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployStage {
    Build,
    Connect,
    Deploy,
    Verify,
}

impl DeployStage {
    pub const ALL: [DeployStage; 4] = [
        DeployStage::Build,
        DeployStage::Connect,
        DeployStage::Deploy,
        DeployStage::Verify,
    ];

    /// Nominal time the stage takes.
    pub fn nominal_delay(self) -> Duration {
        match self {
            DeployStage::Build => Duration::ZERO,
            DeployStage::Connect => Duration::from_millis(2_000),
            DeployStage::Deploy => Duration::from_millis(3_000),
            DeployStage::Verify => Duration::from_millis(1_500),
        }
    }

    fn banner(self) -> String {
        match self {
            DeployStage::Build => "📦 Building project...".to_string(),
            DeployStage::Connect => format!("\n🔗 Connecting to {DEPLOY_NETWORK_NAME}..."),
            DeployStage::Deploy => "\n📝 Deploying smart contract...".to_string(),
            DeployStage::Verify => "\n🔍 Verifying deployment...".to_string(),
        }
    }

    fn done(self) -> &'static str {
        match self {
            DeployStage::Build => "✅ Build completed successfully",
            DeployStage::Connect => "✅ Connected to Preprod Testnet",
            DeployStage::Deploy => "✅ Smart contract deployed successfully",
            DeployStage::Verify => "✅ Deployment verified",
        }
    }
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeployStage::Build => "build",
            DeployStage::Connect => "connect",
            DeployStage::Deploy => "deploy",
            DeployStage::Verify => "verify",
        };
        f.write_str(name)
    }
}

impl FromStr for DeployStage {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "build" => Ok(DeployStage::Build),
            "connect" => Ok(DeployStage::Connect),
            "deploy" => Ok(DeployStage::Deploy),
            "verify" => Ok(DeployStage::Verify),
            other => Err(DeployError::UnknownStage(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("unknown deploy stage '{0}' (expected build, connect, deploy or verify)")]
    UnknownStage(String),

    #[error("{stage} stage failed: simulated failure")]
    StageFailed { stage: DeployStage },

    #[error("failed to write deployment log: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// What the summary block reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeploymentSummary {
    pub network: String,
    pub contract_address: String,
    pub tx_hash: String,
    pub gas_used: String,
    pub status: String,
    pub visit_url: String,
}

impl DeploymentSummary {
    fn canned(port: u16) -> Self {
        Self {
            network: DEPLOY_NETWORK_NAME.to_string(),
            contract_address: CONTRACT_ADDRESS.to_string(),
            tx_hash: DEPLOY_TX_HASH.to_string(),
            gas_used: GAS_USED.to_string(),
            status: "Active".to_string(),
            visit_url: format!("http://localhost:{port}"),
        }
    }
}

/// Runs the scripted deployment, writing the progress log to `out`.
///
/// `fail_at` makes that stage fail after its banner is printed. The caller
/// reports the error; nothing is written to `out` for it.
pub async fn run_deployment<W: Write>(
    out: &mut W,
    latency: &dyn Latency,
    fail_at: Option<DeployStage>,
    port: u16,
) -> Result<DeploymentSummary, DeployError> {
    writeln!(out, "🚀 Starting deployment of Time-Locked Payment Vault...\n")?;

    for stage in DeployStage::ALL {
        writeln!(out, "{}", stage.banner())?;
        out.flush()?;
        latency.pause(stage.nominal_delay()).await;

        if fail_at == Some(stage) {
            tracing::warn!(%stage, "deployment stage failed");
            return Err(DeployError::StageFailed { stage });
        }
        writeln!(out, "{}", stage.done())?;
        tracing::debug!(%stage, "deployment stage completed");
    }

    let summary = DeploymentSummary::canned(port);
    writeln!(out, "\n🎉 Deployment completed successfully!")?;
    writeln!(out, "\n📋 Deployment Summary:")?;
    writeln!(out, "   • Network: {}", summary.network)?;
    writeln!(out, "   • Contract Address: {}", summary.contract_address)?;
    writeln!(out, "   • Transaction Hash: {}", summary.tx_hash)?;
    writeln!(out, "   • Gas Used: {}", summary.gas_used)?;
    writeln!(out, "   • Status: {}", summary.status)?;
    writeln!(out, "\n🌐 Your Time-Locked Payment Vault is now live!")?;
    writeln!(out, "   Visit: {} to interact with the vault", summary.visit_url)?;
    out.flush()?;

    tracing::info!(contract = %summary.contract_address, "deployment completed");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::{NoLatency, SimulatedLatency};

    #[tokio::test]
    async fn full_run_prints_summary() {
        let mut out = Vec::new();
        let summary = run_deployment(&mut out, &NoLatency, None, 3000)
            .await
            .unwrap();
        let log = String::from_utf8(out).unwrap();

        assert!(log.contains("Connecting to Cardano Preprod Testnet..."));
        assert!(log.contains("✅ Deployment verified"));
        assert!(log.contains("Contract Address: contract_1234567890abcdef"));
        assert!(log.contains("Transaction Hash: tx_abcdef1234567890"));
        assert!(log.contains("Gas Used: 2.5 ADA"));
        assert!(log.contains("Status: Active"));
        assert!(log.contains("Visit: http://localhost:3000 to interact"));
        assert_eq!(summary.visit_url, "http://localhost:3000");
    }

    #[tokio::test]
    async fn failure_stops_at_stage() {
        let mut out = Vec::new();
        let err = run_deployment(&mut out, &NoLatency, Some(DeployStage::Deploy), 3000)
            .await
            .unwrap_err();
        let log = String::from_utf8(out).unwrap();

        assert!(matches!(
            err,
            DeployError::StageFailed {
                stage: DeployStage::Deploy
            }
        ));
        assert!(log.contains("✅ Connected to Preprod Testnet"));
        assert!(log.contains("Deploying smart contract..."));
        assert!(!log.contains("deployed successfully"));
        assert!(!log.contains("Deployment Summary"));
    }

    #[tokio::test(start_paused = true)]
    async fn nominal_delays_add_up() {
        let start = tokio::time::Instant::now();
        run_deployment(&mut io::sink(), &SimulatedLatency, None, 3000)
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(6_500));
    }

    #[test]
    fn stage_parses_case_insensitively() {
        assert_eq!("Verify".parse::<DeployStage>().unwrap(), DeployStage::Verify);
        assert!("launch".parse::<DeployStage>().is_err());
    }
}
