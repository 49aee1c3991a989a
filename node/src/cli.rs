//! # CLI Interface
//!
//! Defines the command-line argument structure for `timelock-node` using
//! `clap` derive. Supports three subcommands: `serve`, `deploy`, and
//! `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use timelock_vault::config::{DEFAULT_DEV_SERVER_PORT, DEFAULT_METRICS_PORT};
use timelock_vault::deploy::DeployStage;

use crate::logging::LogFormat;

/// Time-locked payment vault demo.
///
/// Serves the vault over HTTP and WebSocket for a local frontend, and
/// carries the scripted deployment log.
#[derive(Parser, Debug)]
#[command(
    name = "timelock-node",
    about = "Time-locked payment vault development server",
    version,
    propagate_version = true
)]
pub struct VaultNodeCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the development server.
    Serve(ServeArgs),
    /// Run the scripted deployment and print its log.
    Deploy(DeployArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port for the HTTP and WebSocket API.
    #[arg(long, short = 'p', env = "VAULT_PORT", default_value_t = DEFAULT_DEV_SERVER_PORT)]
    pub port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "VAULT_METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Directory holding `session.json`.
    ///
    /// When omitted the session lives in memory and is lost on exit.
    #[arg(long, short = 'd', env = "VAULT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Skip every simulated delay.
    #[arg(long, env = "VAULT_INSTANT")]
    pub instant: bool,

    /// Log output format.
    #[arg(long, env = "VAULT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Arguments for the `deploy` subcommand.
#[derive(Parser, Debug)]
pub struct DeployArgs {
    /// Make this stage fail: build, connect, deploy, or verify.
    #[arg(long)]
    pub fail_at: Option<DeployStage>,

    /// Skip the stage delays.
    #[arg(long, env = "VAULT_INSTANT")]
    pub instant: bool,

    /// Dev server port printed in the final "Visit" line.
    #[arg(long, env = "VAULT_PORT", default_value_t = DEFAULT_DEV_SERVER_PORT)]
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        VaultNodeCli::command().debug_assert();
    }

    #[test]
    fn deploy_parses_fail_stage() {
        let cli = VaultNodeCli::try_parse_from(["timelock-node", "deploy", "--fail-at", "verify"])
            .unwrap();
        match cli.command {
            Commands::Deploy(args) => assert_eq!(args.fail_at, Some(DeployStage::Verify)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_accepts_json_logs() {
        let cli = VaultNodeCli::try_parse_from([
            "timelock-node",
            "serve",
            "--port",
            "4000",
            "--log-format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, 4000);
                assert_eq!(args.log_format, LogFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
