//! # Structured Logging
//!
//! Vault node logs go to stderr through `tracing_subscriber`, either as
//! pretty text or as JSON lines. Stdout belongs to the deployment log and
//! the `version` output.

use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "timelock_node=info,timelock_vault=info,tower_http=debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, colored output. Suitable for local development.
    #[default]
    Pretty,
    /// Machine-parseable JSON lines.
    Json,
}

/// Installs the global subscriber for one subcommand run.
///
/// `serve` passes [`DEFAULT_FILTER`] and the `--log-format` choice;
/// `deploy` passes a warn-only filter so its stdout log reads cleanly.
/// A process gets one subscriber, so only one of them may call this.
///
/// `RUST_LOG`, when set, replaces `default_level`:
///
/// ```text
/// RUST_LOG=timelock_node=debug,timelock_vault=debug,tower_http=info
/// ```
pub fn init_logging(default_level: &str, format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .init();
        }
    }

    tracing::debug!("logging initialized (format={:?})", format);
}
