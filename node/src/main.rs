// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Time-Locked Vault Node
//!
//! Entry point for the `timelock-node` binary. Parses CLI arguments,
//! initializes logging and metrics, builds the vault app, and serves the
//! HTTP/WS API.
//!
//! The binary supports three subcommands:
//!
//! - `serve`  : start the development server
//! - `deploy` : print the scripted deployment log
//! - `version`: print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;

use timelock_vault::app::VaultApp;
use timelock_vault::clock::SystemClock;
use timelock_vault::config::{LatencyProfile, SESSION_FILE_NAME};
use timelock_vault::deploy;
use timelock_vault::latency::{NoLatency, SharedLatency, SimulatedLatency};
use timelock_vault::session::{FileSessionStore, MemorySessionStore, SessionContext, SessionStore};

use cli::{Commands, VaultNodeCli};
use logging::LogFormat;
use metrics::VaultMetrics;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = VaultNodeCli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await.map(|()| ExitCode::SUCCESS),
        Commands::Deploy(args) => Ok(run_deploy(args).await),
        Commands::Version => {
            print_version();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn latency_for(instant: bool) -> (SharedLatency, LatencyProfile) {
    if instant {
        (Arc::new(NoLatency), LatencyProfile::instant())
    } else {
        (Arc::new(SimulatedLatency), LatencyProfile::default())
    }
}

/// Starts the development server: API, metrics endpoint, and the
/// once-a-second status refresh.
async fn serve(args: cli::ServeArgs) -> Result<()> {
    logging::init_logging(logging::DEFAULT_FILTER, args.log_format);

    tracing::info!(
        port = args.port,
        metrics_port = args.metrics_port,
        data_dir = ?args.data_dir,
        instant = args.instant,
        "starting timelock-node"
    );

    // --- Session ---
    let store: Arc<dyn SessionStore> = match &args.data_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create data directory: {}", dir.display()))?;
            let path = dir.join(SESSION_FILE_NAME);
            Arc::new(
                FileSessionStore::open(&path)
                    .with_context(|| format!("failed to open session store at {}", path.display()))?,
            )
        }
        None => Arc::new(MemorySessionStore::new()),
    };
    let session = SessionContext::open(store);
    let session_handle = session.clone();

    // --- App ---
    let (latency, profile) = latency_for(args.instant);
    let app = Arc::new(VaultApp::new(
        session,
        Arc::new(SystemClock),
        latency,
        profile,
    ));
    let refresh = VaultApp::spawn_status_refresh(Arc::clone(&app));

    // --- Metrics ---
    let vault_metrics =
        Arc::new(VaultMetrics::new().context("failed to register prometheus metrics")?);

    // --- API server ---
    let app_state = api::AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        app: Arc::clone(&app),
        metrics: Arc::clone(&vault_metrics),
    };
    let api_router = api::create_router(app_state);
    let api_addr = format!("0.0.0.0:{}", args.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&vault_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received");
        }
    }

    refresh.abort();
    // Open WebSocket tasks may still hold the app, so close the session
    // through its own handle.
    session_handle.close().context("failed to close session")?;

    tracing::info!("timelock-node stopped");
    Ok(())
}

/// Prints the scripted deployment log. Failures go to stderr and exit 1.
async fn run_deploy(args: cli::DeployArgs) -> ExitCode {
    logging::init_logging("timelock_vault=warn", LogFormat::Pretty);

    let (latency, _) = latency_for(args.instant);
    let mut stdout = std::io::stdout();
    match deploy::run_deployment(&mut stdout, latency.as_ref(), args.fail_at, args.port).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Deployment failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Prints version information to stdout.
fn print_version() {
    println!("timelock-node {}", env!("CARGO_PKG_VERSION"));
    println!("rustc         {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
