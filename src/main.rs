//! Point-in-Time Recovery Tool for Versioned Object Storage
//!
//! Restores every object under a bucket prefix to the version that was
//! current as of a given UTC cutoff, optionally deleting objects whose
//! entire version history postdates it.

// recoverytool/src/main.rs
mod config;
mod recover;
mod storage;

use anyhow::Result;
use clap::Parser;
use config::{AppConfig, CliArgs};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Main entry point for the recovery tool
#[tokio::main]
async fn main() -> ExitCode {
    match run_app().await {
        Ok(_) => {
            println!("✅ Recovery completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_app() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.debug);

    // Config validation happens before any storage call; a malformed
    // recovery time or endpoint aborts the process here.
    let app_config = AppConfig::from_args(&args)?;
    tracing::debug!(
        "Parsed recovery time: {}",
        app_config.recovery.recovery_time
    );

    let client = storage::build_client(&app_config.storage).await;
    let store = storage::S3VersionStore::new(client, app_config.storage.bucket_name.clone());
    tracing::debug!(
        "Storage client initialized for bucket: {}",
        app_config.storage.bucket_name
    );

    recover::run_recovery_flow(&store, &app_config.recovery).await
}

/// Installs the log subscriber. `--debug` raises the default level to
/// debug; an explicit RUST_LOG still overrides it.
fn init_tracing(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}
