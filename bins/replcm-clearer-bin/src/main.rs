use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use replcm_core::{Clearer, CmConfig};
use replcm_fs::LocalFileSystem;
use replcm_logging::{init_logging, LogConfig};

/// Standalone clearer for the change-recycle area.
#[derive(Parser, Debug)]
#[command(name = "replcm-clearer", version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "replcm.toml")]
    config: PathBuf,

    /// Run a single sweep and exit
    #[arg(long)]
    once: bool,
}

/// On-disk configuration: a `[log]` table and a `[cm]` table.
#[derive(Debug, Default, Deserialize)]
struct ClearerConfig {
    #[serde(default)]
    log: LogConfig,
    #[serde(default)]
    cm: CmConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let content = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading config file {}", args.config.display()))?;
    let config: ClearerConfig =
        toml::from_str(&content).with_context(|| "parsing config file")?;
    config.cm.validate()?;

    let _guard = init_logging(&config.log);

    let fs = Arc::new(LocalFileSystem::new());
    let clearer = Arc::new(Clearer::new(fs, config.cm));

    if args.once {
        let stats = clearer.sweep();
        tracing::info!(
            files_seen = stats.files_seen,
            files_removed = stats.files_removed,
            dirs_removed = stats.dirs_removed,
            errors = stats.errors,
            "sweep finished"
        );
        return Ok(());
    }

    if !clearer.schedule() {
        anyhow::bail!("clearer was not scheduled, check the [cm] configuration");
    }

    wait_for_shutdown_signal().await;
    tracing::info!("shutting down clearer");
    clearer.shutdown().await;

    Ok(())
}

/// Wait for a shutdown signal (CTRL+C or SIGTERM).
async fn wait_for_shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .expect("failed to register SIGTERM handler");
    tokio::select! {
        _ = ctrl_c => { tracing::info!("Received CTRL+C"); }
        _ = sigterm.recv() => { tracing::info!("Received SIGTERM"); }
    }
}
