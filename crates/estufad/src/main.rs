//! Estufa Daemon - greenhouse telemetry simulator
//!
//! Generates a bounded random walk of sensor readings and POSTs each
//! snapshot to the configured endpoint until interrupted.

use anyhow::{Context, Result};
use clap::Parser;
use estufad::cli::Cli;
use estufad::shutdown::{spawn_signal_handler, ShutdownSignal};
use estufad::{Config, Simulator};
use tracing::{error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging comes up before config so load errors go through tracing.
    // RUST_LOG wins; otherwise start at info and switch to the configured level.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    info!("Estufa telemetry simulator v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match Config::resolve(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("[FATAL] Failed to load configuration: {:#}", e);
            std::process::exit(78);
        }
    };

    if !from_env {
        if let Err(e) = filter_handle.reload(EnvFilter::new(&config.logging.level)) {
            warn!("Failed to apply log level '{}': {}", config.logging.level, e);
        }
    }
    config.log_summary();

    let shutdown = ShutdownSignal::new();
    spawn_signal_handler(shutdown.clone()).context("Failed to install signal handlers")?;

    let mut simulator = Simulator::from_config(&config).context("Failed to build simulator")?;
    let summary = simulator
        .run_loop(&shutdown)
        .await
        .context("Simulator loop failed")?;

    info!(
        "Stopped after {} cycles ({} answered, {} failed)",
        summary.cycles, summary.responded, summary.failed
    );
    Ok(())
}
