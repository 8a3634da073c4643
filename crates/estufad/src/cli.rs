//! CLI - Command-line argument parsing
//!
//! With no arguments the simulator runs forever against the default endpoint.

use clap::Parser;
use std::path::PathBuf;

/// Hydroponic greenhouse telemetry simulator
#[derive(Parser, Debug)]
#[command(name = "estufad")]
#[command(about = "Simulates greenhouse sensor telemetry and POSTs it to an HTTP endpoint", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults to /etc/estufa/estufad.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Endpoint receiving the telemetry POSTs
    #[arg(long)]
    pub url: Option<String>,

    /// Seconds to wait between cycles
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Fixed RNG seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after N cycles
    #[arg(long)]
    pub cycles: Option<u64>,

    /// Greenhouse identifier to report
    #[arg(long)]
    pub estufa_id: Option<String>,
}
