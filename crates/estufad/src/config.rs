//! Configuration management for estufad.
//!
//! Loads settings from /etc/estufa/estufad.toml if present, otherwise uses defaults.
//! A present but broken file is fatal.
//! Every key is optional; CLI flags override whatever the file says.

use anyhow::{Context, Result};
use estufa_common::{EstufaError, DEFAULT_ESTUFA_ID};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::cli::Cli;

/// Config file path
pub const CONFIG_PATH: &str = "/etc/estufa/estufad.toml";

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Greenhouse identifier reported in every snapshot
    #[serde(default = "default_estufa_id")]
    pub estufa_id: String,

    /// Seconds between cycles
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,

    /// Stop after this many cycles (runs until shutdown if absent)
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

fn default_estufa_id() -> String {
    DEFAULT_ESTUFA_ID.to_string()
}

fn default_interval() -> u64 {
    5
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            estufa_id: default_estufa_id(),
            interval_secs: default_interval(),
            seed: None,
            max_cycles: None,
        }
    }
}

/// Receiving API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in seconds, 0 disables it
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "http://localhost:8000/estufa".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter directive, overridden by RUST_LOG
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Full daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulator: SimulatorConfig,

    #[serde(default)]
    pub endpoint: EndpointConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config from `path` if it exists, or return defaults
    ///
    /// A file that exists but cannot be read or parsed is an error, same as --config.
    pub fn load_if_present(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Self::load_from_path(path)
    }

    /// Load config from specific path
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the effective config: explicit --config, system file, or defaults, then CLI overrides
    pub fn resolve(cli: &Cli) -> Result<Self> {
        Self::resolve_with_system_path(cli, CONFIG_PATH)
    }

    fn resolve_with_system_path(cli: &Cli, system_path: impl AsRef<Path>) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load_if_present(system_path)?,
        };
        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(url) = &cli.url {
            self.endpoint.url = url.clone();
        }
        if let Some(secs) = cli.interval_secs {
            self.simulator.interval_secs = secs;
        }
        if let Some(seed) = cli.seed {
            self.simulator.seed = Some(seed);
        }
        if let Some(cycles) = cli.cycles {
            self.simulator.max_cycles = Some(cycles);
        }
        if let Some(id) = &cli.estufa_id {
            self.simulator.estufa_id = id.clone();
        }
    }

    pub fn validate(&self) -> Result<(), EstufaError> {
        let url = self.endpoint.url.trim();
        if url.is_empty() {
            return Err(EstufaError::Config("endpoint.url is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(EstufaError::Config(format!(
                "endpoint.url must be http(s): {}",
                url
            )));
        }
        if self.simulator.interval_secs == 0 {
            return Err(EstufaError::Config(
                "simulator.interval_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.simulator.interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self.endpoint.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn log_summary(&self) {
        info!(
            "Config: endpoint={} interval={}s estufa_id={}",
            self.endpoint.url, self.simulator.interval_secs, self.simulator.estufa_id
        );
        debug!(
            "Config: seed={:?} max_cycles={:?} timeout={}s",
            self.simulator.seed, self.simulator.max_cycles, self.endpoint.timeout_secs
        );
    }
}
