//! Telemetry simulator loop
//!
//! Owns the greenhouse state and drives the generate -> log -> send -> wait
//! cycle. A failed POST is logged and the loop moves on from the already
//! advanced state; there is no retry.

use chrono::Local;
use estufa_common::{advance_state, EstufaError, GreenhouseState, NoiseSource, Result, RngNoise};
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::shutdown::ShutdownSignal;
use crate::sink::{HttpSink, SinkResponse, TelemetrySink};

/// Result of a single cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The endpoint answered (any status)
    Responded(SinkResponse),
    /// Transport failure; carries the error message
    Failed(String),
}

/// Counters for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub responded: u64,
    pub failed: u64,
}

pub struct Simulator<N: NoiseSource> {
    state: GreenhouseState,
    noise: N,
    sink: Arc<dyn TelemetrySink>,
    interval: Duration,
    max_cycles: Option<u64>,
}

impl Simulator<RngNoise<StdRng>> {
    /// Production simulator: HTTP sink, seeded or entropy-backed noise
    pub fn from_config(config: &Config) -> Result<Self> {
        let sink = HttpSink::new(config.endpoint.url.clone(), config.request_timeout())?;
        let noise = match config.simulator.seed {
            Some(seed) => RngNoise::seeded(seed),
            None => RngNoise::from_entropy(),
        };

        Ok(Self::new(
            GreenhouseState::initial(config.simulator.estufa_id.clone()),
            noise,
            Arc::new(sink),
            config.interval(),
        )
        .with_max_cycles(config.simulator.max_cycles))
    }
}

impl<N: NoiseSource> Simulator<N> {
    pub fn new(
        state: GreenhouseState,
        noise: N,
        sink: Arc<dyn TelemetrySink>,
        interval: Duration,
    ) -> Self {
        Self {
            state,
            noise,
            sink,
            interval,
            max_cycles: None,
        }
    }

    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn state(&self) -> &GreenhouseState {
        &self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Advance the state once and deliver it
    ///
    /// Transport failures become `CycleOutcome::Failed`; any other error propagates.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let state = advance_state(&mut self.state, &mut self.noise);
        let payload = state.to_payload()?;
        info!("[{}] Sending: {}", Local::now().to_rfc3339(), payload);

        match self.sink.send(state).await {
            Ok(response) => {
                if response.is_success() {
                    info!("Response: {} - {}", response.status, response.body);
                } else {
                    warn!("Response: {} - {}", response.status, response.body);
                }
                Ok(CycleOutcome::Responded(response))
            }
            Err(EstufaError::Transport(message)) => {
                warn!("Failed to send telemetry: {}", message);
                Ok(CycleOutcome::Failed(message))
            }
            Err(e) => Err(e),
        }
    }

    /// Run cycles until shutdown or the cycle limit
    pub async fn run_loop(&mut self, shutdown: &ShutdownSignal) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        info!(
            "Sending telemetry for estufa {} to {} every {:?}",
            self.state.greenhouse_id,
            self.sink.endpoint(),
            self.interval
        );

        loop {
            if shutdown.is_triggered() {
                info!("Shutdown requested after {} cycles", summary.cycles);
                break;
            }
            if self.limit_reached(summary.cycles) {
                break;
            }

            match self.run_cycle().await? {
                CycleOutcome::Responded(_) => summary.responded += 1,
                CycleOutcome::Failed(_) => summary.failed += 1,
            }
            summary.cycles += 1;

            if self.limit_reached(summary.cycles) {
                info!("Cycle limit reached ({})", summary.cycles);
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.wait() => {
                    info!("Shutdown requested after {} cycles", summary.cycles);
                    break;
                }
            }
        }

        Ok(summary)
    }

    fn limit_reached(&self, cycles: u64) -> bool {
        self.max_cycles.is_some_and(|max| cycles >= max)
    }
}
