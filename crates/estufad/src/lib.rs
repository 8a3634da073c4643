//! Estufa daemon library - exposes modules for testing.

pub mod cli;
pub mod config;
pub mod shutdown;
pub mod simulator;
pub mod sink;

pub use config::Config;
pub use shutdown::ShutdownSignal;
pub use simulator::{CycleOutcome, RunSummary, Simulator};
pub use sink::{HttpSink, RecordingSink, SinkResponse, TelemetrySink};
