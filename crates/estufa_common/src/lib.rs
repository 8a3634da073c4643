//! Estufa Common - shared types for the greenhouse telemetry simulator

pub mod error;
pub mod state;
pub mod walk;

pub use error::{EstufaError, Result};
pub use state::{GreenhouseState, DEFAULT_ESTUFA_ID};
pub use walk::{advance_state, round2, vary, vary_int, Bounds, FixedNoise, NoiseSource, RngNoise};
