//! Error types for the greenhouse simulator.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstufaError {
    /// Any failure of the telemetry POST: connect refused, DNS, timeout, body read.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EstufaError>;
