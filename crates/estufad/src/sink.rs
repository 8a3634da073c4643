//! Telemetry sink abstraction
//!
//! The simulator hands each snapshot to a `TelemetrySink`. Production uses
//! `HttpSink`, which POSTs JSON to the configured endpoint. `RecordingSink`
//! keeps snapshots in memory and can be told to fail, for deterministic runs
//! without a network.

use async_trait::async_trait;
use estufa_common::{EstufaError, GreenhouseState, Result};
use std::error::Error as StdError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// What the endpoint answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkResponse {
    pub status: u16,
    pub body: String,
}

impl SinkResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Destination for telemetry snapshots
///
/// Only transport failures are errors. Any HTTP status, including 4xx/5xx,
/// is a normal `SinkResponse`.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn send(&self, state: &GreenhouseState) -> Result<SinkResponse>;

    /// Where snapshots go, for logging
    fn endpoint(&self) -> &str;
}

// ============================================================================
// HTTP Sink (Production)
// ============================================================================

/// POSTs snapshots as JSON over HTTP
pub struct HttpSink {
    client: reqwest::Client,
    url: String,
}

impl HttpSink {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let url = url.into();
        reqwest::Url::parse(&url)
            .map_err(|e| EstufaError::Config(format!("invalid endpoint url {}: {}", url, e)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| EstufaError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl TelemetrySink for HttpSink {
    async fn send(&self, state: &GreenhouseState) -> Result<SinkResponse> {
        let response = self
            .client
            .post(&self.url)
            .json(state)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        debug!("POST {} -> {} ({} bytes)", self.url, status, body.len());

        Ok(SinkResponse { status, body })
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

/// reqwest's top-level message hides the cause ("error sending request"), so append the chain
fn transport_error(err: reqwest::Error) -> EstufaError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    EstufaError::Transport(message)
}

// ============================================================================
// Recording Sink (Testing / dry runs)
// ============================================================================

/// In-memory sink that records delivered snapshots
///
/// ## Example
///
/// ```rust,ignore
/// let sink = RecordingSink::responding(201, "created").with_failures(2, "connection refused");
/// // first two sends fail with a transport error, the rest answer 201
/// ```
pub struct RecordingSink {
    status: u16,
    body: String,
    failure: String,
    fail_first: usize,
    attempts: AtomicUsize,
    delivered: Mutex<Vec<GreenhouseState>>,
}

impl RecordingSink {
    /// Answer every send with the given status and body
    pub fn responding(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            failure: String::new(),
            fail_first: 0,
            attempts: AtomicUsize::new(0),
            delivered: Mutex::new(Vec::new()),
        }
    }

    /// Fail every send with a transport error
    pub fn failing(message: impl Into<String>) -> Self {
        Self::responding(200, "").with_failures(usize::MAX, message)
    }

    /// Fail the first `count` sends, then respond normally
    pub fn with_failures(mut self, count: usize, message: impl Into<String>) -> Self {
        self.fail_first = count;
        self.failure = message.into();
        self
    }

    /// Number of send calls, failed or not
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Snapshots that were answered
    pub fn delivered(&self) -> Vec<GreenhouseState> {
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl TelemetrySink for RecordingSink {
    async fn send(&self, state: &GreenhouseState) -> Result<SinkResponse> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.fail_first {
            return Err(EstufaError::Transport(self.failure.clone()));
        }

        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(state.clone());

        Ok(SinkResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }

    fn endpoint(&self) -> &str {
        "memory://recording"
    }
}
