//! Shutdown signal
//!
//! A cloneable cancellation token. The simulator checks it every iteration
//! and races it against the interval wait; the signal handler task trips it
//! on Ctrl+C or SIGTERM.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Clone)]
pub struct ShutdownSignal {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// Request shutdown; idempotent
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once shutdown has been requested
    pub async fn wait(&self) {
        let mut receiver = self.receiver.clone();
        // self holds the sender, so the channel cannot close while we wait
        let _ = receiver.wait_for(|triggered| *triggered).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the task that trips `shutdown` on Ctrl+C (and SIGTERM on Unix)
pub fn spawn_signal_handler(shutdown: ShutdownSignal) -> Result<()> {
    #[cfg(unix)]
    let mut sigterm = {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate())?
    };

    tokio::spawn(async move {
        #[cfg(unix)]
        let terminate = async {
            sigterm.recv().await;
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
                info!("Ctrl+C received - shutting down");
            }
            _ = terminate => {
                info!("SIGTERM received - shutting down");
            }
        }

        shutdown.trigger();
    });

    Ok(())
}
