//! Signal handling for graceful shutdown

use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, warn};

/// Handles shutdown signals (SIGTERM, SIGINT, SIGHUP)
pub struct ShutdownSignal;

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self
    }

    /// Wait for a shutdown signal
    ///
    /// A signal that cannot be registered is logged and never fires; the
    /// others still work.
    pub async fn wait(&self) {
        tokio::select! {
            _ = wait_for(SignalKind::terminate(), "SIGTERM") => {}
            _ = wait_for(SignalKind::interrupt(), "SIGINT") => {}
            _ = wait_for(SignalKind::hangup(), "SIGHUP") => {}
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

async fn wait_for(kind: SignalKind, name: &'static str) {
    match signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
            debug!("received {}", name);
        }
        Err(e) => {
            warn!(?e, "failed to register {} handler", name);
            std::future::pending::<()>().await;
        }
    }
}
