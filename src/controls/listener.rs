//! Terminal key listener
//!
//! Puts the terminal in raw mode and polls for key presses on a dedicated
//! thread, forwarding push-to-talk and quit presses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::terminal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::keys::ControlEvent;

/// How long one poll waits before re-checking the running flag
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Listens for control keys on the controlling terminal
pub struct KeyListener {
    event_tx: mpsc::Sender<ControlEvent>,
    running: Arc<AtomicBool>,
}

impl KeyListener {
    /// Create a new key listener
    pub fn new(event_tx: mpsc::Sender<ControlEvent>) -> Self {
        Self {
            event_tx,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the key listener
    ///
    /// Raw mode is enabled here, on the caller's thread, so a terminal that
    /// cannot support it is reported immediately.
    pub fn start(&self) -> Result<(), ControlError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ControlError::AlreadyRunning);
        }

        if let Err(e) = terminal::enable_raw_mode() {
            self.running.store(false, Ordering::SeqCst);
            return Err(ControlError::RawMode(e));
        }

        let event_tx = self.event_tx.clone();
        let running = Arc::clone(&self.running);

        let spawned = thread::Builder::new()
            .name("key-listener".to_string())
            .spawn(move || {
                info!("key listener thread started");

                if let Err(e) = run_key_loop(&event_tx, &running) {
                    error!(?e, "key listener error");
                }

                restore_terminal();
                running.store(false, Ordering::SeqCst);
                info!("key listener thread stopped");
            });

        if let Err(e) = spawned {
            restore_terminal();
            self.running.store(false, Ordering::SeqCst);
            return Err(ControlError::ThreadSpawn(e.to_string()));
        }

        Ok(())
    }

    /// Stop the key listener; the thread exits within one poll interval.
    ///
    /// The terminal is restored right away so it is sane even if the
    /// process exits before the thread does.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            restore_terminal();
        }
    }

    /// Check if the listener is currently running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Errors that can occur in the key listener
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("key listener is already running")]
    AlreadyRunning,

    #[error("failed to enable raw terminal mode: {0}")]
    RawMode(#[source] std::io::Error),

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),

    #[error("failed to read terminal event: {0}")]
    Read(#[from] std::io::Error),
}

fn restore_terminal() {
    if let Err(e) = terminal::disable_raw_mode() {
        warn!(?e, "failed to restore terminal mode");
    }
}

fn run_key_loop(
    event_tx: &mpsc::Sender<ControlEvent>,
    running: &AtomicBool,
) -> Result<(), ControlError> {
    while running.load(Ordering::SeqCst) {
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };

        let Some(control) = ControlEvent::from_key(&key) else {
            continue;
        };

        debug!(?control, "control key pressed");

        // We are not in an async context, so block until the event is taken
        if event_tx.blocking_send(control).is_err() {
            warn!("failed to send control event - channel closed?");
            break;
        }

        if control == ControlEvent::Quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_creation() {
        let (tx, _rx) = mpsc::channel(8);
        let listener = KeyListener::new(tx);
        assert!(!listener.is_running());
        listener.stop();
        assert!(!listener.is_running());
    }
}
