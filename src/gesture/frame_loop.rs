//! The primary frame loop
//!
//! Pulls landmark frames, classifies them and hands one gesture reading
//! per frame to the command arbiter. Runs on a dedicated thread since the
//! source blocks until the tracker produces the next frame.
//!
//! Readings are stamped when the frame is read and never wait for room in
//! the arbiter's queue: while the arbiter is busy, new frames are dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use super::classifier::HandPoseClassifier;
use super::source::{LandmarkSource, SourceError};
use crate::state::ArbiterInput;

/// Why the frame loop stopped
#[derive(Debug)]
pub enum FrameLoopExit {
    /// The source has no more frames
    StreamEnded { frames: u64 },
    /// `stop()` was called
    Stopped { frames: u64 },
    /// The arbiter is gone
    ArbiterClosed { frames: u64 },
    /// Reading from the source failed
    Failed(SourceError),
}

/// Errors that can occur when starting the frame loop
#[derive(Debug, thiserror::Error)]
pub enum FrameLoopError {
    #[error("frame loop is already running")]
    AlreadyRunning,

    #[error("failed to spawn frame loop thread: {0}")]
    ThreadSpawn(String),
}

/// Drives a [`LandmarkSource`] on its own thread
pub struct FrameLoop {
    input_tx: mpsc::Sender<ArbiterInput>,
    classifier: HandPoseClassifier,
    running: Arc<AtomicBool>,
}

impl FrameLoop {
    pub fn new(input_tx: mpsc::Sender<ArbiterInput>) -> Self {
        Self {
            input_tx,
            classifier: HandPoseClassifier::new(),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start pulling frames from `source`.
    ///
    /// The returned receiver resolves once the loop has exited, whatever the
    /// reason.
    pub fn start<S>(&self, source: S) -> Result<oneshot::Receiver<FrameLoopExit>, FrameLoopError>
    where
        S: LandmarkSource + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(FrameLoopError::AlreadyRunning);
        }

        let (exit_tx, exit_rx) = oneshot::channel();
        let input_tx = self.input_tx.clone();
        let classifier = self.classifier;
        let running = Arc::clone(&self.running);

        thread::Builder::new()
            .name("frame-loop".to_string())
            .spawn(move || {
                info!("frame loop thread started");

                let exit = run_frames(source, classifier, &input_tx, &running);
                match &exit {
                    FrameLoopExit::Failed(e) => error!(error = %e, "frame loop failed"),
                    other => info!(?other, "frame loop thread stopped"),
                }

                running.store(false, Ordering::SeqCst);
                let _ = exit_tx.send(exit);
            })
            .map_err(|e| FrameLoopError::ThreadSpawn(e.to_string()))?;

        Ok(exit_rx)
    }

    /// Ask the loop to stop after the current frame
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Classify frames from `source` until it ends, `running` is cleared or the
/// arbiter hangs up. The frame count includes frames dropped while the
/// arbiter's queue was full.
pub fn run_frames<S: LandmarkSource>(
    mut source: S,
    classifier: HandPoseClassifier,
    input_tx: &mpsc::Sender<ArbiterInput>,
    running: &AtomicBool,
) -> FrameLoopExit {
    let mut frames = 0u64;
    let mut dropped = 0u64;

    while running.load(Ordering::SeqCst) {
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return FrameLoopExit::StreamEnded { frames },
            Err(e) => return FrameLoopExit::Failed(e),
        };
        frames += 1;

        if frame.hands.len() > 1 {
            warn!(hands = frame.hands.len(), "several hands in frame, using the first");
        }

        let reading = classifier.classify_frame(&frame);
        match input_tx.try_send(ArbiterInput::gesture(reading)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                dropped += 1;
                debug!(dropped, "arbiter busy, dropping frame");
            }
            Err(TrySendError::Closed(_)) => return FrameLoopExit::ArbiterClosed { frames },
        }
    }

    FrameLoopExit::Stopped { frames }
}
