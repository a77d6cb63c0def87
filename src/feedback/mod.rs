//! Spoken feedback
//!
//! Phrases are handed to a background worker that runs a text-to-speech
//! program, one utterance at a time. Callers never wait for audio.
//!
//! Queue policy: phrases play in FIFO order from a bounded queue. When the
//! queue is full the newest phrase is dropped. Synthesis failures are
//! logged and otherwise ignored.

use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Phrases waiting to be spoken before new ones are dropped
pub const QUEUE_CAPACITY: usize = 8;

/// Anything that can announce a status phrase without blocking
pub trait Feedback: Send + Sync {
    fn speak(&self, phrase: &str);
}

/// Handle to the speech worker
#[derive(Debug, Clone)]
pub struct FeedbackChannel {
    tx: Option<mpsc::Sender<String>>,
}

impl FeedbackChannel {
    /// Start the speech worker on the current tokio runtime.
    ///
    /// `command` is the synthesizer program followed by its fixed
    /// arguments; each phrase is appended as the final argument.
    pub fn spawn(command: Vec<String>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let handle = tokio::spawn(run_worker(command, rx));
        (Self { tx: Some(tx) }, handle)
    }

    /// A channel that only logs phrases
    pub fn muted() -> Self {
        Self { tx: None }
    }
}

impl Feedback for FeedbackChannel {
    fn speak(&self, phrase: &str) {
        let Some(tx) = &self.tx else {
            info!(phrase, "feedback (muted)");
            return;
        };

        match tx.try_send(phrase.to_string()) {
            Ok(()) => debug!(phrase, "feedback queued"),
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!(phrase, "feedback queue full, dropping phrase");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(phrase, "feedback worker stopped, dropping phrase");
            }
        }
    }
}

async fn run_worker(command: Vec<String>, mut rx: mpsc::Receiver<String>) {
    let Some((program, args)) = command.split_first() else {
        warn!("no speech synthesizer configured, feedback disabled");
        while let Some(phrase) = rx.recv().await {
            info!(%phrase, "feedback");
        }
        return;
    };

    info!(%program, "feedback worker started");

    while let Some(phrase) = rx.recv().await {
        info!(%phrase, "speaking");

        // kill_on_drop: aborting this task abandons the utterance in progress.
        let status = Command::new(program)
            .args(args)
            .arg(&phrase)
            .kill_on_drop(true)
            .status()
            .await;

        match status {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(%status, "speech synthesizer exited with failure"),
            Err(e) => warn!(error = %e, "failed to run speech synthesizer"),
        }
    }

    info!("feedback worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_channel_never_blocks() {
        let feedback = FeedbackChannel::muted();
        for _ in 0..100 {
            feedback.speak("No hand detected");
        }
    }

    #[test]
    fn test_full_queue_drops_phrases() {
        let (tx, mut rx) = mpsc::channel(QUEUE_CAPACITY);
        let feedback = FeedbackChannel { tx: Some(tx) };

        for i in 0..QUEUE_CAPACITY + 3 {
            feedback.speak(&format!("phrase {}", i));
        }

        let received: Vec<String> = (0..QUEUE_CAPACITY)
            .map(|_| tokio_test::block_on(rx.recv()).unwrap())
            .collect();
        assert_eq!(received[0], "phrase 0");
        assert_eq!(
            received[QUEUE_CAPACITY - 1],
            format!("phrase {}", QUEUE_CAPACITY - 1)
        );

        // The overflow was dropped, not parked behind the queue.
        let mut next = tokio_test::task::spawn(rx.recv());
        tokio_test::assert_pending!(next.poll());
    }

    #[tokio::test]
    async fn test_missing_synthesizer_is_swallowed() {
        let (feedback, handle) =
            FeedbackChannel::spawn(vec!["/nonexistent/handsignal-tts".to_string()]);
        feedback.speak("Bulb one is on");
        drop(feedback);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_synthesizer_command() {
        let (feedback, handle) = FeedbackChannel::spawn(Vec::new());
        feedback.speak("Both bulbs are on");
        drop(feedback);
        handle.await.unwrap();
    }
}
