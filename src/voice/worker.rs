//! Push-to-talk voice worker
//!
//! Each push-to-talk runs one recognition cycle as its own task so the
//! frame loop never waits for the microphone. Successful transcripts are
//! parsed and forwarded to the arbiter; recognition failures are turned
//! into spoken fallback phrases right here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::parser::VoiceCommandParser;
use super::recognizer::SpeechRecognizer;
use crate::feedback::Feedback;
use crate::state::ArbiterInput;

/// Spoken right before the microphone opens
pub const PROMPT_PHRASE: &str = "Please say the command.";

/// Starts voice cycles on demand, at most one at a time
pub struct VoiceWorker<F> {
    recognizer: Arc<dyn SpeechRecognizer>,
    parser: VoiceCommandParser,
    feedback: F,
    input_tx: mpsc::Sender<ArbiterInput>,
    busy: Arc<AtomicBool>,
    current: Mutex<Option<JoinHandle<()>>>,
}

/// Clears the busy flag when a cycle ends, including on abort
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<F: Feedback + Clone + 'static> VoiceWorker<F> {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        feedback: F,
        input_tx: mpsc::Sender<ArbiterInput>,
    ) -> Self {
        Self {
            recognizer,
            parser: VoiceCommandParser::new(),
            feedback,
            input_tx,
            busy: Arc::new(AtomicBool::new(false)),
            current: Mutex::new(None),
        }
    }

    /// A capture is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Start one capture-and-recognize cycle.
    ///
    /// Returns `false` if a cycle is already running; the trigger is then
    /// ignored rather than queued.
    pub fn push_to_talk(&self) -> bool {
        if self.busy.swap(true, Ordering::SeqCst) {
            info!("voice capture already in progress, ignoring trigger");
            return false;
        }

        let guard = BusyGuard(Arc::clone(&self.busy));
        let recognizer = Arc::clone(&self.recognizer);
        let parser = self.parser;
        let feedback = self.feedback.clone();
        let input_tx = self.input_tx.clone();

        let handle = tokio::spawn(async move {
            let _guard = guard;

            feedback.speak(PROMPT_PHRASE);
            info!("listening for command");

            match recognizer.recognize().await {
                Ok(transcript) => {
                    let parsed = parser.parse(&transcript);
                    info!(
                        transcript = %parsed.transcript,
                        command = ?parsed.command,
                        "voice command heard"
                    );
                    if input_tx.send(ArbiterInput::Voice(parsed)).await.is_err() {
                        warn!("arbiter closed, dropping voice command");
                    }
                }
                Err(e) => {
                    warn!(error = %e, "voice recognition failed");
                    feedback.speak(e.phrase());
                }
            }
        });

        if let Ok(mut current) = self.current.lock() {
            *current = Some(handle);
        }
        true
    }

    /// Abandon any capture in flight
    pub fn shutdown(&self) {
        let handle = match self.current.lock() {
            Ok(mut current) => current.take(),
            Err(_) => None,
        };
        if let Some(handle) = handle {
            handle.abort();
            info!("voice worker stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::state::ActuatorState;
    use crate::voice::RecognitionError;

    struct Scripted(Result<String, RecognitionError>);

    #[async_trait]
    impl SpeechRecognizer for Scripted {
        async fn recognize(&self) -> Result<String, RecognitionError> {
            self.0.clone()
        }
    }

    struct Stalled;

    #[async_trait]
    impl SpeechRecognizer for Stalled {
        async fn recognize(&self) -> Result<String, RecognitionError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(RecognitionError::Timeout)
        }
    }

    #[derive(Clone, Default)]
    struct Phrases(Arc<Mutex<Vec<String>>>);

    impl Feedback for Phrases {
        fn speak(&self, phrase: &str) {
            self.0.lock().unwrap().push(phrase.to_string());
        }
    }

    async fn settle(worker: &VoiceWorker<Phrases>) {
        for _ in 0..100 {
            if !worker.is_busy() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("voice cycle did not finish");
    }

    #[tokio::test]
    async fn test_transcript_reaches_arbiter() {
        let (tx, mut rx) = mpsc::channel(4);
        let phrases = Phrases::default();
        let worker = VoiceWorker::new(
            Arc::new(Scripted(Ok("turn on bulb one".into()))),
            phrases.clone(),
            tx,
        );

        assert!(worker.push_to_talk());
        match rx.recv().await.unwrap() {
            ArbiterInput::Voice(parsed) => {
                assert_eq!(parsed.command, Some(ActuatorState::Bulb1));
            }
            other => panic!("unexpected input {:?}", other),
        }
        settle(&worker).await;
        assert_eq!(*phrases.0.lock().unwrap(), vec![PROMPT_PHRASE]);
    }

    #[tokio::test]
    async fn test_recognition_failure_is_spoken() {
        let (tx, mut rx) = mpsc::channel(4);
        let phrases = Phrases::default();
        let worker = VoiceWorker::new(
            Arc::new(Scripted(Err(RecognitionError::Timeout))),
            phrases.clone(),
            tx,
        );

        worker.push_to_talk();
        settle(&worker).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(
            *phrases.0.lock().unwrap(),
            vec![PROMPT_PHRASE, "Listening timed out."]
        );
    }

    #[tokio::test]
    async fn test_second_trigger_ignored_while_busy() {
        let (tx, _rx) = mpsc::channel(4);
        let worker = VoiceWorker::new(Arc::new(Stalled), Phrases::default(), tx);

        assert!(worker.push_to_talk());
        assert!(!worker.push_to_talk());
        assert!(worker.is_busy());

        worker.shutdown();
        settle(&worker).await;
        assert!(worker.push_to_talk());
        worker.shutdown();
    }
}
