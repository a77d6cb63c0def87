//! Speech-to-text backends
//!
//! A recognizer performs one complete capture-and-transcribe cycle. The
//! acoustic model is not part of this crate; the shipped backend delegates
//! to an external program.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

/// Ways a recognition cycle can fail
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecognitionError {
    #[error("no speech detected")]
    NoSpeechDetected,

    #[error("recognizer unavailable: {0}")]
    NetworkError(String),

    #[error("listening timed out")]
    Timeout,
}

impl RecognitionError {
    /// Fallback phrase spoken to the user
    pub fn phrase(&self) -> &'static str {
        match self {
            RecognitionError::NoSpeechDetected => "Sorry, I didn't understand.",
            RecognitionError::NetworkError(_) => "Network error.",
            RecognitionError::Timeout => "Listening timed out.",
        }
    }
}

/// A speech-to-text backend
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Listen once and return the transcript
    async fn recognize(&self) -> Result<String, RecognitionError>;
}

/// Runs an external program that records from the microphone and prints
/// the transcript on stdout.
///
/// Exit status 0 with output is a transcript, exit status 0 without output
/// means nothing was heard, anything else is a backend failure.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    command: Vec<String>,
    timeout: Duration,
}

impl CommandRecognizer {
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        Self { command, timeout }
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn recognize(&self) -> Result<String, RecognitionError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| RecognitionError::NetworkError("no recognizer configured".into()))?;

        debug!(%program, timeout_ms = self.timeout.as_millis() as u64, "starting recognizer");

        // kill_on_drop: the timeout drops the future, which kills the child.
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| RecognitionError::Timeout)?
            .map_err(|e| RecognitionError::NetworkError(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "recognizer failed");
            return Err(RecognitionError::NetworkError(format!(
                "recognizer exited with {}",
                output.status
            )));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_lowercase();
        if transcript.is_empty() {
            return Err(RecognitionError::NoSpeechDetected);
        }
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str, timeout: Duration) -> CommandRecognizer {
        CommandRecognizer::new(
            vec!["sh".into(), "-c".into(), script.into()],
            timeout,
        )
    }

    #[test]
    fn test_fallback_phrases() {
        assert_eq!(RecognitionError::NoSpeechDetected.phrase(), "Sorry, I didn't understand.");
        assert_eq!(RecognitionError::NetworkError("x".into()).phrase(), "Network error.");
        assert_eq!(RecognitionError::Timeout.phrase(), "Listening timed out.");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_transcript_is_trimmed_and_lowercased() {
        let recognizer = sh("echo '  Turn On Bulb One '", Duration::from_secs(5));
        assert_eq!(recognizer.recognize().await.unwrap(), "turn on bulb one");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_empty_output_is_no_speech() {
        let recognizer = sh("true", Duration::from_secs(5));
        assert_eq!(
            recognizer.recognize().await,
            Err(RecognitionError::NoSpeechDetected)
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failure_exit_is_network_error() {
        let recognizer = sh("echo offline >&2; exit 3", Duration::from_secs(5));
        assert!(matches!(
            recognizer.recognize().await,
            Err(RecognitionError::NetworkError(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let recognizer = sh("sleep 5", Duration::from_millis(100));
        assert_eq!(recognizer.recognize().await, Err(RecognitionError::Timeout));
    }

    #[test]
    fn test_unconfigured_recognizer() {
        let recognizer = CommandRecognizer::new(Vec::new(), Duration::from_secs(1));
        let result = tokio_test::block_on(recognizer.recognize());
        assert!(matches!(result, Err(RecognitionError::NetworkError(_))));
    }
}
