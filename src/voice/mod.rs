//! Voice module: push-to-talk capture, recognition and command parsing

mod parser;
mod recognizer;
mod worker;

pub use parser::{ParsedVoice, VoiceCommandParser};
pub use recognizer::{CommandRecognizer, RecognitionError, SpeechRecognizer};
pub use worker::{VoiceWorker, PROMPT_PHRASE};
