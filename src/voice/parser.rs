//! Transcript to command matching

use crate::state::ActuatorState;

/// Keyword table, checked top to bottom; the first hit wins.
///
/// "both"/"all" come first so that "turn both bulbs off" lights both
/// bulbs, and "off" comes last so it never shadows a bulb name.
const KEYWORDS: &[(&[&str], ActuatorState)] = &[
    (&["both", "all"], ActuatorState::Both),
    (&["one"], ActuatorState::Bulb1),
    (&["two"], ActuatorState::Bulb2),
    (&["off"], ActuatorState::Off),
];

/// A recognized utterance and the command it resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVoice {
    pub transcript: String,
    /// `None` when no keyword matched
    pub command: Option<ActuatorState>,
}

/// Maps transcripts onto actuator states by keyword containment
#[derive(Debug, Clone, Copy, Default)]
pub struct VoiceCommandParser;

impl VoiceCommandParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, transcript: &str) -> ParsedVoice {
        let lowered = transcript.trim().to_lowercase();
        let command = KEYWORDS
            .iter()
            .find(|(words, _)| words.iter().any(|w| lowered.contains(w)))
            .map(|(_, state)| *state);

        ParsedVoice {
            transcript: lowered,
            command,
        }
    }
}
