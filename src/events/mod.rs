//! Events module for arbiter decisions
//!
//! Every decision the command arbiter takes that has a visible effect is
//! broadcast as an [`ArbiterEvent`] so observers (the status log, tests)
//! can follow along without touching the arbiter's state.

use serde::{Deserialize, Serialize};

use crate::state::{ActuatorState, CommandSource};

/// Events emitted by the command arbiter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArbiterEvent {
    /// A command reached the actuator
    Commanded {
        state: ActuatorState,
        /// State that was commanded before, if any
        previous: Option<ActuatorState>,
        source: CommandSource,
    },

    /// Writing a command to the link failed; nothing was updated
    LinkFailed {
        state: ActuatorState,
        source: CommandSource,
        reason: String,
    },

    /// No hand has been visible for a while
    NoHand,

    /// A transcript did not match any command
    NotUnderstood {
        transcript: String,
    },
}

impl std::fmt::Display for ArbiterEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArbiterEvent::Commanded { state, source, .. } => {
                write!(f, "COMMANDED {} ({})", state, source)
            }
            ArbiterEvent::LinkFailed { state, source, reason } => {
                write!(f, "LINK_FAILED {} ({}): {}", state, source, reason)
            }
            ArbiterEvent::NoHand => write!(f, "NO_HAND"),
            ArbiterEvent::NotUnderstood { transcript } => {
                write!(f, "NOT_UNDERSTOOD \"{}\"", transcript)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = ArbiterEvent::Commanded {
            state: ActuatorState::Both,
            previous: Some(ActuatorState::Off),
            source: CommandSource::Gesture,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"commanded\""));
        assert!(json.contains("\"state\":\"both\""));
        assert!(json.contains("\"source\":\"gesture\""));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"no_hand"}"#;
        let event: ArbiterEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, ArbiterEvent::NoHand);
    }

    #[test]
    fn test_event_display() {
        let event = ArbiterEvent::LinkFailed {
            state: ActuatorState::Bulb1,
            source: CommandSource::Voice,
            reason: "broken pipe".into(),
        };
        assert_eq!(event.to_string(), "LINK_FAILED BULB1 (voice): broken pipe");
    }
}
