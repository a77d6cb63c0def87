//! Actuator state and command intents
//!
//! The two bulbs behind the serial link can be in one of four states.
//! Both input channels (gesture and voice) produce [`CommandIntent`]s
//! targeting one of them.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// The four states of the bulb controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorState {
    /// Both bulbs off
    Off,
    /// Only bulb one lit
    Bulb1,
    /// Only bulb two lit
    Bulb2,
    /// Both bulbs lit
    Both,
}

impl ActuatorState {
    /// Every state, in wire-code order
    pub const ALL: [ActuatorState; 4] = [
        ActuatorState::Off,
        ActuatorState::Bulb1,
        ActuatorState::Bulb2,
        ActuatorState::Both,
    ];

    /// Single ASCII digit sent to the controller for this state
    pub fn wire_byte(self) -> u8 {
        match self {
            ActuatorState::Off => b'0',
            ActuatorState::Bulb1 => b'1',
            ActuatorState::Bulb2 => b'2',
            ActuatorState::Both => b'5',
        }
    }

    /// Inverse of [`wire_byte`](Self::wire_byte)
    pub fn from_wire_byte(byte: u8) -> Option<Self> {
        match byte {
            b'0' => Some(ActuatorState::Off),
            b'1' => Some(ActuatorState::Bulb1),
            b'2' => Some(ActuatorState::Bulb2),
            b'5' => Some(ActuatorState::Both),
            _ => None,
        }
    }

    /// Confirmation phrase spoken after the state is commanded
    pub fn phrase(self) -> &'static str {
        match self {
            ActuatorState::Off => "All bulbs are off",
            ActuatorState::Bulb1 => "Bulb one is on",
            ActuatorState::Bulb2 => "Bulb two is on",
            ActuatorState::Both => "Both bulbs are on",
        }
    }

    /// Map an extended-finger count to the state it requests.
    ///
    /// 1, 2 and 5 select a bulb configuration. 0, 3 and 4 all mean OFF:
    /// the classifier is unreliable for mid-range counts, so 3 and 4 are
    /// folded into the closed-hand gesture rather than given meanings of
    /// their own.
    pub fn from_finger_count(count: i8) -> Option<Self> {
        match count {
            1 => Some(ActuatorState::Bulb1),
            2 => Some(ActuatorState::Bulb2),
            5 => Some(ActuatorState::Both),
            0 | 3 | 4 => Some(ActuatorState::Off),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActuatorState::Off => write!(f, "OFF"),
            ActuatorState::Bulb1 => write!(f, "BULB1"),
            ActuatorState::Bulb2 => write!(f, "BULB2"),
            ActuatorState::Both => write!(f, "BOTH"),
        }
    }
}

/// Which input channel produced an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandSource {
    Gesture,
    Voice,
}

impl std::fmt::Display for CommandSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandSource::Gesture => write!(f, "gesture"),
            CommandSource::Voice => write!(f, "voice"),
        }
    }
}

/// A request to drive the actuator into `target`
///
/// Intents are never queued: the arbiter either commits one immediately or
/// drops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandIntent {
    pub target: ActuatorState,
    pub source: CommandSource,
    pub timestamp: Instant,
}

impl CommandIntent {
    pub fn new(target: ActuatorState, source: CommandSource, timestamp: Instant) -> Self {
        Self {
            target,
            source,
            timestamp,
        }
    }
}
