//! Actuator link module
//!
//! Carries actuator commands to the bulb controller. The wire protocol is
//! one ASCII digit per command followed by a newline; the controller never
//! acknowledges.

mod serial;

pub use serial::{SerialLink, SerialSettings};

use crate::state::ActuatorState;

/// Errors that can occur on the actuator link
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("failed to open serial port {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error("actuator link disconnected: {0}")]
    Disconnected(#[source] std::io::Error),
}

/// Something that can drive the actuator into a state
pub trait ActuatorLink: Send {
    /// Write one command. Failures are never retried here.
    fn send(&mut self, state: ActuatorState) -> Result<(), LinkError>;
}

impl<L: ActuatorLink + ?Sized> ActuatorLink for Box<L> {
    fn send(&mut self, state: ActuatorState) -> Result<(), LinkError> {
        (**self).send(state)
    }
}

/// Wire frame for one command
pub fn encode(state: ActuatorState) -> [u8; 2] {
    [state.wire_byte(), b'\n']
}

/// Parse one wire frame back into a state
pub fn decode(frame: &[u8]) -> Option<ActuatorState> {
    match frame {
        [byte, b'\n'] => ActuatorState::from_wire_byte(*byte),
        _ => None,
    }
}
