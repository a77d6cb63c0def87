//! State module for actuator command arbitration
//!
//! Provides the command arbiter, the only component allowed to change
//! what the actuator was last told to do:
//! - ActuatorState: OFF, BULB1, BULB2, BOTH
//! - CooldownTimer: minimum interval between gesture commands
//! - CommandArbiter: merges gesture and voice inputs into link writes

mod actuator;
mod cooldown;
mod machine;

pub use actuator::{ActuatorState, CommandIntent, CommandSource};
pub use cooldown::CooldownTimer;
pub use machine::{ArbiterInput, CommandArbiter, NOT_RECOGNIZED_PHRASE, NO_HAND_PHRASE};
