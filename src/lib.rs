//! handsignal: gesture and voice control for a two-bulb serial actuator
//!
//! A hand tracker feeds landmark frames to a finger-count classifier, a
//! push-to-talk worker feeds parsed voice commands, and a single command
//! arbiter decides which commands actually reach the serial link.

pub mod config;
pub mod controls;
pub mod events;
pub mod feedback;
pub mod gesture;
pub mod lifecycle;
pub mod link;
pub mod state;
pub mod voice;
