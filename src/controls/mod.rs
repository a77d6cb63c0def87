//! Controls module for user-facing key triggers
//!
//! `v` opens one push-to-talk voice capture; `Esc`, `q` or Ctrl-C quit.
//! Keys are read from the controlling terminal in raw mode.

mod keys;
mod listener;
mod term_writer;

pub use keys::{ControlEvent, PUSH_TO_TALK};
pub use listener::{ControlError, KeyListener};
pub use term_writer::CrlfWriter;
