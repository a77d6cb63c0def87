//! Configuration loading and management
//!
//! Everything is a startup parameter, given on the command line or through
//! `HANDSIGNAL_*` environment variables. There is no configuration file.

use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;

use crate::link::SerialSettings;

/// Command-line arguments
#[derive(Debug, Clone, Parser)]
#[command(
    name = "handsignal",
    version,
    about = "Drive two bulbs over serial with hand gestures and push-to-talk voice commands"
)]
pub struct Args {
    /// Serial device of the bulb controller
    #[arg(long, env = "HANDSIGNAL_SERIAL_PORT", default_value = "/dev/ttyACM0")]
    pub serial_port: String,

    /// Serial baud rate
    #[arg(long, env = "HANDSIGNAL_BAUD", default_value_t = 9600)]
    pub baud: u32,

    /// Minimum time between two gesture commands, in milliseconds
    #[arg(long, env = "HANDSIGNAL_COOLDOWN_MS", default_value_t = 2000)]
    pub cooldown_ms: u64,

    /// Wait after opening the port while the controller reboots, in milliseconds
    #[arg(long, env = "HANDSIGNAL_BOOT_DELAY_MS", default_value_t = 2000)]
    pub boot_delay_ms: u64,

    /// Upper bound for one serial write, in milliseconds
    #[arg(long, env = "HANDSIGNAL_WRITE_TIMEOUT_MS", default_value_t = 100)]
    pub write_timeout_ms: u64,

    /// Hand tracker command line (whitespace separated)
    #[arg(long, env = "HANDSIGNAL_TRACKER", default_value = "handsignal-tracker")]
    pub tracker: String,

    /// Speech recognizer command line (whitespace separated)
    #[arg(long, env = "HANDSIGNAL_RECOGNIZER", default_value = "handsignal-listen")]
    pub recognizer: String,

    /// Give up on one voice capture after this long, in milliseconds
    #[arg(long, env = "HANDSIGNAL_LISTEN_TIMEOUT_MS", default_value_t = 10_000)]
    pub listen_timeout_ms: u64,

    /// Text-to-speech command line; the phrase is appended as last argument
    #[arg(long, env = "HANDSIGNAL_TTS", default_value = "espeak-ng")]
    pub tts: String,

    /// Log feedback phrases instead of speaking them
    #[arg(long, env = "HANDSIGNAL_MUTE")]
    pub mute: bool,
}

/// Validated daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub serial: SerialSettings,

    /// Minimum interval between gesture commands and between "no hand" notices
    pub cooldown: Duration,

    pub tracker_command: Vec<String>,

    pub recognizer_command: Vec<String>,

    pub listen_timeout: Duration,

    /// `None` when feedback is muted
    pub tts_command: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from the process arguments and environment
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        if args.cooldown_ms == 0 {
            bail!("cooldown must be greater than zero");
        }
        if args.listen_timeout_ms == 0 {
            bail!("listen timeout must be greater than zero");
        }
        if args.serial_port.trim().is_empty() {
            bail!("serial port must not be empty");
        }

        let tracker_command = split_command(&args.tracker);
        if tracker_command.is_empty() {
            bail!("tracker command must not be empty");
        }

        let recognizer_command = split_command(&args.recognizer);
        if recognizer_command.is_empty() {
            bail!("recognizer command must not be empty");
        }

        let tts_command = if args.mute {
            None
        } else {
            Some(split_command(&args.tts)).filter(|cmd| !cmd.is_empty())
        };

        Ok(Self {
            serial: SerialSettings {
                path: args.serial_port.trim().to_string(),
                baud: args.baud,
                write_timeout: Duration::from_millis(args.write_timeout_ms),
                boot_delay: Duration::from_millis(args.boot_delay_ms),
            },
            cooldown: Duration::from_millis(args.cooldown_ms),
            tracker_command,
            recognizer_command,
            listen_timeout: Duration::from_millis(args.listen_timeout_ms),
            tts_command,
        })
    }
}

fn split_command(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}
