//! Command arbiter state machine
//!
//! Turns per-frame gesture readings and asynchronous voice commands into
//! a de-duplicated stream of actuator commands. Gesture input arrives at
//! frame rate and goes through three gates (frame debounce, cooldown and
//! commanded-state de-duplication); voice input is already paced by
//! push-to-talk and goes straight to the link.

use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use super::actuator::{ActuatorState, CommandIntent, CommandSource};
use super::cooldown::CooldownTimer;
use crate::events::ArbiterEvent;
use crate::feedback::Feedback;
use crate::gesture::GestureReading;
use crate::link::ActuatorLink;
use crate::voice::ParsedVoice;

/// Spoken when no hand has been visible for a cooldown period
pub const NO_HAND_PHRASE: &str = "No hand detected";

/// Spoken when a transcript matched no command
pub const NOT_RECOGNIZED_PHRASE: &str = "Command not recognized";

/// Inputs accepted by the arbiter, from either channel
#[derive(Debug, Clone, PartialEq)]
pub enum ArbiterInput {
    /// One classified camera frame and when it was captured
    Gesture {
        reading: GestureReading,
        captured_at: Instant,
    },
    /// One parsed utterance
    Voice(ParsedVoice),
}

impl ArbiterInput {
    /// A reading captured just now
    pub fn gesture(reading: GestureReading) -> Self {
        ArbiterInput::Gesture {
            reading,
            captured_at: Instant::now(),
        }
    }

    /// Capture time for gesture readings, `None` for voice
    pub fn captured_at(&self) -> Option<Instant> {
        match self {
            ArbiterInput::Gesture { captured_at, .. } => Some(*captured_at),
            ArbiterInput::Voice(_) => None,
        }
    }
}

/// The single owner of actuator state
pub struct CommandArbiter<L, F> {
    link: L,
    feedback: F,
    /// Last state that reached the actuator; `None` until the first success
    commanded: Option<ActuatorState>,
    /// Last finger count acted upon (frame debounce)
    last_observed: Option<i8>,
    /// Gap between gesture commands
    command_timer: CooldownTimer,
    /// Gap between "no hand" notices
    notice_timer: CooldownTimer,
    /// Channel for emitting arbiter events
    event_tx: broadcast::Sender<ArbiterEvent>,
}

impl<L: ActuatorLink, F: Feedback> CommandArbiter<L, F> {
    pub fn new(
        link: L,
        feedback: F,
        cooldown: Duration,
        event_tx: broadcast::Sender<ArbiterEvent>,
    ) -> Self {
        Self {
            link,
            feedback,
            commanded: None,
            last_observed: None,
            command_timer: CooldownTimer::new(cooldown),
            notice_timer: CooldownTimer::new(cooldown),
            event_tx,
        }
    }

    /// Last state successfully sent to the actuator
    pub fn commanded(&self) -> Option<ActuatorState> {
        self.commanded
    }

    /// Last finger count that passed the frame debounce
    pub fn last_observed(&self) -> Option<i8> {
        self.last_observed
    }

    pub fn cooldown(&self) -> Duration {
        self.command_timer.min_interval()
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    /// Process inputs until every sender is gone
    pub async fn run(&mut self, mut input_rx: mpsc::Receiver<ArbiterInput>) {
        info!(
            cooldown_ms = self.cooldown().as_millis() as u64,
            "command arbiter started"
        );

        while let Some(input) = input_rx.recv().await {
            // Readings that waited in the queue are judged at capture time.
            let now = input.captured_at().unwrap_or_else(Instant::now);
            self.handle(input, now);
        }

        info!("command arbiter stopped");
    }

    /// Apply one input observed at `now`
    pub fn handle(&mut self, input: ArbiterInput, now: Instant) {
        match input {
            ArbiterInput::Gesture { reading, .. } => self.handle_gesture(reading, now),
            ArbiterInput::Voice(parsed) => self.handle_voice(parsed, now),
        }
    }

    fn handle_gesture(&mut self, reading: GestureReading, now: Instant) {
        if !reading.detected {
            self.notice_no_hand(now);
            return;
        }

        let count = reading.finger_count;
        if self.last_observed == Some(count) {
            return;
        }

        // A new pose inside the cooldown is not recorded, so it fires as
        // soon as the cooldown expires if it is still being held.
        if !self.command_timer.is_ready(now) {
            debug!(count, "finger count changed during cooldown");
            return;
        }

        let settled = match ActuatorState::from_finger_count(count) {
            Some(target) if self.commanded == Some(target) => {
                debug!(count, %target, "already commanded, restarting cooldown");
                self.command_timer.restart(now);
                true
            }
            Some(target) => self.commit(CommandIntent::new(target, CommandSource::Gesture, now)),
            None => {
                debug!(count, "finger count maps to no command");
                true
            }
        };

        // A failed write leaves the pose unobserved so the next frame retries it.
        if settled {
            self.last_observed = Some(count);
        }
    }

    fn handle_voice(&mut self, parsed: ParsedVoice, now: Instant) {
        match parsed.command {
            Some(target) => {
                self.commit(CommandIntent::new(target, CommandSource::Voice, now));
            }
            None => {
                info!(transcript = %parsed.transcript, "voice command not recognized");
                self.feedback.speak(NOT_RECOGNIZED_PHRASE);
                self.emit(ArbiterEvent::NotUnderstood {
                    transcript: parsed.transcript,
                });
            }
        }
    }

    fn notice_no_hand(&mut self, now: Instant) {
        if !self.notice_timer.has_expired(now) {
            return;
        }

        info!("no hand detected");
        self.feedback.speak(NO_HAND_PHRASE);
        self.emit(ArbiterEvent::NoHand);
        self.notice_timer.restart(now);
    }

    /// Send `intent` and, only if the write succeeded, record it.
    ///
    /// Returns whether the actuator was reached.
    fn commit(&mut self, intent: CommandIntent) -> bool {
        let CommandIntent {
            target,
            source,
            timestamp,
        } = intent;

        if let Err(e) = self.link.send(target) {
            warn!(%target, %source, error = %e, "command dropped");
            self.emit(ArbiterEvent::LinkFailed {
                state: target,
                source,
                reason: e.to_string(),
            });
            return false;
        }

        let previous = self.commanded.replace(target);
        self.command_timer.restart(timestamp);

        info!(
            from = ?previous,
            to = %target,
            %source,
            "actuator commanded"
        );

        self.feedback.speak(target.phrase());
        self.emit(ArbiterEvent::Commanded {
            state: target,
            previous,
            source,
        });
        true
    }

    fn emit(&self, event: ArbiterEvent) {
        debug!(%event, "emitting arbiter event");
        let _ = self.event_tx.send(event);
    }
}
