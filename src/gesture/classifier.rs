//! Extended-finger counting
//!
//! Turns one frame's hand keypoints into a [`GestureReading`]. The
//! geometry assumes an upright hand facing the camera in a mirrored
//! (selfie) view.

use tracing::debug;

use super::landmarks::{Handedness, HandLandmarks, LandmarkFrame, FINGER_TIPS};

/// Which digits are extended, thumb first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FingerState(pub [bool; 5]);

impl FingerState {
    pub fn thumb(&self) -> bool {
        self.0[0]
    }

    pub fn count(&self) -> u8 {
        self.0.iter().filter(|&&extended| extended).count() as u8
    }
}

/// Classification of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureReading {
    /// Number of extended fingers, `-1` when no hand was seen
    pub finger_count: i8,
    pub detected: bool,
}

impl GestureReading {
    pub fn no_hand() -> Self {
        Self {
            finger_count: -1,
            detected: false,
        }
    }

    pub fn fingers(count: u8) -> Self {
        Self {
            finger_count: count.min(5) as i8,
            detected: true,
        }
    }
}

/// Classifies landmark frames into finger counts
#[derive(Debug, Clone, Copy, Default)]
pub struct HandPoseClassifier;

impl HandPoseClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a whole frame.
    ///
    /// When several hands are present the first one reported by the
    /// tracker wins; the rest are ignored.
    pub fn classify_frame(&self, frame: &LandmarkFrame) -> GestureReading {
        match frame.hands.first() {
            Some(hand) => self.classify_hand(hand),
            None => GestureReading::no_hand(),
        }
    }

    pub fn classify_hand(&self, hand: &HandLandmarks) -> GestureReading {
        match self.finger_state(hand) {
            Some(fingers) => GestureReading::fingers(fingers.count()),
            None => {
                debug!(points = hand.landmarks.len(), "incomplete hand, treating as no hand");
                GestureReading::no_hand()
            }
        }
    }

    /// Per-digit extension, or `None` if the hand is missing keypoints
    pub fn finger_state(&self, hand: &HandLandmarks) -> Option<FingerState> {
        if !hand.is_complete() {
            return None;
        }
        let lm = &hand.landmarks;
        let mut fingers = [false; 5];

        // Thumb bends sideways, so compare x against the joint two below the tip.
        let tip = lm[FINGER_TIPS[0]];
        let joint = lm[FINGER_TIPS[0] - 2];
        fingers[0] = match hand.handedness.unwrap_or_default() {
            Handedness::Right => tip.x < joint.x,
            Handedness::Left => tip.x > joint.x,
        };

        for (i, &tip_idx) in FINGER_TIPS.iter().enumerate().skip(1) {
            fingers[i] = lm[tip_idx].y < lm[tip_idx - 2].y;
        }

        Some(FingerState(fingers))
    }
}
